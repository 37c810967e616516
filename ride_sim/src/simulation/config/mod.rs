// ride_sim/src/simulation/config/mod.rs

//! Loading, resolving and validating everything a run needs from disk: the
//! scenario file, the prefab catalog, and the per-vehicle controller tuning.

mod catalog;
mod resolver;

pub mod structs;

use bevy::prelude::*;
use figment::{
    providers::{Format, Toml},
    Figment,
};
use ride_core::errors::ConfigError;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::Cli;
use crate::simulation::core::app_state::AppState;
pub use catalog::{PrefabCatalog, DEFAULT_CATALOG_ROOT};
pub use resolver::resolve_vehicle_value;
pub use structs::{ScenarioConfig, VehicleConfig};

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("scenario file {0:?} does not exist")]
    MissingScenario(PathBuf),

    #[error("failed to read or parse scenario {path:?}: {source}")]
    Scenario {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("prefab '{0}' not found in catalog")]
    UnknownPrefab(String),

    #[error("prefab '{0}' must resolve to a table to be merged")]
    PrefabNotATable(String),

    #[error("prefab chain through '{0}' is too deep, is there a `from` cycle?")]
    PrefabTooDeep(String),

    #[error("vehicle #{index} does not match the vehicle schema: {source}")]
    VehicleShape {
        index: usize,
        #[source]
        source: Box<figment::Error>,
    },

    #[error("vehicle '{name}' has an invalid ride configuration: {source}")]
    InvalidRide {
        name: String,
        #[source]
        source: ConfigError,
    },
}

/// The final, concrete vehicle configurations, in scenario order.
#[derive(Resource, Default, Debug, Clone)]
pub struct ResolvedVehicles(pub Vec<VehicleConfig>);

/// Reads `scenario_path`, resolves each vehicle against `catalog` and validates
/// its ride configuration. Stops at the first problem.
pub fn load_scenario(
    scenario_path: &Path,
    catalog: &PrefabCatalog,
) -> Result<(ScenarioConfig, Vec<VehicleConfig>), ConfigLoadError> {
    if !scenario_path.exists() {
        return Err(ConfigLoadError::MissingScenario(scenario_path.to_path_buf()));
    }
    let scenario: ScenarioConfig = Figment::new()
        .merge(Toml::file(scenario_path))
        .extract()
        .map_err(|e| ConfigLoadError::Scenario {
            path: scenario_path.to_path_buf(),
            source: Box::new(e),
        })?;

    let vehicles = resolve_vehicles(&scenario, catalog)?;
    Ok((scenario, vehicles))
}

/// Resolves and validates the raw `[[vehicles]]` entries of `scenario`.
pub fn resolve_vehicles(
    scenario: &ScenarioConfig,
    catalog: &PrefabCatalog,
) -> Result<Vec<VehicleConfig>, ConfigLoadError> {
    let gravity = scenario.world.gravity_magnitude();
    let mut vehicles = Vec::with_capacity(scenario.vehicles.len());

    for (index, raw) in scenario.vehicles.iter().enumerate() {
        let resolved = resolve_vehicle_value(raw, catalog)?;
        let vehicle: VehicleConfig =
            resolved
                .deserialize()
                .map_err(|e| ConfigLoadError::VehicleShape {
                    index,
                    source: Box::new(e),
                })?;

        vehicle
            .ride
            .validate()
            .map_err(|source| ConfigLoadError::InvalidRide {
                name: vehicle.name.clone(),
                source,
            })?;

        if (vehicle.ride.gravity - gravity).abs() > 1e-3 {
            warn!(
                "[CONFIG] Vehicle '{}' sizes its lift for g = {:.2} but the world uses {:.2}.",
                vehicle.name, vehicle.ride.gravity, gravity
            );
        }
        info!("[CONFIG] Resolved vehicle '{}'.", vehicle.name);
        vehicles.push(vehicle);
    }
    Ok(vehicles)
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ResolvedVehicles>()
            .init_resource::<PrefabCatalog>()
            .init_resource::<ScenarioConfig>()
            .add_systems(OnEnter(AppState::AssetLoading), load_configuration);
    }
}

fn load_configuration(
    cli: Option<Res<Cli>>,
    mut scenario_res: ResMut<ScenarioConfig>,
    mut catalog_res: ResMut<PrefabCatalog>,
    mut vehicles_res: ResMut<ResolvedVehicles>,
    mut next_state: ResMut<NextState<AppState>>,
    mut exit: EventWriter<AppExit>,
) {
    let cli = cli.map(|c| c.clone()).unwrap_or_default();
    info!("[CONFIG] Loading scenario from: {:?}", cli.scenario);

    let catalog = PrefabCatalog::load_from_dir(&cli.catalog);
    match load_scenario(&cli.scenario, &catalog) {
        Ok((mut scenario, vehicles)) => {
            if let Some(seed) = cli.seed {
                info!("[CONFIG] Seed overridden from the command line: {}", seed);
                scenario.simulation.seed = Some(seed);
            }
            *scenario_res = scenario;
            *catalog_res = catalog;
            vehicles_res.0 = vehicles;
            info!("[CONFIG] Configuration complete. Transitioning to SceneBuilding.");
            next_state.set(AppState::SceneBuilding);
        }
        Err(e) => {
            error!("[CONFIG] {}", e);
            exit.write(AppExit::error());
        }
    }
}
