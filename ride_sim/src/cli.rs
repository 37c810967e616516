use bevy::prelude::Resource;
use clap::Parser;
use std::path::PathBuf;

use crate::simulation::config::DEFAULT_CATALOG_ROOT;

/// Ride: a hovercraft controller running on a rigid-body sandbox.
///
/// Any binary built on the `ride_sim` library accepts these arguments.
#[derive(Parser, Debug, Resource, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/hover_track.toml")]
    pub scenario: PathBuf,

    /// Run without a window. Vehicles are driven by the scenario's autopilot.
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Overrides `simulation.seed` from the scenario.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Root directory of the prefab catalog.
    #[arg(long, default_value = DEFAULT_CATALOG_ROOT)]
    pub catalog: PathBuf,
}

impl Default for Cli {
    fn default() -> Self {
        Self::parse_from(["ride"])
    }
}
