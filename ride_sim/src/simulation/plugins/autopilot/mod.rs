// ride_sim/src/simulation/plugins/autopilot/mod.rs

//! Scripted driving for runs without a keyboard: hover in place for a moment,
//! start every vehicle, then hold the throttle while the steer sweeps as a sine.
//! Used when the scenario has `[simulation.autopilot]`, and by default when
//! running headless.

use std::f32::consts::TAU;

use crate::cli::Cli;
use crate::prelude::*;
use crate::simulation::config::structs::AutopilotConfig;
use crate::simulation::plugins::vehicles::hovercraft::HovercraftInput;

#[derive(Resource, Default, Debug)]
struct AutopilotClock {
    config: Option<AutopilotConfig>,
    /// Seconds of fixed time since the scene started running.
    elapsed: f32,
    started: bool,
}

/// One tick of autopilot output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutopilotCommand {
    pub steer: f32,
    pub throttle: f32,
    pub start: bool,
}

/// What the autopilot wants `elapsed` seconds into the run. Before the start
/// delay it holds still; `start` is raised from then on.
pub fn autopilot_command(config: &AutopilotConfig, elapsed: f32) -> AutopilotCommand {
    let driving = elapsed - config.start_delay_seconds;
    if driving < 0.0 {
        return AutopilotCommand {
            steer: 0.0,
            throttle: 0.0,
            start: false,
        };
    }
    let phase = if config.steer_period_seconds > 0.0 {
        TAU * driving / config.steer_period_seconds
    } else {
        0.0
    };
    AutopilotCommand {
        steer: (config.steer_amplitude * phase.sin()).clamp(-1.0, 1.0),
        throttle: config.throttle.clamp(-1.0, 1.0),
        start: true,
    }
}

/// Resolved once the scene runs: the scenario's autopilot, or the default one
/// for headless runs that did not configure it.
pub fn active_autopilot(configured: Option<AutopilotConfig>, headless: bool) -> Option<AutopilotConfig> {
    configured.or_else(|| headless.then(AutopilotConfig::default))
}

pub struct AutopilotPlugin;

impl Plugin for AutopilotPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutopilotClock>()
            .add_systems(OnEnter(AppState::Running), engage_autopilot)
            .add_systems(FixedUpdate, drive_autopilot.in_set(SimulationSet::Input));
    }
}

fn engage_autopilot(
    scenario: Res<ScenarioConfig>,
    cli: Option<Res<Cli>>,
    mut clock: ResMut<AutopilotClock>,
) {
    let headless = cli.is_some_and(|cli| cli.headless);
    clock.config = active_autopilot(scenario.simulation.autopilot, headless);

    if let Some(autopilot) = &clock.config {
        info!(
            "[RIDE] Autopilot engaged: throttle {:.2}, steer ±{:.2} every {:.1} s after {:.1} s.",
            autopilot.throttle,
            autopilot.steer_amplitude,
            autopilot.steer_period_seconds,
            autopilot.start_delay_seconds
        );
    }
}

fn drive_autopilot(
    time: Res<Time>,
    mut clock: ResMut<AutopilotClock>,
    mut inputs: Query<&mut HovercraftInput>,
) {
    let Some(autopilot) = clock.config else {
        return;
    };
    clock.elapsed += time.delta_secs();
    let command = autopilot_command(&autopilot, clock.elapsed);

    // `start` is only passed on once; a crashed vehicle stays Idle.
    let start_now = command.start && !clock.started;
    if start_now {
        info!("[RIDE] Autopilot starting all vehicles.");
        clock.started = true;
    }

    for mut input in &mut inputs {
        input.steer = command.steer;
        input.throttle = command.throttle;
        input.start_requested |= start_now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn config() -> AutopilotConfig {
        AutopilotConfig {
            throttle: 0.6,
            steer_amplitude: 0.5,
            steer_period_seconds: 4.0,
            start_delay_seconds: 1.0,
        }
    }

    #[test]
    fn holds_still_before_the_delay() {
        let command = autopilot_command(&config(), 0.5);
        assert!(!command.start);
        assert_eq!(command.throttle, 0.0);
        assert_eq!(command.steer, 0.0);
    }

    #[test]
    fn steer_sweeps_as_a_sine() {
        let c = config();
        assert!(autopilot_command(&c, 1.0).start);
        assert_abs_diff_eq!(autopilot_command(&c, 1.0).steer, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(autopilot_command(&c, 2.0).steer, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(autopilot_command(&c, 4.0).steer, -0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(autopilot_command(&c, 2.0).throttle, 0.6);
    }

    #[test]
    fn headless_runs_fall_back_to_the_default_autopilot() {
        assert_eq!(active_autopilot(None, true), Some(AutopilotConfig::default()));
        assert_eq!(active_autopilot(None, false), None);
        assert_eq!(active_autopilot(Some(config()), false), Some(config()));
    }

    #[test]
    fn out_of_range_settings_are_clamped() {
        let c = AutopilotConfig {
            throttle: 3.0,
            steer_amplitude: 2.0,
            steer_period_seconds: 0.0,
            start_delay_seconds: 0.0,
        };
        let command = autopilot_command(&c, 10.0);
        assert_eq!(command.throttle, 1.0);
        assert_eq!(command.steer, 0.0);
    }
}
