// ride_core/src/dynamics/vehicle.rs

use crate::config::{CrashConfig, DriveConfig, RideConfig};
use crate::dynamics::forces::{clamp_forward, drag, throttle_force, LateralCancel};
use crate::dynamics::steering::{integrate_turn_rate, turn_rate_ceiling, yaw_increment};
use crate::errors::ConfigError;
use crate::messages::{ContactReport, CrashResponse, TickOutput, VehicleEvent};
use crate::models::hover::HoverForceModel;
use crate::sensing::GroundQuery;
use crate::types::{up, BodyState, InputVector};
use crate::utils::math::normalize_or_zero;
use nalgebra::{UnitQuaternion, Vector3};
use tracing::{debug, info};

/// Slack on the bump-angle comparison so a normal exactly at the limit stays a bump.
const BUMP_COSINE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Drag only. The initial mode, and the terminal one after a crash.
    #[default]
    Idle,
    Moving,
}

/// Mutable per-vehicle state, advanced once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VehicleState {
    pub mode: Mode,
    /// rad/s, positive to the right.
    pub turn_rate: f64,
    pub input: InputVector,
    pub airborne: bool,
    /// Set by the first qualifying crash and never cleared.
    pub crashed: bool,
    /// Body speed seen on the latest tick, used to size the crash rebound.
    pub last_speed: f64,
}

/// The root controller: steering, thrust, drag, hover and the crash state machine.
///
/// The host calls [`tick`](Self::tick) once per fixed physics step with a fresh
/// body snapshot and applies the returned force and yaw. Contacts are forwarded
/// through [`on_contact`](Self::on_contact).
#[derive(Debug, Clone)]
pub struct VehicleDynamics {
    drive: DriveConfig,
    crash: CrashConfig,
    hover: HoverForceModel,
    state: VehicleState,
}

impl VehicleDynamics {
    pub fn new(config: RideConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let hover = HoverForceModel::new(config.hover, config.sensor_grid, config.gravity)?;
        Ok(Self {
            drive: config.drive,
            crash: config.crash,
            hover,
            state: VehicleState::default(),
        })
    }

    pub fn set_input(&mut self, steer: f64, throttle: f64) {
        self.state.input = InputVector::new(steer, throttle);
    }

    /// Switches to Moving. Refused once the vehicle has crashed.
    pub fn start(&mut self) -> bool {
        if self.state.crashed {
            return false;
        }
        if self.state.mode != Mode::Moving {
            info!("Vehicle started.");
            self.state.mode = Mode::Moving;
        }
        true
    }

    pub fn tick(&mut self, body: &BodyState, ground: &dyn GroundQuery, dt: f64) -> TickOutput {
        self.state.last_speed = body.linear_velocity.norm();
        let drag_force = drag(&self.drive, &body.horizontal_velocity(), body.mass);

        if self.state.mode == Mode::Idle {
            return TickOutput {
                force: drag_force,
                ..TickOutput::default()
            };
        }

        let input = self.state.input;

        // --- Steering ---
        let ceiling = turn_rate_ceiling(&self.drive, body.linear_velocity.dot(&body.forward()));
        self.state.turn_rate =
            integrate_turn_rate(&self.drive, self.state.turn_rate, input.steer, ceiling);
        let yaw_rotation = yaw_increment(self.state.turn_rate, dt);

        // Cancel and thrust act along the heading after this tick's yaw.
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw_rotation);
        let forward = yaw * body.forward();
        let right = yaw * body.right();
        let forward_speed = body.linear_velocity.dot(&forward);

        let cancel = LateralCancel::compute(
            &self.drive,
            &body.linear_velocity,
            &right,
            self.state.turn_rate,
            ceiling,
            body.mass,
        );

        // --- Thrust ---
        let mut forward_force = throttle_force(&self.drive, input.throttle, forward_speed);
        if !self.state.airborne {
            forward_force += cancel.forwarded(self.drive.forwarded_cancel_fraction);
        }
        let forward_force = clamp_forward(&self.drive, forward_force, forward_speed, body.mass);

        let mut events = vec![VehicleEvent::SteerChanged {
            turn_rate: self.state.turn_rate,
            lateral_cancel_over_mass: cancel.along_right() / body.mass,
        }];

        // --- Hover ---
        let hover = self.hover.update(body, ground);
        events.push(VehicleEvent::TargetPitchChanged {
            pitch: hover.target_pitch,
        });

        let airborne = hover.reading.average_distance > self.hover.config().grounded_distance();
        if airborne != self.state.airborne {
            debug!("Air status changed: airborne = {}", airborne);
            self.state.airborne = airborne;
            events.push(VehicleEvent::AirStatusChanged { airborne });
        }

        TickOutput {
            force: right * cancel.along_right() + forward * forward_force + drag_force + hover.force,
            yaw_rotation,
            hover: Some(hover),
            events,
        }
    }

    /// Decides whether a contact is a crash. A qualifying contact ends the run:
    /// the vehicle goes Idle for good and the returned impulse knocks it back.
    pub fn on_contact(
        &mut self,
        contact: &ContactReport,
        body: &BodyState,
    ) -> Option<CrashResponse> {
        if self.state.mode != Mode::Moving || !contact.layers.intersects(self.crash.crash_layer) {
            return None;
        }
        if contact.impulse < self.crash.min_impulse_per_mass * body.mass {
            return None;
        }
        let normal = normalize_or_zero(&contact.normal);
        if normal == Vector3::zeros() {
            return None;
        }
        let vertical_cosine = normal.dot(&up()).abs().min(1.0);
        let bump_cosine = self.crash.max_bump_angle_deg.to_radians().cos();
        if vertical_cosine >= bump_cosine - BUMP_COSINE_TOLERANCE {
            debug!(
                "Contact {:.1} deg from vertical treated as a bump.",
                vertical_cosine.acos().to_degrees()
            );
            return None;
        }

        info!(
            "Vehicle crashed at {:.1} m/s (impulse {:.1} N·s).",
            self.state.last_speed, contact.impulse
        );
        self.state.mode = Mode::Idle;
        self.state.crashed = true;
        self.state.turn_rate = 0.0;

        Some(CrashResponse {
            impulse: normal * self.crash.rebound_factor * self.state.last_speed * body.mass,
            point: contact.point,
            release_constraints: true,
        })
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn turn_rate(&self) -> f64 {
        self.state.turn_rate
    }

    pub fn is_airborne(&self) -> bool {
        self.state.airborne
    }

    pub fn is_crashed(&self) -> bool {
        self.state.crashed
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn hover_model(&self) -> &HoverForceModel {
        &self.hover
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::PlaneGround;
    use crate::types::CollisionMask;
    use approx::assert_abs_diff_eq;

    const DT: f64 = 1.0 / 60.0;
    const G: f64 = 9.81;

    fn moving_vehicle() -> VehicleDynamics {
        let mut vehicle = VehicleDynamics::new(RideConfig::default()).unwrap();
        assert!(vehicle.start());
        vehicle
    }

    fn body(height: f64, velocity: Vector3<f64>) -> BodyState {
        BodyState {
            position: Vector3::new(0.0, height, 0.0),
            rotation: UnitQuaternion::identity(),
            linear_velocity: velocity,
            mass: 80.0,
        }
    }

    fn wall_hit(impulse: f64) -> ContactReport {
        ContactReport {
            point: Vector3::new(0.0, 0.5, -1.0),
            normal: Vector3::z(),
            impulse,
            layers: CollisionMask(0b100),
        }
    }

    #[test]
    fn starts_idle_and_idles_with_drag_only() {
        let mut vehicle = VehicleDynamics::new(RideConfig::default()).unwrap();
        assert_eq!(vehicle.mode(), Mode::Idle);
        vehicle.set_input(1.0, 1.0);

        let out = vehicle.tick(&body(0.5, Vector3::new(0.0, 0.0, -1.0)), &PlaneGround::flat(0.0), DT);
        assert!(out.events.is_empty());
        assert!(out.hover.is_none());
        assert_eq!(out.yaw_rotation, 0.0);
        assert_abs_diff_eq!(out.force, Vector3::new(0.0, 0.0, 40.0), epsilon = 1e-9);
    }

    #[test]
    fn at_rest_height_the_board_floats_still() {
        let mut vehicle = moving_vehicle();
        let ground = PlaneGround::flat(0.0);
        let out = vehicle.tick(&body(0.5, Vector3::zeros()), &ground, DT);

        assert_abs_diff_eq!(out.force.y, 80.0 * G, epsilon = 1e-9);
        assert_abs_diff_eq!(out.force.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.force.z, 0.0, epsilon = 1e-9);
        assert_eq!(out.yaw_rotation, 0.0);
        assert_eq!(
            out.events,
            vec![
                VehicleEvent::SteerChanged {
                    turn_rate: 0.0,
                    lateral_cancel_over_mass: 0.0
                },
                VehicleEvent::TargetPitchChanged { pitch: 0.0 },
            ]
        );
        assert!(!vehicle.is_airborne());
    }

    #[test]
    fn steering_right_yaws_negative() {
        let mut vehicle = moving_vehicle();
        vehicle.set_input(1.0, 0.0);
        let out = vehicle.tick(&body(0.5, Vector3::new(0.0, 0.0, -10.0)), &PlaneGround::flat(0.0), DT);
        assert!(vehicle.turn_rate() > 0.0);
        assert!(out.yaw_rotation < 0.0);
        assert_abs_diff_eq!(out.yaw_rotation, -vehicle.turn_rate() * DT, epsilon = 1e-12);
    }

    #[test]
    fn inputs_are_clamped() {
        let mut vehicle = moving_vehicle();
        vehicle.set_input(-3.0, 7.0);
        assert_eq!(vehicle.state().input, InputVector::new(-1.0, 1.0));
    }

    #[test]
    fn throttle_pushes_along_forward() {
        let mut vehicle = moving_vehicle();
        vehicle.set_input(0.0, 1.0);
        let out = vehicle.tick(&body(0.5, Vector3::zeros()), &PlaneGround::flat(0.0), DT);
        assert_abs_diff_eq!(out.force.z, -1600.0, epsilon = 1e-9);
    }

    #[test]
    fn no_net_push_at_max_speed() {
        let mut vehicle = moving_vehicle();
        vehicle.set_input(0.0, 1.0);
        let out = vehicle.tick(&body(0.5, Vector3::new(0.0, 0.0, -25.0)), &PlaneGround::flat(0.0), DT);
        // Forward is -Z, so a non-negative z means no forward push.
        assert!(out.force.z >= 0.0);
    }

    #[test]
    fn slip_is_cancelled_and_forwarded_only_while_grounded() {
        let mut vehicle = moving_vehicle();
        let ground = PlaneGround::flat(0.0);
        let sliding = Vector3::new(2.0, 0.0, 0.0);

        let grounded = vehicle.tick(&body(0.5, sliding), &ground, DT);
        // Cancel (-160) plus drag (-160) along X, a quarter of the cancel forwarded.
        assert_abs_diff_eq!(grounded.force.x, -320.0, epsilon = 1e-9);
        assert_abs_diff_eq!(grounded.force.z, -40.0, epsilon = 1e-9);

        // The first airborne tick still forwards; status is read from the previous tick.
        vehicle.tick(&body(1.5, sliding), &ground, DT);
        assert!(vehicle.is_airborne());
        let airborne = vehicle.tick(&body(1.5, sliding), &ground, DT);
        assert_abs_diff_eq!(airborne.force.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn air_status_is_reported_on_change_only() {
        let mut vehicle = moving_vehicle();
        let ground = PlaneGround::flat(0.0);
        let air_events = |out: &TickOutput| -> Vec<VehicleEvent> {
            out.events
                .iter()
                .filter(|e| matches!(e, VehicleEvent::AirStatusChanged { .. }))
                .copied()
                .collect()
        };

        let first = vehicle.tick(&body(0.9, Vector3::zeros()), &ground, DT);
        assert_eq!(air_events(&first), vec![VehicleEvent::AirStatusChanged { airborne: true }]);
        let second = vehicle.tick(&body(0.95, Vector3::zeros()), &ground, DT);
        assert!(air_events(&second).is_empty());
        let landed = vehicle.tick(&body(0.5, Vector3::zeros()), &ground, DT);
        assert_eq!(air_events(&landed), vec![VehicleEvent::AirStatusChanged { airborne: false }]);
    }

    #[test]
    fn a_hard_wall_hit_crashes_for_good() {
        let mut vehicle = moving_vehicle();
        vehicle.tick(&body(0.5, Vector3::new(0.0, 0.0, -10.0)), &PlaneGround::flat(0.0), DT);

        let response = vehicle
            .on_contact(&wall_hit(2000.0), &body(0.5, Vector3::zeros()))
            .expect("wall hit should crash");
        assert_abs_diff_eq!(response.impulse, Vector3::new(0.0, 0.0, 320.0), epsilon = 1e-9);
        assert_eq!(response.point, Vector3::new(0.0, 0.5, -1.0));
        assert!(response.release_constraints);

        assert_eq!(vehicle.mode(), Mode::Idle);
        assert!(vehicle.is_crashed());
        assert!(!vehicle.start());
        assert_eq!(vehicle.mode(), Mode::Idle);

        // A second hit while Idle changes nothing.
        assert!(vehicle
            .on_contact(&wall_hit(2000.0), &body(0.5, Vector3::zeros()))
            .is_none());
    }

    #[test]
    fn soft_bumps_and_floor_hits_are_ignored() {
        let mut vehicle = moving_vehicle();
        let still = body(0.5, Vector3::zeros());

        // Below 6 * 80 N·s.
        assert!(vehicle.on_contact(&wall_hit(479.0), &still).is_none());

        let landing = ContactReport {
            normal: Vector3::new(0.0, 1.0, 0.3),
            ..wall_hit(5000.0)
        };
        assert!(vehicle.on_contact(&landing, &still).is_none());
        assert_eq!(vehicle.mode(), Mode::Moving);
    }

    #[test]
    fn a_contact_exactly_at_the_bump_angle_is_a_bump() {
        let mut vehicle = moving_vehicle();
        let still = body(0.5, Vector3::zeros());

        let ramp_edge = ContactReport {
            normal: Vector3::new(0.0, 1.0, 1.0),
            ..wall_hit(5000.0)
        };
        assert!(vehicle.on_contact(&ramp_edge, &still).is_none());
        assert_eq!(vehicle.mode(), Mode::Moving);

        let steeper = ContactReport {
            normal: Vector3::new(0.0, 1.0, 1.01),
            ..wall_hit(5000.0)
        };
        assert!(vehicle.on_contact(&steeper, &still).is_some());
        assert!(vehicle.is_crashed());
    }

    #[test]
    fn an_impulse_of_exactly_the_threshold_crashes() {
        let mut vehicle = moving_vehicle();
        // 6 N·s per kg on an 80 kg board.
        assert!(vehicle
            .on_contact(&wall_hit(480.0), &body(0.5, Vector3::zeros()))
            .is_some());
        assert!(vehicle.is_crashed());
    }

    #[test]
    fn thrust_follows_the_heading_after_this_ticks_yaw() {
        let mut vehicle = moving_vehicle();
        vehicle.set_input(1.0, 1.0);
        let out = vehicle.tick(&body(0.5, Vector3::zeros()), &PlaneGround::flat(0.0), DT);
        assert!(out.yaw_rotation < 0.0);

        let heading = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), out.yaw_rotation)
            * Vector3::new(0.0, 0.0, -1.0);
        let horizontal = Vector3::new(out.force.x, 0.0, out.force.z);
        // Turning right swings the push towards +X.
        assert!(out.force.x > 0.0);
        assert_abs_diff_eq!(horizontal.normalize(), heading, epsilon = 1e-9);
        assert_abs_diff_eq!(horizontal.norm(), 1600.0, epsilon = 1e-9);
    }

    #[test]
    fn contacts_outside_the_crash_layer_are_ignored() {
        let mut config = RideConfig::default();
        config.crash.crash_layer = CollisionMask(0b010);
        let mut vehicle = VehicleDynamics::new(config).unwrap();
        vehicle.start();

        assert!(vehicle
            .on_contact(&wall_hit(5000.0), &body(0.5, Vector3::zeros()))
            .is_none());
        assert!(!vehicle.is_crashed());
    }

    #[test]
    fn idle_vehicle_never_crashes() {
        let mut vehicle = VehicleDynamics::new(RideConfig::default()).unwrap();
        assert!(vehicle
            .on_contact(&wall_hit(5000.0), &body(0.5, Vector3::zeros()))
            .is_none());
        assert!(vehicle.start());
    }
}
