//! Manual altitude task with jerk-limited vertical smoothing.
//!
//! Only the vertical axis is smoothed. Horizontal motion and attitude are
//! left to the surrounding manual mode. Yaw is passed through from the
//! raw target provider.
//!
//! ## Tick order ([`AltitudeSmoothingTask::update`])
//!
//! 1. advance the smoother by `dt` and sample (j, a, v, x)
//! 2. fetch the raw target
//! 3. select climb/descent limits from the target sign; set jerk
//! 4. resynchronize on estimator resets
//! 5. unlock on a non-zero target, re-plan, publish (see
//!    [`VerticalSmoothing::update`])

use tracing::{debug, warn};

use mcsv_common::estimator::VehicleLocalPosition;
use mcsv_common::limits::SmoothingLimits;
use mcsv_common::setpoint::{AltitudeSetpoint, Axis, LocalPositionSetpoint};

use super::RawTargetProvider;
use super::vertical::VerticalSmoothing;
use crate::constraints::select_limits;
use crate::reset::{EkfResetTracker, ResetEvents};
use crate::sanitize::sanitize;
use crate::smoothing::{TrajectorySmoother, VelocitySmoothing};

/// Altitude task: vertical smoothing + position lock.
#[derive(Debug, Clone)]
pub struct AltitudeSmoothingTask<P, S: TrajectorySmoother = VelocitySmoothing> {
    input: P,
    limits: SmoothingLimits,
    vertical: VerticalSmoothing<S>,
    reset_tracker: EkfResetTracker,
    local_position: VehicleLocalPosition,
    setpoint: AltitudeSetpoint,
}

impl<P: RawTargetProvider> AltitudeSmoothingTask<P> {
    pub fn new(input: P, limits: SmoothingLimits) -> Self {
        Self::with_smoother(input, limits, VelocitySmoothing::default())
    }
}

impl<P: RawTargetProvider, S: TrajectorySmoother> AltitudeSmoothingTask<P, S> {
    pub fn with_smoother(input: P, limits: SmoothingLimits, smoother: S) -> Self {
        Self {
            input,
            limits,
            vertical: VerticalSmoothing::with_smoother(smoother),
            reset_tracker: EkfResetTracker::default(),
            local_position: VehicleLocalPosition::default(),
            setpoint: AltitudeSetpoint::default(),
        }
    }

    /// Replace the tunables; takes effect on the next tick.
    #[inline]
    pub fn set_limits(&mut self, limits: SmoothingLimits) {
        self.limits = limits;
    }

    /// Latest estimator sample; call before `activate` and every tick.
    #[inline]
    pub fn set_local_position(&mut self, local_position: VehicleLocalPosition) {
        self.local_position = local_position;
    }

    /// Vertical velocity setpoint actually sent to the controller last tick.
    #[inline]
    pub fn set_velocity_setpoint_feedback(&mut self, vz: f32) {
        self.vertical.set_velocity_setpoint_feedback(vz);
    }

    /// Switch into this task, continuing from `previous`.
    ///
    /// Returns `false` without touching any state when the estimate
    /// itself is not finite, since the NaN fallbacks would be unusable.
    pub fn activate(&mut self, previous: &LocalPositionSetpoint) -> bool {
        if !self.local_position.is_z_finite() {
            warn!("altitude task activation refused: vertical estimate not finite");
            return false;
        }

        let seed = sanitize(
            previous.axis(Axis::Z),
            self.local_position.position.z,
            self.local_position.velocity.z,
        );
        self.vertical
            .reset(seed.acceleration, seed.velocity, seed.position);
        self.reset_tracker.init(self.local_position.z_counters());
        self.setpoint = AltitudeSetpoint::default();

        debug!(
            z = seed.position,
            vz = seed.velocity,
            az = seed.acceleration,
            "altitude task activated"
        );
        true
    }

    /// Re-arm while landed: zero derivatives at the measured altitude, so a
    /// later takeoff starts with a clean jerk onset.
    ///
    /// Refused like [`activate`](Self::activate) when the vertical
    /// estimate is not finite.
    pub fn re_activate(&mut self) -> bool {
        if !self.local_position.is_z_finite() {
            warn!("altitude task re-activation refused: vertical estimate not finite");
            return false;
        }

        self.vertical.reset(0.0, 0.0, self.local_position.position.z);
        self.reset_tracker.init(self.local_position.z_counters());
        self.setpoint = AltitudeSetpoint::default();
        true
    }

    /// One control tick.
    pub fn update(&mut self, dt: f32) -> AltitudeSetpoint {
        self.vertical.advance(dt);

        let raw = self.input.raw_target(dt);
        let target_z = raw.velocity.z;

        self.vertical
            .apply_limits(select_limits(&self.limits, target_z), self.limits.max_jerk);

        self.check_ekf_resets();

        let z = self
            .vertical
            .update(target_z, self.local_position.position.z);

        self.setpoint = AltitudeSetpoint {
            z,
            yaw: raw.yaw,
            yaw_rate: raw.yaw_rate,
        };
        self.setpoint
    }

    fn check_ekf_resets(&mut self) -> ResetEvents {
        self.reset_tracker.check(
            self.local_position.z_counters(),
            self.local_position.position.z,
            self.local_position.velocity.z,
            &mut self.vertical,
        )
    }

    /// Setpoint published by the last tick.
    #[inline]
    pub fn setpoint(&self) -> AltitudeSetpoint {
        self.setpoint
    }

    #[inline]
    pub fn is_position_locked(&self) -> bool {
        self.vertical.is_position_locked()
    }

    #[inline]
    pub fn locked_position(&self) -> Option<f32> {
        self.vertical.locked_position()
    }

    #[inline]
    pub fn smoother(&self) -> &S {
        self.vertical.smoother()
    }

    #[inline]
    pub fn limits(&self) -> &SmoothingLimits {
        &self.limits
    }

    #[inline]
    pub fn input_mut(&mut self) -> &mut P {
        &mut self.input
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
