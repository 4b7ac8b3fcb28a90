//! Vertical axis smoothing core with position lock.
//!
//! Shared by the altitude task and the three-axis position task. The
//! owning task drives one tick in three calls, with its own work
//! (raw target, limits, reset check) in between:
//!
//! 1. [`VerticalSmoothing::advance`] - evaluate the profile at `t + dt`
//! 2. [`VerticalSmoothing::apply_limits`] - direction-dependent limits
//! 3. [`VerticalSmoothing::update`] - lock/unlock, re-plan, publish
//!
//! Down-positive (NED) convention throughout.

use tracing::{debug, trace};

use mcsv_common::consts::{
    HOLD_SNAP_VELOCITY, LOCK_ACCELERATION_THRESHOLD, LOCK_VELOCITY_THRESHOLD, TARGET_EPSILON,
};
use mcsv_common::limits::AxisLimits;
use mcsv_common::setpoint::AxisSetpoint;

use crate::lock::PositionLock;
use crate::reset::Resynchronize;
use crate::smoothing::velocity::Trajectory;
use crate::smoothing::{TrajectorySmoother, VelocitySmoothing};

/// Single-axis smoother plus lock state for the vertical axis.
#[derive(Debug, Clone)]
pub struct VerticalSmoothing<S: TrajectorySmoother = VelocitySmoothing> {
    smoothing: S,
    lock: PositionLock<f32>,
    /// Profile sample taken by the last `advance`.
    sample: Trajectory,
    velocity_setpoint_feedback: f32,
}

impl<S: TrajectorySmoother + Default> Default for VerticalSmoothing<S> {
    fn default() -> Self {
        Self::with_smoother(S::default())
    }
}

impl<S: TrajectorySmoother> VerticalSmoothing<S> {
    pub fn with_smoother(smoothing: S) -> Self {
        Self {
            smoothing,
            lock: PositionLock::Unlocked,
            sample: Trajectory::default(),
            velocity_setpoint_feedback: 0.0,
        }
    }

    /// Seed the smoother and start unlocked.
    pub fn reset(&mut self, accel: f32, vel: f32, pos: f32) {
        self.smoothing.reset(accel, vel, pos);
        self.sample = Trajectory {
            j: 0.0,
            a: accel,
            v: vel,
            x: pos,
        };
        self.lock = PositionLock::Unlocked;
    }

    #[inline]
    pub fn set_velocity_setpoint_feedback(&mut self, feedback: f32) {
        self.velocity_setpoint_feedback = feedback;
    }

    /// Evaluate the current profile `dt` seconds ahead and sample it.
    pub fn advance(&mut self, dt: f32) {
        self.smoothing.update_traj(dt);
        self.sample = Trajectory {
            j: self.smoothing.current_jerk(),
            a: self.smoothing.current_acceleration(),
            v: self.smoothing.current_velocity(),
            x: self.smoothing.current_position(),
        };
    }

    /// Acceleration/velocity pair for this tick plus the jerk bound.
    pub fn apply_limits(&mut self, limits: AxisLimits, max_jerk: f32) {
        self.smoothing.set_max_accel(limits.max_accel);
        self.smoothing.set_max_vel(limits.max_vel);
        self.smoothing.set_max_jerk(max_jerk);
    }

    /// Lock handling, re-plan towards `velocity_target` and build the
    /// setpoint from the sample taken by [`advance`](Self::advance).
    pub fn update(&mut self, velocity_target: f32, position_estimate: f32) -> AxisSetpoint<f32> {
        let target_active = velocity_target.abs() > TARGET_EPSILON;

        if target_active && self.lock.release() {
            // The position loop output vanishes with the lock; continue
            // from the velocity the controller was really commanded.
            self.smoothing
                .set_current_velocity(self.velocity_setpoint_feedback);
            debug!(
                vz = self.velocity_setpoint_feedback,
                "z position lock released"
            );
        }

        self.smoothing.update_durations(velocity_target);

        if !self.lock.is_locked() {
            self.smoothing.set_current_position(position_estimate);
        }

        let mut setpoint = AxisSetpoint {
            jerk: self.sample.j,
            acceleration: self.sample.a,
            velocity: self.sample.v,
            position: None,
        };

        if self.sample.v.abs() < LOCK_VELOCITY_THRESHOLD
            && self.sample.a.abs() < LOCK_ACCELERATION_THRESHOLD
            && !target_active
            && self.lock.engage(self.sample.x)
        {
            debug!(z = self.sample.x, "z position lock engaged");
        }

        if let Some(held) = self.lock.position() {
            setpoint.position = Some(held);

            if setpoint.velocity.abs() < HOLD_SNAP_VELOCITY
                && setpoint.acceleration.abs() < TARGET_EPSILON
            {
                setpoint.velocity = 0.0;
                setpoint.acceleration = 0.0;
                self.smoothing.set_current_velocity(0.0);
                self.smoothing.set_current_acceleration(0.0);
            }
        }

        trace!(
            vz = setpoint.velocity,
            az = setpoint.acceleration,
            locked = self.lock.is_locked(),
            "z smoothing tick"
        );
        setpoint
    }

    #[inline]
    pub fn is_position_locked(&self) -> bool {
        self.lock.is_locked()
    }

    #[inline]
    pub fn locked_position(&self) -> Option<f32> {
        self.lock.position()
    }

    #[inline]
    pub fn smoother(&self) -> &S {
        &self.smoothing
    }
}

impl<S: TrajectorySmoother> Resynchronize for VerticalSmoothing<S> {
    type Value = f32;

    fn set_current_position(&mut self, position: f32) {
        self.smoothing.set_current_position(position);
    }

    fn set_current_velocity(&mut self, velocity: f32) {
        self.smoothing.set_current_velocity(velocity);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
