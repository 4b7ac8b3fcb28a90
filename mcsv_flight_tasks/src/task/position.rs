//! Manual position task: joint XY smoothing plus vertical smoothing.
//!
//! The horizontal plane uses [`VelocitySmoothingXY`] with one joint lock;
//! the vertical axis uses the same [`VerticalSmoothing`] core as the
//! altitude task. The two locks are independent, so the vehicle can hold
//! altitude while translating and vice versa.

use nalgebra::{Vector2, Vector3};
use tracing::{debug, warn};

use mcsv_common::estimator::VehicleLocalPosition;
use mcsv_common::limits::SmoothingLimits;
use mcsv_common::setpoint::{Axis, LocalPositionSetpoint, TrajectorySetpoint};

use super::RawTargetProvider;
use super::vertical::VerticalSmoothing;
use crate::constraints::select_limits;
use crate::reset::EkfResetTracker;
use crate::sanitize::sanitize_setpoint;
use crate::smoothing::{TrajectorySmoother, VelocitySmoothing, VelocitySmoothingXY};

/// Three-axis manual position task.
#[derive(Debug, Clone)]
pub struct PositionSmoothingTask<P, S: TrajectorySmoother = VelocitySmoothing> {
    input: P,
    limits: SmoothingLimits,
    horizontal: VelocitySmoothingXY<S>,
    vertical: VerticalSmoothing<S>,
    xy_reset_tracker: EkfResetTracker,
    z_reset_tracker: EkfResetTracker,
    local_position: VehicleLocalPosition,
    velocity_setpoint_feedback: Vector3<f32>,
    setpoint: TrajectorySetpoint,
}

impl<P: RawTargetProvider> PositionSmoothingTask<P> {
    pub fn new(input: P, limits: SmoothingLimits) -> Self {
        Self::with_smoothers(input, limits, Default::default(), Default::default())
    }
}

impl<P: RawTargetProvider, S: TrajectorySmoother> PositionSmoothingTask<P, S> {
    pub fn with_smoothers(
        input: P,
        limits: SmoothingLimits,
        horizontal: [S; 2],
        vertical: S,
    ) -> Self {
        Self {
            input,
            limits,
            horizontal: VelocitySmoothingXY::with_smoothers(horizontal),
            vertical: VerticalSmoothing::with_smoother(vertical),
            xy_reset_tracker: EkfResetTracker::default(),
            z_reset_tracker: EkfResetTracker::default(),
            local_position: VehicleLocalPosition::default(),
            velocity_setpoint_feedback: Vector3::zeros(),
            setpoint: TrajectorySetpoint::default(),
        }
    }

    #[inline]
    pub fn set_limits(&mut self, limits: SmoothingLimits) {
        self.limits = limits;
    }

    #[inline]
    pub fn set_local_position(&mut self, local_position: VehicleLocalPosition) {
        self.local_position = local_position;
    }

    /// Velocity setpoint actually sent to the controller last tick.
    #[inline]
    pub fn set_velocity_setpoint_feedback(&mut self, feedback: Vector3<f32>) {
        self.velocity_setpoint_feedback = feedback;
        self.vertical.set_velocity_setpoint_feedback(feedback.z);
    }

    fn init_reset_counters(&mut self) {
        self.xy_reset_tracker.init(self.local_position.xy_counters());
        self.z_reset_tracker.init(self.local_position.z_counters());
    }

    /// Switch into this task, continuing from `previous`.
    ///
    /// Returns `false` without touching any state when the estimate is
    /// not finite on every axis.
    pub fn activate(&mut self, previous: &LocalPositionSetpoint) -> bool {
        if !(self.local_position.is_xy_finite() && self.local_position.is_z_finite()) {
            warn!("position task activation refused: estimate not finite");
            return false;
        }

        let seed = sanitize_setpoint(previous, &self.local_position);
        let (sx, sy, sz) = (seed.axis(Axis::X), seed.axis(Axis::Y), seed.axis(Axis::Z));

        self.horizontal.reset(
            Vector2::new(sx.acceleration, sy.acceleration),
            Vector2::new(sx.velocity, sy.velocity),
            Vector2::new(sx.position, sy.position),
        );
        self.vertical
            .reset(sz.acceleration, sz.velocity, sz.position);
        self.init_reset_counters();
        self.setpoint = TrajectorySetpoint::default();

        debug!(
            x = sx.position,
            y = sy.position,
            z = sz.position,
            "position task activated"
        );
        true
    }

    /// Re-arm while landed. XY keeps the measured drift velocity; Z starts
    /// from rest so takeoff produces a clean jerk onset.
    ///
    /// Refused like [`activate`](Self::activate) when the estimate is not
    /// finite on every axis.
    pub fn re_activate(&mut self) -> bool {
        if !(self.local_position.is_xy_finite() && self.local_position.is_z_finite()) {
            warn!("position task re-activation refused: estimate not finite");
            return false;
        }

        self.horizontal.reset(
            Vector2::zeros(),
            self.local_position.velocity_xy(),
            self.local_position.position_xy(),
        );
        self.vertical.reset(0.0, 0.0, self.local_position.position.z);
        self.init_reset_counters();
        self.setpoint = TrajectorySetpoint::default();
        true
    }

    /// One control tick.
    pub fn update(&mut self, dt: f32) -> TrajectorySetpoint {
        self.vertical.advance(dt);

        let raw = self.input.raw_target(dt);
        let target_xy = raw.velocity.xy();
        let target_z = raw.velocity.z;

        let horizontal_limits = self.limits.horizontal();
        self.horizontal.set_max_accel(horizontal_limits.max_accel);
        self.horizontal.set_max_vel(horizontal_limits.max_vel);
        self.horizontal.set_max_jerk(self.limits.max_jerk);
        self.vertical
            .apply_limits(select_limits(&self.limits, target_z), self.limits.max_jerk);

        let est = self.local_position;
        self.xy_reset_tracker.check(
            est.xy_counters(),
            est.position_xy(),
            est.velocity_xy(),
            &mut self.horizontal,
        );
        self.z_reset_tracker.check(
            est.z_counters(),
            est.position.z,
            est.velocity.z,
            &mut self.vertical,
        );

        self.horizontal
            .set_vel_sp_feedback(self.velocity_setpoint_feedback.xy());
        self.horizontal
            .set_current_position_estimate(est.position_xy());
        self.horizontal.update(dt, target_xy);

        let z = self.vertical.update(target_z, est.position.z);

        self.setpoint = TrajectorySetpoint {
            xy: self.horizontal.setpoint(),
            z,
            yaw: raw.yaw,
            yaw_rate: raw.yaw_rate,
        };
        self.setpoint
    }

    #[inline]
    pub fn setpoint(&self) -> TrajectorySetpoint {
        self.setpoint
    }

    #[inline]
    pub fn horizontal(&self) -> &VelocitySmoothingXY<S> {
        &self.horizontal
    }

    #[inline]
    pub fn vertical(&self) -> &VerticalSmoothing<S> {
        &self.vertical
    }

    #[inline]
    pub fn input_mut(&mut self) -> &mut P {
        &mut self.input
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
