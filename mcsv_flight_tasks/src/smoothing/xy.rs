//! Horizontal (XY) manual velocity smoothing with a joint position lock.
//!
//! Two single-axis smoothers share one set of limits and are time
//! synchronized every tick. Unlike the vertical axis the lock is joint:
//! X and Y engage and release together, tested on Euclidean norms.
//!
//! Tick order inside [`VelocitySmoothingXY::update`]:
//! 1. advance both profiles and sample (j, a, v, x)
//! 2. release the lock on a non-zero target (velocity continuity)
//! 3. re-plan durations and synchronize X/Y
//! 4. while unlocked, re-seed position from the estimate
//! 5. engage the lock when slow, not accelerating and no target
//! 6. while locked, snap near-zero velocity/acceleration to exactly zero

use nalgebra::Vector2;
use tracing::{debug, trace};

use mcsv_common::consts::{
    HOLD_SNAP_VELOCITY, LOCK_ACCELERATION_THRESHOLD, LOCK_VELOCITY_THRESHOLD, TARGET_EPSILON,
};
use mcsv_common::setpoint::AxisSetpoint;

use super::{TrajectorySmoother, VelocitySmoothing, time_synchronization};
use crate::lock::PositionLock;
use crate::reset::Resynchronize;

/// Vector kinematic state of the horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarState {
    pub j: Vector2<f32>,
    pub a: Vector2<f32>,
    pub v: Vector2<f32>,
    pub x: Vector2<f32>,
}

impl Default for PlanarState {
    fn default() -> Self {
        Self {
            j: Vector2::zeros(),
            a: Vector2::zeros(),
            v: Vector2::zeros(),
            x: Vector2::zeros(),
        }
    }
}

/// Joint XY smoother with position lock.
#[derive(Debug, Clone)]
pub struct VelocitySmoothingXY<S: TrajectorySmoother = VelocitySmoothing> {
    smoothing: [S; 2],
    lock: PositionLock<Vector2<f32>>,
    velocity_setpoint_feedback: Vector2<f32>,
    position_estimate: Vector2<f32>,
    state: PlanarState,
}

impl<S: TrajectorySmoother + Default> Default for VelocitySmoothingXY<S> {
    fn default() -> Self {
        Self::with_smoothers([S::default(), S::default()])
    }
}

impl<S: TrajectorySmoother> VelocitySmoothingXY<S> {
    pub fn with_smoothers(smoothing: [S; 2]) -> Self {
        Self {
            smoothing,
            lock: PositionLock::Unlocked,
            velocity_setpoint_feedback: Vector2::zeros(),
            position_estimate: Vector2::zeros(),
            state: PlanarState::default(),
        }
    }

    /// Seed both axes and clear the lock.
    pub fn reset(&mut self, accel: Vector2<f32>, vel: Vector2<f32>, pos: Vector2<f32>) {
        for i in 0..2 {
            self.smoothing[i].reset(accel[i], vel[i], pos[i]);
        }
        self.state = PlanarState {
            j: Vector2::zeros(),
            a: accel,
            v: vel,
            x: pos,
        };
        self.lock = PositionLock::Unlocked;
    }

    /// Last velocity setpoint sent to the controller, used on unlock.
    #[inline]
    pub fn set_vel_sp_feedback(&mut self, feedback: Vector2<f32>) {
        self.velocity_setpoint_feedback = feedback;
    }

    #[inline]
    pub fn set_current_position_estimate(&mut self, position: Vector2<f32>) {
        self.position_estimate = position;
    }

    pub fn set_max_jerk(&mut self, max_jerk: f32) {
        self.smoothing.iter_mut().for_each(|s| s.set_max_jerk(max_jerk));
    }

    pub fn max_jerk(&self) -> f32 {
        self.smoothing[0].max_jerk()
    }

    pub fn set_max_accel(&mut self, max_accel: f32) {
        self.smoothing.iter_mut().for_each(|s| s.set_max_accel(max_accel));
    }

    pub fn max_accel(&self) -> f32 {
        self.smoothing[0].max_accel()
    }

    pub fn set_max_vel(&mut self, max_vel: f32) {
        self.smoothing.iter_mut().for_each(|s| s.set_max_vel(max_vel));
    }

    pub fn max_vel(&self) -> f32 {
        self.smoothing[0].max_vel()
    }

    /// One control tick towards `velocity_target`.
    pub fn update(&mut self, dt: f32, velocity_target: Vector2<f32>) {
        let smoothed_position = self.update_trajectories(dt);
        let target_norm = velocity_target.norm();

        if target_norm > TARGET_EPSILON {
            self.release_lock();
        }

        self.update_traj_durations(velocity_target);

        if !self.lock.is_locked() {
            let estimate = self.position_estimate;
            self.set_current_position(estimate);
        }

        if self.state.v.norm() < LOCK_VELOCITY_THRESHOLD
            && self.state.a.norm() < LOCK_ACCELERATION_THRESHOLD
            && target_norm <= TARGET_EPSILON
            && self.lock.engage(smoothed_position)
        {
            debug!(
                x = smoothed_position.x,
                y = smoothed_position.y,
                "xy position lock engaged"
            );
        }

        if self.lock.is_locked() {
            self.snap_to_zero();
        }

        trace!(
            vx = self.state.v.x,
            vy = self.state.v.y,
            locked = self.lock.is_locked(),
            "xy smoothing tick"
        );
    }

    fn update_trajectories(&mut self, dt: f32) -> Vector2<f32> {
        for (i, s) in self.smoothing.iter_mut().enumerate() {
            s.update_traj(dt);
            self.state.j[i] = s.current_jerk();
            self.state.a[i] = s.current_acceleration();
            self.state.v[i] = s.current_velocity();
            self.state.x[i] = s.current_position();
        }
        self.state.x
    }

    fn release_lock(&mut self) {
        if self.lock.release() {
            // Only the feed-forward survives the unlock; start the profile
            // from what the velocity controller was actually commanded.
            let feedback = self.velocity_setpoint_feedback;
            Resynchronize::set_current_velocity(self, feedback);
            debug!(
                vx = feedback.x,
                vy = feedback.y,
                "xy position lock released"
            );
        }
    }

    fn update_traj_durations(&mut self, velocity_target: Vector2<f32>) {
        for (i, s) in self.smoothing.iter_mut().enumerate() {
            s.update_durations(velocity_target[i]);
        }
        time_synchronization(&mut self.smoothing);
    }

    fn snap_to_zero(&mut self) {
        for i in 0..2 {
            if self.state.v[i].abs() < HOLD_SNAP_VELOCITY && self.state.a[i].abs() < TARGET_EPSILON
            {
                self.state.v[i] = 0.0;
                self.state.a[i] = 0.0;
                self.smoothing[i].set_current_velocity(0.0);
                self.smoothing[i].set_current_acceleration(0.0);
            }
        }
    }

    #[inline]
    pub fn current_jerk(&self) -> Vector2<f32> {
        self.state.j
    }

    #[inline]
    pub fn current_acceleration(&self) -> Vector2<f32> {
        self.state.a
    }

    #[inline]
    pub fn current_velocity(&self) -> Vector2<f32> {
        self.state.v
    }

    /// Held position while locked, otherwise the live smoother position.
    #[inline]
    pub fn current_position(&self) -> Vector2<f32> {
        self.lock.position().unwrap_or(self.state.x)
    }

    /// Held position, `None` while free-running.
    #[inline]
    pub fn locked_position(&self) -> Option<Vector2<f32>> {
        self.lock.position()
    }

    #[inline]
    pub fn is_position_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Internal velocity of both single-axis smoothers.
    #[inline]
    pub fn smoother_velocity(&self) -> Vector2<f32> {
        Vector2::new(
            self.smoothing[0].current_velocity(),
            self.smoothing[1].current_velocity(),
        )
    }

    /// Setpoint for the position controller.
    pub fn setpoint(&self) -> AxisSetpoint<Vector2<f32>> {
        AxisSetpoint {
            jerk: self.state.j,
            acceleration: self.state.a,
            velocity: self.state.v,
            position: self.lock.position(),
        }
    }
}

impl<S: TrajectorySmoother> Resynchronize for VelocitySmoothingXY<S> {
    type Value = Vector2<f32>;

    fn set_current_position(&mut self, position: Vector2<f32>) {
        self.state.x = position;
        for i in 0..2 {
            self.smoothing[i].set_current_position(position[i]);
        }
    }

    fn set_current_velocity(&mut self, velocity: Vector2<f32>) {
        self.state.v = velocity;
        for i in 0..2 {
            self.smoothing[i].set_current_velocity(velocity[i]);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
