//! Trajectory smoothing root.
//!
//! [`TrajectorySmoother`] is the seam between the flight tasks and the
//! single-axis profile generator. The tasks only ever talk to the trait;
//! [`VelocitySmoothing`] is the jerk-limited implementation used in flight.

pub mod velocity;
pub mod xy;

pub use velocity::VelocitySmoothing;
pub use xy::VelocitySmoothingXY;

/// Single-axis jerk-limited trajectory generator.
///
/// Per tick the owner calls [`update_traj`](Self::update_traj) to advance
/// the current profile, may overwrite parts of the state, and then calls
/// [`update_durations`](Self::update_durations) to re-plan towards the new
/// velocity target from wherever the axis is now.
pub trait TrajectorySmoother {
    /// Set state and profile origin; jerk is zeroed.
    fn reset(&mut self, accel: f32, vel: f32, pos: f32);

    fn set_max_jerk(&mut self, max_jerk: f32);
    fn max_jerk(&self) -> f32;
    fn set_max_accel(&mut self, max_accel: f32);
    fn max_accel(&self) -> f32;
    fn set_max_vel(&mut self, max_vel: f32);
    fn max_vel(&self) -> f32;

    /// Overwrite the acceleration of the live state and the profile origin.
    fn set_current_acceleration(&mut self, accel: f32);
    /// Overwrite the velocity of the live state and the profile origin.
    fn set_current_velocity(&mut self, vel: f32);
    /// Overwrite the position of the live state and the profile origin.
    fn set_current_position(&mut self, pos: f32);

    /// Advance the profile by `dt` seconds.
    fn update_traj(&mut self, dt: f32);
    /// Re-plan the minimum-time profile towards `vel_target`.
    fn update_durations(&mut self, vel_target: f32);
    /// Re-plan so that the profile lasts exactly `t123` seconds.
    fn update_durations_given_total_time(&mut self, t123: f32);
    /// Duration of the planned profile [s].
    fn total_time(&self) -> f32;

    fn current_jerk(&self) -> f32;
    fn current_acceleration(&self) -> f32;
    fn current_velocity(&self) -> f32;
    fn current_position(&self) -> f32;
}

/// Stretch every profile to the duration of the longest one.
///
/// Axes that share a target direction then reach it together, which keeps
/// a diagonal stick command on a straight line in velocity space.
pub fn time_synchronization<S: TrajectorySmoother>(trajectories: &mut [S]) {
    let mut desired_time = 0.0_f32;
    let mut longest = 0;
    for (i, traj) in trajectories.iter().enumerate() {
        let t = traj.total_time();
        if t > desired_time {
            desired_time = t;
            longest = i;
        }
    }

    if desired_time > f32::EPSILON {
        for (i, traj) in trajectories.iter_mut().enumerate() {
            if i != longest {
                traj.update_durations_given_total_time(desired_time);
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
