//! Tunable kinematic limits for manual velocity smoothing.
//!
//! Vertical limits are asymmetric (climb vs. descent). Horizontal limits
//! are shared by both axes. Numeric parameters are bounded by the const
//! `MIN`/`MAX` values in [`crate::consts`]; missing TOML fields take the
//! defaults below.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, Validate};
use crate::consts::{
    MAX_ACCEL_MAX, MAX_ACCEL_MIN, MAX_JERK_MAX, MAX_JERK_MIN, MAX_VEL_MAX, MAX_VEL_MIN,
};

/// Acceleration and velocity bound applied to one smoother.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    /// Maximum acceleration magnitude [m/s²].
    pub max_accel: f32,
    /// Maximum velocity magnitude [m/s].
    pub max_vel: f32,
}

/// Full set of smoothing tunables, read once per tick by the tasks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothingLimits {
    /// Maximum climb speed [m/s].
    pub max_vel_up: f32,
    /// Maximum descent speed [m/s].
    pub max_vel_down: f32,
    /// Maximum upward acceleration [m/s²].
    pub max_accel_up: f32,
    /// Maximum downward acceleration [m/s²].
    pub max_accel_down: f32,
    /// Maximum jerk, all axes [m/s³].
    pub max_jerk: f32,
    /// Maximum horizontal speed [m/s].
    pub max_vel_xy: f32,
    /// Maximum horizontal acceleration [m/s²].
    pub max_accel_xy: f32,
}

impl Default for SmoothingLimits {
    fn default() -> Self {
        Self {
            max_vel_up: 3.0,
            max_vel_down: 1.0,
            max_accel_up: 4.0,
            max_accel_down: 3.0,
            max_jerk: 8.0,
            max_vel_xy: 12.0,
            max_accel_xy: 5.0,
        }
    }
}

impl SmoothingLimits {
    /// Limits used while the vertical target points up (negative z).
    #[inline]
    pub const fn ascend(&self) -> AxisLimits {
        AxisLimits {
            max_accel: self.max_accel_up,
            max_vel: self.max_vel_up,
        }
    }

    /// Limits used while the vertical target points down or is zero.
    #[inline]
    pub const fn descend(&self) -> AxisLimits {
        AxisLimits {
            max_accel: self.max_accel_down,
            max_vel: self.max_vel_down,
        }
    }

    /// Limits shared by both horizontal axes.
    #[inline]
    pub const fn horizontal(&self) -> AxisLimits {
        AxisLimits {
            max_accel: self.max_accel_xy,
            max_vel: self.max_vel_xy,
        }
    }
}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::ValidationError(format!(
            "{name} {value} out of range [{min}, {max}]"
        )));
    }
    Ok(())
}

impl Validate for SmoothingLimits {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("max_vel_up", self.max_vel_up, MAX_VEL_MIN, MAX_VEL_MAX)?;
        check_range("max_vel_down", self.max_vel_down, MAX_VEL_MIN, MAX_VEL_MAX)?;
        check_range("max_vel_xy", self.max_vel_xy, MAX_VEL_MIN, MAX_VEL_MAX)?;
        check_range("max_accel_up", self.max_accel_up, MAX_ACCEL_MIN, MAX_ACCEL_MAX)?;
        check_range("max_accel_down", self.max_accel_down, MAX_ACCEL_MIN, MAX_ACCEL_MAX)?;
        check_range("max_accel_xy", self.max_accel_xy, MAX_ACCEL_MIN, MAX_ACCEL_MAX)?;
        check_range("max_jerk", self.max_jerk, MAX_JERK_MIN, MAX_JERK_MAX)?;
        Ok(())
    }
}
