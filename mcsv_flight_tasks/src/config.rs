//! TOML configuration for the flight task simulator.
//!
//! One file holds the shared service settings, the smoothing tunables and
//! the simulated stick schedule. Every section is optional; a missing
//! section takes its defaults. Unknown fields are rejected so that typos in
//! limit names do not silently fall back to defaults.
//!
//! ```toml
//! [shared]
//! service_name = "mcsv-sim"
//!
//! [limits]
//! max_jerk = 8.0
//! max_accel_down = 3.0
//! max_vel_down = 3.0
//!
//! [sim]
//! dt = 0.01
//!
//! [[sim.segments]]
//! duration = 2.0
//! velocity = [0.0, 0.0, 2.0]
//!
//! [[sim.segments]]
//! duration = 3.0
//! velocity = [0.0, 0.0, 0.0]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use mcsv_common::config::{ConfigError, ConfigLoader, SharedConfig, Validate};
use mcsv_common::consts::{DEFAULT_DT, DT_MAX, DT_MIN};
use mcsv_common::limits::SmoothingLimits;

/// One constant-stick interval of the simulated schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSegment {
    /// Interval length [s].
    pub duration: f32,
    /// Raw velocity target [m/s], NED.
    pub velocity: [f32; 3],
}

/// Simulated plant and stick schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Control tick period [s].
    pub dt: f32,
    /// First-order velocity tracking time constant of the plant [s].
    pub plant_time_constant: f32,
    /// Proportional gain of the simulated position loop [1/s].
    pub position_gain: f32,
    /// Start position [m], NED.
    pub start_position: [f32; 3],
    pub segments: Vec<TargetSegment>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            plant_time_constant: 0.05,
            position_gain: 1.0,
            start_position: [0.0; 3],
            segments: vec![
                TargetSegment {
                    duration: 2.0,
                    velocity: [0.0, 0.0, 2.0],
                },
                TargetSegment {
                    duration: 3.0,
                    velocity: [0.0, 0.0, 0.0],
                },
            ],
        }
    }
}

impl SimConfig {
    /// Total scheduled time [s].
    pub fn duration(&self) -> f32 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}

impl Validate for SimConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(DT_MIN..=DT_MAX).contains(&self.dt) {
            return Err(ConfigError::ValidationError(format!(
                "sim.dt {} out of range [{DT_MIN}, {DT_MAX}]",
                self.dt
            )));
        }
        if !self.plant_time_constant.is_finite() || self.plant_time_constant < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "sim.plant_time_constant {} must be finite and >= 0",
                self.plant_time_constant
            )));
        }
        if !self.position_gain.is_finite() || self.position_gain < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "sim.position_gain {} must be finite and >= 0",
                self.position_gain
            )));
        }
        if self.start_position.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::ValidationError(
                "sim.start_position must be finite".to_string(),
            ));
        }
        if self.segments.is_empty() {
            return Err(ConfigError::ValidationError(
                "sim.segments cannot be empty".to_string(),
            ));
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if !seg.duration.is_finite() || seg.duration <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "sim.segments[{i}].duration {} must be > 0",
                    seg.duration
                )));
            }
            if seg.velocity.iter().any(|v| !v.is_finite()) {
                return Err(ConfigError::ValidationError(format!(
                    "sim.segments[{i}].velocity must be finite"
                )));
            }
        }
        Ok(())
    }
}

/// Complete simulator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskConfig {
    pub shared: SharedConfig,
    pub limits: SmoothingLimits,
    pub sim: SimConfig,
}

impl Validate for TaskConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.limits.validate()?;
        self.sim.validate()
    }
}

/// Load from `path`, or validated defaults when no path is given.
pub fn load_task_config(path: Option<&Path>) -> Result<TaskConfig, ConfigError> {
    match path {
        Some(p) => TaskConfig::load(p),
        None => {
            let config = TaskConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
