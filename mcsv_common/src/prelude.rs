//! Prelude module for common re-exports.
//!
//! ```rust
//! use mcsv_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig, Validate};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{
    DEFAULT_DT, HOLD_SNAP_VELOCITY, LOCK_ACCELERATION_THRESHOLD, LOCK_VELOCITY_THRESHOLD,
    TARGET_EPSILON,
};

// ─── Estimator ──────────────────────────────────────────────────────
pub use crate::estimator::{ResetCounters, VehicleLocalPosition};

// ─── Limits ─────────────────────────────────────────────────────────
pub use crate::limits::{AxisLimits, SmoothingLimits};

// ─── Setpoints ──────────────────────────────────────────────────────
pub use crate::setpoint::{
    AltitudeSetpoint, Axis, AxisSeed, AxisSetpoint, LocalPositionSetpoint, RawTarget,
    TrajectorySetpoint,
};
