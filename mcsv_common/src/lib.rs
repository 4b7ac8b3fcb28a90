//! MCSV Common Library
//!
//! Shared types for the MCSV (multicopter smooth velocity) workspace: the
//! estimator sample consumed by flight tasks, the setpoints they publish,
//! the tunable smoothing limits and the TOML configuration layer.
//!
//! # Module Structure
//!
//! - [`consts`] - Lock thresholds and limit bounds
//! - [`config`] - Configuration loading traits and types
//! - [`estimator`] - Local position estimate and reset counters
//! - [`limits`] - Tunable velocity/acceleration/jerk limits
//! - [`setpoint`] - Activation-time and per-tick setpoint types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use mcsv_common::prelude::*;
//!
//! let limits = SmoothingLimits::default();
//! assert!(limits.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod estimator;
pub mod limits;
pub mod prelude;
pub mod setpoint;
