//! # MCSV Flight Tasks
//!
//! Manual multirotor flight tasks that turn raw, possibly discontinuous
//! stick velocity targets into jerk-limited setpoints for the inner-loop
//! controller, and decide when to hold position instead of following a
//! velocity command.
//!
//! ## Layers
//!
//! 1. **Smoothing** - single-axis jerk-limited profile plus the joint XY
//!    smoother with its position lock
//! 2. **Support** - limit selection, estimator reset tracking and
//!    handover sanitization
//! 3. **Tasks** - [`task::AltitudeSmoothingTask`] and
//!    [`task::PositionSmoothingTask`], run once per control tick
//!
//! The per-tick path never allocates and never returns errors: invalid
//! inputs are substituted, not reported.

#![deny(clippy::disallowed_types)]

pub mod config;
pub mod constraints;
pub mod lock;
pub mod reset;
pub mod sanitize;
pub mod sim;
pub mod smoothing;
pub mod task;
