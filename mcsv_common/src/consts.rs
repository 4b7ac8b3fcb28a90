//! Workspace-wide constants for the MCSV flight tasks.
//!
//! Single source of truth for lock thresholds, tunable bounds and default
//! simulation timing. Imported by all crates, no duplication permitted.

// ─── Position Lock Thresholds ───────────────────────────────────────

/// Smoothed speed below which the position lock may engage [m/s].
pub const LOCK_VELOCITY_THRESHOLD: f32 = 0.1;

/// Smoothed acceleration below which the position lock may engage [m/s²].
pub const LOCK_ACCELERATION_THRESHOLD: f32 = 0.2;

/// Output speed below which a locked axis is snapped to exactly zero [m/s].
pub const HOLD_SNAP_VELOCITY: f32 = 1e-3;

/// Magnitude at which a stick target counts as "no input".
pub const TARGET_EPSILON: f32 = f32::EPSILON;

// ─── Tunable Bounds ─────────────────────────────────────────────────

/// Minimum accepted velocity limit [m/s].
pub const MAX_VEL_MIN: f32 = 0.1;
/// Maximum accepted velocity limit [m/s].
pub const MAX_VEL_MAX: f32 = 30.0;

/// Minimum accepted acceleration limit [m/s²].
pub const MAX_ACCEL_MIN: f32 = 0.5;
/// Maximum accepted acceleration limit [m/s²].
pub const MAX_ACCEL_MAX: f32 = 20.0;

/// Minimum accepted jerk limit [m/s³].
pub const MAX_JERK_MIN: f32 = 0.5;
/// Maximum accepted jerk limit [m/s³].
pub const MAX_JERK_MAX: f32 = 500.0;

// ─── Simulation Timing ──────────────────────────────────────────────

/// Default control tick period [s] (100 Hz).
pub const DEFAULT_DT: f32 = 0.01;

/// Shortest accepted control tick period [s].
pub const DT_MIN: f32 = 0.001;

/// Longest accepted control tick period [s].
pub const DT_MAX: f32 = 0.1;
