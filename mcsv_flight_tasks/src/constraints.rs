//! Direction-dependent constraint selection.
//!
//! Vertical limits are asymmetric: a multirotor usually climbs faster than
//! it may safely descend. The limit pair is picked from the sign of the
//! raw (unsmoothed) target, in the down-positive NED convention.

use mcsv_common::limits::{AxisLimits, SmoothingLimits};

/// Pick the (max_accel, max_vel) pair for one vertical target component.
///
/// Negative targets (climb) use the ascend pair. Zero and positive
/// targets use the descend pair, so releasing the stick keeps the limits
/// that bound the braking of a descent.
#[inline]
pub fn select_limits(limits: &SmoothingLimits, target_velocity: f32) -> AxisLimits {
    if target_velocity < 0.0 {
        limits.ascend()
    } else {
        limits.descend()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
