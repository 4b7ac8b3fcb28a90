//! Manual flight tasks.
//!
//! A task turns the raw stick target into smoothed setpoints once per
//! control tick. The raw target comes from an injected
//! [`RawTargetProvider`]; the task then applies smoothing in an explicit
//! second step.

pub mod altitude;
pub mod position;
pub mod vertical;

pub use altitude::AltitudeSmoothingTask;
pub use position::PositionSmoothingTask;
pub use vertical::VerticalSmoothing;

use mcsv_common::setpoint::RawTarget;

/// Source of the unsmoothed, stick-derived target.
///
/// Stick scaling, deadband and yaw handling live behind this trait.
pub trait RawTargetProvider {
    /// Raw target for the current tick.
    fn raw_target(&mut self, dt: f32) -> RawTarget;
}

impl<F> RawTargetProvider for F
where
    F: FnMut(f32) -> RawTarget,
{
    #[inline]
    fn raw_target(&mut self, dt: f32) -> RawTarget {
        self(dt)
    }
}

/// Provider that always returns the same target.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedTarget(pub RawTarget);

impl RawTargetProvider for FixedTarget {
    #[inline]
    fn raw_target(&mut self, _dt: f32) -> RawTarget {
        self.0
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
