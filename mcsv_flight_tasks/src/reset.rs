//! Estimator reset detection.
//!
//! The estimator bumps a per-quantity counter whenever it jumps its
//! position or velocity estimate. A smoother that integrated from the old
//! estimate would otherwise keep a stale base, so each counter change
//! re-seeds the matching smoother state exactly once.

use mcsv_common::estimator::ResetCounters;
use tracing::debug;

/// Anything whose position/velocity base can be re-seeded from a fresh
/// estimate: a single-axis smoother core or a joint XY smoother.
pub trait Resynchronize {
    type Value: Copy;

    fn set_current_position(&mut self, position: Self::Value);
    fn set_current_velocity(&mut self, velocity: Self::Value);
}

/// Which resynchronizations a [`EkfResetTracker::check`] call performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetEvents {
    pub position: bool,
    pub velocity: bool,
}

impl ResetEvents {
    #[inline]
    pub const fn any(&self) -> bool {
        self.position || self.velocity
    }
}

/// Last observed reset counters for one axis group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EkfResetTracker {
    counters: ResetCounters,
}

impl EkfResetTracker {
    pub const fn new(counters: ResetCounters) -> Self {
        Self { counters }
    }

    /// Adopt the current counters without resynchronizing anything.
    #[inline]
    pub fn init(&mut self, counters: ResetCounters) {
        self.counters = counters;
    }

    #[inline]
    pub const fn counters(&self) -> ResetCounters {
        self.counters
    }

    /// Compare `current` against the stored counters and re-seed `target`
    /// for every counter that changed.
    ///
    /// Must run every tick before the trajectory durations are updated.
    pub fn check<R: Resynchronize>(
        &mut self,
        current: ResetCounters,
        measured_position: R::Value,
        measured_velocity: R::Value,
        target: &mut R,
    ) -> ResetEvents {
        let mut events = ResetEvents::default();

        if current.position != self.counters.position {
            target.set_current_position(measured_position);
            self.counters.position = current.position;
            events.position = true;
        }

        if current.velocity != self.counters.velocity {
            target.set_current_velocity(measured_velocity);
            self.counters.velocity = current.velocity;
            events.velocity = true;
        }

        if events.any() {
            debug!(
                position = events.position,
                velocity = events.velocity,
                "estimator reset, smoother resynchronized"
            );
        }
        events
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
