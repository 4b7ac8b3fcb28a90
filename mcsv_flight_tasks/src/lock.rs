//! Position lock state shared by the vertical and horizontal orchestrators.
//!
//! `Unlocked`: the axis free-runs on velocity feed-forward and publishes no
//! position setpoint. `Locked`: the position captured at the engaging tick
//! is held until a non-zero stick target releases it.

/// Lock state with the held position carried inside the locked variant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionLock<T> {
    #[default]
    Unlocked,
    Locked(T),
}

impl<T: Copy> PositionLock<T> {
    #[inline]
    pub const fn is_locked(&self) -> bool {
        matches!(self, Self::Locked(_))
    }

    /// Held position, if locked.
    #[inline]
    pub fn position(&self) -> Option<T> {
        match self {
            Self::Locked(p) => Some(*p),
            Self::Unlocked => None,
        }
    }

    /// Lock at `position` unless already locked.
    ///
    /// Returns `true` only on the tick the lock engages; an active lock
    /// keeps its original position.
    #[inline]
    pub fn engage(&mut self, position: T) -> bool {
        if self.is_locked() {
            return false;
        }
        *self = Self::Locked(position);
        true
    }

    /// Release the lock. Returns `true` if it was active.
    #[inline]
    pub fn release(&mut self) -> bool {
        let was_locked = self.is_locked();
        *self = Self::Unlocked;
        was_locked
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
