//! Local position estimate as seen by the flight tasks.
//!
//! The state estimator publishes position and velocity in a local NED frame
//! (down-positive z) together with one reset counter per quantity. A counter
//! changes whenever the estimator applies a discontinuous correction, so
//! consumers compare counters for equality only. They wrap at `u8::MAX`.

use nalgebra::{Vector2, Vector3};

/// Position/velocity reset counters for one axis group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResetCounters {
    /// Incremented on every position reset.
    pub position: u8,
    /// Incremented on every velocity reset.
    pub velocity: u8,
}

impl ResetCounters {
    #[inline]
    pub const fn new(position: u8, velocity: u8) -> Self {
        Self { position, velocity }
    }
}

/// Latest estimator sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleLocalPosition {
    /// Position [m], NED.
    pub position: Vector3<f32>,
    /// Velocity [m/s], NED.
    pub velocity: Vector3<f32>,
    pub xy_reset_counter: u8,
    pub vxy_reset_counter: u8,
    pub z_reset_counter: u8,
    pub vz_reset_counter: u8,
}

impl Default for VehicleLocalPosition {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            xy_reset_counter: 0,
            vxy_reset_counter: 0,
            z_reset_counter: 0,
            vz_reset_counter: 0,
        }
    }
}

impl VehicleLocalPosition {
    /// Horizontal reset counters.
    #[inline]
    pub const fn xy_counters(&self) -> ResetCounters {
        ResetCounters::new(self.xy_reset_counter, self.vxy_reset_counter)
    }

    /// Vertical reset counters.
    #[inline]
    pub const fn z_counters(&self) -> ResetCounters {
        ResetCounters::new(self.z_reset_counter, self.vz_reset_counter)
    }

    #[inline]
    pub fn position_xy(&self) -> Vector2<f32> {
        self.position.xy()
    }

    #[inline]
    pub fn velocity_xy(&self) -> Vector2<f32> {
        self.velocity.xy()
    }

    /// Horizontal position and velocity are usable as fallback values.
    #[inline]
    pub fn is_xy_finite(&self) -> bool {
        self.position_xy().iter().all(|v| v.is_finite())
            && self.velocity_xy().iter().all(|v| v.is_finite())
    }

    /// Vertical position and velocity are usable as fallback values.
    #[inline]
    pub fn is_z_finite(&self) -> bool {
        self.position.z.is_finite() && self.velocity.z.is_finite()
    }
}
