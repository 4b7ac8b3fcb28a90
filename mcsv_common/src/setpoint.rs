//! Setpoint types exchanged between flight tasks and the position controller.
//!
//! [`LocalPositionSetpoint`] is the flat, NaN-means-unknown record handed
//! over by whichever task ran before; it is only read at activation.
//! The per-tick outputs use `Option` for "no position hold" instead of a
//! NaN sentinel.

use nalgebra::{Vector2, Vector3};
use static_assertions::const_assert_eq;

/// Cartesian axis index in the local NED frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Last setpoint published by the previously active task.
///
/// Any field may be NaN when the previous task did not control it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct LocalPositionSetpoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub acc_x: f32,
    pub acc_y: f32,
    pub acc_z: f32,
    pub yaw: f32,
    pub yawspeed: f32,
}

const_assert_eq!(core::mem::size_of::<LocalPositionSetpoint>(), 44);

impl Default for LocalPositionSetpoint {
    fn default() -> Self {
        Self::unknown()
    }
}

impl LocalPositionSetpoint {
    /// A setpoint where nothing is known (all NaN).
    pub const fn unknown() -> Self {
        Self {
            x: f32::NAN,
            y: f32::NAN,
            z: f32::NAN,
            vx: f32::NAN,
            vy: f32::NAN,
            vz: f32::NAN,
            acc_x: f32::NAN,
            acc_y: f32::NAN,
            acc_z: f32::NAN,
            yaw: f32::NAN,
            yawspeed: f32::NAN,
        }
    }

    /// Acceleration, velocity and position of one axis.
    #[inline]
    pub const fn axis(&self, axis: Axis) -> AxisSeed {
        match axis {
            Axis::X => AxisSeed::new(self.acc_x, self.vx, self.x),
            Axis::Y => AxisSeed::new(self.acc_y, self.vy, self.y),
            Axis::Z => AxisSeed::new(self.acc_z, self.vz, self.z),
        }
    }

    /// Overwrite acceleration, velocity and position of one axis.
    #[inline]
    pub fn set_axis(&mut self, axis: Axis, seed: AxisSeed) {
        let (a, v, p) = match axis {
            Axis::X => (&mut self.acc_x, &mut self.vx, &mut self.x),
            Axis::Y => (&mut self.acc_y, &mut self.vy, &mut self.y),
            Axis::Z => (&mut self.acc_z, &mut self.vz, &mut self.z),
        };
        *a = seed.acceleration;
        *v = seed.velocity;
        *p = seed.position;
    }
}

/// Initial kinematic state for one smoothed axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisSeed {
    pub acceleration: f32,
    pub velocity: f32,
    pub position: f32,
}

impl AxisSeed {
    #[inline]
    pub const fn new(acceleration: f32, velocity: f32, position: f32) -> Self {
        Self {
            acceleration,
            velocity,
            position,
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.acceleration.is_finite() && self.velocity.is_finite() && self.position.is_finite()
    }
}

/// Raw, unsmoothed target produced from stick input for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTarget {
    /// Velocity target [m/s], NED (negative z = climb).
    pub velocity: Vector3<f32>,
    /// Yaw setpoint [rad], if the input layer holds heading.
    pub yaw: Option<f32>,
    /// Yaw rate setpoint [rad/s], if the input layer commands a rate.
    pub yaw_rate: Option<f32>,
}

impl Default for RawTarget {
    fn default() -> Self {
        Self {
            velocity: Vector3::zeros(),
            yaw: None,
            yaw_rate: None,
        }
    }
}

impl RawTarget {
    /// Pure velocity target with no yaw command.
    #[inline]
    pub fn velocity(velocity: Vector3<f32>) -> Self {
        Self {
            velocity,
            ..Default::default()
        }
    }
}

/// Smoothed setpoint for one axis (scalar) or axis group (vector).
///
/// `position` is `None` while the axis free-runs on its velocity
/// feed-forward; it is `Some` only while a position lock is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSetpoint<T> {
    pub jerk: T,
    pub acceleration: T,
    pub velocity: T,
    pub position: Option<T>,
}

impl AxisSetpoint<f32> {
    pub const ZERO: Self = Self {
        jerk: 0.0,
        acceleration: 0.0,
        velocity: 0.0,
        position: None,
    };

    /// Returns true if every present field is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.jerk.is_finite()
            && self.acceleration.is_finite()
            && self.velocity.is_finite()
            && self.position.is_none_or(f32::is_finite)
    }
}

impl Default for AxisSetpoint<f32> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl AxisSetpoint<Vector2<f32>> {
    /// Returns true if every present component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        let finite = |v: &Vector2<f32>| v.iter().all(|c| c.is_finite());
        finite(&self.jerk)
            && finite(&self.acceleration)
            && finite(&self.velocity)
            && self.position.as_ref().is_none_or(finite)
    }
}

impl Default for AxisSetpoint<Vector2<f32>> {
    fn default() -> Self {
        Self {
            jerk: Vector2::zeros(),
            acceleration: Vector2::zeros(),
            velocity: Vector2::zeros(),
            position: None,
        }
    }
}

/// Output of the altitude task: vertical axis plus heading pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AltitudeSetpoint {
    pub z: AxisSetpoint<f32>,
    pub yaw: Option<f32>,
    pub yaw_rate: Option<f32>,
}

impl AltitudeSetpoint {
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.z.is_finite()
    }
}

/// Output of the three-axis position task.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrajectorySetpoint {
    pub xy: AxisSetpoint<Vector2<f32>>,
    pub z: AxisSetpoint<f32>,
    pub yaw: Option<f32>,
    pub yaw_rate: Option<f32>,
}

impl TrajectorySetpoint {
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.xy.is_finite() && self.z.is_finite()
    }
}
