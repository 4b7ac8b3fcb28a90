//! Activation-time setpoint sanitizing.
//!
//! The previous task may hand over NaN for anything it did not control.
//! Before seeding a smoother, unknown positions fall back to the measured
//! position, unknown velocities to the measured velocity and unknown
//! accelerations to zero. Finite values pass through untouched.

use mcsv_common::estimator::VehicleLocalPosition;
use mcsv_common::setpoint::{Axis, AxisSeed, LocalPositionSetpoint};

/// Replace the non-finite fields of one axis seed.
#[inline]
pub fn sanitize(raw: AxisSeed, measured_position: f32, measured_velocity: f32) -> AxisSeed {
    AxisSeed {
        acceleration: if raw.acceleration.is_finite() {
            raw.acceleration
        } else {
            0.0
        },
        velocity: if raw.velocity.is_finite() {
            raw.velocity
        } else {
            measured_velocity
        },
        position: if raw.position.is_finite() {
            raw.position
        } else {
            measured_position
        },
    }
}

/// Sanitize all three axes of a handed-over setpoint.
pub fn sanitize_setpoint(
    previous: &LocalPositionSetpoint,
    estimate: &VehicleLocalPosition,
) -> LocalPositionSetpoint {
    let mut out = *previous;
    for axis in Axis::ALL {
        let i = axis.index();
        out.set_axis(
            axis,
            sanitize(previous.axis(axis), estimate.position[i], estimate.velocity[i]),
        );
    }
    out
}

// ─── Tests ──────────────────────────────────────────────────────────
