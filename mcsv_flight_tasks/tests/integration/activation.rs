//! Task handover and direction-dependent limit selection.

use mcsv_common::prelude::*;
use mcsv_flight_tasks::constraints::select_limits;
use mcsv_flight_tasks::smoothing::TrajectorySmoother;
use mcsv_flight_tasks::task::{AltitudeSmoothingTask, FixedTarget, PositionSmoothingTask};
use nalgebra::{Vector2, Vector3};

const DT: f32 = 0.01;

fn estimate() -> VehicleLocalPosition {
    VehicleLocalPosition {
        position: Vector3::new(3.0, -4.0, -8.0),
        velocity: Vector3::new(0.5, 0.25, -0.4),
        ..Default::default()
    }
}

#[test]
fn nan_handover_falls_back_to_estimate() {
    let mut task = AltitudeSmoothingTask::new(FixedTarget::default(), SmoothingLimits::default());
    task.set_local_position(estimate());
    assert!(task.activate(&LocalPositionSetpoint::unknown()));

    let s = task.smoother();
    assert_eq!(s.current_position(), -8.0);
    assert_eq!(s.current_velocity(), -0.4);
    assert_eq!(s.current_acceleration(), 0.0);
}

#[test]
fn partial_handover_replaces_only_nan_fields() {
    let mut task = AltitudeSmoothingTask::new(FixedTarget::default(), SmoothingLimits::default());
    task.set_local_position(estimate());
    let previous = LocalPositionSetpoint {
        z: -7.5,
        vz: f32::NAN,
        acc_z: 0.6,
        ..LocalPositionSetpoint::unknown()
    };
    assert!(task.activate(&previous));

    let s = task.smoother();
    assert_eq!(s.current_position(), -7.5);
    assert_eq!(s.current_velocity(), -0.4);
    assert_eq!(s.current_acceleration(), 0.6);
}

#[test]
fn position_task_seeds_every_axis() {
    let mut task = PositionSmoothingTask::new(FixedTarget::default(), SmoothingLimits::default());
    task.set_local_position(estimate());
    let previous = LocalPositionSetpoint {
        x: 2.0,
        vx: 1.0,
        acc_x: 0.5,
        ..LocalPositionSetpoint::unknown()
    };
    assert!(task.activate(&previous));

    let xy = task.horizontal();
    assert_eq!(xy.current_position(), Vector2::new(2.0, -4.0));
    assert_eq!(xy.current_velocity(), Vector2::new(1.0, 0.25));
    assert_eq!(xy.current_acceleration(), Vector2::new(0.5, 0.0));
    assert_eq!(task.vertical().smoother().current_position(), -8.0);
}

#[test]
fn refused_activation_keeps_previous_state() {
    let mut hovering = estimate();
    hovering.velocity = Vector3::zeros();
    let mut task = AltitudeSmoothingTask::new(FixedTarget::default(), SmoothingLimits::default());
    task.set_local_position(hovering);
    assert!(task.activate(&LocalPositionSetpoint::unknown()));
    task.update(DT);
    assert_eq!(task.locked_position(), Some(-8.0));

    let mut broken = hovering;
    broken.velocity.z = f32::INFINITY;
    task.set_local_position(broken);
    assert!(!task.activate(&LocalPositionSetpoint::unknown()));
    assert_eq!(task.locked_position(), Some(-8.0));
    assert_eq!(task.smoother().current_position(), -8.0);
}

#[test]
fn limit_selection_by_target_sign() {
    let limits = SmoothingLimits::default();
    assert_eq!(select_limits(&limits, -1.0), limits.ascend());
    assert_eq!(select_limits(&limits, 1.0), limits.descend());
    assert_eq!(select_limits(&limits, 0.0), limits.descend());
}

#[test]
fn task_applies_descend_limits_at_zero_target() {
    let limits = SmoothingLimits {
        max_vel_down: 1.5,
        max_accel_down: 2.5,
        ..Default::default()
    };
    let mut task = AltitudeSmoothingTask::new(FixedTarget::default(), limits);
    task.set_local_position(estimate());
    task.activate(&LocalPositionSetpoint::unknown());
    task.update(DT);
    assert_eq!(task.smoother().max_vel(), 1.5);
    assert_eq!(task.smoother().max_accel(), 2.5);
}
