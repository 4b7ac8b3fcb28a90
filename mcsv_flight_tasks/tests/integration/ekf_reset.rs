//! Estimator reset handling inside complete tasks.

use mcsv_common::prelude::*;
use mcsv_flight_tasks::smoothing::TrajectorySmoother;
use mcsv_flight_tasks::task::{AltitudeSmoothingTask, FixedTarget, PositionSmoothingTask};
use nalgebra::{Vector2, Vector3};

const DT: f32 = 0.01;

fn altitude_task(vz: f32, estimate: VehicleLocalPosition) -> AltitudeSmoothingTask<FixedTarget> {
    let mut task = AltitudeSmoothingTask::new(
        FixedTarget(RawTarget::velocity(Vector3::new(0.0, 0.0, vz))),
        SmoothingLimits::default(),
    );
    task.set_local_position(estimate);
    assert!(task.activate(&LocalPositionSetpoint::unknown()));
    task
}

#[test]
fn position_reset_resyncs_once() {
    let mut estimate = VehicleLocalPosition {
        position: Vector3::new(0.0, 0.0, -5.0),
        z_reset_counter: 7,
        ..Default::default()
    };
    let mut task = altitude_task(0.0, estimate);
    task.update(DT);
    assert_eq!(task.locked_position(), Some(-5.0));

    // Tick n+1: the estimator jumped and bumped its counter.
    estimate.position.z = -3.0;
    estimate.z_reset_counter = 8;
    task.set_local_position(estimate);
    let sp = task.update(DT);
    assert_eq!(task.smoother().current_position(), -3.0);
    // The held point stays frozen until the stick releases it.
    assert_eq!(sp.z.position, Some(-5.0));

    // Same counter again: the locked smoother ignores the new estimate.
    estimate.position.z = -4.0;
    task.set_local_position(estimate);
    let sp = task.update(DT);
    assert_eq!(task.smoother().current_position(), -3.0);
    assert_eq!(sp.z.position, Some(-5.0));
}

#[test]
fn counter_wrap_is_a_reset() {
    let mut estimate = VehicleLocalPosition {
        position: Vector3::new(0.0, 0.0, -5.0),
        z_reset_counter: u8::MAX,
        ..Default::default()
    };
    let mut task = altitude_task(0.0, estimate);
    task.update(DT);

    estimate.position.z = -6.0;
    estimate.z_reset_counter = estimate.z_reset_counter.wrapping_add(1);
    task.set_local_position(estimate);
    task.update(DT);
    assert_eq!(task.smoother().current_position(), -6.0);
}

#[test]
fn velocity_reset_reseeds_smoother_velocity() {
    let mut estimate = VehicleLocalPosition {
        position: Vector3::new(0.0, 0.0, -5.0),
        ..Default::default()
    };
    let mut task = altitude_task(-1.0, estimate);
    for _ in 0..20 {
        task.update(DT);
    }

    estimate.velocity.z = -0.8;
    estimate.vz_reset_counter = 1;
    task.set_local_position(estimate);
    task.update(DT);
    assert_eq!(task.smoother().current_velocity(), -0.8);
    assert!(!task.is_position_locked());
}

#[test]
fn horizontal_reset_leaves_vertical_alone() {
    let mut estimate = VehicleLocalPosition {
        position: Vector3::new(1.0, 1.0, -2.0),
        ..Default::default()
    };
    let mut task = PositionSmoothingTask::new(FixedTarget::default(), SmoothingLimits::default());
    task.set_local_position(estimate);
    assert!(task.activate(&LocalPositionSetpoint::unknown()));
    task.update(DT);
    assert_eq!(task.horizontal().locked_position(), Some(Vector2::new(1.0, 1.0)));

    estimate.position.x = 5.0;
    estimate.position.y = 5.0;
    estimate.xy_reset_counter = 1;
    task.set_local_position(estimate);
    let sp = task.update(DT);
    assert_eq!(sp.xy.position, Some(Vector2::new(1.0, 1.0)));
    assert_eq!(sp.z.position, Some(-2.0));
    assert_eq!(task.vertical().smoother().current_position(), -2.0);

    // Releasing the stick afterwards continues from the new frame.
    let mut moving = task;
    moving.input_mut().0 = RawTarget::velocity(Vector3::new(1.0, 0.0, 0.0));
    moving.set_local_position(estimate);
    moving.update(DT);
    assert!(!moving.horizontal().is_position_locked());
    assert_eq!(moving.horizontal().current_position(), Vector2::new(5.0, 5.0));
}

#[test]
fn horizontal_velocity_reset_reseeds_both_axes() {
    let mut estimate = VehicleLocalPosition {
        position: Vector3::new(1.0, 1.0, -2.0),
        ..Default::default()
    };
    let mut task = PositionSmoothingTask::new(FixedTarget::default(), SmoothingLimits::default());
    task.set_local_position(estimate);
    assert!(task.activate(&LocalPositionSetpoint::unknown()));
    task.update(DT);
    assert!(task.horizontal().is_position_locked());

    estimate.velocity = Vector3::new(0.4, -0.2, 0.0);
    estimate.vxy_reset_counter = 1;
    task.set_local_position(estimate);
    let sp = task.update(DT);

    let reseeded = Vector2::new(0.4, -0.2);
    assert_eq!(task.horizontal().smoother_velocity(), reseeded);
    assert_eq!(sp.xy.velocity, reseeded);
    // Velocity resets leave the lock and the vertical axis alone.
    assert_eq!(sp.xy.position, Some(Vector2::new(1.0, 1.0)));
    assert_eq!(task.vertical().smoother().current_velocity(), 0.0);

    // Same counter again: the smoother brakes from the reseeded velocity.
    task.set_local_position(estimate);
    let sp = task.update(DT);
    assert!(sp.xy.velocity.norm() < reseeded.norm());
    assert!(sp.xy.velocity.x > 0.0);
}
