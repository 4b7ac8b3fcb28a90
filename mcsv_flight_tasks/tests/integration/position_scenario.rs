//! Three-axis task: diagonal translation at constant altitude.

use mcsv_common::prelude::*;
use mcsv_flight_tasks::task::PositionSmoothingTask;
use nalgebra::{Vector2, Vector3};

const DT: f32 = 0.01;
const INPUT_TICKS: usize = 200;
const TOTAL_TICKS: usize = 500;

fn run(stick: Vector3<f32>) -> Vec<(TrajectorySetpoint, bool)> {
    let mut tick = 0usize;
    let input = move |_dt: f32| {
        let v = if tick < INPUT_TICKS {
            stick
        } else {
            Vector3::zeros()
        };
        tick += 1;
        RawTarget::velocity(v)
    };

    let mut task = PositionSmoothingTask::new(input, SmoothingLimits::default());
    let mut estimate = VehicleLocalPosition {
        position: Vector3::new(0.0, 0.0, -5.0),
        ..Default::default()
    };
    task.set_local_position(estimate);
    assert!(task.activate(&LocalPositionSetpoint::unknown()));

    let mut out = Vec::with_capacity(TOTAL_TICKS);
    for _ in 0..TOTAL_TICKS {
        task.set_local_position(estimate);
        let sp = task.update(DT);
        out.push((sp, task.horizontal().is_position_locked()));

        let v = Vector3::new(sp.xy.velocity.x, sp.xy.velocity.y, sp.z.velocity);
        estimate.position += v * DT;
        estimate.velocity = v;
        task.set_velocity_setpoint_feedback(v);
    }
    out
}

#[test]
fn altitude_holds_while_translating() {
    let trace = run(Vector3::new(2.0, 1.0, 0.0));
    for (i, (sp, _)) in trace.iter().enumerate() {
        assert!(sp.is_finite(), "tick {i}");
        assert_eq!(sp.z.position, Some(-5.0), "tick {i}");
        assert_eq!(sp.z.velocity, 0.0, "tick {i}");
    }
}

#[test]
fn horizontal_lock_follows_stick() {
    let trace = run(Vector3::new(2.0, 1.0, 0.0));
    for (i, (sp, locked)) in trace.iter().take(INPUT_TICKS).enumerate() {
        assert!(!locked, "tick {i} locked during input");
        assert_eq!(sp.xy.position, None);
    }

    let lock_tick = trace
        .iter()
        .position(|(_, locked)| *locked)
        .expect("xy never locked");
    assert!(lock_tick - INPUT_TICKS < 150);

    let held = trace[lock_tick].0.xy.position.expect("no held position");
    assert!(held.x > held.y && held.y > 0.0, "held {held:?}");
    for (sp, locked) in &trace[lock_tick..] {
        assert!(*locked);
        assert_eq!(sp.xy.position, Some(held));
    }

    let last = trace[TOTAL_TICKS - 1].0;
    assert_eq!(last.xy.velocity, Vector2::zeros());
    assert_eq!(last.xy.acceleration, Vector2::zeros());
}

#[test]
fn synchronized_axes_stop_together() {
    let trace = run(Vector3::new(2.0, 1.0, 0.0));
    let stop_tick = |axis: usize| {
        trace
            .iter()
            .skip(INPUT_TICKS)
            .position(|(sp, _)| sp.xy.velocity[axis].abs() < 0.01)
            .expect("axis never stopped")
    };
    let (x, y) = (stop_tick(0), stop_tick(1));
    assert!(x.abs_diff(y) <= 10, "x stopped at {x}, y at {y}");
}

#[test]
fn horizontal_speed_respects_limit() {
    let limits = SmoothingLimits::default();
    let trace = run(Vector3::new(20.0, 0.0, 0.0));
    let peak = trace
        .iter()
        .map(|(sp, _)| sp.xy.velocity.x)
        .fold(f32::MIN, f32::max);
    assert!(peak <= limits.max_vel_xy + 1e-2, "peak {peak}");
}
