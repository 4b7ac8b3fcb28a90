//! Closed-loop simulation of a manual task against a simple plant.
//!
//! The plant tracks a commanded velocity through a first-order lag and
//! integrates it to position. When a setpoint carries a position, a
//! proportional position loop adds a correction on top of the feedforward
//! velocity, like the downstream controller would. The commanded velocity
//! is fed back to the task on the next tick.

use nalgebra::{Vector2, Vector3};
use thiserror::Error;
use tracing::{debug, info};

use mcsv_common::estimator::VehicleLocalPosition;
use mcsv_common::setpoint::{LocalPositionSetpoint, RawTarget};

use crate::config::{TargetSegment, TaskConfig};
use crate::task::{AltitudeSmoothingTask, PositionSmoothingTask, RawTargetProvider};

/// Simulation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("task refused activation")]
    ActivationRefused,
    #[error("non-finite setpoint at tick {tick}")]
    NonFiniteSetpoint { tick: usize },
}

/// Piecewise-constant stick schedule.
#[derive(Debug, Clone)]
pub struct SegmentSchedule {
    segments: Vec<TargetSegment>,
    elapsed: f32,
    /// Index of the segment that was active on the previous tick.
    current: usize,
}

impl SegmentSchedule {
    pub fn new(segments: Vec<TargetSegment>) -> Self {
        Self {
            segments,
            elapsed: 0.0,
            current: 0,
        }
    }

    /// Time at which the last non-zero segment ends, if any.
    pub fn last_input_end(&self) -> Option<f32> {
        let mut end = 0.0;
        let mut last = None;
        for seg in &self.segments {
            end += seg.duration;
            if seg.velocity.iter().any(|v| *v != 0.0) {
                last = Some(end);
            }
        }
        last
    }

    fn segment_at(&self, t: f32) -> Option<(usize, TargetSegment)> {
        let mut end = 0.0;
        for (i, seg) in self.segments.iter().enumerate() {
            end += seg.duration;
            if t < end {
                return Some((i, *seg));
            }
        }
        None
    }
}

impl RawTargetProvider for SegmentSchedule {
    fn raw_target(&mut self, dt: f32) -> RawTarget {
        let t = self.elapsed;
        self.elapsed += dt;
        match self.segment_at(t) {
            Some((i, seg)) => {
                if i != self.current {
                    debug!(segment = i, t, "stick segment");
                    self.current = i;
                }
                RawTarget::velocity(Vector3::from(seg.velocity))
            }
            None => RawTarget::default(),
        }
    }
}

/// First-order velocity plant with a proportional position loop.
#[derive(Debug, Clone)]
pub struct PlantModel {
    position: Vector3<f32>,
    velocity: Vector3<f32>,
    time_constant: f32,
    position_gain: f32,
}

impl PlantModel {
    pub fn new(position: Vector3<f32>, time_constant: f32, position_gain: f32) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            time_constant,
            position_gain,
        }
    }

    /// Velocity the controller would command for one axis.
    pub fn command(&self, axis: usize, velocity: f32, position: Option<f32>) -> f32 {
        match position {
            Some(p) => velocity + self.position_gain * (p - self.position[axis]),
            None => velocity,
        }
    }

    /// Advance the plant by `dt` under `commanded` velocity.
    pub fn step(&mut self, commanded: Vector3<f32>, dt: f32) {
        let alpha = if self.time_constant > 0.0 {
            (dt / self.time_constant).min(1.0)
        } else {
            1.0
        };
        self.velocity += (commanded - self.velocity) * alpha;
        self.position += self.velocity * dt;
    }

    pub fn estimate(&self) -> VehicleLocalPosition {
        VehicleLocalPosition {
            position: self.position,
            velocity: self.velocity,
            ..Default::default()
        }
    }

    #[inline]
    pub fn position(&self) -> Vector3<f32> {
        self.position
    }
}

/// Outcome of one simulated run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimReport {
    pub ticks: usize,
    /// Ticks between the end of stick input and the first locked tick.
    pub lock_delay_ticks: Option<usize>,
    /// Position held by the lock at the end of the run.
    pub held_position: Option<Vector3<f32>>,
    pub final_position: Vector3<f32>,
    pub max_speed: f32,
}

fn tick_count(config: &TaskConfig) -> usize {
    (config.sim.duration() / config.sim.dt).round() as usize
}

fn input_end_tick(schedule: &SegmentSchedule, dt: f32) -> usize {
    schedule
        .last_input_end()
        .map_or(0, |t| (t / dt).round() as usize)
}

/// Run the altitude task through the configured schedule.
pub fn run_altitude(config: &TaskConfig) -> Result<SimReport, SimError> {
    let dt = config.sim.dt;
    let schedule = SegmentSchedule::new(config.sim.segments.clone());
    let input_end = input_end_tick(&schedule, dt);
    let mut plant = PlantModel::new(
        Vector3::from(config.sim.start_position),
        config.sim.plant_time_constant,
        config.sim.position_gain,
    );

    let mut task = AltitudeSmoothingTask::new(schedule, config.limits);
    task.set_local_position(plant.estimate());
    if !task.activate(&LocalPositionSetpoint::unknown()) {
        return Err(SimError::ActivationRefused);
    }

    let ticks = tick_count(config);
    let mut lock_delay_ticks = None;
    let mut max_speed = 0.0_f32;

    for tick in 0..ticks {
        task.set_local_position(plant.estimate());
        let sp = task.update(dt);
        if !sp.is_finite() {
            return Err(SimError::NonFiniteSetpoint { tick });
        }

        if tick >= input_end && lock_delay_ticks.is_none() && task.is_position_locked() {
            lock_delay_ticks = Some(tick - input_end);
        }
        max_speed = max_speed.max(sp.z.velocity.abs());

        let vz = plant.command(2, sp.z.velocity, sp.z.position);
        task.set_velocity_setpoint_feedback(vz);
        plant.step(Vector3::new(0.0, 0.0, vz), dt);
    }

    let final_position = plant.position();
    let report = SimReport {
        ticks,
        lock_delay_ticks,
        held_position: task
            .locked_position()
            .map(|z| Vector3::new(final_position.x, final_position.y, z)),
        final_position,
        max_speed,
    };
    info!(
        ticks,
        lock_delay = ?report.lock_delay_ticks,
        z = final_position.z,
        "altitude simulation finished"
    );
    Ok(report)
}

/// Run the three-axis position task through the configured schedule.
pub fn run_position(config: &TaskConfig) -> Result<SimReport, SimError> {
    let dt = config.sim.dt;
    let schedule = SegmentSchedule::new(config.sim.segments.clone());
    let input_end = input_end_tick(&schedule, dt);
    let mut plant = PlantModel::new(
        Vector3::from(config.sim.start_position),
        config.sim.plant_time_constant,
        config.sim.position_gain,
    );

    let mut task = PositionSmoothingTask::new(schedule, config.limits);
    task.set_local_position(plant.estimate());
    if !task.activate(&LocalPositionSetpoint::unknown()) {
        return Err(SimError::ActivationRefused);
    }

    let ticks = tick_count(config);
    let mut lock_delay_ticks = None;
    let mut max_speed = 0.0_f32;

    for tick in 0..ticks {
        task.set_local_position(plant.estimate());
        let sp = task.update(dt);
        if !sp.is_finite() {
            return Err(SimError::NonFiniteSetpoint { tick });
        }

        let locked =
            task.horizontal().is_position_locked() && task.vertical().is_position_locked();
        if tick >= input_end && lock_delay_ticks.is_none() && locked {
            lock_delay_ticks = Some(tick - input_end);
        }
        let velocity = Vector3::new(sp.xy.velocity.x, sp.xy.velocity.y, sp.z.velocity);
        max_speed = max_speed.max(velocity.norm());

        let xy_position = sp.xy.position.unwrap_or_else(Vector2::zeros);
        let commanded = Vector3::new(
            plant.command(0, sp.xy.velocity.x, sp.xy.position.map(|_| xy_position.x)),
            plant.command(1, sp.xy.velocity.y, sp.xy.position.map(|_| xy_position.y)),
            plant.command(2, sp.z.velocity, sp.z.position),
        );
        task.set_velocity_setpoint_feedback(commanded);
        plant.step(commanded, dt);
    }

    let final_position = plant.position();
    let held_position = match (
        task.horizontal().locked_position(),
        task.vertical().locked_position(),
    ) {
        (Some(xy), Some(z)) => Some(Vector3::new(xy.x, xy.y, z)),
        _ => None,
    };
    let report = SimReport {
        ticks,
        lock_delay_ticks,
        held_position,
        final_position,
        max_speed,
    };
    info!(
        ticks,
        lock_delay = ?report.lock_delay_ticks,
        x = final_position.x,
        y = final_position.y,
        z = final_position.z,
        "position simulation finished"
    );
    Ok(report)
}

// ─── Tests ──────────────────────────────────────────────────────────
