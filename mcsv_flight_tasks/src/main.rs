//! # MCSV Flight Task Simulator
//!
//! Runs one manual flight task against a first-order plant through a
//! scripted stick schedule and reports when the position lock engaged.
//! Without `--config` the default schedule descends at 2 m/s for two
//! seconds and then centers the stick for three.

use clap::{Parser, ValueEnum};
use mcsv_common::config::{ConfigError, LogLevel};
use mcsv_flight_tasks::config::{load_task_config, TaskConfig};
use mcsv_flight_tasks::sim::{run_altitude, run_position};
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TaskKind {
    /// Vertical smoothing only.
    Altitude,
    /// XY + Z smoothing with independent locks.
    Position,
}

/// MCSV flight task simulator
#[derive(Parser, Debug)]
#[command(name = "mcsv_flight_tasks")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Closed-loop simulation of jerk-limited manual flight tasks")]
struct Args {
    /// Path to the simulator TOML. Defaults apply when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Task to simulate.
    #[arg(long, value_enum, default_value_t = TaskKind::Altitude)]
    task: TaskKind,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,

    /// Enable verbose logging (DEBUG level), overriding `shared.log_level`.
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let loaded = load_task_config(args.config.as_deref());
    let level = loaded
        .as_ref()
        .map_or(LogLevel::Info, |config| config.shared.log_level);
    setup_tracing(&args, level);

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, &config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn run(args: &Args, config: &TaskConfig) -> Result<(), Box<dyn std::error::Error>> {
    if args.print_config {
        let text =
            toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    info!(
        "{} v{} starting: task={:?}, dt={}s, duration={}s",
        config.shared.service_name,
        env!("CARGO_PKG_VERSION"),
        args.task,
        config.sim.dt,
        config.sim.duration(),
    );

    let report = match args.task {
        TaskKind::Altitude => run_altitude(config)?,
        TaskKind::Position => run_position(config)?,
    };

    match (report.lock_delay_ticks, report.held_position) {
        (Some(delay), Some(held)) => info!(
            "Locked {} ticks ({:.2}s) after input ended, holding [{:.3}, {:.3}, {:.3}]",
            delay,
            delay as f32 * config.sim.dt,
            held.x,
            held.y,
            held.z,
        ),
        _ => info!("Position lock not engaged at end of run"),
    }
    info!(
        "Final position [{:.3}, {:.3}, {:.3}], peak speed {:.3} m/s over {} ticks",
        report.final_position.x,
        report.final_position.y,
        report.final_position.z,
        report.max_speed,
        report.ticks,
    );

    Ok(())
}

fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        match configured {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
