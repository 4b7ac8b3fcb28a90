//! Closed-loop simulator driven from a TOML file.

use std::io::Write;

use mcsv_common::config::ConfigError;
use mcsv_flight_tasks::config::load_task_config;
use mcsv_flight_tasks::sim::{run_altitude, run_position};
use tempfile::NamedTempFile;

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn descent_scenario_from_file() {
    let file = write_config(
        r#"
[limits]
max_jerk = 8.0
max_accel_down = 3.0
max_vel_down = 3.0

[sim]
dt = 0.01

[[sim.segments]]
duration = 2.0
velocity = [0.0, 0.0, 2.0]

[[sim.segments]]
duration = 3.0
velocity = [0.0, 0.0, 0.0]
"#,
    );
    let config = load_task_config(Some(file.path())).unwrap();
    let report = run_altitude(&config).unwrap();

    assert_eq!(report.ticks, 500);
    let delay = report.lock_delay_ticks.expect("never locked");
    assert!(delay < 150, "lock delay {delay}");
    let held = report.held_position.expect("no held position");
    assert!(held.z > 3.0, "held {}", held.z);
    assert!((report.final_position.z - held.z).abs() < 0.05);
    assert!(report.max_speed <= 2.0 + 1e-2);
}

#[test]
fn position_run_holds_all_axes() {
    let file = write_config(
        r#"
[sim]
start_position = [0.0, 0.0, -10.0]

[[sim.segments]]
duration = 1.5
velocity = [1.0, -1.0, -0.5]

[[sim.segments]]
duration = 3.0
velocity = [0.0, 0.0, 0.0]
"#,
    );
    let config = load_task_config(Some(file.path())).unwrap();
    let report = run_position(&config).unwrap();

    assert!(report.lock_delay_ticks.is_some());
    let held = report.held_position.expect("no held position");
    assert!(held.x > 0.5 && held.y < -0.5 && held.z < -10.3, "held {held:?}");
    assert!((report.final_position - held).norm() < 0.1);
}

#[test]
fn invalid_file_is_rejected() {
    let file = write_config("[limits]\nmax_jerk = 0.0\n");
    assert!(matches!(
        load_task_config(Some(file.path())),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn missing_file_is_reported() {
    let result = load_task_config(Some(std::path::Path::new("/nonexistent/mcsv.toml")));
    assert!(matches!(result, Err(ConfigError::FileNotFound)));
}
