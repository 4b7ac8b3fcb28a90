mod activation;
mod ekf_reset;
mod lock_continuity;
mod position_scenario;
mod simulation;
