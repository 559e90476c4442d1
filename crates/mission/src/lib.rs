//! Phase-transition orchestrator for the debris capture mission.
//!
//! The [`Orchestrator`] owns the power, propulsion, and grabbing subsystems
//! together with the approach controllers, and advances the mission one
//! [`Orchestrator::tick`] at a time. [`Simulation`] wraps it in a simple
//! kinematic driver.

pub mod orchestrator;
pub mod phase;
pub mod simulation;
pub mod telemetry;

pub use orchestrator::{Orchestrator, identify_nearest_debris};
pub use phase::{MissionPhase, decide_phase};
pub use simulation::{MissionReport, PhaseEvent, Simulation, TickSample};
pub use telemetry::{ControlMode, Telemetry, TelemetryError, TickOutput};

use capture_config::ConfigError;
use capture_grabbing::GrabbingError;
use capture_power::PowerError;
use capture_propulsion::PropulsionError;

/// Top-level mission error.
#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error("invalid mission configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("time step must be finite and positive, got {0} s")]
    InvalidTimeStep(f64),
    #[error("state vector must be finite")]
    InvalidState,
    #[error("target position and velocity must be finite")]
    InvalidTarget,
    #[error("catalog cannot change once a target is locked")]
    TargetLocked,
    #[error("no target selected")]
    NoTarget,
    #[error("power system: {0}")]
    Power(#[from] PowerError),
    #[error("propulsion: {0}")]
    Propulsion(#[from] PropulsionError),
    #[error("grabbing system: {0}")]
    Grabbing(#[from] GrabbingError),
}
