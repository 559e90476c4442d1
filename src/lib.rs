//! Autonomous mission controller for locating, approaching, and net-capturing
//! a piece of orbital debris.
//!
//! The workspace crates are re-exported here so front-ends only need this
//! one dependency.

pub mod logging;
pub mod report;

pub use capture_config as config;
pub use capture_control as control;
pub use capture_core as base;
pub use capture_export as export;
pub use capture_grabbing as grabbing;
pub use capture_mission as mission;
pub use capture_power as power;
pub use capture_propulsion as propulsion;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
