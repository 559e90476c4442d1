//! Per-tick telemetry records.

use std::fmt;

use capture_core::vector::{self, Vector3};
use serde::Serialize;

use crate::phase::MissionPhase;

/// Control law active during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlMode {
    #[serde(rename = "LQR")]
    Lqr,
    #[serde(rename = "MPC")]
    Mpc,
    #[serde(rename = "SMC+Adaptive")]
    SlidingAdaptive,
    #[serde(rename = "retract")]
    Retract,
    #[serde(rename = "reentry")]
    Reentry,
}

impl ControlMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlMode::Lqr => "LQR",
            ControlMode::Mpc => "MPC",
            ControlMode::SlidingAdaptive => "SMC+Adaptive",
            ControlMode::Retract => "retract",
            ControlMode::Reentry => "reentry",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recoverable per-tick faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryError {
    LowPower,
}

impl TelemetryError {
    pub fn as_str(self) -> &'static str {
        match self {
            TelemetryError::LowPower => "low_power",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Telemetry {
    pub phase: MissionPhase,
    pub control_mode: Option<ControlMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TelemetryError>,
    pub distance_m: Option<f64>,
    pub power_delivered_kw: f64,
    pub thrust_n: Vector3,
    pub fuel_used_kg: f64,
    pub soc: f64,
    pub fuel_kg: f64,
}

impl Telemetry {
    pub(crate) fn new(phase: MissionPhase) -> Self {
        Self {
            phase,
            control_mode: None,
            error: None,
            distance_m: None,
            power_delivered_kw: 0.0,
            thrust_n: vector::ZERO,
            fuel_used_kg: 0.0,
            soc: 0.0,
            fuel_kg: 0.0,
        }
    }

    pub fn thrust_magnitude_n(&self) -> f64 {
        vector::norm(&self.thrust_n)
    }
}

/// Result of one orchestrator tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickOutput {
    /// Commanded acceleration for the driver to integrate (m/s²).
    pub acceleration: Vector3,
    pub telemetry: Telemetry,
}
