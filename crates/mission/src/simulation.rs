//! Fixed-step kinematic driver around the orchestrator.
//!
//! The driver owns the stage state, integrates the commanded acceleration,
//! and drifts the selected target. Phase changes are left entirely to the
//! orchestrator.

use capture_config::DebrisRecord;
use capture_core::state::StateVector;
use capture_core::vector::{self, Vector3};
use serde::Serialize;
use tracing::info;

use crate::MissionError;
use crate::orchestrator::Orchestrator;
use crate::phase::MissionPhase;
use crate::telemetry::Telemetry;

/// First tick spent in a phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseEvent {
    pub time_s: f64,
    pub phase: MissionPhase,
    pub distance_m: Option<f64>,
    pub accel_norm_m_s2: f64,
}

/// State after one driver step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSample {
    pub time_s: f64,
    pub state: StateVector,
    pub acceleration: Vector3,
    pub target_pos: Option<Vector3>,
    pub telemetry: Telemetry,
}

/// Outcome of a simulated mission.
#[derive(Debug, Clone, Serialize)]
pub struct MissionReport {
    pub elapsed_s: f64,
    pub final_phase: MissionPhase,
    pub target: Option<DebrisRecord>,
    pub captured_mass_kg: Option<f64>,
    pub soc: f64,
    pub fuel_kg: f64,
    pub phases: Vec<PhaseEvent>,
    pub samples: Vec<TickSample>,
}

impl MissionReport {
    pub fn completed(&self) -> bool {
        self.final_phase.is_terminal()
    }

    /// Phase names joined with arrows, in the order they were entered.
    pub fn phase_summary(&self) -> String {
        self.phases
            .iter()
            .map(|e| e.phase.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[derive(Debug)]
pub struct Simulation {
    orchestrator: Orchestrator,
    state: StateVector,
    drift_factor: f64,
    elapsed_s: f64,
    phases: Vec<PhaseEvent>,
    samples: Vec<TickSample>,
}

impl Simulation {
    pub fn new(orchestrator: Orchestrator, initial_state: StateVector) -> Self {
        let drift_factor = orchestrator.config().simulation.drift_factor;
        Self {
            orchestrator,
            state: initial_state,
            drift_factor,
            elapsed_s: 0.0,
            phases: Vec::new(),
            samples: Vec::new(),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn state(&self) -> &StateVector {
        &self.state
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// Tick the orchestrator, integrate the command, and drift the target.
    pub fn step(&mut self, dt: f64) -> Result<&TickSample, MissionError> {
        let output = self.orchestrator.tick(&self.state, dt)?;
        self.state.integrate(&output.acceleration, dt);

        if let Some(target) = self.orchestrator.target() {
            let drift = vector::scale(&target.vel, dt * self.drift_factor);
            let pos = vector::add(&target.pos, &drift);
            let vel = target.vel;
            self.orchestrator.update_target_state(pos, vel)?;
        }
        let target_pos = self.orchestrator.target().map(|t| t.pos);

        let phase = self.orchestrator.phase();
        if self.phases.last().is_none_or(|e| e.phase != phase) {
            let distance_m = target_pos.map(|p| self.state.range_to(&p));
            let accel_norm_m_s2 = vector::norm(&output.acceleration);
            info!(t = self.elapsed_s, %phase, ?distance_m, accel_norm_m_s2, "entered phase");
            self.phases.push(PhaseEvent {
                time_s: self.elapsed_s,
                phase,
                distance_m,
                accel_norm_m_s2,
            });
        }

        self.samples.push(TickSample {
            time_s: self.elapsed_s,
            state: self.state,
            acceleration: output.acceleration,
            target_pos,
            telemetry: output.telemetry,
        });
        self.elapsed_s += dt;
        Ok(&self.samples[self.samples.len() - 1])
    }

    /// Step until `duration_s` has elapsed or the mission completes.
    pub fn run(mut self, duration_s: f64, dt: f64) -> Result<MissionReport, MissionError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(MissionError::InvalidTimeStep(dt));
        }
        while self.elapsed_s < duration_s && !self.orchestrator.phase().is_terminal() {
            self.step(dt)?;
        }
        Ok(self.into_report())
    }

    pub fn into_report(self) -> MissionReport {
        let orchestrator = &self.orchestrator;
        MissionReport {
            elapsed_s: self.elapsed_s,
            final_phase: orchestrator.phase(),
            target: orchestrator.target().cloned(),
            captured_mass_kg: orchestrator.grabbing().captured_mass_kg(),
            soc: orchestrator.power().soc(),
            fuel_kg: orchestrator.propulsion().fuel_kg(),
            phases: self.phases,
            samples: self.samples,
        }
    }
}
