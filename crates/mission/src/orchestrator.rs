//! Mission orchestrator: one `tick` per control cycle.

use capture_config::{DebrisRecord, MissionConfig};
use capture_control::ControllerSet;
use capture_core::state::StateVector;
use capture_core::units::mm_to_m;
use capture_core::vector::{self, Vector3};
use capture_grabbing::GrabbingSystem;
use capture_power::PowerSystem;
use capture_propulsion::PropulsionSystem;
use tracing::{debug, info, warn};

use crate::MissionError;
use crate::phase::{MissionPhase, decide_phase};
use crate::telemetry::{ControlMode, Telemetry, TelemetryError, TickOutput};

/// Index of the catalog entry nearest to `position`.
///
/// Ties go to the earliest entry. Returns `None` for an empty catalog.
pub fn identify_nearest_debris(position: &Vector3, catalog: &[DebrisRecord]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, record) in catalog.iter().enumerate() {
        let distance = vector::distance(&record.pos, position);
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

/// Owns the mission phase, the selected target, and every subsystem.
#[derive(Debug)]
pub struct Orchestrator {
    config: MissionConfig,
    phase: MissionPhase,
    catalog: Vec<DebrisRecord>,
    target: Option<usize>,
    power: PowerSystem,
    propulsion: PropulsionSystem,
    grabbing: GrabbingSystem,
    controllers: ControllerSet,
}

impl Orchestrator {
    /// Build an orchestrator with the reference control laws.
    pub fn new(config: MissionConfig) -> Result<Self, MissionError> {
        let controllers = ControllerSet::from_config(&config.controllers);
        Self::with_controllers(config, controllers)
    }

    /// Build an orchestrator around caller-supplied control laws.
    pub fn with_controllers(
        config: MissionConfig,
        controllers: ControllerSet,
    ) -> Result<Self, MissionError> {
        config.validate()?;
        Ok(Self {
            power: PowerSystem::new(&config.power),
            propulsion: PropulsionSystem::new(&config.propulsion),
            grabbing: GrabbingSystem::new(&config.grabbing),
            phase: MissionPhase::PayloadDeployed,
            catalog: Vec::new(),
            target: None,
            controllers,
            config,
        })
    }

    /// Replace the debris catalog.
    ///
    /// Refused once a target has been locked, and when any record has a
    /// non-finite state or a negative mass. A refused catalog leaves the
    /// current one in place.
    pub fn set_catalog(&mut self, catalog: Vec<DebrisRecord>) -> Result<(), MissionError> {
        if self.target.is_some() {
            return Err(MissionError::TargetLocked);
        }
        for record in &catalog {
            record.validate()?;
        }
        self.catalog = catalog;
        Ok(())
    }

    pub fn catalog(&self) -> &[DebrisRecord] {
        &self.catalog
    }

    pub fn target(&self) -> Option<&DebrisRecord> {
        self.target.map(|index| &self.catalog[index])
    }

    /// Move the selected target, e.g. to apply drift between ticks.
    pub fn update_target_state(&mut self, pos: Vector3, vel: Vector3) -> Result<(), MissionError> {
        let index = self.target.ok_or(MissionError::NoTarget)?;
        if !(vector::is_finite(&pos) && vector::is_finite(&vel)) {
            return Err(MissionError::InvalidTarget);
        }
        let record = &mut self.catalog[index];
        record.pos = pos;
        record.vel = vel;
        Ok(())
    }

    pub fn phase(&self) -> MissionPhase {
        self.phase
    }

    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    pub fn power(&self) -> &PowerSystem {
        &self.power
    }

    pub fn propulsion(&self) -> &PropulsionSystem {
        &self.propulsion
    }

    pub fn grabbing(&self) -> &GrabbingSystem {
        &self.grabbing
    }

    /// Run one control cycle and return the commanded acceleration.
    ///
    /// Order within the tick: power gate, target selection, phase decision,
    /// controller dispatch, then power and propellant consumption for the
    /// commanded acceleration. A failed power gate ends the tick early with
    /// a zero command and a `low_power` flag.
    pub fn tick(&mut self, state: &StateVector, dt: f64) -> Result<TickOutput, MissionError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(MissionError::InvalidTimeStep(dt));
        }
        if !state.is_finite() {
            return Err(MissionError::InvalidState);
        }

        if !self.power.can_support(self.config.guidance.power_gate_kw) {
            warn!(soc = self.power.soc(), phase = %self.phase, "insufficient power, control inhibited");
            let mut telemetry = self.snapshot(Telemetry::new(self.phase));
            telemetry.error = Some(TelemetryError::LowPower);
            return Ok(TickOutput {
                acceleration: vector::ZERO,
                telemetry,
            });
        }

        if self.target.is_none() {
            if let Some(index) = identify_nearest_debris(&state.position_m, &self.catalog) {
                let record = &self.catalog[index];
                info!(
                    index,
                    name = record.name.as_deref().unwrap_or("-"),
                    range_m = state.range_to(&record.pos),
                    mass_kg = record.mass_kg,
                    "target selected"
                );
                self.target = Some(index);
                self.phase = MissionPhase::CoarseApproach;
                // adapted gains belong to the previous engagement
                self.controllers.reset();
            }
        }

        let target = self.target.map(|index| self.catalog[index].clone());
        let distance = target.as_ref().map(|t| state.range_to(&t.pos));
        let next = decide_phase(
            self.phase,
            distance,
            &self.grabbing.status(),
            &self.config.thresholds,
        );
        if next != self.phase {
            info!(from = %self.phase, to = %next, distance_m = ?distance, "phase transition");
            self.phase = next;
        }

        let (acceleration, control_mode) = self.dispatch(state, target.as_ref(), distance, dt)?;

        let demand_kw = vector::norm(&acceleration) * self.config.guidance.kw_per_m_s2;
        let delivered_kw = self.power.request_power(demand_kw, dt)?;
        let thrust = self.propulsion.thrust_from_acceleration(&acceleration, dt)?;

        let mut telemetry = Telemetry::new(self.phase);
        telemetry.control_mode = control_mode;
        telemetry.distance_m = distance;
        telemetry.power_delivered_kw = delivered_kw;
        telemetry.thrust_n = thrust.force_n;
        telemetry.fuel_used_kg = thrust.fuel_used_kg;
        let telemetry = self.snapshot(telemetry);
        debug!(
            phase = %telemetry.phase,
            mode = ?telemetry.control_mode,
            accel = ?acceleration,
            soc = telemetry.soc,
            fuel_kg = telemetry.fuel_kg,
            "tick"
        );

        Ok(TickOutput {
            acceleration,
            telemetry,
        })
    }

    fn dispatch(
        &mut self,
        state: &StateVector,
        target: Option<&DebrisRecord>,
        distance: Option<f64>,
        dt: f64,
    ) -> Result<(Vector3, Option<ControlMode>), MissionError> {
        let Some(target) = target else {
            return Ok((vector::ZERO, None));
        };

        let command = match self.phase {
            MissionPhase::CoarseApproach => (
                self.controllers.coarse.compute_control(state, &target.pos, None),
                Some(ControlMode::Lqr),
            ),
            MissionPhase::FineApproach => (
                self.controllers.fine.compute_control(state, &target.pos, None),
                Some(ControlMode::Mpc),
            ),
            MissionPhase::Capture => {
                let terminal = self.controllers.terminal.compute_control(state, &target.pos, None);
                let u = self.controllers.terminal_adaptive.compute_control(
                    state,
                    &target.pos,
                    Some(&terminal),
                );
                let tolerance_m = mm_to_m(self.config.thresholds.capture_tolerance_mm);
                if distance.is_some_and(|d| d < tolerance_m) {
                    self.grabbing.deploy_net(dt)?;
                }
                (u, Some(ControlMode::SlidingAdaptive))
            }
            MissionPhase::Retracting => {
                // The capture range is wider than the deployment tolerance, so
                // the net usually finishes deploying here.
                if !self.grabbing.net_deployed() {
                    self.grabbing.deploy_net(dt)?;
                }
                self.grabbing.confirm_capture(target.mass_kg)?;
                self.grabbing.retract_net(dt)?;
                (vector::ZERO, Some(ControlMode::Retract))
            }
            MissionPhase::Reentry => {
                let p = state.position_m;
                let gain = -self.config.guidance.deorbit_gain / (vector::norm(&p) + 1e-6);
                (vector::scale(&p, gain), Some(ControlMode::Reentry))
            }
            _ => (vector::ZERO, None),
        };
        Ok(command)
    }

    fn snapshot(&self, mut telemetry: Telemetry) -> Telemetry {
        telemetry.soc = self.power.soc();
        telemetry.fuel_kg = self.propulsion.fuel_kg();
        telemetry
    }
}
