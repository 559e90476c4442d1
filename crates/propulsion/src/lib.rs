//! RCS and vernier thruster model with propellant accounting.

use capture_config::{FuelFlowStep, PropulsionConfig};
use capture_core::vector::{self, Vector3};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq)]
pub enum PropulsionError {
    #[error("commanded acceleration must be finite, got {0:?}")]
    InvalidAcceleration(Vector3),
    #[error("time step must be finite and positive, got {0} s")]
    InvalidTimeStep(f64),
}

/// Force realised by the thrusters for one command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThrustCommand {
    pub force_n: Vector3,
    /// Propellant actually drawn from the tanks.
    pub fuel_used_kg: f64,
}

impl ThrustCommand {
    pub fn magnitude_n(&self) -> f64 {
        vector::norm(&self.force_n)
    }
}

/// Main RCS and vernier thrusters of the stage.
#[derive(Debug, Clone)]
pub struct PropulsionSystem {
    main_thrust_n: f64,
    vernier_thrust_n: f64,
    isp_seconds: f64,
    g0: f64,
    mass_kg: f64,
    fuel_kg: f64,
    reserve_fuel_kg: f64,
    fuel_flow: FuelFlowStep,
    vernier_axis: Vector3,
}

impl PropulsionSystem {
    pub fn new(config: &PropulsionConfig) -> Self {
        let axis_norm = vector::norm(&config.vernier_axis);
        let vernier_axis = if axis_norm > 0.0 {
            vector::scale(&config.vernier_axis, 1.0 / axis_norm)
        } else {
            [1.0, 0.0, 0.0]
        };
        Self {
            main_thrust_n: config.main_thrust_n,
            vernier_thrust_n: config.vernier_thrust_n,
            isp_seconds: config.isp_seconds,
            g0: config.standard_gravity_m_s2,
            mass_kg: config.dry_mass_kg,
            fuel_kg: config.fuel_kg.max(0.0),
            reserve_fuel_kg: config.reserve_fuel_kg,
            fuel_flow: config.fuel_flow,
            vernier_axis,
        }
    }

    /// Dry mass used to turn accelerations into forces.
    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    pub fn fuel_kg(&self) -> f64 {
        self.fuel_kg
    }

    /// Largest force the combined-axis RCS can produce.
    pub fn max_force_n(&self) -> f64 {
        3f64.sqrt() * self.main_thrust_n
    }

    /// Advisory check only: thrust commands are not refused above zero fuel.
    pub fn has_fuel(&self) -> bool {
        self.fuel_kg > self.reserve_fuel_kg
    }

    /// Convert a desired acceleration into a thrust vector and burn the propellant for it.
    ///
    /// Forces above the combined-axis cap are scaled down. Forces below the
    /// vernier minimum impulse are scaled *up* to it, so a near-zero command
    /// still fires the verniers; a zero command fires them along the
    /// configured vernier axis. With empty tanks no force is produced.
    pub fn thrust_from_acceleration(
        &mut self,
        accel_m_s2: &Vector3,
        dt: f64,
    ) -> Result<ThrustCommand, PropulsionError> {
        if !vector::is_finite(accel_m_s2) {
            return Err(PropulsionError::InvalidAcceleration(*accel_m_s2));
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PropulsionError::InvalidTimeStep(dt));
        }
        if self.fuel_kg <= 0.0 {
            warn!("propellant exhausted, thrust command dropped");
            return Ok(ThrustCommand {
                force_n: vector::ZERO,
                fuel_used_kg: 0.0,
            });
        }

        let mut force = vector::scale(accel_m_s2, self.mass_kg);
        let f_max = self.max_force_n();
        force = vector::clamp_norm(&force, f_max);

        let mag = vector::norm(&force);
        if mag < self.vernier_thrust_n {
            force = if mag > 0.0 {
                vector::scale(&force, self.vernier_thrust_n / mag)
            } else {
                vector::scale(&self.vernier_axis, self.vernier_thrust_n)
            };
        }

        let burn_s = match self.fuel_flow {
            FuelFlowStep::Fixed { seconds } => seconds,
            FuelFlowStep::TickDt => dt,
        };
        let mdot = vector::norm(&force) / (self.isp_seconds * self.g0);
        let fuel_used = (mdot * burn_s).min(self.fuel_kg);
        self.fuel_kg = (self.fuel_kg - fuel_used).max(0.0);
        debug!(force_n = vector::norm(&force), fuel_used, fuel_kg = self.fuel_kg, "thrust");

        Ok(ThrustCommand {
            force_n: force,
            fuel_used_kg: fuel_used,
        })
    }
}
