//! Battery model gating every control action on the stage.

use capture_config::PowerConfig;
use capture_core::units::{kw_seconds_to_kwh, kwh_over_seconds_to_kw};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq)]
pub enum PowerError {
    #[error("requested load must be finite and non-negative, got {0} kW")]
    InvalidLoad(f64),
    #[error("time step must be finite and positive, got {0} s")]
    InvalidTimeStep(f64),
}

/// Battery-powered electrical bus.
#[derive(Debug, Clone)]
pub struct PowerSystem {
    capacity_kwh: f64,
    soc: f64,
    efficiency: f64,
    max_discharge_kw: f64,
    min_soc: f64,
}

impl PowerSystem {
    pub fn new(config: &PowerConfig) -> Self {
        Self {
            capacity_kwh: config.capacity_kwh,
            soc: config.initial_soc.clamp(0.0, 1.0),
            efficiency: config.efficiency,
            max_discharge_kw: config.max_discharge_kw,
            min_soc: config.min_soc,
        }
    }

    /// State of charge in `[0, 1]`.
    pub fn soc(&self) -> f64 {
        self.soc
    }

    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }

    pub fn max_discharge_kw(&self) -> f64 {
        self.max_discharge_kw
    }

    pub fn remaining_energy_kwh(&self) -> f64 {
        self.soc * self.capacity_kwh
    }

    /// Whether the battery can carry a load of `kw` right now.
    pub fn can_support(&self, kw: f64) -> bool {
        self.soc > self.min_soc && kw <= self.max_discharge_kw
    }

    /// Draw `kw` for `dt` seconds and return the power delivered to the load.
    ///
    /// The draw is limited by the discharge rate and by the energy left in the
    /// battery; the returned figure includes conversion losses.
    pub fn request_power(&mut self, kw: f64, dt: f64) -> Result<f64, PowerError> {
        if !(kw.is_finite() && kw >= 0.0) {
            return Err(PowerError::InvalidLoad(kw));
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PowerError::InvalidTimeStep(dt));
        }

        let mut delivered_kw = kw.min(self.max_discharge_kw);
        let energy_kwh = kw_seconds_to_kwh(delivered_kw, dt);
        let remaining_kwh = self.remaining_energy_kwh();
        if energy_kwh > remaining_kwh {
            delivered_kw = kwh_over_seconds_to_kw(remaining_kwh, dt);
            self.soc = 0.0;
            warn!(delivered_kw, "battery depleted");
        } else {
            self.soc = (self.soc - energy_kwh / self.capacity_kwh).max(0.0);
        }
        debug!(requested_kw = kw, delivered_kw, soc = self.soc, "power drawn");
        Ok(delivered_kw * self.efficiency)
    }
}
