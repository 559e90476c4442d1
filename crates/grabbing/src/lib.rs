//! Net capture mechanism: deployment, capture confirmation, and retraction.
//!
//! The mechanism only moves forward. Timers accumulate from construction and
//! are never reset; the net deploys once and the captured mass is recorded
//! once. Calls made out of order are refused through their return value
//! rather than as errors, so the orchestrator can keep calling every tick.

use capture_config::GrabbingConfig;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum GrabbingError {
    #[error("time step must be finite and non-negative, got {0} s")]
    InvalidTimeStep(f64),
    #[error("debris mass must be finite and non-negative, got {0} kg")]
    InvalidMass(f64),
}

/// Coarse mechanism state derived from the flags and timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetState {
    Idle,
    Deploying,
    Deployed,
    Captured,
    Retracting,
    Retracted,
}

/// Snapshot consumed by the phase state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GrabbingStatus {
    pub net_deployed: bool,
    pub capture_confirmed: bool,
    pub retract_timer_s: f64,
}

#[derive(Debug, Clone)]
pub struct GrabbingSystem {
    config: GrabbingConfig,
    net_deploying: bool,
    net_deployed: bool,
    capture_confirmed: bool,
    retracting: bool,
    deployment_thruster_active: bool,
    deploy_timer_s: f64,
    retract_timer_s: f64,
    captured_mass_kg: Option<f64>,
}

fn check_dt(dt: f64) -> Result<(), GrabbingError> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(GrabbingError::InvalidTimeStep(dt))
    }
}

impl GrabbingSystem {
    pub fn new(config: &GrabbingConfig) -> Self {
        Self {
            config: config.clone(),
            net_deploying: false,
            net_deployed: false,
            capture_confirmed: false,
            retracting: false,
            deployment_thruster_active: false,
            deploy_timer_s: 0.0,
            retract_timer_s: 0.0,
            captured_mass_kg: None,
        }
    }

    pub fn net_deployed(&self) -> bool {
        self.net_deployed
    }

    pub fn capture_confirmed(&self) -> bool {
        self.capture_confirmed
    }

    pub fn deployment_thruster_active(&self) -> bool {
        self.deployment_thruster_active
    }

    pub fn deploy_timer_s(&self) -> f64 {
        self.deploy_timer_s
    }

    pub fn retract_timer_s(&self) -> f64 {
        self.retract_timer_s
    }

    pub fn captured_mass_kg(&self) -> Option<f64> {
        self.captured_mass_kg
    }

    pub fn status(&self) -> GrabbingStatus {
        GrabbingStatus {
            net_deployed: self.net_deployed,
            capture_confirmed: self.capture_confirmed,
            retract_timer_s: self.retract_timer_s,
        }
    }

    pub fn state(&self) -> NetState {
        if self.retract_timer_s >= self.config.retraction_time_s {
            NetState::Retracted
        } else if self.retracting {
            NetState::Retracting
        } else if self.capture_confirmed {
            NetState::Captured
        } else if self.net_deployed {
            NetState::Deployed
        } else if self.net_deploying {
            NetState::Deploying
        } else {
            NetState::Idle
        }
    }

    /// Advance net deployment by `dt`. Returns true once the net is fully out.
    pub fn deploy_net(&mut self, dt: f64) -> Result<bool, GrabbingError> {
        check_dt(dt)?;
        if self.net_deployed {
            return Ok(true);
        }
        if !self.net_deploying {
            self.net_deploying = true;
            self.deployment_thruster_active = true;
            info!("net deployment started");
        }
        self.deploy_timer_s += dt;
        if self.deploy_timer_s >= self.config.deployment_time_s {
            self.net_deployed = true;
            self.net_deploying = false;
            self.deployment_thruster_active = false;
            info!(deploy_timer_s = self.deploy_timer_s, "net deployed");
        }
        Ok(self.net_deployed)
    }

    /// Confirm the debris is held by the net.
    ///
    /// Refused (returns `false`, nothing changes) until the net is deployed or
    /// when the object is heavier than the net can hold, even after an earlier
    /// confirmation. The first confirmed mass is kept.
    pub fn confirm_capture(&mut self, mass_kg: f64) -> Result<bool, GrabbingError> {
        if !(mass_kg.is_finite() && mass_kg >= 0.0) {
            return Err(GrabbingError::InvalidMass(mass_kg));
        }
        if !self.net_deployed {
            return Ok(false);
        }
        if mass_kg > self.config.max_debris_mass_kg {
            warn!(
                mass_kg,
                limit_kg = self.config.max_debris_mass_kg,
                "debris too massive for the net"
            );
            return Ok(false);
        }
        if self.capture_confirmed {
            return Ok(true);
        }
        self.capture_confirmed = true;
        self.captured_mass_kg = Some(mass_kg);
        info!(mass_kg, "capture confirmed");
        Ok(true)
    }

    /// Advance retraction by `dt`. Returns true once retraction time has elapsed.
    pub fn retract_net(&mut self, dt: f64) -> Result<bool, GrabbingError> {
        check_dt(dt)?;
        if !self.capture_confirmed {
            return Ok(false);
        }
        self.retracting = true;
        self.retract_timer_s += dt;
        Ok(self.retract_timer_s >= self.config.retraction_time_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_follow_the_sequence() {
        let mut g = GrabbingSystem::new(&GrabbingConfig::default());
        assert_eq!(g.state(), NetState::Idle);
        g.deploy_net(1.0).unwrap();
        assert_eq!(g.state(), NetState::Deploying);
        assert!(g.deployment_thruster_active());
        g.deploy_net(2.0).unwrap();
        assert_eq!(g.state(), NetState::Deployed);
        assert!(!g.deployment_thruster_active());
        g.confirm_capture(10.0).unwrap();
        assert_eq!(g.state(), NetState::Captured);
        g.retract_net(1.0).unwrap();
        assert_eq!(g.state(), NetState::Retracting);
        g.retract_net(4.0).unwrap();
        assert_eq!(g.state(), NetState::Retracted);
    }

    #[test]
    fn captured_mass_is_recorded_once() {
        let mut g = GrabbingSystem::new(&GrabbingConfig::default());
        g.deploy_net(3.0).unwrap();
        assert!(g.confirm_capture(80.0).unwrap());
        assert!(g.confirm_capture(120.0).unwrap());
        assert_eq!(g.captured_mass_kg(), Some(80.0));
    }

    #[test]
    fn over_mass_is_refused_after_confirmation() {
        let mut g = GrabbingSystem::new(&GrabbingConfig::default());
        g.deploy_net(3.0).unwrap();
        assert!(g.confirm_capture(80.0).unwrap());
        assert!(!g.confirm_capture(600.0).unwrap());
        assert!(g.capture_confirmed());
        assert_eq!(g.captured_mass_kg(), Some(80.0));
    }

    #[test]
    fn bad_inputs_are_rejected_without_side_effects() {
        let mut g = GrabbingSystem::new(&GrabbingConfig::default());
        assert_eq!(g.deploy_net(-0.1), Err(GrabbingError::InvalidTimeStep(-0.1)));
        assert_eq!(g.confirm_capture(-5.0), Err(GrabbingError::InvalidMass(-5.0)));
        assert_eq!(g.state(), NetState::Idle);
        assert_eq!(g.deploy_timer_s(), 0.0);
    }
}
