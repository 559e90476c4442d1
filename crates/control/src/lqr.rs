//! Steady-state linear-quadratic regulator for the coarse approach.

use capture_config::LqrConfig;
use capture_core::state::StateVector;
use capture_core::vector::{self, Vector3};

use crate::Controller;

/// LQR on three decoupled double integrators.
///
/// For `ẍ = u` with cost `∫ q_p x² + q_v ẋ² + r u² dt` the Riccati solution
/// gives `u = -kp x - kd ẋ` with `kp = √(q_p / r)` and
/// `kd = √(q_v / r + 2 kp)`.
#[derive(Debug, Clone)]
pub struct LinearQuadratic {
    kp: f64,
    kd: f64,
    max_accel: f64,
}

impl LinearQuadratic {
    pub fn new(config: &LqrConfig) -> Self {
        let kp = (config.q_position / config.r_effort).sqrt();
        let kd = (config.q_velocity / config.r_effort + 2.0 * kp).sqrt();
        Self {
            kp,
            kd,
            max_accel: config.max_accel_m_s2,
        }
    }

    pub fn gains(&self) -> (f64, f64) {
        (self.kp, self.kd)
    }
}

impl Controller for LinearQuadratic {
    fn compute_control(
        &mut self,
        state: &StateVector,
        target: &Vector3,
        _seed: Option<&Vector3>,
    ) -> Vector3 {
        let error = vector::sub(&state.position_m, target);
        let u = vector::add(
            &vector::scale(&error, -self.kp),
            &vector::scale(&state.velocity_m_s, -self.kd),
        );
        vector::clamp_norm(&u, self.max_accel)
    }

    fn name(&self) -> &str {
        "lqr"
    }
}
