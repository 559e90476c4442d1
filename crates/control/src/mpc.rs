//! Receding-horizon controller for the fine approach.

use capture_config::MpcConfig;
use capture_core::state::StateVector;
use capture_core::vector::{self, Vector3};

use crate::Controller;

/// Constant-acceleration receding horizon.
///
/// Each call picks the acceleration `a` held over the horizon `T` that
/// minimises `|e + vT + ½aT²|² + w|a|²`, then applies only its first step.
#[derive(Debug, Clone)]
pub struct ModelPredictive {
    horizon_s: f64,
    effort_weight: f64,
    max_accel: f64,
}

impl ModelPredictive {
    pub fn new(config: &MpcConfig) -> Self {
        Self {
            horizon_s: f64::from(config.horizon_steps) * config.dt_s,
            effort_weight: config.effort_weight,
            max_accel: config.max_accel_m_s2,
        }
    }

    pub fn horizon_s(&self) -> f64 {
        self.horizon_s
    }
}

impl Controller for ModelPredictive {
    fn compute_control(
        &mut self,
        state: &StateVector,
        target: &Vector3,
        _seed: Option<&Vector3>,
    ) -> Vector3 {
        let t = self.horizon_s;
        let half_t2 = 0.5 * t * t;
        let error = vector::sub(&state.position_m, target);
        let coast = vector::add(&error, &vector::scale(&state.velocity_m_s, t));
        let gain = -half_t2 / (half_t2 * half_t2 + self.effort_weight);
        vector::clamp_norm(&vector::scale(&coast, gain), self.max_accel)
    }

    fn name(&self) -> &str {
        "mpc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unweighted_solution_nulls_terminal_error() {
        let cfg = MpcConfig {
            max_accel_m_s2: 10.0,
            ..MpcConfig::default()
        };
        let mut mpc = ModelPredictive::new(&cfg);
        let state = StateVector::new([1.0, -2.0, 0.5], [0.01, 0.0, -0.02]);
        let target = [0.0; 3];
        let a = mpc.compute_control(&state, &target, None);
        let t = mpc.horizon_s();
        for i in 0..3 {
            let terminal = state.position_m[i] + state.velocity_m_s[i] * t + 0.5 * a[i] * t * t;
            assert!(terminal.abs() < 1e-9);
        }
    }
}
