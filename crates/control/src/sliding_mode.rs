//! Boundary-layer sliding-mode law for the terminal approach.

use capture_config::SlidingModeConfig;
use capture_core::state::StateVector;
use capture_core::vector::{self, Vector3};

use crate::Controller;

/// Drives `s = v + λe` to zero with a saturated switching term.
#[derive(Debug, Clone)]
pub struct SlidingMode {
    slope: f64,
    gain: f64,
    boundary_layer: f64,
    max_accel: f64,
}

/// Sliding surface `s = v + λ e` for a position error `e`.
pub fn sliding_surface(state: &StateVector, target: &Vector3, slope: f64) -> Vector3 {
    let error = vector::sub(&state.position_m, target);
    vector::add(&state.velocity_m_s, &vector::scale(&error, slope))
}

impl SlidingMode {
    pub fn new(config: &SlidingModeConfig) -> Self {
        Self {
            slope: config.surface_slope,
            gain: config.switching_gain,
            boundary_layer: config.boundary_layer,
            max_accel: config.max_accel_m_s2,
        }
    }
}

impl Controller for SlidingMode {
    fn compute_control(
        &mut self,
        state: &StateVector,
        target: &Vector3,
        _seed: Option<&Vector3>,
    ) -> Vector3 {
        let s = sliding_surface(state, target, self.slope);
        let u = s.map(|c| -self.gain * (c / self.boundary_layer).clamp(-1.0, 1.0));
        vector::clamp_norm(&u, self.max_accel)
    }

    fn name(&self) -> &str {
        "sliding_mode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_term_saturates_outside_boundary_layer() {
        let mut smc = SlidingMode::new(&SlidingModeConfig::default());
        let state = StateVector::new([2.0, 0.0, 0.0], [0.0, 0.0, 0.01]);
        let u = smc.compute_control(&state, &[0.0; 3], None);
        assert!((u[0] + 0.05).abs() < 1e-12);
        // inside the layer: linear in s
        assert!((u[2] + 0.05 * 0.1).abs() < 1e-12);
    }
}
