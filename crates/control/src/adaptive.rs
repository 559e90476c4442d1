//! Adaptive correction stacked on the terminal controller.

use capture_config::AdaptiveConfig;
use capture_core::state::StateVector;
use capture_core::vector::{self, Vector3};

use crate::Controller;
use crate::sliding_mode::sliding_surface;

/// Adds `-θ s` to the seed command, growing `θ` with `|s|²`.
///
/// `θ` is the only memory kept between calls and is bounded by `max_gain`.
#[derive(Debug, Clone)]
pub struct Adaptive {
    slope: f64,
    rate: f64,
    initial_gain: f64,
    max_gain: f64,
    max_accel: f64,
    dt: f64,
    theta: f64,
}

impl Adaptive {
    pub fn new(config: &AdaptiveConfig) -> Self {
        Self {
            slope: config.surface_slope,
            rate: config.adaptation_rate,
            initial_gain: config.initial_gain,
            max_gain: config.max_gain,
            max_accel: config.max_accel_m_s2,
            dt: config.dt_s,
            theta: config.initial_gain,
        }
    }

    pub fn gain(&self) -> f64 {
        self.theta
    }
}

impl Controller for Adaptive {
    fn compute_control(
        &mut self,
        state: &StateVector,
        target: &Vector3,
        seed: Option<&Vector3>,
    ) -> Vector3 {
        let s = sliding_surface(state, target, self.slope);
        self.theta = (self.theta + self.rate * vector::dot(&s, &s) * self.dt).min(self.max_gain);
        let base = seed.copied().unwrap_or(vector::ZERO);
        let u = vector::add(&base, &vector::scale(&s, -self.theta));
        vector::clamp_norm(&u, self.max_accel)
    }

    fn reset(&mut self) {
        self.theta = self.initial_gain;
    }

    fn name(&self) -> &str {
        "adaptive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_grows_bounded_and_resets() {
        let cfg = AdaptiveConfig::default();
        let mut ctl = Adaptive::new(&cfg);
        let state = StateVector::new([4.0, 0.0, 0.0], [0.0; 3]);
        for _ in 0..1_000 {
            ctl.compute_control(&state, &[0.0; 3], None);
        }
        assert_eq!(ctl.gain(), cfg.max_gain);
        ctl.reset();
        assert_eq!(ctl.gain(), cfg.initial_gain);
    }

    #[test]
    fn zero_surface_passes_seed_through() {
        let mut ctl = Adaptive::new(&AdaptiveConfig::default());
        let state = StateVector::default();
        let seed = [0.01, -0.02, 0.0];
        assert_eq!(ctl.compute_control(&state, &[0.0; 3], Some(&seed)), seed);
    }
}
