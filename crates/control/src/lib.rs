//! Feedback control laws for the approach regimes.
//!
//! Every law maps the stage state and the target position to a desired
//! acceleration in the LVLH frame. The orchestrator selects the law by phase
//! and treats each one as opaque.

pub mod adaptive;
pub mod lqr;
pub mod mpc;
pub mod sliding_mode;

use capture_config::ControllersConfig;
use capture_core::state::StateVector;
use capture_core::vector::Vector3;

pub use adaptive::Adaptive;
pub use lqr::LinearQuadratic;
pub use mpc::ModelPredictive;
pub use sliding_mode::SlidingMode;

/// Common contract for all approach controllers.
pub trait Controller {
    /// Desired acceleration (m/s²) to bring `state` onto `target`.
    ///
    /// `seed` carries another controller's output for laws that refine it.
    fn compute_control(
        &mut self,
        state: &StateVector,
        target: &Vector3,
        seed: Option<&Vector3>,
    ) -> Vector3;

    /// Clear any internal memory (integrators, adapted gains).
    fn reset(&mut self) {}

    fn name(&self) -> &str;
}

/// The four controllers dispatched by mission phase.
pub struct ControllerSet {
    pub coarse: Box<dyn Controller>,
    pub fine: Box<dyn Controller>,
    pub terminal: Box<dyn Controller>,
    pub terminal_adaptive: Box<dyn Controller>,
}

impl ControllerSet {
    /// Reference laws: LQR, MPC, sliding mode, and adaptive correction.
    pub fn from_config(config: &ControllersConfig) -> Self {
        Self {
            coarse: Box::new(LinearQuadratic::new(&config.lqr)),
            fine: Box::new(ModelPredictive::new(&config.mpc)),
            terminal: Box::new(SlidingMode::new(&config.sliding_mode)),
            terminal_adaptive: Box::new(Adaptive::new(&config.adaptive)),
        }
    }

    pub fn reset(&mut self) {
        self.coarse.reset();
        self.fine.reset();
        self.terminal.reset();
        self.terminal_adaptive.reset();
    }
}

impl std::fmt::Debug for ControllerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerSet")
            .field("coarse", &self.coarse.name())
            .field("fine", &self.fine.name())
            .field("terminal", &self.terminal.name())
            .field("terminal_adaptive", &self.terminal_adaptive.name())
            .finish()
    }
}
