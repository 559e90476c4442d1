//! Configuration models and loaders for the debris capture mission.
//!
//! Every tunable constant of the mission lives in [`MissionConfig`]. The
//! `Default` implementations reproduce the reference mission, so partial YAML
//! or TOML files only need to name the values they change.

use std::fs::File;
use std::path::Path;

use capture_core::vector::{self, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Range thresholds driving the phase state machine (metres unless noted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    /// Coarse (LQR) to fine (MPC) hand-over range.
    pub coarse_m: f64,
    /// Fine (MPC) to terminal (sliding mode) hand-over range.
    pub fine_m: f64,
    /// Range below which capture is considered achieved.
    pub capture_m: f64,
    /// Net deployment precision, in millimetres.
    pub capture_tolerance_mm: f64,
    /// Retraction time after which the mission proceeds to re-entry.
    pub reentry_retract_s: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            coarse_m: 500.0,
            fine_m: 5.0,
            capture_m: 0.01,
            capture_tolerance_mm: 1.0,
            reentry_retract_s: 5.0,
        }
    }
}

/// Battery parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub capacity_kwh: f64,
    pub efficiency: f64,
    pub max_discharge_kw: f64,
    pub initial_soc: f64,
    /// State of charge at or below which no load is supported.
    pub min_soc: f64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 50.0,
            efficiency: 0.95,
            max_discharge_kw: 10.0,
            initial_soc: 1.0,
            min_soc: 0.01,
        }
    }
}

/// How much burn time one thrust command is charged for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FuelFlowStep {
    /// Every command burns for a fixed duration, whatever the tick length.
    #[serde(rename = "fixed")]
    Fixed { seconds: f64 },
    /// Every command burns for the tick duration passed by the caller.
    #[serde(rename = "tick_dt")]
    TickDt,
}

impl Default for FuelFlowStep {
    fn default() -> Self {
        FuelFlowStep::Fixed { seconds: 0.1 }
    }
}

/// RCS and vernier thruster parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropulsionConfig {
    pub dry_mass_kg: f64,
    pub fuel_kg: f64,
    pub main_thrust_n: f64,
    pub vernier_thrust_n: f64,
    pub isp_seconds: f64,
    pub standard_gravity_m_s2: f64,
    /// Threshold used by the advisory `has_fuel` check.
    pub reserve_fuel_kg: f64,
    pub fuel_flow: FuelFlowStep,
    /// Direction of the vernier floor when the command carries no direction.
    pub vernier_axis: Vector3,
}

impl Default for PropulsionConfig {
    fn default() -> Self {
        Self {
            dry_mass_kg: 4_000.0,
            fuel_kg: 500.0,
            main_thrust_n: 450.0,
            vernier_thrust_n: 50.0,
            isp_seconds: 300.0,
            standard_gravity_m_s2: capture_core::constants::G0,
            reserve_fuel_kg: 1.0,
            fuel_flow: FuelFlowStep::default(),
            vernier_axis: [1.0, 0.0, 0.0],
        }
    }
}

/// Net deployment and retraction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabbingConfig {
    pub deployment_time_s: f64,
    pub retraction_time_s: f64,
    pub max_debris_mass_kg: f64,
}

impl Default for GrabbingConfig {
    fn default() -> Self {
        Self {
            deployment_time_s: 3.0,
            retraction_time_s: 5.0,
            max_debris_mass_kg: 500.0,
        }
    }
}

/// Orchestrator-level guidance constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Load the battery must be able to carry before any control is attempted.
    pub power_gate_kw: f64,
    /// Electrical load per unit of commanded acceleration (kW per m/s²).
    pub kw_per_m_s2: f64,
    /// Magnitude of the re-entry pointing acceleration (m/s²).
    pub deorbit_gain: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            power_gate_kw: 5.0,
            kw_per_m_s2: 0.5,
            deorbit_gain: 0.5,
        }
    }
}

/// Weights of the coarse-range linear-quadratic regulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LqrConfig {
    pub q_position: f64,
    pub q_velocity: f64,
    pub r_effort: f64,
    pub max_accel_m_s2: f64,
}

impl Default for LqrConfig {
    fn default() -> Self {
        Self {
            q_position: 1.0e-4,
            q_velocity: 1.67,
            r_effort: 1.0,
            max_accel_m_s2: 0.15,
        }
    }
}

/// Receding-horizon parameters of the fine-range predictive controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpcConfig {
    pub horizon_steps: u32,
    pub effort_weight: f64,
    pub max_accel_m_s2: f64,
    /// Length of one horizon step.
    pub dt_s: f64,
}

impl Default for MpcConfig {
    fn default() -> Self {
        Self {
            horizon_steps: 600,
            effort_weight: 0.0,
            max_accel_m_s2: 0.15,
            dt_s: 0.1,
        }
    }
}

/// Sliding surface and switching gain of the terminal controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidingModeConfig {
    pub surface_slope: f64,
    pub switching_gain: f64,
    pub boundary_layer: f64,
    pub max_accel_m_s2: f64,
}

impl Default for SlidingModeConfig {
    fn default() -> Self {
        Self {
            surface_slope: 1.0,
            switching_gain: 0.05,
            boundary_layer: 0.1,
            max_accel_m_s2: 0.1,
        }
    }
}

/// Adaptation law of the terminal correction stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    pub surface_slope: f64,
    pub adaptation_rate: f64,
    pub initial_gain: f64,
    pub max_gain: f64,
    pub max_accel_m_s2: f64,
    pub dt_s: f64,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            surface_slope: 1.0,
            adaptation_rate: 0.5,
            initial_gain: 0.0,
            max_gain: 0.5,
            max_accel_m_s2: 0.1,
            dt_s: 0.01,
        }
    }
}

/// Parameters for the four control laws.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllersConfig {
    pub lqr: LqrConfig,
    pub mpc: MpcConfig,
    pub sliding_mode: SlidingModeConfig,
    pub adaptive: AdaptiveConfig,
}

/// Driver settings used by the bundled simulation loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub duration_s: f64,
    pub dt_s: f64,
    /// Fraction of the catalogued debris velocity applied as drift each step.
    pub drift_factor: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration_s: 120.0,
            dt_s: 0.1,
            drift_factor: 0.1,
        }
    }
}

/// Complete, immutable mission configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub thresholds: PhaseThresholds,
    pub power: PowerConfig,
    pub propulsion: PropulsionConfig,
    pub grabbing: GrabbingConfig,
    pub guidance: GuidanceConfig,
    pub controllers: ControllersConfig,
    pub simulation: SimulationConfig,
}

/// Single catalogued debris object in the LVLH frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebrisRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pos: Vector3,
    #[serde(default)]
    pub vel: Vector3,
    pub mass_kg: f64,
}

impl DebrisRecord {
    pub fn new(pos: Vector3, vel: Vector3, mass_kg: f64) -> Self {
        Self {
            name: None,
            pos,
            vel,
            mass_kg,
        }
    }

    /// Finite position and velocity, non-negative mass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(vector::is_finite(&self.pos) && vector::is_finite(&self.vel)) {
            return Err(invalid("debris.pos", "position and velocity must be finite"));
        }
        require_non_negative("debris.mass_kg", self.mass_kg)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    debris: Vec<DebrisRecord>,
}

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be non-negative, got {value}")))
    }
}

impl MissionConfig {
    /// Check physical plausibility and the ordering of the phase thresholds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        require_positive("thresholds.coarse_m", t.coarse_m)?;
        require_positive("thresholds.fine_m", t.fine_m)?;
        require_positive("thresholds.capture_m", t.capture_m)?;
        require_positive("thresholds.capture_tolerance_mm", t.capture_tolerance_mm)?;
        require_non_negative("thresholds.reentry_retract_s", t.reentry_retract_s)?;
        if !(t.coarse_m > t.fine_m && t.fine_m > t.capture_m) {
            return Err(invalid(
                "thresholds",
                "ranges must shrink from coarse to fine to capture",
            ));
        }

        let p = &self.power;
        require_positive("power.capacity_kwh", p.capacity_kwh)?;
        require_positive("power.max_discharge_kw", p.max_discharge_kw)?;
        if !(p.efficiency > 0.0 && p.efficiency <= 1.0) {
            return Err(invalid("power.efficiency", "must lie in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&p.initial_soc) {
            return Err(invalid("power.initial_soc", "must lie in [0, 1]"));
        }
        if !(0.0..1.0).contains(&p.min_soc) {
            return Err(invalid("power.min_soc", "must lie in [0, 1)"));
        }

        let prop = &self.propulsion;
        require_positive("propulsion.dry_mass_kg", prop.dry_mass_kg)?;
        require_non_negative("propulsion.fuel_kg", prop.fuel_kg)?;
        require_positive("propulsion.main_thrust_n", prop.main_thrust_n)?;
        require_positive("propulsion.vernier_thrust_n", prop.vernier_thrust_n)?;
        require_positive("propulsion.isp_seconds", prop.isp_seconds)?;
        require_positive("propulsion.standard_gravity_m_s2", prop.standard_gravity_m_s2)?;
        require_non_negative("propulsion.reserve_fuel_kg", prop.reserve_fuel_kg)?;
        if prop.vernier_thrust_n > 3f64.sqrt() * prop.main_thrust_n {
            return Err(invalid(
                "propulsion.vernier_thrust_n",
                "vernier floor exceeds the combined-axis thrust cap",
            ));
        }
        if let FuelFlowStep::Fixed { seconds } = prop.fuel_flow {
            require_positive("propulsion.fuel_flow.seconds", seconds)?;
        }
        if !(vector::is_finite(&prop.vernier_axis) && vector::norm(&prop.vernier_axis) > 0.0) {
            return Err(invalid("propulsion.vernier_axis", "must be a non-zero vector"));
        }

        let g = &self.grabbing;
        require_positive("grabbing.deployment_time_s", g.deployment_time_s)?;
        require_positive("grabbing.retraction_time_s", g.retraction_time_s)?;
        require_non_negative("grabbing.max_debris_mass_kg", g.max_debris_mass_kg)?;

        let gd = &self.guidance;
        require_non_negative("guidance.power_gate_kw", gd.power_gate_kw)?;
        require_non_negative("guidance.kw_per_m_s2", gd.kw_per_m_s2)?;
        require_non_negative("guidance.deorbit_gain", gd.deorbit_gain)?;

        let c = &self.controllers;
        require_positive("controllers.lqr.r_effort", c.lqr.r_effort)?;
        require_non_negative("controllers.lqr.q_position", c.lqr.q_position)?;
        require_non_negative("controllers.lqr.q_velocity", c.lqr.q_velocity)?;
        require_positive("controllers.lqr.max_accel_m_s2", c.lqr.max_accel_m_s2)?;
        if c.mpc.horizon_steps == 0 {
            return Err(invalid("controllers.mpc.horizon_steps", "must be at least 1"));
        }
        require_non_negative("controllers.mpc.effort_weight", c.mpc.effort_weight)?;
        require_positive("controllers.mpc.max_accel_m_s2", c.mpc.max_accel_m_s2)?;
        require_positive("controllers.mpc.dt_s", c.mpc.dt_s)?;
        require_positive("controllers.sliding_mode.boundary_layer", c.sliding_mode.boundary_layer)?;
        require_non_negative("controllers.sliding_mode.surface_slope", c.sliding_mode.surface_slope)?;
        require_non_negative(
            "controllers.sliding_mode.switching_gain",
            c.sliding_mode.switching_gain,
        )?;
        require_positive(
            "controllers.sliding_mode.max_accel_m_s2",
            c.sliding_mode.max_accel_m_s2,
        )?;
        require_non_negative("controllers.adaptive.adaptation_rate", c.adaptive.adaptation_rate)?;
        require_non_negative("controllers.adaptive.initial_gain", c.adaptive.initial_gain)?;
        if c.adaptive.max_gain < c.adaptive.initial_gain {
            return Err(invalid(
                "controllers.adaptive.max_gain",
                "must not be below the initial gain",
            ));
        }
        require_positive("controllers.adaptive.max_accel_m_s2", c.adaptive.max_accel_m_s2)?;
        require_positive("controllers.adaptive.dt_s", c.adaptive.dt_s)?;

        let s = &self.simulation;
        require_positive("simulation.duration_s", s.duration_s)?;
        require_positive("simulation.dt_s", s.dt_s)?;
        require_non_negative("simulation.drift_factor", s.drift_factor)?;
        Ok(())
    }
}

/// Load and validate a mission configuration from YAML or TOML (by extension).
pub fn load_mission_config<P: AsRef<Path>>(path: P) -> Result<MissionConfig, ConfigError> {
    let path = path.as_ref();
    let config: MissionConfig = if is_toml(path) {
        toml::from_str(&std::fs::read_to_string(path)?)?
    } else {
        serde_yaml::from_reader(File::open(path)?)?
    };
    config.validate()?;
    Ok(config)
}

/// Load a debris catalog.
///
/// YAML files hold a top-level list of records; TOML files hold a
/// `[[debris]]` array of tables.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<DebrisRecord>, ConfigError> {
    let path = path.as_ref();
    let records: Vec<DebrisRecord> = if is_toml(path) {
        let file: CatalogFile = toml::from_str(&std::fs::read_to_string(path)?)?;
        file.debris
    } else {
        serde_yaml::from_reader(File::open(path)?)?
    };
    for record in &records {
        record.validate()?;
    }
    Ok(records)
}

/// The three-object catalog of the reference scenario.
pub fn default_catalog() -> Vec<DebrisRecord> {
    vec![
        DebrisRecord::new([800.0, 200.0, 100.0], [0.1, -0.05, 0.0], 150.0),
        DebrisRecord::new([300.0, 50.0, 20.0], [-0.02, 0.01, 0.0], 80.0),
        DebrisRecord::new([5_000.0, 500.0, 300.0], [0.0, 0.0, 0.0], 200.0),
    ]
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}
