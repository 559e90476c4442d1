use debris_capture::config::{
    ConfigError, FuelFlowStep, MissionConfig, default_catalog, load_catalog, load_mission_config,
};

#[test]
fn shipped_mission_config_loads() {
    let config = load_mission_config("configs/mission.yaml").expect("mission config");
    assert_eq!(config.thresholds, MissionConfig::default().thresholds);
    assert_eq!(config.propulsion.fuel_flow, FuelFlowStep::Fixed { seconds: 0.1 });
    assert_eq!(config.controllers, MissionConfig::default().controllers);
    assert_eq!(config.simulation.duration_s, 900.0);
}

#[test]
fn shipped_catalog_matches_reference() {
    let catalog = load_catalog("configs/debris.toml").expect("debris catalog");
    let reference = default_catalog();
    assert_eq!(catalog.len(), reference.len());
    for (loaded, expected) in catalog.iter().zip(&reference) {
        assert!(loaded.name.is_some());
        assert_eq!(loaded.pos, expected.pos);
        assert_eq!(loaded.vel, expected.vel);
        assert_eq!(loaded.mass_kg, expected.mass_kg);
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_mission_config("configs/does-not-exist.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)), "{err}");
}
