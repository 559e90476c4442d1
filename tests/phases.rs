use debris_capture::base::state::StateVector;
use debris_capture::config::{DebrisRecord, GrabbingConfig, MissionConfig, PhaseThresholds};
use debris_capture::grabbing::GrabbingSystem;
use debris_capture::mission::{ControlMode, MissionPhase, Orchestrator, decide_phase};

fn orchestrator_with(target: [f64; 3]) -> Orchestrator {
    let mut orchestrator = Orchestrator::new(MissionConfig::default()).expect("default config");
    orchestrator
        .set_catalog(vec![DebrisRecord::new(target, [0.0; 3], 80.0)])
        .unwrap();
    orchestrator
}

#[test]
fn long_range_target_stays_in_coarse_approach() {
    let mut orchestrator = orchestrator_with([600.0, 0.0, 0.0]);
    let out = orchestrator.tick(&StateVector::default(), 0.1).unwrap();
    assert_eq!(out.telemetry.phase, MissionPhase::CoarseApproach);
    assert_eq!(out.telemetry.control_mode, Some(ControlMode::Lqr));
    assert_eq!(out.telemetry.distance_m, Some(600.0));

    let closer = StateVector::new([101.0, 0.0, 0.0], [0.0; 3]);
    let out = orchestrator.tick(&closer, 0.1).unwrap();
    assert_eq!(out.telemetry.phase, MissionPhase::FineApproach);
    assert_eq!(out.telemetry.control_mode, Some(ControlMode::Mpc));
}

#[test]
fn at_most_one_range_transition_per_tick() {
    let mut orchestrator = orchestrator_with([0.001, 0.0, 0.0]);
    let state = StateVector::default();
    let expected = [
        MissionPhase::FineApproach,
        MissionPhase::Capture,
        MissionPhase::Retracting,
    ];
    for phase in expected {
        let out = orchestrator.tick(&state, 0.1).unwrap();
        assert_eq!(out.telemetry.phase, phase);
    }
}

#[test]
fn finished_retraction_overrides_capture() {
    let thresholds = PhaseThresholds::default();
    let mut net = GrabbingSystem::new(&GrabbingConfig::default());
    net.deploy_net(3.0).unwrap();
    net.confirm_capture(80.0).unwrap();
    net.retract_net(5.0).unwrap();

    // far outside the capture range, so only the retraction rule can fire
    let next = decide_phase(MissionPhase::Capture, Some(2.0), &net.status(), &thresholds);
    assert_eq!(next, MissionPhase::Reentry);

    let next = decide_phase(MissionPhase::Reentry, Some(2.0), &net.status(), &thresholds);
    assert_eq!(next, MissionPhase::Complete);

    let next = decide_phase(MissionPhase::Complete, Some(2.0), &net.status(), &thresholds);
    assert_eq!(next, MissionPhase::Complete);
}

#[test]
fn losing_the_target_returns_to_seeking() {
    let thresholds = PhaseThresholds::default();
    let net = GrabbingSystem::new(&GrabbingConfig::default());
    for phase in MissionPhase::ALL {
        assert_eq!(
            decide_phase(phase, None, &net.status(), &thresholds),
            MissionPhase::SeekingDebris
        );
    }
}

#[test]
fn phase_names_are_snake_case() {
    let names: Vec<&str> = MissionPhase::ALL.iter().map(|p| p.as_str()).collect();
    assert_eq!(
        names,
        [
            "payload_deployed",
            "seeking_debris",
            "coarse_approach",
            "fine_approach",
            "capture",
            "retracting",
            "reentry",
            "complete",
        ]
    );
    let json = serde_json::to_string(&MissionPhase::FineApproach).unwrap();
    assert_eq!(json, "\"fine_approach\"");
}
