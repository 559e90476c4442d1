//! Mission phases and the transition rules between them.

use std::fmt;

use capture_config::PhaseThresholds;
use capture_grabbing::GrabbingStatus;
use serde::Serialize;

/// Mission phases in nominal order of progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionPhase {
    PayloadDeployed,
    SeekingDebris,
    /// Long range, LQR.
    CoarseApproach,
    /// Medium range, MPC.
    FineApproach,
    /// Terminal, sliding mode with adaptive correction.
    Capture,
    Retracting,
    Reentry,
    Complete,
}

impl MissionPhase {
    pub const ALL: [MissionPhase; 8] = [
        MissionPhase::PayloadDeployed,
        MissionPhase::SeekingDebris,
        MissionPhase::CoarseApproach,
        MissionPhase::FineApproach,
        MissionPhase::Capture,
        MissionPhase::Retracting,
        MissionPhase::Reentry,
        MissionPhase::Complete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MissionPhase::PayloadDeployed => "payload_deployed",
            MissionPhase::SeekingDebris => "seeking_debris",
            MissionPhase::CoarseApproach => "coarse_approach",
            MissionPhase::FineApproach => "fine_approach",
            MissionPhase::Capture => "capture",
            MissionPhase::Retracting => "retracting",
            MissionPhase::Reentry => "reentry",
            MissionPhase::Complete => "complete",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == MissionPhase::Complete
    }
}

impl fmt::Display for MissionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Next phase given the current one, the range to target, and the net status.
///
/// `distance_m` is `None` when no target is selected. Rules are checked in a
/// fixed priority order and the first match wins:
///
/// 1. no target: seeking debris;
/// 2. coarse approach inside the coarse range: fine approach;
/// 3. fine approach inside the fine range: capture;
/// 4. capture inside the capture range: retracting;
/// 5. capture confirmed and retracted long enough: re-entry, from any phase
///    before re-entry (including an unfinished approach);
/// 6. re-entry: complete;
/// 7. otherwise stay.
pub fn decide_phase(
    current: MissionPhase,
    distance_m: Option<f64>,
    grabbing: &GrabbingStatus,
    thresholds: &PhaseThresholds,
) -> MissionPhase {
    let Some(distance) = distance_m else {
        return MissionPhase::SeekingDebris;
    };

    match current {
        MissionPhase::CoarseApproach if distance < thresholds.coarse_m => {
            return MissionPhase::FineApproach;
        }
        MissionPhase::FineApproach if distance < thresholds.fine_m => {
            return MissionPhase::Capture;
        }
        MissionPhase::Capture if distance < thresholds.capture_m => {
            return MissionPhase::Retracting;
        }
        _ => {}
    }

    if current < MissionPhase::Reentry
        && grabbing.capture_confirmed
        && grabbing.retract_timer_s >= thresholds.reentry_retract_s
    {
        return MissionPhase::Reentry;
    }

    if current == MissionPhase::Reentry {
        return MissionPhase::Complete;
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> GrabbingStatus {
        GrabbingStatus::default()
    }

    #[test]
    fn missing_target_always_seeks() {
        let t = PhaseThresholds::default();
        for phase in MissionPhase::ALL {
            assert_eq!(
                decide_phase(phase, None, &idle(), &t),
                MissionPhase::SeekingDebris
            );
        }
    }

    #[test]
    fn range_rules_only_fire_from_their_own_phase() {
        let t = PhaseThresholds::default();
        assert_eq!(
            decide_phase(MissionPhase::FineApproach, Some(400.0), &idle(), &t),
            MissionPhase::FineApproach
        );
        assert_eq!(
            decide_phase(MissionPhase::CoarseApproach, Some(1.0), &idle(), &t),
            MissionPhase::FineApproach
        );
        assert_eq!(
            decide_phase(MissionPhase::Capture, Some(0.009), &idle(), &t),
            MissionPhase::Retracting
        );
        assert_eq!(
            decide_phase(MissionPhase::Capture, Some(0.01), &idle(), &t),
            MissionPhase::Capture
        );
    }

    #[test]
    fn reentry_completes_and_complete_stays() {
        let t = PhaseThresholds::default();
        let done = GrabbingStatus {
            net_deployed: true,
            capture_confirmed: true,
            retract_timer_s: 6.0,
        };
        assert_eq!(
            decide_phase(MissionPhase::Reentry, Some(10.0), &done, &t),
            MissionPhase::Complete
        );
        assert_eq!(
            decide_phase(MissionPhase::Complete, Some(10.0), &done, &t),
            MissionPhase::Complete
        );
    }
}
