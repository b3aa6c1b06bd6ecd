use serde::{Deserialize, Serialize};

/// Why a [`RotationEntry`] was generated. Shared with the deviation
/// handler, which reuses a subset of these tags for the rotation history it
/// writes on irregular events (see `engine::deviation::DeviationReason`).
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum RotationReason {
    /// Emitted by the ordinary scheduled-balance trigger.
    Scheduled,
    /// A player exceeded `max_stint_on_field_seconds` or
    /// `max_bench_stint_seconds`.
    UrgentStint,
    /// Proactive fatigue/readiness balancing ahead of a variance breach.
    Proactive,
    /// Multi-player swap emitted at a period boundary.
    Break,
    /// `emergency_swap`, bypassing the plan.
    Emergency,
    GoalkeeperChange,
    LateSubstitution,
    /// Applied by the deviation handler's repair pass.
    Repair,
}

impl std::fmt::Display for RotationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RotationReason::Scheduled => "scheduled",
            RotationReason::UrgentStint => "urgent_stint",
            RotationReason::Proactive => "proactive",
            RotationReason::Break => "break",
            RotationReason::Emergency => "emergency",
            RotationReason::GoalkeeperChange => "goalkeeper_changed",
            RotationReason::LateSubstitution => "late_substitution",
            RotationReason::Repair => "repair",
        };
        f.write_str(label)
    }
}

/// A single substitution event: `off.len() == on.len()`, every `off` member
/// is on field and every `on` member is on bench at `time`, in the ledger
/// the plan was generated against.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RotationEntry {
    pub time: u64,
    pub off: Vec<String>,
    pub on: Vec<String>,
    pub reason: RotationReason,
}

/// An ordered sequence of future rotations, as produced by the optimizer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plan {
    pub rotations: Vec<RotationEntry>,
    pub target_minutes_per_player: f64,
    pub expected_variance_seconds: u64,
}

impl Plan {
    pub fn empty(target_minutes_per_player: f64, expected_variance_seconds: u64) -> Self {
        Plan {
            rotations: Vec::new(),
            target_minutes_per_player,
            expected_variance_seconds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }

    /// The next rotation at or after `at_time`, if any.
    pub fn next_at_or_after(&self, at_time: u64) -> Option<&RotationEntry> {
        self.rotations.iter().find(|r| r.time >= at_time)
    }
}
