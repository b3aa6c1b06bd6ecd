use serde::{Deserialize, Serialize};

/// The game runtime's state machine (spec §4.4).
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum EngineState {
    Uninitialized,
    Ready,
    Running,
    /// A scheduled rotation's time has arrived but it has not yet been
    /// confirmed. Ticks continue; the plan index does not advance.
    PendingRotation,
    Paused,
    /// Also used for non-final period breaks (e.g. AFL quarter breaks).
    Halftime,
    GameOver,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Ready => "ready",
            EngineState::Running => "running",
            EngineState::PendingRotation => "pending_rotation",
            EngineState::Paused => "paused",
            EngineState::Halftime => "halftime",
            EngineState::GameOver => "game_over",
        };
        f.write_str(label)
    }
}
