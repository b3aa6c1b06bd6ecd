use serde::{Deserialize, Serialize};

use crate::engine::clock::GameClock;
use crate::engine::scoreboard::ScoreBook;
use crate::engine::state::EngineState;
use crate::ledger::player::PlayerRecord;
use crate::optimizer::plan::RotationEntry;

/// A view of a pending or upcoming rotation, as surfaced to collaborators.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RotationView {
    pub off: Vec<String>,
    pub on: Vec<String>,
    pub time: u64,
}

impl From<&RotationEntry> for RotationView {
    fn from(entry: &RotationEntry) -> Self {
        RotationView {
            off: entry.off.clone(),
            on: entry.on.clone(),
            time: entry.time,
        }
    }
}

/// A structural, read-only copy of the engine's state, returned by
/// [`crate::engine::GameEngine::get_state`]. Never a reference into live
/// state (spec §5 "Shared resources").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub state: EngineState,
    pub clock: GameClock,
    pub field: Vec<PlayerRecord>,
    pub bench: Vec<PlayerRecord>,
    pub removed: Vec<PlayerRecord>,
    pub pending: Option<RotationView>,
    pub next_scheduled: Option<RotationView>,
    pub remaining_count: usize,
    pub history_count: usize,
    pub variance_seconds: u64,
    pub target_minutes_per_player: f64,
    pub expected_variance_seconds: u64,
    pub score: ScoreBook,
}
