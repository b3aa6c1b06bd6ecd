use serde::{Deserialize, Serialize};

use crate::ledger::status::PlayerStatus;

/// A roster member and their accumulated playing-time accounting.
///
/// Created at `initialize`, mutated by [`crate::ledger::PlayerLedger`] on
/// every tick and every confirmed rotation, destroyed on `reset`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub jersey_number: Option<u8>,
    pub position: String,
    pub is_goalkeeper: bool,
    pub status: PlayerStatus,
    pub total_play_seconds: u64,
    pub total_bench_seconds: u64,
    /// Game time at which the current stint began; reset on every status
    /// transition.
    pub current_stint_start_seconds: u64,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, status: PlayerStatus, at_time: u64) -> Self {
        PlayerRecord {
            name: name.into(),
            jersey_number: None,
            position: String::new(),
            is_goalkeeper: false,
            status,
            total_play_seconds: 0,
            total_bench_seconds: 0,
            current_stint_start_seconds: at_time,
        }
    }

    /// Length of the player's current, still-ongoing stint.
    pub fn current_stint_seconds(&self, at_time: u64) -> u64 {
        at_time.saturating_sub(self.current_stint_start_seconds)
    }

    pub fn on_field(&self) -> bool {
        matches!(self.status, PlayerStatus::OnField)
    }

    pub fn on_bench(&self) -> bool {
        matches!(self.status, PlayerStatus::OnBench)
    }

    pub fn removed(&self) -> bool {
        matches!(self.status, PlayerStatus::Removed)
    }

    /// Transition to a new status, resetting the current stint clock.
    pub fn transition(&mut self, status: PlayerStatus, at_time: u64) {
        self.status = status;
        self.current_stint_start_seconds = at_time;
    }
}
