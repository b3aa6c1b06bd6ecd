use serde::{Deserialize, Serialize};

/// A player's current status bucket. Exactly one of these applies to each
/// roster member at any time (spec §3 invariant 2).
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum PlayerStatus {
    OnField,
    OnBench,
    /// Terminal unless explicitly reverted by [`crate::ledger::PlayerLedger::restore`].
    Removed,
}

impl PlayerStatus {
    pub fn is_active(&self) -> bool {
        !matches!(self, PlayerStatus::Removed)
    }
}
