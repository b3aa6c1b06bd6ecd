//! C2 — Player Ledger.
//!
//! The authoritative per-player time accounting. [`PlayerLedger`] is the
//! single source of truth for playing time; the optimizer and deviation
//! handler only ever touch a cloned "virtual" copy of it.

pub mod player;
pub mod status;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::ledger::player::PlayerRecord;
use crate::ledger::status::PlayerStatus;
use crate::optimizer::plan::RotationEntry;

/// Authoritative per-player time accounting, keyed by player name for
/// deterministic iteration order (spec §8 law 8: byte-equal state across
/// identical runs).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerLedger {
    players: BTreeMap<String, PlayerRecord>,
}

impl PlayerLedger {
    pub fn new() -> Self {
        PlayerLedger {
            players: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, record: PlayerRecord) {
        self.players.insert(record.name.clone(), record);
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PlayerRecord> {
        self.players.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn all(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.values()
    }

    pub fn field(&self) -> Vec<&PlayerRecord> {
        self.players.values().filter(|p| p.on_field()).collect()
    }

    pub fn bench(&self) -> Vec<&PlayerRecord> {
        self.players.values().filter(|p| p.on_bench()).collect()
    }

    pub fn removed(&self) -> Vec<&PlayerRecord> {
        self.players.values().filter(|p| p.removed()).collect()
    }

    pub fn active_count(&self) -> usize {
        self.players.values().filter(|p| !p.removed()).count()
    }

    pub fn goalkeeper(&self) -> Option<&PlayerRecord> {
        self.players
            .values()
            .find(|p| p.on_field() && p.is_goalkeeper)
    }

    /// Advance every non-removed player's time accounting by `delta`
    /// seconds: field players accrue play time (and stint time), bench
    /// players accrue bench time. Removed players never accrue time.
    pub fn tick(&mut self, delta: u64) {
        if delta == 0 {
            return;
        }
        for player in self.players.values_mut() {
            match player.status {
                PlayerStatus::OnField => {
                    player.total_play_seconds += delta;
                }
                PlayerStatus::OnBench => {
                    player.total_bench_seconds += delta;
                }
                PlayerStatus::Removed => {}
            }
        }
    }

    /// Apply a substitution: each `off` player moves to the bench, each
    /// `on` player moves to the field, and both sides' current-stint clocks
    /// reset to `at_time`.
    pub fn apply_rotation(&mut self, off: &[String], on: &[String], at_time: u64) -> EngineResult<()> {
        if off.len() != on.len() {
            return Err(EngineError::invalid_rotation(format!(
                "off ({}) and on ({}) counts differ",
                off.len(),
                on.len()
            )));
        }
        for name in off {
            match self.players.get(name) {
                Some(p) if p.on_field() => {}
                Some(_) => {
                    return Err(EngineError::invalid_rotation(format!(
                        "{name} is not currently on field"
                    )))
                }
                None => return Err(EngineError::invalid_rotation(format!("unknown player {name}"))),
            }
        }
        for name in on {
            match self.players.get(name) {
                Some(p) if p.on_bench() => {}
                Some(_) => {
                    return Err(EngineError::invalid_rotation(format!(
                        "{name} is not currently on bench"
                    )))
                }
                None => return Err(EngineError::invalid_rotation(format!("unknown player {name}"))),
            }
        }
        for name in off {
            self.players
                .get_mut(name)
                .unwrap()
                .transition(PlayerStatus::OnBench, at_time);
        }
        for name in on {
            self.players
                .get_mut(name)
                .unwrap()
                .transition(PlayerStatus::OnField, at_time);
        }
        Ok(())
    }

    /// Remove a bench player from the game. Legal only while `OnBench`.
    pub fn remove(&mut self, name: &str, at_time: u64) -> EngineResult<()> {
        let player = self
            .players
            .get_mut(name)
            .ok_or_else(|| EngineError::invalid_rotation(format!("unknown player {name}")))?;
        if !player.on_bench() {
            return Err(EngineError::invalid_rotation(format!(
                "{name} must be on bench to be removed"
            )));
        }
        player.transition(PlayerStatus::Removed, at_time);
        Ok(())
    }

    /// Inverse of [`Self::remove`]: places a removed player back on the bench.
    pub fn restore(&mut self, name: &str, at_time: u64) -> EngineResult<()> {
        let player = self
            .players
            .get_mut(name)
            .ok_or_else(|| EngineError::invalid_rotation(format!("unknown player {name}")))?;
        if !player.removed() {
            return Err(EngineError::invalid_rotation(format!(
                "{name} is not removed"
            )));
        }
        player.transition(PlayerStatus::OnBench, at_time);
        Ok(())
    }

    /// Swap the goalkeeper designation to `new_gk`. If `new_gk` is on the
    /// bench, they trade places with the current on-field goalkeeper. If
    /// `new_gk` is already on the field, only the GK designation and
    /// positions move. Either way, `new_gk` ends up `is_goalkeeper = true`
    /// with position `"GK"`, and the former goalkeeper is repositioned.
    pub fn swap_goalkeeper(&mut self, new_gk: &str, at_time: u64) -> EngineResult<()> {
        if !self.players.contains_key(new_gk) {
            return Err(EngineError::invalid_rotation(format!("unknown player {new_gk}")));
        }
        if self.players[new_gk].removed() {
            return Err(EngineError::invalid_rotation(format!(
                "{new_gk} has been removed from the game"
            )));
        }
        let previous_gk_name = self.goalkeeper().map(|p| p.name.clone());
        let new_gk_on_bench = self.players[new_gk].on_bench();

        if new_gk_on_bench {
            if let Some(prev) = &previous_gk_name {
                self.apply_rotation(std::slice::from_ref(prev), std::slice::from_ref(&new_gk.to_string()), at_time)?;
            } else {
                // No current goalkeeper on field: bring new_gk on without
                // an offsetting substitution (caller must ensure a bench
                // spot is otherwise accounted for).
                self.players
                    .get_mut(new_gk)
                    .unwrap()
                    .transition(PlayerStatus::OnField, at_time);
            }
        }

        if let Some(prev) = &previous_gk_name {
            if prev != new_gk {
                let prev_record = self.players.get_mut(prev).unwrap();
                prev_record.is_goalkeeper = false;
                prev_record.position = "FLD".to_string();
            }
        }
        let new_record = self.players.get_mut(new_gk).unwrap();
        new_record.is_goalkeeper = true;
        new_record.position = "GK".to_string();
        Ok(())
    }

    /// Force a single player's status, bypassing the paired off/on
    /// validation `apply_rotation` enforces. Used only by
    /// [`crate::engine::repair`] to restore §3 invariants after an
    /// [`EngineError::InternalInvariantViolation`]; never called on the
    /// happy path.
    pub(crate) fn force_transition(&mut self, name: &str, status: PlayerStatus, at_time: u64) -> EngineResult<()> {
        let player = self
            .players
            .get_mut(name)
            .ok_or_else(|| EngineError::invalid_rotation(format!("unknown player {name}")))?;
        player.transition(status, at_time);
        Ok(())
    }

    /// `max(total_play) - min(total_play)` over active (non-removed)
    /// players. Zero (or undefined, treated as zero) with fewer than two
    /// active players.
    pub fn variance(&self) -> u64 {
        let mut min = None;
        let mut max = None;
        for p in self.players.values().filter(|p| !p.removed()) {
            let t = p.total_play_seconds;
            min = Some(min.map_or(t, |m: u64| m.min(t)));
            max = Some(max.map_or(t, |m: u64| m.max(t)));
        }
        match (min, max) {
            (Some(min), Some(max)) => max - min,
            _ => 0,
        }
    }

    /// Replay `scheduled_rotations` forward through a cloned ledger out to
    /// `remaining_seconds` from now, and return the resulting variance.
    /// Used by the optimizer's trigger evaluation and by the coach-facing
    /// advisory surface; never mutates `self`.
    pub fn project_final_variance(&self, now: u64, remaining_seconds: u64, scheduled_rotations: &[RotationEntry]) -> u64 {
        let mut virtual_ledger = self.clone();
        let end_time = now + remaining_seconds;
        let mut cursor = now;
        let mut rotations: Vec<&RotationEntry> = scheduled_rotations
            .iter()
            .filter(|r| r.time > now && r.time <= end_time)
            .collect();
        rotations.sort_by_key(|r| r.time);
        for rotation in rotations {
            let delta = rotation.time.saturating_sub(cursor);
            virtual_ledger.tick(delta);
            let _ = virtual_ledger.apply_rotation(&rotation.off, &rotation.on, rotation.time);
            cursor = rotation.time;
        }
        virtual_ledger.tick(end_time.saturating_sub(cursor));
        virtual_ledger.variance()
    }
}

impl Default for PlayerLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(field: &[&str], bench: &[&str]) -> PlayerLedger {
        let mut ledger = PlayerLedger::new();
        for name in field {
            ledger.insert(PlayerRecord::new(*name, PlayerStatus::OnField, 0));
        }
        for name in bench {
            ledger.insert(PlayerRecord::new(*name, PlayerStatus::OnBench, 0));
        }
        ledger
    }

    #[test]
    fn tick_accrues_play_and_bench_time_separately() {
        let mut ledger = ledger_with(&["A", "B"], &["C"]);
        ledger.tick(10);
        assert_eq!(ledger.get("A").unwrap().total_play_seconds, 10);
        assert_eq!(ledger.get("C").unwrap().total_bench_seconds, 10);
    }

    #[test]
    fn apply_rotation_swaps_status_and_resets_stint() {
        let mut ledger = ledger_with(&["A", "B"], &["C"]);
        ledger.tick(50);
        ledger
            .apply_rotation(&["A".to_string()], &["C".to_string()], 50)
            .unwrap();
        assert!(ledger.get("A").unwrap().on_bench());
        assert!(ledger.get("C").unwrap().on_field());
        assert_eq!(ledger.get("C").unwrap().current_stint_start_seconds, 50);
    }

    #[test]
    fn apply_rotation_rejects_mismatched_sizes() {
        let mut ledger = ledger_with(&["A", "B"], &["C", "D"]);
        let err = ledger
            .apply_rotation(&["A".to_string()], &["C".to_string(), "D".to_string()], 0)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRotation(_)));
    }

    #[test]
    fn apply_rotation_rejects_off_player_not_on_field() {
        let mut ledger = ledger_with(&["A"], &["B"]);
        let err = ledger
            .apply_rotation(&["B".to_string()], &["B".to_string()], 0)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRotation(_)));
    }

    #[test]
    fn remove_requires_bench_status() {
        let mut ledger = ledger_with(&["A"], &["B"]);
        assert!(ledger.remove("A", 0).is_err());
        assert!(ledger.remove("B", 0).is_ok());
        assert!(ledger.get("B").unwrap().removed());
    }

    #[test]
    fn restore_reverses_remove() {
        let mut ledger = ledger_with(&["A"], &["B"]);
        ledger.remove("B", 0).unwrap();
        ledger.restore("B", 10).unwrap();
        assert!(ledger.get("B").unwrap().on_bench());
    }

    #[test]
    fn swap_goalkeeper_trades_bench_player_with_current_gk() {
        let mut ledger = ledger_with(&["GK1", "A"], &["GK2"]);
        ledger.get_mut("GK1").unwrap().is_goalkeeper = true;
        ledger.get_mut("GK1").unwrap().position = "GK".to_string();

        ledger.swap_goalkeeper("GK2", 100).unwrap();

        assert!(ledger.get("GK2").unwrap().on_field());
        assert!(ledger.get("GK2").unwrap().is_goalkeeper);
        assert!(ledger.get("GK1").unwrap().on_bench());
        assert!(!ledger.get("GK1").unwrap().is_goalkeeper);
    }

    #[test]
    fn variance_is_max_minus_min_over_active_players() {
        let mut ledger = ledger_with(&["A", "B"], &["C"]);
        ledger.get_mut("A").unwrap().total_play_seconds = 100;
        ledger.get_mut("B").unwrap().total_play_seconds = 40;
        ledger.get_mut("C").unwrap().total_play_seconds = 200;
        ledger.remove("C", 0).unwrap();
        assert_eq!(ledger.variance(), 60);
    }
}
