//! Persisted state layout (spec §6). Data-only: this module has no file or
//! network I/O of its own, it just shapes what a caller serializes. The CLI
//! is the only collaborator that reads and writes this to disk.
//!
//! Two distinct records live here: [`GameRecord`], a full round-trippable
//! dump of [`PersistedState`] the CLI uses to resume a game across process
//! invocations, and [`GameSummary`], the spec's "game record containing the
//! setup input plus final stats" — a lossy report meant for a storage
//! collaborator once a game is over, never read back into a `GameEngine`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::setup::SetupInput;
use crate::engine::{GameEngine, PersistedState};
use crate::error::{EngineError, EngineResult};

/// A timestamped, fully round-trippable snapshot of a [`GameEngine`] — the
/// whole of [`PersistedState`] plus when it was written.
#[derive(Serialize, Deserialize)]
pub struct GameRecord {
    pub created_at: DateTime<Utc>,
    pub state: PersistedState,
}

impl GameRecord {
    pub fn new(engine: &GameEngine) -> Self {
        GameRecord {
            created_at: Utc::now(),
            state: engine.to_persisted(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }
}

/// A single player's final accounting, as reported in a [`GameSummary`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerFinalStats {
    pub name: String,
    pub jersey_number: Option<u8>,
    pub position: String,
    pub total_play_seconds: u64,
    pub total_bench_seconds: u64,
    pub points: u32,
}

/// The spec's "persisted state layout": setup input plus final stats,
/// write-only as far as the core is concerned. A storage collaborator
/// builds one of these from a finished (or in-progress) [`GameEngine`] via
/// [`GameSummary::new`]; the core never reads one back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSummary {
    pub setup: SetupInput,
    pub players: Vec<PlayerFinalStats>,
    pub variance_seconds: u64,
    pub total_rotations: usize,
    pub total_game_seconds: u64,
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_score: u32,
    pub away_score: u32,
    pub created_at: DateTime<Utc>,
}

impl GameSummary {
    /// Build a final-stats record from `engine`. Fails with
    /// [`EngineError::InvalidState`] if the engine was never initialized.
    pub fn new(engine: &GameEngine) -> EngineResult<Self> {
        let setup = engine
            .setup()
            .cloned()
            .ok_or_else(|| EngineError::invalid_state("engine is not initialized"))?;
        let snapshot = engine.snapshot();

        let players = snapshot
            .field
            .iter()
            .chain(snapshot.bench.iter())
            .chain(snapshot.removed.iter())
            .map(|p| PlayerFinalStats {
                name: p.name.clone(),
                jersey_number: p.jersey_number,
                position: p.position.clone(),
                total_play_seconds: p.total_play_seconds,
                total_bench_seconds: p.total_bench_seconds,
                points: *snapshot.score.player_points.get(&p.name).unwrap_or(&0),
            })
            .collect();

        Ok(GameSummary {
            setup,
            players,
            variance_seconds: snapshot.variance_seconds,
            total_rotations: engine.history().len(),
            total_game_seconds: snapshot.clock.current_game_seconds,
            home_team_name: snapshot.score.home_team_name.clone(),
            away_team_name: snapshot.score.away_team_name.clone(),
            home_score: snapshot.score.home_score,
            away_score: snapshot.score.away_score,
            created_at: Utc::now(),
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Profile, Sport};
    use crate::engine::callbacks::EngineCallbacks;
    use crate::engine::setup::SetupInput;

    fn basketball_engine() -> GameEngine {
        let mut engine = GameEngine::new(EngineCallbacks::new());
        engine
            .initialize(SetupInput {
                sport: Sport::Basketball,
                profile: Profile::Balanced,
                minutes_per_period: 10,
                num_periods: 4,
                field_spots: 5,
                num_goalkeepers: 0,
                starter_names: vec!["A", "B", "C", "D", "E"].into_iter().map(String::from).collect(),
                reserve_names: vec!["F"].into_iter().map(String::from).collect(),
                player_data: Default::default(),
                ideal_shifts_per_player: None,
                auto_confirm_rotations: Some(true),
                enable_warning_sound: None,
                home_team_name: "Home".to_string(),
                away_team_name: "Away".to_string(),
            })
            .unwrap();
        engine
    }

    #[test]
    fn record_round_trips_through_json_and_preserves_progress() {
        let mut engine = basketball_engine();
        engine.start().unwrap();
        engine.tick(45).unwrap();

        let record = GameRecord::new(&engine);
        let json = record.to_json().unwrap();
        let restored = GameRecord::from_json(&json).unwrap();
        let reloaded = GameEngine::from_persisted(restored.state, EngineCallbacks::new());

        assert_eq!(reloaded.snapshot().clock.current_game_seconds, 45);
        assert_eq!(reloaded.get_state(), engine.get_state());
    }

    #[test]
    fn summary_reports_setup_and_final_stats() {
        let mut engine = basketball_engine();
        engine.start().unwrap();
        engine.tick(45).unwrap();
        engine.score("A", 2);

        let summary = GameSummary::new(&engine).unwrap();
        assert_eq!(summary.setup.sport, Sport::Basketball);
        assert_eq!(summary.total_game_seconds, 45);
        assert_eq!(summary.players.len(), 6);
        let a = summary.players.iter().find(|p| p.name == "A").unwrap();
        assert_eq!(a.total_play_seconds, 45);
        assert_eq!(a.points, 2);
    }

    #[test]
    fn summary_fails_before_initialize() {
        let engine = GameEngine::new(EngineCallbacks::new());
        assert!(GameSummary::new(&engine).is_err());
    }
}
