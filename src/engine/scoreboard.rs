use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// External-facing score state, mutated by the core on score events but
/// otherwise owned by the renderer/persistence collaborators.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreBook {
    pub home_team_name: String,
    pub away_team_name: String,
    pub home_score: u32,
    pub away_score: u32,
    pub player_points: BTreeMap<String, u32>,
}

impl ScoreBook {
    pub fn new(home_team_name: impl Into<String>, away_team_name: impl Into<String>) -> Self {
        ScoreBook {
            home_team_name: home_team_name.into(),
            away_team_name: away_team_name.into(),
            home_score: 0,
            away_score: 0,
            player_points: BTreeMap::new(),
        }
    }

    /// Adjust `player`'s points and the home team's score in tandem,
    /// clamped to >= 0. Renaming a team afterward never touches scores.
    pub fn score_home(&mut self, player: &str, delta: i32) {
        self.home_score = clamp_add(self.home_score, delta);
        let entry = self.player_points.entry(player.to_string()).or_insert(0);
        *entry = clamp_add(*entry, delta);
    }

    /// Adjust the away team's score only; no per-player attribution is
    /// tracked for the opposition.
    pub fn score_away(&mut self, delta: i32) {
        self.away_score = clamp_add(self.away_score, delta);
    }

    pub fn rename_home(&mut self, name: impl Into<String>) {
        self.home_team_name = name.into();
    }

    pub fn rename_away(&mut self, name: impl Into<String>) {
        self.away_team_name = name.into();
    }
}

fn clamp_add(value: u32, delta: i32) -> u32 {
    let result = value as i64 + delta as i64;
    result.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_home_updates_player_and_team_together() {
        let mut book = ScoreBook::new("Home", "Away");
        book.score_home("Alex", 3);
        assert_eq!(book.home_score, 3);
        assert_eq!(book.player_points["Alex"], 3);
    }

    #[test]
    fn score_clamps_at_zero() {
        let mut book = ScoreBook::new("Home", "Away");
        book.score_home("Alex", -5);
        assert_eq!(book.home_score, 0);
        assert_eq!(book.player_points["Alex"], 0);
    }

    #[test]
    fn rename_does_not_affect_scores() {
        let mut book = ScoreBook::new("Home", "Away");
        book.score_home("Alex", 10);
        book.rename_home("Wildcats");
        assert_eq!(book.home_score, 10);
        assert_eq!(book.home_team_name, "Wildcats");
    }
}
