use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Profile, Sport};

/// Optional per-player metadata supplied at setup.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct PlayerData {
    pub jersey_number: Option<u8>,
    pub position: Option<String>,
}

/// The setup input presented to [`crate::engine::GameEngine::initialize`]
/// (spec §6).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetupInput {
    pub sport: Sport,
    pub profile: Profile,
    pub minutes_per_period: u64,
    pub num_periods: u32,
    pub field_spots: u32,
    pub num_goalkeepers: u32,
    pub reserve_names: Vec<String>,
    pub starter_names: Vec<String>,
    #[serde(default)]
    pub player_data: BTreeMap<String, PlayerData>,
    pub ideal_shifts_per_player: Option<u32>,
    #[serde(default)]
    pub auto_confirm_rotations: Option<bool>,
    #[serde(default)]
    pub enable_warning_sound: Option<bool>,
    #[serde(default = "default_home_team_name")]
    pub home_team_name: String,
    #[serde(default = "default_away_team_name")]
    pub away_team_name: String,
}

fn default_home_team_name() -> String {
    "Home".to_string()
}

fn default_away_team_name() -> String {
    "Away".to_string()
}
