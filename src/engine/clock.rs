use serde::{Deserialize, Serialize};

/// The monotonic game clock. `current_game_seconds` only moves forward,
/// whether by a normal tick or by a visibility catch-up.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameClock {
    pub current_game_seconds: u64,
    pub current_period: u32,
    pub period_elapsed_seconds: u64,
    pub running: bool,
    pub paused: bool,
    pub is_halftime: bool,
    pub game_over: bool,
}

impl GameClock {
    pub fn new() -> Self {
        GameClock {
            current_game_seconds: 0,
            current_period: 1,
            period_elapsed_seconds: 0,
            running: false,
            paused: false,
            is_halftime: false,
            game_over: false,
        }
    }

    /// Advance the clock by exactly one second (the unit of tick
    /// discipline, spec §4.4).
    pub fn advance_one_second(&mut self) {
        self.current_game_seconds += 1;
        self.period_elapsed_seconds += 1;
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}
