use crate::config::EngineConfig;

/// Coarse position within the game, used to scale gap/urgency behavior.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Phase {
    Early,
    Mid,
    Late,
    EndGame,
}

const MID_THRESHOLD: f64 = 0.25;
const LATE_THRESHOLD: f64 = 0.55;
const ENDGAME_THRESHOLD: f64 = 0.85;

impl Phase {
    /// Derive the phase from how far through the game `virtual_time` is.
    pub fn at(virtual_time: u64, game_length: u64) -> Phase {
        if game_length == 0 {
            return Phase::EndGame;
        }
        let fraction = virtual_time as f64 / game_length as f64;
        if fraction < MID_THRESHOLD {
            Phase::Early
        } else if fraction < LATE_THRESHOLD {
            Phase::Mid
        } else if fraction < ENDGAME_THRESHOLD {
            Phase::Late
        } else {
            Phase::EndGame
        }
    }

    /// Multiplier shortening the configured `min_sub_gap_seconds` as the
    /// game moves into more urgent phases.
    pub fn gap_multiplier(&self) -> f64 {
        match self {
            Phase::Early => 1.0,
            Phase::Mid => 1.0,
            Phase::Late => 0.75,
            Phase::EndGame => 0.5,
        }
    }

    /// Maximum number of players swapped in a single non-break rotation
    /// during this phase.
    pub fn max_subs_per_rotation(&self) -> usize {
        match self {
            Phase::Early => 1,
            Phase::Mid => 2,
            Phase::Late => 2,
            Phase::EndGame => 1,
        }
    }
}

/// The minimum wall-clock spacing between consecutive substitutions in
/// `phase`, derived from the configured base gap.
pub fn effective_min_gap(config: &EngineConfig, phase: Phase) -> u64 {
    ((config.min_sub_gap_seconds as f64) * phase.gap_multiplier()) as u64
}

/// Bench-side counterpart to `max_stint_on_field_seconds`: how long a
/// player may sit before being treated as an urgent incoming candidate.
pub fn max_bench_stint_seconds(config: &EngineConfig) -> u64 {
    config.max_stint_on_field_seconds
}

/// Window (in seconds) within which a player approaching their max stint
/// is considered an "upcoming" candidate rather than merely "proactive".
pub fn look_ahead_window(config: &EngineConfig) -> u64 {
    config.check_interval_seconds * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_thresholds_partition_the_game() {
        assert_eq!(Phase::at(0, 1000), Phase::Early);
        assert_eq!(Phase::at(300, 1000), Phase::Mid);
        assert_eq!(Phase::at(600, 1000), Phase::Late);
        assert_eq!(Phase::at(900, 1000), Phase::EndGame);
    }

    #[test]
    fn gap_shortens_in_later_phases() {
        assert!(Phase::EndGame.gap_multiplier() < Phase::Early.gap_multiplier());
    }
}
