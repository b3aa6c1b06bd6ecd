use serde::{Deserialize, Serialize};

use crate::config::profile::Profile;
use crate::config::sport::Sport;
use crate::error::{EngineError, EngineResult};

/// Caller-supplied overrides. Every field is optional; `None` means "use the
/// sport default, nudged by the chosen profile". Mirrors the `*Raw` structs
/// the teacher validates before constructing a strict type.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct ConfigOverrides {
    pub field_spots: Option<u32>,
    pub num_goalkeepers: Option<u32>,
    pub period_length_seconds: Option<u64>,
    pub num_periods: Option<u32>,
    pub variance_goal_seconds: Option<u64>,
    pub max_early_variance_multiplier: Option<f64>,
    pub min_stint_on_field_seconds: Option<u64>,
    pub max_stint_on_field_seconds: Option<u64>,
    pub min_sub_gap_seconds: Option<u64>,
    pub check_interval_seconds: Option<u64>,
    pub end_buffer_seconds: Option<u64>,
    pub first_sub_delay_seconds: Option<u64>,
    pub ideal_shifts_per_player: Option<u32>,
    pub auto_confirm_rotations: Option<bool>,
}

/// Immutable, fully resolved per-game tuning record. Produced once by
/// [`resolve`] and never mutated afterward; a profile change re-runs
/// [`resolve`] and replaces the whole record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    pub sport: Sport,
    pub profile: Profile,
    pub field_spots: u32,
    pub num_goalkeepers: u32,
    pub period_length_seconds: u64,
    pub num_periods: u32,
    pub has_period_breaks: bool,
    pub variance_goal_seconds: u64,
    pub max_early_variance_multiplier: f64,
    pub min_stint_on_field_seconds: u64,
    pub max_stint_on_field_seconds: u64,
    pub min_sub_gap_seconds: u64,
    pub check_interval_seconds: u64,
    pub end_buffer_seconds: u64,
    pub first_sub_delay_seconds: u64,
    pub ideal_shifts_per_player: Option<u32>,
    pub auto_confirm_rotations: bool,
}

const DEFAULT_CHECK_INTERVAL_SECONDS: u64 = 15;
const DEFAULT_END_BUFFER_SECONDS: u64 = 30;
const DEFAULT_FIRST_SUB_DELAY_SECONDS: u64 = 60;
const MIN_SUB_GAP_LOWER_BOUND_SECONDS: u64 = 30;
const MIN_SUB_GAP_UPPER_BOUND_SECONDS: u64 = 300;

impl EngineConfig {
    /// Total game length in seconds across all periods.
    pub fn game_length_seconds(&self) -> u64 {
        self.period_length_seconds * self.num_periods as u64
    }
}

/// Resolve a sport + profile + overrides triple into an immutable config.
///
/// ### Example
/// ```
/// use rotation_core::config::{resolve, profile::Profile, sport::Sport, resolver::ConfigOverrides};
///
/// let cfg = resolve(Sport::Basketball, Profile::Balanced, ConfigOverrides::default(), 8).unwrap();
/// assert_eq!(cfg.field_spots, 5);
/// ```
pub fn resolve(
    sport: Sport,
    profile: Profile,
    overrides: ConfigOverrides,
    roster_size: usize,
) -> EngineResult<EngineConfig> {
    let defaults = sport.defaults();
    let overlay = profile.overlay();

    let field_spots = overrides.field_spots.unwrap_or(defaults.field_spots);
    let num_goalkeepers = overrides
        .num_goalkeepers
        .unwrap_or(defaults.num_goalkeepers);

    if num_goalkeepers > field_spots {
        return Err(EngineError::invalid_config(format!(
            "num_goalkeepers ({num_goalkeepers}) exceeds field_spots ({field_spots})"
        )));
    }
    if (field_spots as usize) > roster_size {
        return Err(EngineError::invalid_config(format!(
            "field_spots ({field_spots}) exceeds roster size ({roster_size})"
        )));
    }

    let min_stint_on_field_seconds = overrides
        .min_stint_on_field_seconds
        .unwrap_or((defaults.min_stint_on_field_seconds as f64 * overlay.min_stint_multiplier) as u64);
    let max_stint_on_field_seconds = overrides
        .max_stint_on_field_seconds
        .unwrap_or((defaults.max_stint_on_field_seconds as f64 * overlay.max_stint_multiplier) as u64);

    if min_stint_on_field_seconds > max_stint_on_field_seconds {
        return Err(EngineError::invalid_config(format!(
            "min_stint_on_field_seconds ({min_stint_on_field_seconds}) exceeds max_stint_on_field_seconds ({max_stint_on_field_seconds})"
        )));
    }

    let period_length_seconds = overrides
        .period_length_seconds
        .unwrap_or(defaults.period_length_seconds);
    let num_periods = overrides.num_periods.unwrap_or(defaults.num_periods);
    let game_length_seconds = period_length_seconds * num_periods as u64;

    let variance_goal_seconds = overrides.variance_goal_seconds.unwrap_or(
        (defaults.variance_goal_seconds as f64 * overlay.variance_goal_multiplier) as u64,
    );
    let max_early_variance_multiplier = overrides
        .max_early_variance_multiplier
        .unwrap_or(overlay.max_early_variance_multiplier);

    let check_interval_seconds = overrides
        .check_interval_seconds
        .unwrap_or(DEFAULT_CHECK_INTERVAL_SECONDS);
    let end_buffer_seconds = overrides
        .end_buffer_seconds
        .unwrap_or(DEFAULT_END_BUFFER_SECONDS);
    let first_sub_delay_seconds = overrides
        .first_sub_delay_seconds
        .unwrap_or(DEFAULT_FIRST_SUB_DELAY_SECONDS);

    let ideal_shifts_per_player = overrides
        .ideal_shifts_per_player
        .or(overlay.ideal_shifts_per_player);

    let min_sub_gap_seconds = overrides.min_sub_gap_seconds.unwrap_or_else(|| {
        adaptive_min_sub_gap(game_length_seconds, roster_size, field_spots, ideal_shifts_per_player)
    });

    let auto_confirm_rotations = overrides
        .auto_confirm_rotations
        .unwrap_or(overlay.auto_confirm_rotations);

    Ok(EngineConfig {
        sport,
        profile,
        field_spots,
        num_goalkeepers,
        period_length_seconds,
        num_periods,
        has_period_breaks: defaults.has_period_breaks,
        variance_goal_seconds,
        max_early_variance_multiplier,
        min_stint_on_field_seconds,
        max_stint_on_field_seconds,
        min_sub_gap_seconds,
        check_interval_seconds,
        end_buffer_seconds,
        first_sub_delay_seconds,
        ideal_shifts_per_player,
        auto_confirm_rotations,
    })
}

/// Derive a default minimum substitution gap: spread the game length over
/// an estimated rotation count, then clamp to sane bounds.
fn adaptive_min_sub_gap(
    game_length_seconds: u64,
    roster_size: usize,
    field_spots: u32,
    ideal_shifts_per_player: Option<u32>,
) -> u64 {
    let bench_size = roster_size.saturating_sub(field_spots as usize).max(1);
    let shifts = ideal_shifts_per_player.unwrap_or(4).max(1) as usize;
    let estimated_rotation_count = (bench_size * shifts).max(1);
    let raw = game_length_seconds / estimated_rotation_count as u64;
    raw.clamp(MIN_SUB_GAP_LOWER_BOUND_SECONDS, MIN_SUB_GAP_UPPER_BOUND_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_too_many_goalkeepers() {
        let overrides = ConfigOverrides {
            num_goalkeepers: Some(2),
            field_spots: Some(1),
            ..Default::default()
        };
        let err = resolve(Sport::Soccer, Profile::Balanced, overrides, 10).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_field_spots_over_roster_size() {
        let overrides = ConfigOverrides {
            field_spots: Some(20),
            ..Default::default()
        };
        let err = resolve(Sport::Basketball, Profile::Balanced, overrides, 6).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_inverted_stint_bounds() {
        let overrides = ConfigOverrides {
            min_stint_on_field_seconds: Some(500),
            max_stint_on_field_seconds: Some(100),
            ..Default::default()
        };
        let err = resolve(Sport::Basketball, Profile::Balanced, overrides, 8).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn adaptive_gap_is_clamped() {
        let gap = adaptive_min_sub_gap(600, 6, 5, None);
        assert!(gap >= MIN_SUB_GAP_LOWER_BOUND_SECONDS && gap <= MIN_SUB_GAP_UPPER_BOUND_SECONDS);
    }

    #[test]
    fn basketball_balanced_resolves_with_defaults() {
        let cfg = resolve(Sport::Basketball, Profile::Balanced, ConfigOverrides::default(), 8).unwrap();
        assert_eq!(cfg.field_spots, 5);
        assert_eq!(cfg.num_goalkeepers, 0);
        assert_eq!(cfg.game_length_seconds(), 2400);
    }
}
