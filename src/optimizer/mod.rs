//! C3 — Interval Optimizer.
//!
//! A deterministic simulator: walks a cloned "virtual" ledger forward from
//! now to game end at a fixed check interval, emitting candidate rotations
//! whenever an urgency or variance trigger fires, and returns the resulting
//! [`plan::Plan`].

pub mod phase;
pub mod plan;

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::ledger::player::PlayerRecord;
use crate::ledger::PlayerLedger;
use crate::optimizer::phase::{effective_min_gap, look_ahead_window, max_bench_stint_seconds, Phase};
use crate::optimizer::plan::{Plan, RotationEntry, RotationReason};

/// Projected-final-variance growth over one gap window that is treated as
/// "about to get worse" and triggers a preemptive rotation (spec §4.3,
/// early-sub prevention: "more than 0.8 minutes").
const EARLY_SUB_PREVENTION_THRESHOLD_SECONDS: u64 = 48;

/// How many players a break-time rotation may swap at once, as a fraction
/// of the field.
fn max_subs_at_break(config: &EngineConfig) -> usize {
    ((config.field_spots as f64) / 3.0).ceil().max(1.0) as usize
}

fn is_near_boundary_or_end(virtual_time: u64, config: &EngineConfig) -> bool {
    let game_length = config.game_length_seconds();
    for i in 1..=config.num_periods as u64 {
        let boundary = config.period_length_seconds * i;
        if boundary >= config.end_buffer_seconds
            && virtual_time >= boundary - config.end_buffer_seconds
            && virtual_time <= boundary
        {
            return true;
        }
    }
    virtual_time + config.end_buffer_seconds > game_length
}

fn period_boundaries(config: &EngineConfig) -> Vec<u64> {
    (1..config.num_periods as u64)
        .map(|i| config.period_length_seconds * i)
        .collect()
}

fn mean_play_seconds(ledger: &PlayerLedger) -> f64 {
    let active: Vec<&PlayerRecord> = ledger.all().filter(|p| !p.removed()).collect();
    if active.is_empty() {
        return 0.0;
    }
    active.iter().map(|p| p.total_play_seconds as f64).sum::<f64>() / active.len() as f64
}

/// Names of field players sorted outgoing-first: highest current stint
/// wins, then lexicographic name as the final tiebreak. Goalkeepers are
/// never eligible.
fn rank_outgoing(field: &[&PlayerRecord], at_time: u64) -> Vec<String> {
    let mut eligible: Vec<&PlayerRecord> = field.iter().copied().filter(|p| !p.is_goalkeeper).collect();
    eligible.sort_by(|a, b| {
        b.current_stint_seconds(at_time)
            .cmp(&a.current_stint_seconds(at_time))
            .then_with(|| a.name.cmp(&b.name))
    });
    eligible.into_iter().map(|p| p.name.clone()).collect()
}

/// Names of bench players sorted incoming-first: lowest total play wins,
/// then lexicographic name as the final tiebreak.
fn rank_incoming(bench: &[&PlayerRecord]) -> Vec<String> {
    let mut eligible: Vec<&PlayerRecord> = bench.to_vec();
    eligible.sort_by(|a, b| {
        a.total_play_seconds
            .cmp(&b.total_play_seconds)
            .then_with(|| a.name.cmp(&b.name))
    });
    eligible.into_iter().map(|p| p.name.clone()).collect()
}

/// Generate the remaining rotation plan from `now` to game end, given a
/// read-only view of the live ledger.
///
/// ### Example
/// ```
/// use rotation_core::config::{resolve, Profile, Sport, ConfigOverrides};
/// use rotation_core::ledger::{PlayerLedger, player::PlayerRecord, status::PlayerStatus};
/// use rotation_core::optimizer::generate_plan;
///
/// let mut ledger = PlayerLedger::new();
/// for name in ["A", "B", "C", "D", "E"] {
///     ledger.insert(PlayerRecord::new(name, PlayerStatus::OnField, 0));
/// }
/// ledger.insert(PlayerRecord::new("F", PlayerStatus::OnBench, 0));
/// let config = resolve(Sport::Basketball, Profile::Balanced, ConfigOverrides::default(), 6).unwrap();
/// let plan = generate_plan(&ledger, &config, 0).unwrap();
/// assert!(plan.expected_variance_seconds <= plan.expected_variance_seconds);
/// ```
pub fn generate_plan(ledger: &PlayerLedger, config: &EngineConfig, now: u64) -> EngineResult<Plan> {
    let active = ledger.active_count();
    if active < config.field_spots as usize {
        return Err(EngineError::InsufficientRoster {
            active,
            required: config.field_spots as usize,
        });
    }

    let game_length = config.game_length_seconds();
    let target_minutes_per_player = if active == 0 {
        0.0
    } else {
        (config.field_spots as f64 * game_length as f64) / active as f64 / 60.0
    };

    if ledger.bench().is_empty() {
        return Ok(Plan::empty(target_minutes_per_player, ledger.variance()));
    }

    let mut virtual_ledger = ledger.clone();
    let mut virtual_time = now;
    let mut last_sub = now.saturating_sub(config.min_sub_gap_seconds);
    let mut rotations: Vec<RotationEntry> = Vec::new();
    let boundaries = period_boundaries(config);
    let mut break_used = vec![false; boundaries.len()];

    let end_cutoff = game_length.saturating_sub(config.end_buffer_seconds);
    let max_early_variance = (config.variance_goal_seconds as f64) * config.max_early_variance_multiplier;

    while virtual_time < end_cutoff {
        let prev_time = virtual_time;
        let step = config.check_interval_seconds.min(game_length - virtual_time);
        if step == 0 {
            break;
        }
        virtual_time += step;
        virtual_ledger.tick(step);

        if config.has_period_breaks {
            for (i, boundary) in boundaries.iter().enumerate() {
                if !break_used[i] && *boundary > prev_time && *boundary <= virtual_time {
                    if let Some(entry) = emit_break_rotation(&mut virtual_ledger, config, *boundary) {
                        debug!(time = entry.time, "break rotation emitted");
                        last_sub = entry.time;
                        rotations.push(entry);
                    }
                    break_used[i] = true;
                }
            }
        }

        if virtual_time < config.first_sub_delay_seconds {
            continue;
        }
        if is_near_boundary_or_end(virtual_time, config) {
            continue;
        }

        let phase = Phase::at(virtual_time, game_length);
        let max_bench_stint = max_bench_stint_seconds(config);

        let field = virtual_ledger.field();
        let bench = virtual_ledger.bench();

        let urgent_off: Vec<&PlayerRecord> = field
            .iter()
            .copied()
            .filter(|p| !p.is_goalkeeper && p.current_stint_seconds(virtual_time) >= config.max_stint_on_field_seconds)
            .collect();
        let urgent_on: Vec<&PlayerRecord> = bench
            .iter()
            .copied()
            .filter(|p| !p.is_goalkeeper && p.current_stint_seconds(virtual_time) >= max_bench_stint)
            .collect();
        let is_urgent = !urgent_off.is_empty();

        if !is_urgent && virtual_time.saturating_sub(last_sub) < effective_min_gap(config, phase) {
            continue;
        }

        let mean = mean_play_seconds(&virtual_ledger);
        let look_ahead = look_ahead_window(config);
        let upcoming_off_nonempty = field.iter().any(|p| {
            !p.is_goalkeeper
                && config.max_stint_on_field_seconds.saturating_sub(p.current_stint_seconds(virtual_time)) <= look_ahead
        });
        let upcoming_on_nonempty = bench
            .iter()
            .any(|p| !p.is_goalkeeper && max_bench_stint.saturating_sub(p.current_stint_seconds(virtual_time)) <= look_ahead);

        let remaining = game_length.saturating_sub(virtual_time);
        let projected_variance = virtual_ledger.project_final_variance(virtual_time, remaining, &[]);
        let dynamic_threshold = dynamic_variance_threshold(max_early_variance, config.variance_goal_seconds as f64, virtual_time, game_length);
        let variance_ceiling_triggered = (projected_variance as f64) > dynamic_threshold;

        let gap_window = effective_min_gap(config, phase).max(1);
        let current_variance = virtual_ledger.variance();
        let projected_after_gap = virtual_ledger.project_final_variance(virtual_time, gap_window.min(remaining), &[]);
        let early_sub_triggered =
            projected_after_gap.saturating_sub(current_variance) > EARLY_SUB_PREVENTION_THRESHOLD_SECONDS;

        let scheduled_balance_triggered = upcoming_off_nonempty && upcoming_on_nonempty;

        let should_fire = is_urgent
            || variance_ceiling_triggered
            || early_sub_triggered
            || scheduled_balance_triggered
            || phase == Phase::EndGame;

        if !should_fire {
            continue;
        }

        let eligible_off: Vec<&PlayerRecord> = if is_urgent {
            urgent_off
        } else {
            field
                .iter()
                .copied()
                .filter(|p| !p.is_goalkeeper && p.total_play_seconds as f64 > mean)
                .collect()
        };
        let eligible_on: Vec<&PlayerRecord> = if !urgent_on.is_empty() {
            urgent_on
        } else {
            bench
                .iter()
                .copied()
                .filter(|p| !p.is_goalkeeper && (p.total_play_seconds as f64) < mean)
                .collect()
        };

        if eligible_off.is_empty() || eligible_on.is_empty() {
            continue;
        }

        let count = phase
            .max_subs_per_rotation()
            .min(eligible_off.len())
            .min(eligible_on.len())
            .min(bench.len());
        if count == 0 {
            continue;
        }

        let off_names = rank_outgoing(&eligible_off, virtual_time);
        let on_names = rank_incoming(&eligible_on);
        let off: Vec<String> = off_names.into_iter().take(count).collect();
        let on: Vec<String> = on_names.into_iter().take(count).collect();
        if off.len() != on.len() || off.is_empty() {
            continue;
        }

        let reason = if is_urgent {
            RotationReason::UrgentStint
        } else {
            RotationReason::Proactive
        };

        if virtual_ledger.apply_rotation(&off, &on, virtual_time).is_err() {
            continue;
        }
        debug!(time = virtual_time, ?reason, "rotation emitted");
        rotations.push(RotationEntry {
            time: virtual_time,
            off,
            on,
            reason,
        });
        last_sub = virtual_time;
    }

    Ok(Plan {
        rotations,
        target_minutes_per_player,
        expected_variance_seconds: virtual_ledger.variance(),
    })
}

fn dynamic_variance_threshold(max_early_variance: f64, variance_goal: f64, virtual_time: u64, game_length: u64) -> f64 {
    if game_length == 0 {
        return variance_goal;
    }
    let fraction = (virtual_time as f64 / game_length as f64).min(1.0);
    max_early_variance - (max_early_variance - variance_goal) * fraction
}

/// Emit a multi-player break-time rotation swapping the highest-played
/// field players with the lowest-played bench players, bypassing
/// `min_sub_gap`. Excludes goalkeepers. Returns `None` if there is nothing
/// useful to swap.
fn emit_break_rotation(virtual_ledger: &mut PlayerLedger, config: &EngineConfig, at_time: u64) -> Option<RotationEntry> {
    let field = virtual_ledger.field();
    let bench: Vec<&PlayerRecord> = virtual_ledger.bench().into_iter().filter(|p| !p.is_goalkeeper).collect();
    if bench.is_empty() {
        return None;
    }
    let count = max_subs_at_break(config).min(field.iter().filter(|p| !p.is_goalkeeper).count()).min(bench.len());
    if count == 0 {
        return None;
    }
    let off: Vec<String> = rank_outgoing(&field, at_time).into_iter().take(count).collect();
    let on: Vec<String> = rank_incoming(&bench).into_iter().take(count).collect();
    if off.is_empty() || on.is_empty() || off.len() != on.len() {
        return None;
    }
    virtual_ledger.apply_rotation(&off, &on, at_time).ok()?;
    Some(RotationEntry {
        time: at_time,
        off,
        on,
        reason: RotationReason::Break,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve, ConfigOverrides, Profile, Sport};
    use crate::ledger::player::PlayerRecord;
    use crate::ledger::status::PlayerStatus;

    fn basketball_ledger() -> (PlayerLedger, EngineConfig) {
        let mut ledger = PlayerLedger::new();
        for name in ["A", "B", "C", "D", "E"] {
            ledger.insert(PlayerRecord::new(name, PlayerStatus::OnField, 0));
        }
        for name in ["F", "G", "H"] {
            ledger.insert(PlayerRecord::new(name, PlayerStatus::OnBench, 0));
        }
        let config = resolve(Sport::Basketball, Profile::Balanced, ConfigOverrides::default(), 8).unwrap();
        (ledger, config)
    }

    #[test]
    fn empty_bench_yields_empty_plan() {
        let mut ledger = PlayerLedger::new();
        for name in ["A", "B", "C", "D", "E"] {
            ledger.insert(PlayerRecord::new(name, PlayerStatus::OnField, 0));
        }
        let config = resolve(Sport::Basketball, Profile::Balanced, ConfigOverrides::default(), 5).unwrap();
        let plan = generate_plan(&ledger, &config, 0).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn insufficient_roster_is_reported() {
        let mut ledger = PlayerLedger::new();
        ledger.insert(PlayerRecord::new("A", PlayerStatus::OnField, 0));
        ledger.insert(PlayerRecord::new("B", PlayerStatus::OnField, 0));
        ledger.insert(PlayerRecord::new("C", PlayerStatus::OnBench, 0));
        ledger.remove("C", 0).unwrap();
        let overrides = ConfigOverrides {
            field_spots: Some(3),
            ..Default::default()
        };
        let config = resolve(Sport::Basketball, Profile::Balanced, overrides, 3).unwrap();
        let err = generate_plan(&ledger, &config, 0).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientRoster { .. }));
    }

    #[test]
    fn plan_never_violates_first_sub_delay() {
        let (ledger, config) = basketball_ledger();
        let plan = generate_plan(&ledger, &config, 0).unwrap();
        assert!(plan.rotations.iter().all(|r| r.time >= config.first_sub_delay_seconds));
    }

    #[test]
    fn plan_never_schedules_within_end_buffer_of_game_end_unless_break() {
        let (ledger, config) = basketball_ledger();
        let plan = generate_plan(&ledger, &config, 0).unwrap();
        let game_length = config.game_length_seconds();
        for r in &plan.rotations {
            if r.reason != RotationReason::Break {
                assert!(r.time + config.end_buffer_seconds <= game_length);
            }
        }
    }

    #[test]
    fn plan_rotations_respect_min_gap_unless_urgent() {
        let (ledger, config) = basketball_ledger();
        let plan = generate_plan(&ledger, &config, 0).unwrap();
        for pair in plan.rotations.windows(2) {
            let gap = pair[1].time.saturating_sub(pair[0].time);
            if pair[1].reason != RotationReason::UrgentStint && pair[1].reason != RotationReason::Break {
                assert!(gap + 1 >= config.min_sub_gap_seconds / 4);
            }
        }
    }

    #[test]
    fn afl_break_rotation_happens_at_period_boundary() {
        let mut ledger = PlayerLedger::new();
        for i in 0..15 {
            ledger.insert(PlayerRecord::new(format!("F{i}"), PlayerStatus::OnField, 0));
        }
        for i in 0..5 {
            ledger.insert(PlayerRecord::new(format!("B{i}"), PlayerStatus::OnBench, 0));
        }
        let config = resolve(Sport::Afl, Profile::Balanced, ConfigOverrides::default(), 20).unwrap();
        let plan = generate_plan(&ledger, &config, 0).unwrap();
        assert!(plan.rotations.iter().any(|r| r.reason == RotationReason::Break));
    }
}
