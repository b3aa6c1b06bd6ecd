use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::engine::repair;
use crate::ledger::PlayerLedger;
use crate::optimizer::{self, plan::Plan};

/// Why a re-plan was triggered (spec §4.5).
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum DeviationReason {
    LateSubstitution,
    Emergency,
    Injury,
    PlayerReturned,
    GoalkeeperChanged,
    InvalidRotation,
    VisibilityCatchup,
}

impl std::fmt::Display for DeviationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeviationReason::LateSubstitution => "late_substitution",
            DeviationReason::Emergency => "emergency",
            DeviationReason::Injury => "injury",
            DeviationReason::PlayerReturned => "player_returned",
            DeviationReason::GoalkeeperChanged => "goalkeeper_changed",
            DeviationReason::InvalidRotation => "invalid_rotation",
            DeviationReason::VisibilityCatchup => "visibility_catchup",
        };
        f.write_str(label)
    }
}

/// Per-period break-rotation usage flags, preserved across re-plans so a
/// deviation cannot cause a double break-rotation in the same window.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BreakUsage {
    used: Vec<bool>,
}

impl BreakUsage {
    pub fn for_periods(num_periods: u32) -> Self {
        BreakUsage {
            used: vec![false; num_periods as usize],
        }
    }

    pub fn mark_current_used(&mut self, current_period: u32) {
        if let Some(slot) = self.used.get_mut(current_period.saturating_sub(1) as usize) {
            *slot = true;
        }
    }
}

/// Result of handling a deviation: the regenerated, validated plan plus how
/// many entries were dropped during validation (surfaced via `on_recovery`).
pub struct DeviationOutcome {
    pub plan: Plan,
    pub dropped: usize,
}

/// C5 — reconcile the ledger, then regenerate and validate the remaining
/// plan.
///
/// Steps (spec §4.5): the caller has already synced field/bench/time state
/// into `ledger` (the live ledger is the ground truth here, there is no
/// separate "virtual ledger to sync" at this layer — that distinction only
/// matters inside the optimizer, which clones `ledger` itself). This
/// function marks the current period's break-rotation flag used, invokes
/// the optimizer, and validates the result by replaying it through a
/// throwaway ledger, dropping any entry that references a non-resident
/// player at its scheduled time.
pub fn handle(
    reason: DeviationReason,
    ledger: &PlayerLedger,
    config: &EngineConfig,
    now: u64,
    current_period: u32,
    break_usage: &mut BreakUsage,
) -> Result<DeviationOutcome, crate::error::EngineError> {
    info!(%reason, now, "deviation handler invoked");
    break_usage.mark_current_used(current_period);

    let candidate_plan = optimizer::generate_plan(ledger, config, now)?;
    let (validated, dropped) = validate_plan(candidate_plan, ledger, now);

    Ok(DeviationOutcome {
        plan: validated,
        dropped,
    })
}

/// Replay a candidate plan step by step through a throwaway ledger cloned
/// from `ledger`, dropping any entry whose `off`/`on` players are not
/// resident in the expected status at its scheduled time.
fn validate_plan(mut plan: Plan, ledger: &PlayerLedger, now: u64) -> (Plan, usize) {
    let mut shadow = ledger.clone();
    let mut cursor = now;
    let mut kept = Vec::with_capacity(plan.rotations.len());
    let mut dropped = 0;

    for entry in plan.rotations.drain(..) {
        let delta = entry.time.saturating_sub(cursor);
        shadow.tick(delta);
        cursor = entry.time;
        match shadow.apply_rotation(&entry.off, &entry.on, entry.time) {
            Ok(()) => kept.push(entry),
            Err(_) => dropped += 1,
        }
    }

    plan.rotations = kept;
    (plan, dropped)
}

/// Recompute `target_seconds_per_player` given an active-player count that
/// may have changed (e.g. after a removal).
pub fn target_seconds_per_player(config: &EngineConfig, active_player_count: usize) -> f64 {
    if active_player_count == 0 {
        return 0.0;
    }
    (config.field_spots as f64 * config.game_length_seconds() as f64) / active_player_count as f64
}

pub use repair::repair as repair_invariants;
