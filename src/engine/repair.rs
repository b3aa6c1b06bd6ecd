use tracing::warn;

use crate::config::EngineConfig;
use crate::ledger::status::PlayerStatus;
use crate::ledger::PlayerLedger;

/// What a [`repair`] pass did, for logging and for recording in
/// [`crate::engine::GameEngine`]'s rotation history.
pub struct RepairSummary {
    pub description: String,
    pub moved_to_bench: Vec<String>,
    pub moved_to_field: Vec<String>,
}

/// Attempt to repair a ledger that has drifted from the §3 invariants:
/// move extras off the field, pull bench players in to refill the field,
/// and restore the goalkeeper designation. Returns `None` if nothing needed
/// fixing.
///
/// Called from [`crate::engine::deviation`] whenever a reconciliation pass
/// detects the field/bench sets no longer match `field_spots`/the
/// goalkeeper rule; the caller is responsible for reporting the resulting
/// `EngineError::InternalInvariantViolation` via `on_error`.
pub fn repair(ledger: &mut PlayerLedger, config: &EngineConfig, at_time: u64) -> Option<RepairSummary> {
    let mut actions: Vec<String> = Vec::new();
    let mut moved_to_bench: Vec<String> = Vec::new();
    let mut moved_to_field: Vec<String> = Vec::new();

    let mut field: Vec<String> = ledger.field().into_iter().map(|p| p.name.clone()).collect();
    field.sort();
    let target = config.field_spots as usize;

    if field.len() > target {
        let mut by_stint: Vec<(&str, u64)> = field
            .iter()
            .map(|name| {
                let stint = ledger.get(name).unwrap().current_stint_seconds(at_time);
                (name.as_str(), stint)
            })
            .collect();
        by_stint.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let excess = field.len() - target;
        for (name, _) in by_stint.into_iter().take(excess) {
            if ledger.force_transition(name, PlayerStatus::OnBench, at_time).is_ok() {
                actions.push(format!("moved {name} to bench (field overfull)"));
                moved_to_bench.push(name.to_string());
            }
        }
    } else if field.len() < target {
        let mut bench: Vec<String> = ledger.bench().into_iter().map(|p| p.name.clone()).collect();
        bench.sort_by(|a, b| {
            let ta = ledger.get(a).unwrap().total_play_seconds;
            let tb = ledger.get(b).unwrap().total_play_seconds;
            ta.cmp(&tb).then_with(|| a.cmp(b))
        });
        let need = target - field.len();
        for name in bench.into_iter().take(need) {
            if ledger.force_transition(&name, PlayerStatus::OnField, at_time).is_ok() {
                actions.push(format!("pulled {name} from bench (field underfull)"));
                moved_to_field.push(name);
            }
        }
    }

    if config.num_goalkeepers > 0 && ledger.goalkeeper().is_none() {
        let candidate = ledger
            .bench()
            .into_iter()
            .find(|p| p.is_goalkeeper)
            .map(|p| p.name.clone());
        if let Some(name) = candidate {
            if ledger.swap_goalkeeper(&name, at_time).is_ok() {
                actions.push(format!("restored {name} as goalkeeper from bench"));
                moved_to_field.push(name);
            }
        } else if let Some(name) = ledger.field().into_iter().map(|p| p.name.clone()).min() {
            if ledger.swap_goalkeeper(&name, at_time).is_ok() {
                actions.push(format!("assigned {name} as goalkeeper (none configured on field)"));
            }
        }
    }

    if actions.is_empty() {
        None
    } else {
        let description = actions.join("; ");
        warn!(summary = %description, "repaired internal invariant violation");
        Some(RepairSummary {
            description,
            moved_to_bench,
            moved_to_field,
        })
    }
}
