//! C4 — Game Runtime.
//!
//! [`GameEngine`] owns every other component and drives the state machine
//! described in spec §4.4: it is the only thing callers talk to once a game
//! is initialized.

pub mod callbacks;
pub mod clock;
pub mod deviation;
pub mod repair;
pub mod scoreboard;
pub mod setup;
pub mod snapshot;
pub mod state;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{resolve, EngineConfig};
use crate::engine::callbacks::EngineCallbacks;
use crate::engine::clock::GameClock;
use crate::engine::deviation::{BreakUsage, DeviationReason};
use crate::engine::scoreboard::ScoreBook;
use crate::engine::setup::SetupInput;
use crate::engine::snapshot::{EngineSnapshot, RotationView};
use crate::engine::state::EngineState;
use crate::error::{EngineError, EngineResult};
use crate::ledger::player::PlayerRecord;
use crate::ledger::status::PlayerStatus;
use crate::ledger::PlayerLedger;
use crate::optimizer::{self, plan::Plan};

/// How late a confirmation may arrive after its scheduled time before it is
/// treated as a deviation worth replanning around (spec §4.4).
pub const LATE_SUB_THRESHOLD_SECS: u64 = 15;

/// The largest single `tick` call serviced by the ordinary per-second path;
/// anything larger is expected to arrive through [`GameEngine::resume`]
/// instead.
pub const MAX_TICK_CATCHUP_SECS: u64 = 10;

/// A hidden-time gap longer than this is reported rather than replayed
/// second-by-second.
pub const STALE_CATCHUP_THRESHOLD_SECS: u64 = 3600;

/// Game time remaining before a scheduled rotation at which an early warning
/// callback fires.
const EARLY_WARNING_LEAD_SECONDS: u64 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct PendingRotation {
    off: Vec<String>,
    on: Vec<String>,
    time: u64,
}

/// Everything a [`GameEngine`] needs to resume exactly where it left off,
/// minus the caller's [`EngineCallbacks`] (which hold unserializable
/// closures and must be supplied fresh by whatever process reloads this).
#[derive(Serialize, Deserialize)]
pub struct PersistedState {
    state: EngineState,
    setup: Option<SetupInput>,
    config: Option<EngineConfig>,
    ledger: PlayerLedger,
    clock: GameClock,
    plan: Plan,
    plan_index: usize,
    pending: Option<PendingRotation>,
    break_usage: BreakUsage,
    history: Vec<crate::optimizer::plan::RotationEntry>,
    score: ScoreBook,
    warned_early: std::collections::HashSet<u64>,
}

/// Owns the config, ledger, clock, plan, and scoreboard for a single game and
/// exposes the full command surface described in spec §4.4 / §6. Never
/// `Clone`: callers hold exactly one engine per game.
pub struct GameEngine {
    state: EngineState,
    setup: Option<SetupInput>,
    config: Option<EngineConfig>,
    ledger: PlayerLedger,
    clock: GameClock,
    plan: Plan,
    plan_index: usize,
    pending: Option<PendingRotation>,
    break_usage: BreakUsage,
    history: Vec<crate::optimizer::plan::RotationEntry>,
    score: ScoreBook,
    warned_early: std::collections::HashSet<u64>,
    callbacks: EngineCallbacks,
}

impl GameEngine {
    pub fn new(callbacks: EngineCallbacks) -> Self {
        GameEngine {
            state: EngineState::Uninitialized,
            setup: None,
            config: None,
            ledger: PlayerLedger::new(),
            clock: GameClock::new(),
            plan: Plan::empty(0.0, 0),
            plan_index: 0,
            pending: None,
            break_usage: BreakUsage::for_periods(1),
            history: Vec::new(),
            score: ScoreBook::new("Home", "Away"),
            warned_early: std::collections::HashSet::new(),
            callbacks,
        }
    }

    pub fn get_state(&self) -> EngineState {
        self.state
    }

    /// The setup input this game was initialized with, if any. Used by
    /// [`crate::persistence::GameSummary`] to echo the original setup
    /// alongside final stats.
    pub fn setup(&self) -> Option<&SetupInput> {
        self.setup.as_ref()
    }

    fn config(&self) -> EngineResult<&EngineConfig> {
        self.config
            .as_ref()
            .ok_or_else(|| EngineError::invalid_state("engine is not initialized"))
    }

    fn require_state(&self, allowed: &[EngineState]) -> EngineResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(EngineError::invalid_state(format!(
                "operation not valid in state {}",
                self.state
            )))
        }
    }

    fn notify_update(&self) {
        if let Some(cb) = &self.callbacks.on_update {
            cb(&self.snapshot());
        }
    }

    fn notify_error(&self, err: &EngineError) {
        warn!(%err, "reporting non-fatal engine error");
        if let Some(cb) = &self.callbacks.on_error {
            cb(&err.to_string());
        }
    }

    /// Uninitialized -> Ready (spec §4.4). Resolves config via C1, seeds the
    /// ledger from the starter/reserve rosters, and generates the initial
    /// plan.
    pub fn initialize(&mut self, setup: SetupInput) -> EngineResult<()> {
        self.require_state(&[EngineState::Uninitialized])?;

        let roster_size = setup.starter_names.len() + setup.reserve_names.len();
        let overrides = crate::config::ConfigOverrides {
            field_spots: Some(setup.field_spots),
            num_goalkeepers: Some(setup.num_goalkeepers),
            period_length_seconds: Some(setup.minutes_per_period * 60),
            num_periods: Some(setup.num_periods),
            ideal_shifts_per_player: setup.ideal_shifts_per_player,
            auto_confirm_rotations: setup.auto_confirm_rotations,
            ..Default::default()
        };
        let config = resolve(setup.sport, setup.profile, overrides, roster_size)?;

        let mut ledger = PlayerLedger::new();
        for name in &setup.starter_names {
            let mut record = PlayerRecord::new(name, PlayerStatus::OnField, 0);
            apply_player_data(&mut record, &setup, name);
            ledger.insert(record);
        }
        for name in &setup.reserve_names {
            let mut record = PlayerRecord::new(name, PlayerStatus::OnBench, 0);
            apply_player_data(&mut record, &setup, name);
            ledger.insert(record);
        }

        if config.num_goalkeepers > 0 && ledger.goalkeeper().is_none() {
            return Err(EngineError::goalkeeper_constraint(
                "no starter is designated as goalkeeper",
            ));
        }
        if ledger.field().len() != config.field_spots as usize {
            return Err(EngineError::invalid_config(format!(
                "starter_names has {} players, field_spots requires {}",
                ledger.field().len(),
                config.field_spots
            )));
        }

        let plan = optimizer::generate_plan(&ledger, &config, 0)?;

        self.break_usage = BreakUsage::for_periods(config.num_periods);
        self.score = ScoreBook::new(setup.home_team_name.clone(), setup.away_team_name.clone());
        self.setup = Some(setup);
        self.config = Some(config);
        self.ledger = ledger;
        self.clock = GameClock::new();
        self.plan = plan;
        self.plan_index = 0;
        self.pending = None;
        self.history.clear();
        self.warned_early.clear();
        self.state = EngineState::Ready;

        info!(sport = ?self.config.as_ref().unwrap().sport, "engine initialized");
        self.notify_update();
        Ok(())
    }

    /// Ready|Paused -> Running.
    pub fn start(&mut self) -> EngineResult<()> {
        self.require_state(&[EngineState::Ready, EngineState::Paused])?;
        self.state = EngineState::Running;
        self.clock.running = true;
        self.clock.paused = false;
        self.notify_update();
        Ok(())
    }

    /// Halftime -> Running, distinct from [`Self::start`] because it is
    /// only legal once a period break has actually occurred.
    pub fn start_next_period(&mut self) -> EngineResult<()> {
        self.require_state(&[EngineState::Halftime])?;
        self.clock.is_halftime = false;
        self.state = EngineState::Running;
        self.clock.running = true;
        self.clock.paused = false;
        self.notify_update();
        Ok(())
    }

    /// Running -> Paused, a manually requested pause (as opposed to
    /// [`Self::suspend`], which records a visibility-loss boundary).
    pub fn stop(&mut self) -> EngineResult<()> {
        self.require_state(&[EngineState::Running, EngineState::PendingRotation])?;
        self.state = EngineState::Paused;
        self.clock.running = false;
        self.clock.paused = true;
        self.notify_update();
        Ok(())
    }

    /// Running -> Paused, recording that the host is about to go invisible.
    /// Pair with [`Self::resume`] once the host is visible again.
    pub fn suspend(&mut self) -> EngineResult<()> {
        self.require_state(&[EngineState::Running, EngineState::PendingRotation])?;
        self.state = EngineState::Paused;
        self.clock.running = false;
        self.clock.paused = true;
        Ok(())
    }

    /// Advance the clock by `delta_seconds` one second at a time, firing
    /// rotation-due/period-end/game-end transitions as their conditions are
    /// crossed. Legal in `Running` and `PendingRotation` (ticks continue
    /// while a rotation awaits confirmation).
    pub fn tick(&mut self, delta_seconds: u64) -> EngineResult<()> {
        self.require_state(&[EngineState::Running, EngineState::PendingRotation])?;
        if delta_seconds > MAX_TICK_CATCHUP_SECS {
            debug!(delta_seconds, "tick exceeds ordinary catch-up bound, processing anyway");
        }
        for _ in 0..delta_seconds {
            self.tick_one_second()?;
            if !matches!(self.state, EngineState::Running | EngineState::PendingRotation) {
                break;
            }
        }
        self.notify_update();
        Ok(())
    }

    fn tick_one_second(&mut self) -> EngineResult<()> {
        let config = self.config()?.clone();
        self.ledger.tick(1);
        self.clock.advance_one_second();

        if self.clock.period_elapsed_seconds >= config.period_length_seconds {
            let overflow = self.clock.period_elapsed_seconds - config.period_length_seconds;
            if self.clock.current_period < config.num_periods {
                self.clock.current_period += 1;
                self.clock.period_elapsed_seconds = overflow;
                self.clock.is_halftime = true;
                self.state = EngineState::Halftime;
                self.pending = None;
                let period_just_ended = self.clock.current_period - 1;
                info!(period = period_just_ended, "period ended");
                if let Some(cb) = &self.callbacks.on_period_end {
                    cb(period_just_ended, true);
                }
            } else {
                self.clock.game_over = true;
                self.state = EngineState::GameOver;
                self.pending = None;
                info!("game over");
                let snapshot = self.snapshot();
                if let Some(cb) = &self.callbacks.on_game_end {
                    cb(&snapshot);
                }
            }
            return Ok(());
        }

        if self.pending.is_none() {
            if let Some(entry) = self.plan.rotations.get(self.plan_index).cloned() {
                let now = self.clock.current_game_seconds;
                if entry.time <= now {
                    self.pending = Some(PendingRotation {
                        off: entry.off.clone(),
                        on: entry.on.clone(),
                        time: entry.time,
                    });
                    if config.auto_confirm_rotations {
                        self.confirm_rotation()?;
                    } else {
                        self.state = EngineState::PendingRotation;
                        if let Some(cb) = &self.callbacks.on_rotation_due {
                            cb(&RotationView::from(&entry));
                        }
                    }
                } else if entry.time.saturating_sub(now) <= EARLY_WARNING_LEAD_SECONDS
                    && self.warned_early.insert(entry.time)
                {
                    if let Some(cb) = &self.callbacks.on_early_warning {
                        cb(entry.time - now);
                    }
                }
            }
        } else if self.state == EngineState::PendingRotation {
            let pending_time = self.pending.as_ref().unwrap().time;
            if self.clock.current_game_seconds.saturating_sub(pending_time) == LATE_SUB_THRESHOLD_SECS {
                if let Some(cb) = &self.callbacks.on_confirmation_warning {
                    cb();
                }
            }
        }
        Ok(())
    }

    /// Confirm the currently pending scheduled rotation, applying it to the
    /// ledger and advancing the plan cursor. Triggers a re-plan via C5 if
    /// the confirmation arrived more than [`LATE_SUB_THRESHOLD_SECS`] after
    /// it was due.
    pub fn confirm_rotation(&mut self) -> EngineResult<()> {
        let pending = self
            .pending
            .take()
            .ok_or_else(|| EngineError::invalid_state("no rotation is pending confirmation"))?;

        if let Err(err) = self.ledger.apply_rotation(&pending.off, &pending.on, pending.time) {
            self.notify_error(&err);
            self.replan(DeviationReason::InvalidRotation)?;
            self.state = EngineState::Running;
            return Ok(());
        }

        let now = self.clock.current_game_seconds;
        let late = now.saturating_sub(pending.time) > LATE_SUB_THRESHOLD_SECS;
        let reason = if late {
            crate::optimizer::plan::RotationReason::LateSubstitution
        } else {
            crate::optimizer::plan::RotationReason::Scheduled
        };
        self.history.push(crate::optimizer::plan::RotationEntry {
            time: pending.time,
            off: pending.off,
            on: pending.on,
            reason,
        });
        self.plan_index += 1;
        self.state = EngineState::Running;

        if late {
            self.replan(DeviationReason::LateSubstitution)?;
        }
        self.notify_update();
        Ok(())
    }

    /// Bypass the plan entirely: substitute `off` for `on` immediately,
    /// optionally removing `off` from the game afterward (an injury). Legal
    /// in any state except `GameOver`.
    pub fn emergency_swap(&mut self, off: &str, on: &str, remove_after: bool) -> EngineResult<()> {
        if self.state == EngineState::GameOver {
            return Err(EngineError::invalid_state("game has already ended"));
        }
        if self.ledger.get(off).is_some_and(|p| p.is_goalkeeper) {
            return Err(EngineError::goalkeeper_constraint(format!(
                "{off} is the current goalkeeper; use set_goalkeeper to replace them"
            )));
        }
        let now = self.clock.current_game_seconds;
        self.ledger
            .apply_rotation(std::slice::from_ref(&off.to_string()), std::slice::from_ref(&on.to_string()), now)?;
        self.history.push(crate::optimizer::plan::RotationEntry {
            time: now,
            off: vec![off.to_string()],
            on: vec![on.to_string()],
            reason: crate::optimizer::plan::RotationReason::Emergency,
        });

        if remove_after {
            self.ledger.remove(off, now)?;
        }

        let reason = if remove_after {
            DeviationReason::Injury
        } else {
            DeviationReason::Emergency
        };
        self.pending = None;
        if self.state == EngineState::PendingRotation {
            self.state = EngineState::Running;
        }
        self.replan(reason)?;
        self.notify_update();
        Ok(())
    }

    /// Designate `name` as goalkeeper, swapping with the current goalkeeper
    /// as needed, and regenerate the plan.
    pub fn set_goalkeeper(&mut self, name: &str) -> EngineResult<()> {
        self.require_state(&[
            EngineState::Ready,
            EngineState::Running,
            EngineState::PendingRotation,
            EngineState::Paused,
            EngineState::Halftime,
        ])?;
        let now = self.clock.current_game_seconds;
        let previous = self.ledger.goalkeeper().map(|p| p.name.clone());
        self.ledger.swap_goalkeeper(name, now)?;

        self.history.push(crate::optimizer::plan::RotationEntry {
            time: now,
            off: previous.clone().into_iter().collect(),
            on: vec![name.to_string()],
            reason: crate::optimizer::plan::RotationReason::GoalkeeperChange,
        });
        if let Some(cb) = &self.callbacks.on_goalkeeper_change {
            cb(previous.as_deref().unwrap_or(""), name, now);
        }
        self.replan(DeviationReason::GoalkeeperChanged)?;
        self.notify_update();
        Ok(())
    }

    /// Remove a bench player from the game (e.g. they did not return for
    /// the second half).
    pub fn remove_player(&mut self, name: &str) -> EngineResult<()> {
        let now = self.clock.current_game_seconds;
        self.ledger.remove(name, now)?;
        self.replan(DeviationReason::Injury)?;
        self.notify_update();
        Ok(())
    }

    /// Inverse of [`Self::remove_player`].
    pub fn restore_player(&mut self, name: &str) -> EngineResult<()> {
        let now = self.clock.current_game_seconds;
        self.ledger.restore(name, now)?;
        self.replan(DeviationReason::PlayerReturned)?;
        self.notify_update();
        Ok(())
    }

    /// Adjust `player`'s points and the home team's score in tandem.
    pub fn score(&mut self, player: &str, delta: i32) {
        self.score.score_home(player, delta);
        if let Some(cb) = &self.callbacks.on_score_update {
            cb(&self.score);
        }
    }

    /// Adjust the away team's score only.
    pub fn score_opposition(&mut self, delta: i32) {
        self.score.score_away(delta);
        if let Some(cb) = &self.callbacks.on_score_update {
            cb(&self.score);
        }
    }

    /// Resume from a visibility-driven suspension, replaying `elapsed`
    /// hidden seconds in bulk rather than one tick at a time. Gaps longer
    /// than [`STALE_CATCHUP_THRESHOLD_SECS`] are reported via `on_error`
    /// and the elapsed time is not applied.
    pub fn resume(&mut self, elapsed_seconds: u64) -> EngineResult<()> {
        self.require_state(&[EngineState::Paused])?;

        if elapsed_seconds > STALE_CATCHUP_THRESHOLD_SECS {
            let err = EngineError::StaleCatchup {
                elapsed_seconds,
                limit_seconds: STALE_CATCHUP_THRESHOLD_SECS,
            };
            self.notify_error(&err);
            self.state = EngineState::Running;
            self.clock.running = true;
            self.clock.paused = false;
            self.notify_update();
            return Ok(());
        }

        self.apply_missed_time(elapsed_seconds)?;
        if self.state == EngineState::Paused {
            self.state = EngineState::Running;
            self.clock.running = true;
            self.clock.paused = false;
        }
        self.notify_update();
        Ok(())
    }

    /// Bulk-advance the ledger and clock by `elapsed` seconds, crossing
    /// period boundaries as needed, then regenerate the plan around the
    /// resulting state (spec §4.4 "visibility catch-up").
    fn apply_missed_time(&mut self, elapsed: u64) -> EngineResult<()> {
        self.ledger.tick(elapsed);

        let mut remaining = elapsed;
        loop {
            let config = self.config()?.clone();
            if remaining == 0 {
                break;
            }
            let space_in_period = config.period_length_seconds.saturating_sub(self.clock.period_elapsed_seconds);
            if remaining < space_in_period {
                self.clock.current_game_seconds += remaining;
                self.clock.period_elapsed_seconds += remaining;
                remaining = 0;
            } else {
                self.clock.current_game_seconds += space_in_period;
                remaining -= space_in_period;
                if self.clock.current_period < config.num_periods {
                    self.clock.current_period += 1;
                    self.clock.period_elapsed_seconds = 0;
                    self.clock.is_halftime = true;
                    self.state = EngineState::Halftime;
                    let period_just_ended = self.clock.current_period - 1;
                    if let Some(cb) = &self.callbacks.on_period_end {
                        cb(period_just_ended, true);
                    }
                } else {
                    self.clock.game_over = true;
                    self.state = EngineState::GameOver;
                    let snapshot = self.snapshot();
                    if let Some(cb) = &self.callbacks.on_game_end {
                        cb(&snapshot);
                    }
                    return Ok(());
                }
            }
        }

        self.pending = None;
        self.replan(DeviationReason::VisibilityCatchup)?;
        Ok(())
    }

    /// Run C5 against the live ledger and install the resulting plan,
    /// resetting the plan cursor to the start of the new plan.
    fn replan(&mut self, reason: DeviationReason) -> EngineResult<()> {
        let config = self.config()?.clone();
        let now = self.clock.current_game_seconds;

        if let Some(summary) = repair::repair(&mut self.ledger, &config, now) {
            self.history.push(crate::optimizer::plan::RotationEntry {
                time: now,
                off: summary.moved_to_bench,
                on: summary.moved_to_field,
                reason: crate::optimizer::plan::RotationReason::Repair,
            });
            self.notify_error(&EngineError::InternalInvariantViolation(summary.description));
        }

        let outcome = match deviation::handle(reason, &self.ledger, &config, now, self.clock.current_period, &mut self.break_usage) {
            Ok(outcome) => outcome,
            Err(err) if err.is_non_fatal() => {
                self.notify_error(&err);
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        if outcome.dropped > 0 {
            if let Some(cb) = &self.callbacks.on_recovery {
                cb(&reason.to_string(), outcome.dropped, now);
            }
        }
        self.plan = outcome.plan;
        self.plan_index = 0;
        Ok(())
    }

    /// Hard reset: tear down everything back to `Uninitialized`.
    pub fn reset(&mut self) {
        self.state = EngineState::Uninitialized;
        self.setup = None;
        self.config = None;
        self.ledger = PlayerLedger::new();
        self.clock = GameClock::new();
        self.plan = Plan::empty(0.0, 0);
        self.plan_index = 0;
        self.pending = None;
        self.break_usage = BreakUsage::for_periods(1);
        self.history.clear();
        self.score = ScoreBook::new("Home", "Away");
        self.warned_early.clear();
        info!("engine reset");
        self.notify_update();
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let variance_seconds = self.ledger.variance();
        EngineSnapshot {
            state: self.state,
            clock: self.clock.clone(),
            field: self.ledger.field().into_iter().cloned().collect(),
            bench: self.ledger.bench().into_iter().cloned().collect(),
            removed: self.ledger.removed().into_iter().cloned().collect(),
            pending: self.pending.as_ref().map(|p| RotationView {
                off: p.off.clone(),
                on: p.on.clone(),
                time: p.time,
            }),
            next_scheduled: self.plan.rotations.get(self.plan_index).map(RotationView::from),
            remaining_count: self.plan.rotations.len().saturating_sub(self.plan_index),
            history_count: self.history.len(),
            variance_seconds,
            target_minutes_per_player: self.plan.target_minutes_per_player,
            expected_variance_seconds: self.plan.expected_variance_seconds,
            score: self.score.clone(),
        }
    }

    pub fn history(&self) -> &[crate::optimizer::plan::RotationEntry] {
        &self.history
    }

    /// Extract everything needed to resume this game later, without the
    /// caller's callbacks.
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            state: self.state,
            setup: self.setup.clone(),
            config: self.config.clone(),
            ledger: self.ledger.clone(),
            clock: self.clock.clone(),
            plan: self.plan.clone(),
            plan_index: self.plan_index,
            pending: self.pending.clone(),
            break_usage: self.break_usage.clone(),
            history: self.history.clone(),
            score: self.score.clone(),
            warned_early: self.warned_early.clone(),
        }
    }

    /// Rebuild an engine from a previously persisted state, installing
    /// fresh callbacks (a reloaded process cannot recover the original
    /// closures).
    pub fn from_persisted(data: PersistedState, callbacks: EngineCallbacks) -> Self {
        GameEngine {
            state: data.state,
            setup: data.setup,
            config: data.config,
            ledger: data.ledger,
            clock: data.clock,
            plan: data.plan,
            plan_index: data.plan_index,
            pending: data.pending,
            break_usage: data.break_usage,
            history: data.history,
            score: data.score,
            warned_early: data.warned_early,
            callbacks,
        }
    }
}

fn apply_player_data(record: &mut PlayerRecord, setup: &SetupInput, name: &str) {
    if let Some(data) = setup.player_data.get(name) {
        record.jersey_number = data.jersey_number;
        if let Some(position) = &data.position {
            record.position = position.clone();
            if position.eq_ignore_ascii_case("GK") {
                record.is_goalkeeper = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Profile, Sport};

    fn basketball_setup() -> SetupInput {
        SetupInput {
            sport: Sport::Basketball,
            profile: Profile::Balanced,
            minutes_per_period: 10,
            num_periods: 4,
            field_spots: 5,
            num_goalkeepers: 0,
            starter_names: vec!["A", "B", "C", "D", "E"].into_iter().map(String::from).collect(),
            reserve_names: vec!["F", "G", "H"].into_iter().map(String::from).collect(),
            player_data: Default::default(),
            ideal_shifts_per_player: None,
            auto_confirm_rotations: Some(true),
            enable_warning_sound: None,
            home_team_name: "Home".to_string(),
            away_team_name: "Away".to_string(),
        }
    }

    #[test]
    fn initialize_then_start_reaches_running() {
        let mut engine = GameEngine::new(EngineCallbacks::new());
        engine.initialize(basketball_setup()).unwrap();
        assert_eq!(engine.get_state(), EngineState::Ready);
        engine.start().unwrap();
        assert_eq!(engine.get_state(), EngineState::Running);
    }

    #[test]
    fn tick_accrues_playing_time() {
        let mut engine = GameEngine::new(EngineCallbacks::new());
        engine.initialize(basketball_setup()).unwrap();
        engine.start().unwrap();
        engine.tick(30).unwrap();
        assert_eq!(engine.ledger.get("A").unwrap().total_play_seconds, 30);
    }

    #[test]
    fn confirm_rotation_is_rejected_when_nothing_pending() {
        let mut engine = GameEngine::new(EngineCallbacks::new());
        engine.initialize(basketball_setup()).unwrap();
        engine.start().unwrap();
        assert!(engine.confirm_rotation().is_err());
    }

    #[test]
    fn manual_confirmation_flow_applies_pending_rotation() {
        let mut setup = basketball_setup();
        setup.auto_confirm_rotations = Some(false);
        let mut engine = GameEngine::new(EngineCallbacks::new());
        engine.initialize(setup).unwrap();
        engine.start().unwrap();

        let budget = config_game_length(&engine) + 10 * config_num_periods(&engine) as u64;
        for _ in 0..budget {
            if engine.get_state() == EngineState::Halftime {
                engine.start_next_period().unwrap();
            }
            engine.tick(1).unwrap();
            if engine.get_state() == EngineState::PendingRotation {
                engine.confirm_rotation().unwrap();
            }
            if engine.get_state() == EngineState::GameOver {
                break;
            }
        }
        assert_eq!(engine.get_state(), EngineState::GameOver);
    }

    fn config_game_length(engine: &GameEngine) -> u64 {
        engine.config.as_ref().unwrap().game_length_seconds()
    }

    fn config_num_periods(engine: &GameEngine) -> u32 {
        engine.config.as_ref().unwrap().num_periods
    }

    #[test]
    fn emergency_swap_is_legal_outside_game_over() {
        let mut engine = GameEngine::new(EngineCallbacks::new());
        engine.initialize(basketball_setup()).unwrap();
        engine.start().unwrap();
        engine.emergency_swap("A", "F", true).unwrap();
        assert!(engine.ledger.get("A").unwrap().removed());
        assert!(engine.ledger.get("F").unwrap().on_field());
    }

    #[test]
    fn emergency_swap_rejects_pulling_the_goalkeeper() {
        let mut setup = basketball_setup();
        setup.num_goalkeepers = 1;
        setup.player_data.insert(
            "A".to_string(),
            crate::engine::setup::PlayerData {
                jersey_number: None,
                position: Some("GK".to_string()),
            },
        );
        let mut engine = GameEngine::new(EngineCallbacks::new());
        engine.initialize(setup).unwrap();
        engine.start().unwrap();

        let err = engine.emergency_swap("A", "F", false).unwrap_err();
        assert!(matches!(err, EngineError::GoalkeeperConstraint(_)));
        assert!(engine.ledger.get("A").unwrap().on_field());
    }

    #[test]
    fn resume_beyond_stale_threshold_is_reported_and_discarded() {
        let mut engine = GameEngine::new(EngineCallbacks::new());
        engine.initialize(basketball_setup()).unwrap();
        engine.start().unwrap();
        engine.suspend().unwrap();
        engine.resume(STALE_CATCHUP_THRESHOLD_SECS + 1).unwrap();
        assert_eq!(engine.get_state(), EngineState::Running);
        assert_eq!(engine.ledger.get("A").unwrap().total_play_seconds, 0);
    }

    #[test]
    fn resume_within_threshold_advances_time_and_crosses_periods() {
        let mut engine = GameEngine::new(EngineCallbacks::new());
        engine.initialize(basketball_setup()).unwrap();
        engine.start().unwrap();
        engine.suspend().unwrap();
        engine.resume(700).unwrap();
        assert_eq!(engine.get_state(), EngineState::Halftime);
    }

    #[test]
    fn reset_returns_to_uninitialized() {
        let mut engine = GameEngine::new(EngineCallbacks::new());
        engine.initialize(basketball_setup()).unwrap();
        engine.start().unwrap();
        engine.reset();
        assert_eq!(engine.get_state(), EngineState::Uninitialized);
    }
}
