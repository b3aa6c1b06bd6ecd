use crate::engine::scoreboard::ScoreBook;
use crate::engine::snapshot::{EngineSnapshot, RotationView};

/// Optional event hooks installed at construction (spec §9 "Event
/// callbacks"): a configuration struct of optional function pointers. The
/// engine never retains caller state beyond the closures themselves, and
/// never calls back into itself from inside a callback.
#[derive(Default)]
pub struct EngineCallbacks {
    pub on_update: Option<Box<dyn Fn(&EngineSnapshot)>>,
    pub on_rotation_due: Option<Box<dyn Fn(&RotationView)>>,
    pub on_period_end: Option<Box<dyn Fn(u32, bool)>>,
    pub on_game_end: Option<Box<dyn Fn(&EngineSnapshot)>>,
    pub on_error: Option<Box<dyn Fn(&str)>>,
    pub on_early_warning: Option<Box<dyn Fn(u64)>>,
    pub on_confirmation_warning: Option<Box<dyn Fn()>>,
    pub on_recovery: Option<Box<dyn Fn(&str, usize, u64)>>,
    pub on_score_update: Option<Box<dyn Fn(&ScoreBook)>>,
    pub on_goalkeeper_change: Option<Box<dyn Fn(&str, &str, u64)>>,
}

impl EngineCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_error(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    pub fn with_on_update(mut self, f: impl Fn(&EngineSnapshot) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    pub fn with_on_rotation_due(mut self, f: impl Fn(&RotationView) + 'static) -> Self {
        self.on_rotation_due = Some(Box::new(f));
        self
    }

    pub fn with_on_period_end(mut self, f: impl Fn(u32, bool) + 'static) -> Self {
        self.on_period_end = Some(Box::new(f));
        self
    }

    pub fn with_on_game_end(mut self, f: impl Fn(&EngineSnapshot) + 'static) -> Self {
        self.on_game_end = Some(Box::new(f));
        self
    }

    pub fn with_on_early_warning(mut self, f: impl Fn(u64) + 'static) -> Self {
        self.on_early_warning = Some(Box::new(f));
        self
    }

    pub fn with_on_confirmation_warning(mut self, f: impl Fn() + 'static) -> Self {
        self.on_confirmation_warning = Some(Box::new(f));
        self
    }

    pub fn with_on_recovery(mut self, f: impl Fn(&str, usize, u64) + 'static) -> Self {
        self.on_recovery = Some(Box::new(f));
        self
    }

    pub fn with_on_score_update(mut self, f: impl Fn(&ScoreBook) + 'static) -> Self {
        self.on_score_update = Some(Box::new(f));
        self
    }

    pub fn with_on_goalkeeper_change(mut self, f: impl Fn(&str, &str, u64) + 'static) -> Self {
        self.on_goalkeeper_change = Some(Box::new(f));
        self
    }
}
