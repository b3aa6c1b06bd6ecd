use thiserror::Error;

/// Errors produced by the rotation engine.
///
/// `InvalidConfig` and `InvalidRotation` are returned directly by the call
/// that triggered them; every other variant is non-fatal and is reported
/// through [`crate::engine::EngineCallbacks::on_error`] while the engine
/// keeps running (see spec §7 propagation policy).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("invalid rotation: {0}")]
    InvalidRotation(String),

    #[error("goalkeeper constraint violated: {0}")]
    GoalkeeperConstraint(String),

    #[error("insufficient roster: {active} active players, {required} required")]
    InsufficientRoster { active: usize, required: usize },

    #[error("stale catchup: {elapsed_seconds}s exceeds the {limit_seconds}s threshold")]
    StaleCatchup { elapsed_seconds: u64, limit_seconds: u64 },

    #[error("internal invariant violation: {0}")]
    InternalInvariantViolation(String),
}

impl EngineError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn invalid_rotation(msg: impl Into<String>) -> Self {
        Self::InvalidRotation(msg.into())
    }

    pub fn goalkeeper_constraint(msg: impl Into<String>) -> Self {
        Self::GoalkeeperConstraint(msg.into())
    }

    /// True for errors that are reported via `on_error` rather than
    /// returned as a command's `Result`.
    pub fn is_non_fatal(&self) -> bool {
        !matches!(self, Self::InvalidConfig(_) | Self::InvalidRotation(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
