//! A deterministic rotation-scheduling engine for team-sports substitution
//! planning: given a roster, a sport/profile tuning, and a live game clock,
//! it produces and maintains a plan of substitutions that keeps playing
//! time balanced across the active roster.
//!
//! [`engine::GameEngine`] is the entry point for embedders; [`config`],
//! [`ledger`], and [`optimizer`] are usable independently for tooling and
//! tests that want to inspect a single component in isolation.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod optimizer;
pub mod persistence;

pub use config::{resolve, ConfigOverrides, EngineConfig, Profile, Sport};
pub use engine::{GameEngine, LATE_SUB_THRESHOLD_SECS};
pub use error::{EngineError, EngineResult};
