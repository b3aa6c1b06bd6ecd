//! Command-line surface over [`crate::engine::GameEngine`] (spec §6). Each
//! invocation loads persisted state from a JSON file, applies exactly one
//! command, and writes the updated state back out.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::engine::callbacks::EngineCallbacks;
use crate::engine::setup::SetupInput;
use crate::engine::GameEngine;
use crate::error::EngineError;
use crate::persistence::GameRecord;

/// A deterministic rotation-scheduling engine for team-sports substitution
/// planning.
#[derive(Parser, Debug)]
#[command(about = "A deterministic rotation-scheduling engine for team-sports substitution planning", long_about = None)]
pub struct Args {
    /// Path to the persisted game state file.
    #[arg(short, long, default_value = "game.json")]
    pub state_file: PathBuf,

    /// Raise the log level from info to debug.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new game from a setup JSON file.
    Init { setup_file: PathBuf },
    /// Start the clock.
    Start,
    /// Pause the clock.
    Stop,
    /// Advance the clock by the given number of seconds.
    Tick { seconds: u64 },
    /// Confirm the currently pending rotation.
    Confirm,
    /// Apply an immediate substitution outside the plan.
    Emergency {
        off: String,
        on: String,
        #[arg(long)]
        remove: bool,
    },
    /// Designate a new goalkeeper.
    Gk { name: String },
    /// Adjust a player's (and the home team's) score. `delta` accepts a
    /// leading `+` or `-`.
    Score {
        player: String,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Print the current engine state as JSON.
    State,
    /// Tear down the game back to an uninitialized engine.
    Reset,
}

/// Exit codes per spec: 0 success, 1 invalid input, 2 state machine
/// violation, 3 insufficient roster.
pub fn run(args: Args) -> i32 {
    crate::logging::init(args.verbose);

    let mut engine = GameEngine::new(EngineCallbacks::new());

    if !matches!(args.command, Command::Init { .. }) {
        match load(&args.state_file) {
            Ok(loaded) => engine = loaded,
            Err(err) => {
                eprintln!("no game state found at {}: {err}", args.state_file.display());
                return 1;
            }
        }
    }

    let result = dispatch(&mut engine, args.command);

    match result {
        Ok(()) => {
            if let Err(err) = save(&args.state_file, &engine) {
                eprintln!("failed to save state: {err}");
                return 1;
            }
            if let Ok(json) = serde_json::to_string_pretty(&engine.snapshot()) {
                println!("{json}");
            }
            0
        }
        Err(err) => {
            eprintln!("error: {err}");
            exit_code_for(&err)
        }
    }
}

/// Map an [`EngineError`] to the exit code spec §6 assigns its kind.
fn exit_code_for(err: &EngineError) -> i32 {
    match err {
        EngineError::InvalidConfig(_) => 1,
        EngineError::InsufficientRoster { .. } => 3,
        EngineError::InvalidState(_)
        | EngineError::InvalidRotation(_)
        | EngineError::GoalkeeperConstraint(_)
        | EngineError::StaleCatchup { .. }
        | EngineError::InternalInvariantViolation(_) => 2,
    }
}

fn dispatch(engine: &mut GameEngine, command: Command) -> Result<(), EngineError> {
    match command {
        Command::Init { setup_file } => {
            let data = fs::read_to_string(&setup_file)
                .map_err(|e| EngineError::invalid_config(format!("reading {}: {e}", setup_file.display())))?;
            let setup: SetupInput = serde_json::from_str(&data)
                .map_err(|e| EngineError::invalid_config(format!("parsing setup file: {e}")))?;
            engine.initialize(setup)
        }
        Command::Start => engine.start(),
        Command::Stop => engine.stop(),
        Command::Tick { seconds } => engine.tick(seconds),
        Command::Confirm => engine.confirm_rotation(),
        Command::Emergency { off, on, remove } => engine.emergency_swap(&off, &on, remove),
        Command::Gk { name } => engine.set_goalkeeper(&name),
        Command::Score { player, delta } => {
            engine.score(&player, delta);
            Ok(())
        }
        Command::State => Ok(()),
        Command::Reset => {
            engine.reset();
            Ok(())
        }
    }
}

fn load(path: &PathBuf) -> std::io::Result<GameEngine> {
    let data = fs::read_to_string(path)?;
    let record: GameRecord =
        GameRecord::from_json(&data).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(GameEngine::from_persisted(record.state, EngineCallbacks::new()))
}

fn save(path: &PathBuf, engine: &GameEngine) -> std::io::Result<()> {
    let record = GameRecord::new(engine);
    let json = record
        .to_json()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}
