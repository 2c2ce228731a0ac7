//! Host-facing entry points.
//!
//! A front end (window, terminal, test harness) drives the simulation
//! through these functions. They bridge requests to the game loop thread
//! via channels and read back the latest published snapshot.

use skyswarm_core::commands::{PlayerCommand, TickInput};
use skyswarm_core::persistence::ScoreStore;
use skyswarm_core::state::GameStateSnapshot;
use skyswarm_sim::engine::SimConfig;

use crate::game_loop;
use crate::state::{AppState, GameLoopCommand};

#[derive(thiserror::Error, Debug)]
pub enum HostError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop channel closed")]
    ChannelClosed,
    #[error("shared state lock poisoned")]
    LockPoisoned,
    #[error("failed to spawn game loop: {0}")]
    Spawn(#[from] std::io::Error),
}

impl<T> From<std::sync::PoisonError<T>> for HostError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        HostError::LockPoisoned
    }
}

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation(
    state: &AppState,
    config: SimConfig,
    store: Box<dyn ScoreStore>,
) -> Result<(), HostError> {
    let mut running = state.running.lock()?;

    if *running {
        return Err(HostError::AlreadyRunning);
    }

    let cmd_tx = game_loop::spawn_game_loop(config, store, state.latest_snapshot.clone())?;

    let mut tx_lock = state.command_tx.lock()?;
    *tx_lock = Some(cmd_tx);
    *running = true;

    log::info!("simulation started (seed {})", config.seed);
    Ok(())
}

fn send(state: &AppState, message: GameLoopCommand) -> Result<(), HostError> {
    let tx_lock = state.command_tx.lock()?;

    match tx_lock.as_ref() {
        Some(tx) => tx.send(message).map_err(|_| HostError::ChannelClosed),
        None => Err(HostError::NotStarted),
    }
}

/// Send a session command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), HostError> {
    send(state, GameLoopCommand::PlayerCommand(command))
}

/// Send the keyboard state for the coming ticks.
pub fn send_input(state: &AppState, input: TickInput) -> Result<(), HostError> {
    send(state, GameLoopCommand::Input(input))
}

/// Get the latest snapshot synchronously (for polling / initial state).
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>, HostError> {
    let lock = state.latest_snapshot.lock()?;
    Ok(lock.clone())
}

/// Stop the game loop. A no-op when it is not running.
pub fn shutdown(state: &AppState) -> Result<(), HostError> {
    let mut running = state.running.lock()?;
    if !*running {
        return Ok(());
    }

    let mut tx_lock = state.command_tx.lock()?;
    if let Some(tx) = tx_lock.take() {
        // The loop may already be gone; a closed channel means it stopped.
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    *running = false;

    log::info!("simulation stopped");
    Ok(())
}
