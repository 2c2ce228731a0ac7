//! State shared between host calls and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use skyswarm_core::commands::{PlayerCommand, TickInput};
use skyswarm_core::state::GameStateSnapshot;

/// Most recent snapshot, written by the loop thread and polled by the host.
pub type SharedSnapshot = Arc<Mutex<Option<GameStateSnapshot>>>;

/// Messages from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Session command, queued on the engine.
    PlayerCommand(PlayerCommand),
    /// Keyboard state. Held keys stay in effect until the next `Input`;
    /// presses apply to one tick only.
    Input(TickInput),
    Shutdown,
}

/// Everything a host needs to talk to a running session.
///
/// `Sender` is not `Sync`, so it sits behind a `Mutex`; both the sender
/// and the snapshot are empty until `host::start_simulation` runs.
#[derive(Default)]
pub struct AppState {
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    pub latest_snapshot: SharedSnapshot,
    pub running: Mutex<bool>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// False when the flag's lock is poisoned.
    pub fn is_running(&self) -> bool {
        self.running.lock().map(|r| *r).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_is_idle() {
        let state = AppState::new();
        assert!(!state.is_running());
        assert!(state.command_tx.lock().unwrap().is_none());
        assert!(state.latest_snapshot.lock().unwrap().is_none());
    }

    #[test]
    fn test_snapshot_slot_is_shared() {
        let state = AppState::new();
        let writer = state.latest_snapshot.clone();
        *writer.lock().unwrap() = Some(GameStateSnapshot::default());
        assert!(state.latest_snapshot.lock().unwrap().is_some());
    }
}
