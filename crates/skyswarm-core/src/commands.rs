//! Input delivered to the simulation by the host.
//!
//! Session-level commands are queued and processed at the next tick
//! boundary. Per-tick keyboard state arrives as an immutable `TickInput`.

use serde::{Deserialize, Serialize};

use crate::difficulty::DifficultyConfig;

/// Session lifecycle commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start a fresh session tuned by `difficulty`, fixed for the whole session.
    /// Presets convert from `DifficultyLevel`.
    NewGame { difficulty: DifficultyConfig },
    /// Pause the session.
    Pause,
    /// Resume a paused session.
    Resume,
    /// Enter a name for a score that qualified for the ranking.
    SubmitRankingName { name: String },
    /// Leave the game-over screen.
    ReturnToTitle,
}

/// Keys held down during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

/// Discrete key presses that happened since the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyPress {
    /// Toggle pause.
    Pause,
    NextWeapon,
    PreviousWeapon,
    Ultimate,
}

/// Everything the player did during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub held: HeldKeys,
    pub presses: Vec<KeyPress>,
}

impl TickInput {
    /// No keys held, nothing pressed.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Only the given keys held.
    pub fn holding(held: HeldKeys) -> Self {
        Self {
            held,
            presses: Vec::new(),
        }
    }

    /// Only the given key pressed.
    pub fn pressing(press: KeyPress) -> Self {
        Self {
            held: HeldKeys::default(),
            presses: vec![press],
        }
    }
}
