//! Events emitted by the simulation for audio, effects and UI feedback.
//!
//! Events are collected during a tick and handed over in that tick's
//! snapshot. The simulation never renders or plays anything itself.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    Sound { cue: SoundCue },
    Explosion { position: Position, large: bool },
    ScreenShake { level: EffectLevel },
    Flash { level: EffectLevel },
    /// Short floating text (buff labels, weapon names, combo callouts).
    Message { text: String },
    EnemyDestroyed {
        serial: u32,
        kind: EnemyKind,
        position: Position,
        score: u64,
    },
    ComboUpdated { count: u32, multiplier: f64 },
    PowerUpCollected { kind: PowerUpKind },
    PlayerHit { outcome: HitOutcome },
    /// A tractor beam latched onto the player ship.
    CaptureStarted { boss: u32 },
    PlayerCaptured { boss: Option<u32> },
    /// The capturing beam was shot down before the capture completed.
    CaptureCancelled,
    PlayerRescued { boss: u32 },
    UltimateFired,
    WaveStarted { wave: u32, bonus: bool },
    WaveCleared { wave: u32 },
    /// A bonus stage ran out of time with enemies left.
    BonusStageExpired { wave: u32, remaining: u32 },
    NewHighScore { score: u64 },
    GameOver { score: u64, rank: Option<usize> },
}
