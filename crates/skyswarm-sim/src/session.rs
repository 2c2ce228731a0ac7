//! Mutable per-session state that lives outside the ECS world.
//!
//! Systems receive `&mut Session` alongside the world, the same way the
//! engine's bookkeeping travels with every tick.

use skyswarm_core::difficulty::DifficultyConfig;
use skyswarm_core::events::GameEvent;

use crate::buffs::PlayerBuffs;
use crate::pilot::PilotStatus;
use crate::scoring::{ComboTracker, NuclearBomb, ScoreState, UltimateMeter};
use crate::systems::wave_spawner::WaveState;

#[derive(Debug, Clone)]
pub struct Session {
    pub difficulty: DifficultyConfig,
    pub pilot: PilotStatus,
    pub buffs: PlayerBuffs,
    pub combo: ComboTracker,
    pub ultimate: UltimateMeter,
    pub bomb: Option<NuclearBomb>,
    pub score: ScoreState,
    pub wave: WaveState,
    /// Events raised this tick, drained into the snapshot.
    pub events: Vec<GameEvent>,
    pub next_serial: u32,
    /// Session clock for the current tick (ms).
    pub now_ms: f64,
    /// The stored high score was beaten and has not been announced yet.
    pub high_score_announced: bool,
}

impl Session {
    pub fn new(difficulty: DifficultyConfig, high_score: u64) -> Self {
        Self {
            pilot: PilotStatus::new(difficulty.lives),
            difficulty,
            buffs: PlayerBuffs::new(),
            combo: ComboTracker::default(),
            ultimate: UltimateMeter::default(),
            bomb: None,
            score: ScoreState {
                high_score,
                ..Default::default()
            },
            wave: WaveState::default(),
            events: Vec::new(),
            next_serial: 0,
            now_ms: 0.0,
            high_score_announced: false,
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Credit points and announce the first time the high score is beaten.
    /// Returns true on that first time.
    pub fn award(&mut self, points: u64) -> bool {
        let beat = self.score.add(points);
        if beat && !self.high_score_announced {
            self.high_score_announced = true;
            self.emit(GameEvent::NewHighScore {
                score: self.score.score,
            });
            return true;
        }
        false
    }
}
