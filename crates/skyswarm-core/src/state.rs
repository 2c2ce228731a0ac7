//! Game state snapshot: the complete visible state handed to the host each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::persistence::RankEntry;
use crate::types::{Position, SimTime, Velocity};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub player: Option<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub powerups: Vec<PowerUpView>,
    pub beams: Vec<BeamView>,
    pub bomb: Option<BombView>,
    pub hud: HudView,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Position,
    pub invulnerable: bool,
    pub double_fighter: bool,
    /// Held in a tractor beam; input is ignored.
    pub being_captured: bool,
    pub shield_active: bool,
}

/// Behavior state as shown to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyStateView {
    Entering,
    Formation,
    BossPattern { pattern: BossPatternKind },
    KamikazeChase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub serial: u32,
    pub kind: EnemyKind,
    pub position: Position,
    pub width: f64,
    pub height: f64,
    pub hp: i32,
    pub max_hp: i32,
    pub state: EnemyStateView,
    pub is_split_child: bool,
    pub holds_captive: bool,
    pub flashed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub serial: u32,
    pub faction: Faction,
    pub weapon: Option<WeaponKind>,
    pub position: Position,
    pub velocity: Velocity,
    pub color: (u8, u8, u8),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub serial: u32,
    pub kind: PowerUpKind,
    pub position: Position,
    /// False during the off half of the expiry blink.
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamView {
    pub serial: u32,
    pub owner: u32,
    pub position: Position,
    pub capturing: bool,
}

/// Field-clearing ultimate in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombView {
    pub center: Position,
    pub radius: f64,
    /// 0.0 at detonation, 1.0 when finished.
    pub progress: f64,
}

/// Active buff levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuffView {
    pub speed_level: u32,
    pub power_level: u32,
    pub multi_shot_level: u32,
    pub shield_count: u32,
    pub rapid_level: u32,
    pub speed_multiplier: f64,
    pub shot_count: u32,
}

/// Numbers for the heads-up display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HudView {
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    pub wave: u32,
    pub bonus_stage: bool,
    /// Time left in a bonus stage.
    pub bonus_time_remaining_ms: Option<f64>,
    pub difficulty: DifficultyLevel,
    pub weapon: WeaponKind,
    pub weapon_name: String,
    pub combo: u32,
    pub combo_multiplier: f64,
    pub max_combo: u32,
    pub ultimate_charge: u32,
    pub ultimate_ready: bool,
    pub buffs: BuffView,
    /// Rank the final score earned, awaiting a name.
    pub pending_rank: Option<usize>,
    pub ranking: Vec<RankEntry>,
}
