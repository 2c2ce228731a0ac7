//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems and in the enemy AI crate, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Creation-order id. Unique within a session and never reused; pairwise
/// resolution walks entities in ascending serial order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Serial(pub u32);

/// Marker for the player's ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerShip;

/// Hit points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Whether `amount` would bring this to zero or below.
    pub fn is_lethal(&self, amount: i32) -> bool {
        self.current <= amount
    }

    /// Returns true when this hit killed.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.current -= amount;
        self.current <= 0
    }
}

/// Per-enemy stats fixed at spawn, plus a few transient flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Movement speed (units per tick).
    pub speed: f64,
    /// Per-tick firing probability.
    pub fire_chance: f64,
    pub score_value: u64,
    /// Spawned by a splitter; can never split again.
    pub is_split_child: bool,
    /// Already produced its children.
    pub has_split: bool,
    /// Boss currently holding the captured player ship.
    pub holds_captive: bool,
    /// Took non-lethal damage this tick (presentation brightens it).
    pub flashed: bool,
}

/// The slot an enemy occupies once it reaches the formation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormationAnchor {
    pub position: Position,
}

/// Waypoints flown while entering; the last one is the formation anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPath {
    pub shape: PathShape,
    pub waypoints: Vec<Position>,
    /// Index of the waypoint currently being approached.
    pub index: usize,
}

/// Boss maneuver in progress, with its pattern-specific state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossManeuver {
    Dive { target: Position, returning: bool },
    Spiral { angle_deg: f64 },
    /// Direction is -1.0 (left) or 1.0 (right).
    Strafe { direction: f64 },
}

/// Enemy behavior state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum BehaviorState {
    #[default]
    Entering,
    FormationIdle,
    BossPattern {
        maneuver: BossManeuver,
        remaining_ms: f64,
    },
    KamikazeChase,
    /// Marked for removal at the end of the tick.
    Dead,
}

/// Mutable behavior bookkeeping for one enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Behavior {
    pub state: BehaviorState,
    /// Per-entity phase for the formation sway, drawn at spawn.
    pub sway_phase: f64,
    pub attack_cooldown_ms: f64,
    pub beam_cooldown_ms: f64,
}

/// A bullet in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub faction: Faction,
    /// Firing weapon; enemy bullets have none.
    pub weapon: Option<WeaponKind>,
    pub damage: i32,
    pub piercing: bool,
    pub explosive: bool,
    pub wave_pattern: bool,
    pub homing: bool,
    /// Speed the projectile keeps while steering.
    pub base_speed: f64,
    pub wave_phase: f64,
    /// Serials of enemies a piercing shot has already damaged.
    pub hits: Vec<u32>,
    /// Serial of the enemy a homing shot is steering toward.
    pub homing_target: Option<u32>,
    /// Set when the projectile is used up; removed at end of tick.
    pub spent: bool,
}

/// A collectible falling toward the bottom of the field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub spawned_at_ms: f64,
    pub visible: bool,
    /// Picked up or expired; removed at end of tick.
    pub removed: bool,
}

/// A boss's tractor beam.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TractorBeam {
    /// Serial of the boss that projected the beam.
    pub owner: u32,
    pub capturing: bool,
    pub capture_started_ms: f64,
    pub destroyed: bool,
}
