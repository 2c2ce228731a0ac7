//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Normal,
    /// Quick, fragile, enters on a fast-dive path.
    Fast,
    /// Slow and armored.
    Tank,
    /// Breaks formation to ram the player.
    Kamikaze,
    /// Splits into two children on its first lethal hit.
    Splitter,
    /// Flagship: attack patterns, tractor beam, guaranteed drop.
    Boss,
}

impl EnemyKind {
    pub fn is_boss(self) -> bool {
        self == EnemyKind::Boss
    }
}

/// Player weapon kind. Cycled through in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Normal,
    Laser,
    Missile,
    Homing,
    Spread,
    Railgun,
    Plasma,
    Wave,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 8] = [
        WeaponKind::Normal,
        WeaponKind::Laser,
        WeaponKind::Missile,
        WeaponKind::Homing,
        WeaponKind::Spread,
        WeaponKind::Railgun,
        WeaponKind::Plasma,
        WeaponKind::Wave,
    ];

    /// Step `direction` places through the roster, wrapping at both ends.
    pub fn cycled(self, direction: i32) -> WeaponKind {
        let len = Self::ALL.len() as i32;
        let index = Self::ALL.iter().position(|w| *w == self).unwrap_or(0) as i32;
        Self::ALL[(index + direction).rem_euclid(len) as usize]
    }
}

/// Which side fired a projectile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    Player,
    Enemy,
}

/// Collectible power-up kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    ShotPower,
    MultiShot,
    Shield,
    ExtraLife,
    RapidFire,
}

impl PowerUpKind {
    /// Drop table for ordinary kills, with relative weights.
    pub const DROP_WEIGHTS: [(PowerUpKind, u32); 6] = [
        (PowerUpKind::Speed, 20),
        (PowerUpKind::ShotPower, 20),
        (PowerUpKind::MultiShot, 20),
        (PowerUpKind::Shield, 15),
        (PowerUpKind::ExtraLife, 5),
        (PowerUpKind::RapidFire, 20),
    ];

    /// Pool a boss kill always draws from.
    pub const BOSS_POOL: [PowerUpKind; 3] = [
        PowerUpKind::MultiShot,
        PowerUpKind::Shield,
        PowerUpKind::RapidFire,
    ];
}

/// Shape of an enemy's entry flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathShape {
    Circle,
    Zigzag,
    #[default]
    Straight,
    FastDive,
}

impl PathShape {
    pub const ALL: [PathShape; 4] = [
        PathShape::Circle,
        PathShape::Zigzag,
        PathShape::Straight,
        PathShape::FastDive,
    ];
}

/// Boss attack pattern, as reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPatternKind {
    Dive,
    Spiral,
    Strafe,
}

/// Session phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Title,
    Playing,
    Paused,
    /// Wave cleared; the next wave starts after a short delay.
    StageClear,
    GameOver,
}

/// Difficulty preset selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Intensity of a screen shake or flash effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectLevel {
    Small,
    Medium,
    Large,
}

/// Named sound cue for the host's audio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Shoot,
    EnemyShoot,
    Explosion,
    PowerUp,
    Capture,
    Rescue,
    StageClear,
    GameOver,
    BossWarning,
}

/// What absorbed (or failed to absorb) a hit on the player ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    /// The ship was inside its invulnerability window.
    Ignored,
    ShieldAbsorbed,
    /// The double-fighter wingman was lost instead.
    WingmanLost,
    LifeLost,
    /// The last life was lost.
    Destroyed,
}
