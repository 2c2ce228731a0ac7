//! Weapon catalog.
//!
//! A read-only table from `WeaponKind` to its ballistic description.
//! The projectile subsystem and the player's firing logic look weapons up
//! here rather than branching on the kind.

use serde::Serialize;

use crate::enums::WeaponKind;

/// RGB color tag for the presentation layer.
pub type ColorTag = (u8, u8, u8);

pub const CYAN: ColorTag = (0, 255, 255);
pub const RED: ColorTag = (255, 50, 50);
pub const ORANGE: ColorTag = (255, 165, 0);
pub const GREEN: ColorTag = (50, 255, 50);
pub const MAGENTA: ColorTag = (255, 0, 255);
pub const PURPLE: ColorTag = (180, 50, 255);
pub const YELLOW: ColorTag = (255, 255, 0);

/// Static description of one weapon kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeaponDescriptor {
    pub kind: WeaponKind,
    pub name: &'static str,
    /// Damage per hit before the shot-power buff is applied.
    pub damage: i32,
    /// Minimum time between shots (ms) before rapid-fire reduction.
    pub cooldown_ms: f64,
    pub color: ColorTag,
    /// Projectile speed as a multiple of the base bullet speed.
    pub speed_factor: f64,
    /// Hitbox (width, height).
    pub size: (f64, f64),
    /// Passes through enemies, damaging each at most once.
    pub piercing: bool,
    pub explosive: bool,
    /// Oscillates sideways while travelling.
    pub wave_pattern: bool,
    /// Steers toward the nearest live enemy.
    pub homing: bool,
    /// Fires a fixed 5-way fan when no multi-shot buff is active.
    pub spread: bool,
}

const BASE: WeaponDescriptor = WeaponDescriptor {
    kind: WeaponKind::Normal,
    name: "Normal Shot",
    damage: 1,
    cooldown_ms: 250.0,
    color: CYAN,
    speed_factor: 1.0,
    size: (6.0, 15.0),
    piercing: false,
    explosive: false,
    wave_pattern: false,
    homing: false,
    spread: false,
};

/// Look up the descriptor for a weapon kind.
pub fn describe(kind: WeaponKind) -> WeaponDescriptor {
    match kind {
        WeaponKind::Normal => BASE,
        WeaponKind::Laser => WeaponDescriptor {
            kind,
            name: "Laser Beam",
            damage: 2,
            cooldown_ms: 400.0,
            color: RED,
            speed_factor: 1.5,
            size: (8.0, 30.0),
            piercing: true,
            ..BASE
        },
        WeaponKind::Missile => WeaponDescriptor {
            kind,
            name: "Missile",
            damage: 3,
            cooldown_ms: 600.0,
            color: ORANGE,
            speed_factor: 0.8,
            size: (10.0, 20.0),
            ..BASE
        },
        WeaponKind::Homing => WeaponDescriptor {
            kind,
            name: "Homing Shot",
            damage: 1,
            cooldown_ms: 350.0,
            color: GREEN,
            speed_factor: 0.9,
            size: (12.0, 12.0),
            homing: true,
            ..BASE
        },
        WeaponKind::Spread => WeaponDescriptor {
            kind,
            name: "Spread Shot",
            damage: 1,
            cooldown_ms: 300.0,
            color: MAGENTA,
            size: (8.0, 12.0),
            spread: true,
            ..BASE
        },
        WeaponKind::Railgun => WeaponDescriptor {
            kind,
            name: "Railgun",
            damage: 5,
            cooldown_ms: 800.0,
            color: CYAN,
            speed_factor: 2.5,
            size: (10.0, 40.0),
            piercing: true,
            ..BASE
        },
        WeaponKind::Plasma => WeaponDescriptor {
            kind,
            name: "Plasma Cannon",
            damage: 4,
            cooldown_ms: 500.0,
            color: PURPLE,
            speed_factor: 1.2,
            size: (16.0, 16.0),
            explosive: true,
            ..BASE
        },
        WeaponKind::Wave => WeaponDescriptor {
            kind,
            name: "Wave Beam",
            damage: 2,
            cooldown_ms: 200.0,
            color: YELLOW,
            speed_factor: 1.3,
            size: (12.0, 20.0),
            wave_pattern: true,
            ..BASE
        },
    }
}
