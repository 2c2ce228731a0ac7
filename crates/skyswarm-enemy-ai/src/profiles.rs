//! Kind-specific stat profiles.
//!
//! Consolidates per-kind parameters; difficulty supplies the base values
//! they scale.

use skyswarm_core::constants::*;
use skyswarm_core::difficulty::DifficultyConfig;
use skyswarm_core::enums::EnemyKind;
use skyswarm_core::types::Hitbox;

/// Relative profile for an enemy kind.
pub struct EnemyBehaviorProfile {
    /// Multiplier on the difficulty's base enemy speed.
    pub speed_factor: f64,
    /// Multiplier on the difficulty's base fire chance.
    pub fire_factor: f64,
    /// Hit points; `None` defers to the difficulty's boss HP.
    pub max_hp: Option<i32>,
    pub score_value: u64,
    /// Extra multiplier applied while flying the entry path.
    pub entry_speed_factor: f64,
    pub hitbox: Hitbox,
}

/// Concrete stats for one spawned enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub speed: f64,
    pub fire_chance: f64,
    pub max_hp: i32,
    pub score_value: u64,
    pub hitbox: Hitbox,
}

/// Get the behavioral profile for a given kind.
pub fn get_profile(kind: EnemyKind, is_split_child: bool) -> EnemyBehaviorProfile {
    let base = EnemyBehaviorProfile {
        speed_factor: 1.0,
        fire_factor: 1.0,
        max_hp: Some(1),
        score_value: 100,
        entry_speed_factor: 1.0,
        hitbox: Hitbox::square(ENEMY_SIZE),
    };

    match kind {
        EnemyKind::Normal => base,
        EnemyKind::Fast => EnemyBehaviorProfile {
            speed_factor: 2.5,
            fire_factor: 0.5,
            score_value: 150,
            entry_speed_factor: 1.5,
            ..base
        },
        EnemyKind::Tank => EnemyBehaviorProfile {
            speed_factor: 0.6,
            fire_factor: 1.5,
            max_hp: Some(4),
            score_value: 200,
            hitbox: Hitbox::new(TANK_WIDTH, TANK_HEIGHT),
            ..base
        },
        EnemyKind::Kamikaze => EnemyBehaviorProfile {
            speed_factor: 1.2,
            fire_factor: 0.0,
            score_value: 130,
            hitbox: Hitbox::square(KAMIKAZE_SIZE),
            ..base
        },
        EnemyKind::Splitter if is_split_child => EnemyBehaviorProfile {
            speed_factor: 1.5,
            hitbox: Hitbox::square(SPLIT_CHILD_SIZE),
            ..base
        },
        EnemyKind::Splitter => EnemyBehaviorProfile {
            speed_factor: 0.8,
            max_hp: Some(2),
            score_value: 150,
            hitbox: Hitbox::square(SPLITTER_SIZE),
            ..base
        },
        EnemyKind::Boss => EnemyBehaviorProfile {
            fire_factor: 2.0,
            max_hp: None,
            score_value: 500,
            hitbox: Hitbox::new(BOSS_WIDTH, BOSS_HEIGHT),
            ..base
        },
    }
}

/// Resolve a kind's profile against the session difficulty.
pub fn stats_for(kind: EnemyKind, is_split_child: bool, difficulty: &DifficultyConfig) -> EnemyStats {
    let profile = get_profile(kind, is_split_child);
    EnemyStats {
        speed: difficulty.enemy_speed * profile.speed_factor,
        fire_chance: difficulty.enemy_fire_chance * profile.fire_factor,
        max_hp: profile.max_hp.unwrap_or(difficulty.boss_hp),
        score_value: profile.score_value,
        hitbox: profile.hitbox,
    }
}
