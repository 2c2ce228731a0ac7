//! Difficulty presets.
//!
//! A `DifficultyConfig` is selected once per session and never mutated.

use serde::{Deserialize, Serialize};

use crate::enums::DifficultyLevel;

/// Tuning values that vary with the chosen difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub level: DifficultyLevel,
    pub lives: u32,
    /// Player ship base speed (units per tick).
    pub player_speed: f64,
    /// Base enemy speed; per-kind profiles scale this.
    pub enemy_speed: f64,
    /// Base per-tick probability that an enemy fires.
    pub enemy_fire_chance: f64,
    pub enemy_bullet_speed: f64,
    pub boss_hp: i32,
    /// Multiplier applied to every kill score.
    pub score_multiplier: f64,
    /// Probability that an ordinary kill drops a power-up.
    pub powerup_drop_chance: f64,
    pub enemy_rows: u32,
    pub enemies_per_row: u32,
}

impl DifficultyConfig {
    pub fn preset(level: DifficultyLevel) -> Self {
        match level {
            DifficultyLevel::Easy => Self {
                level,
                lives: 5,
                player_speed: 6.0,
                enemy_speed: 1.5,
                enemy_fire_chance: 0.005,
                enemy_bullet_speed: 3.0,
                boss_hp: 3,
                score_multiplier: 0.8,
                powerup_drop_chance: 0.20,
                enemy_rows: 3,
                enemies_per_row: 8,
            },
            DifficultyLevel::Normal => Self {
                level,
                lives: 3,
                player_speed: 5.0,
                enemy_speed: 2.0,
                enemy_fire_chance: 0.01,
                enemy_bullet_speed: 5.0,
                boss_hp: 5,
                score_multiplier: 1.0,
                powerup_drop_chance: 0.15,
                enemy_rows: 4,
                enemies_per_row: 10,
            },
            DifficultyLevel::Hard => Self {
                level,
                lives: 2,
                player_speed: 5.0,
                enemy_speed: 3.0,
                enemy_fire_chance: 0.02,
                enemy_bullet_speed: 7.0,
                boss_hp: 8,
                score_multiplier: 1.5,
                powerup_drop_chance: 0.10,
                enemy_rows: 5,
                enemies_per_row: 12,
            },
        }
    }
}

impl From<DifficultyLevel> for DifficultyConfig {
    fn from(level: DifficultyLevel) -> Self {
        Self::preset(level)
    }
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::preset(DifficultyLevel::Normal)
    }
}
