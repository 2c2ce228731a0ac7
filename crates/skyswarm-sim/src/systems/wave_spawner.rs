//! Wave and formation generator. Builds each wave's enemies from the wave number.

use hecs::{Entity, World};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyswarm_core::constants::*;
use skyswarm_core::difficulty::DifficultyConfig;
use skyswarm_core::enums::{EnemyKind, PathShape};
use skyswarm_core::types::Position;

use crate::world_setup::{self, Arrival, EnemySpawn};

/// Progress through the session's waves.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaveState {
    /// Current wave number (1-based; 0 before the first wave).
    pub number: u32,
    pub bonus: bool,
    pub started_ms: f64,
    /// When the wave was cleared; the next wave follows after a delay.
    pub cleared_at_ms: Option<f64>,
}

impl WaveState {
    /// Time left before a bonus stage force-clears its survivors.
    pub fn bonus_time_remaining(&self, now_ms: f64) -> Option<f64> {
        self.bonus
            .then(|| (BONUS_STAGE_TIME_LIMIT_MS - (now_ms - self.started_ms)).max(0.0))
    }
}

pub fn is_bonus_wave(wave: u32) -> bool {
    wave > 0 && wave % BONUS_STAGE_INTERVAL == 0
}

/// Formation (rows, columns) for a normal wave.
pub fn formation_size(wave: u32, difficulty: &DifficultyConfig) -> (u32, u32) {
    let rows = (difficulty.enemy_rows + wave / 3).min(MAX_FORMATION_ROWS);
    let columns = (difficulty.enemies_per_row + wave / 5).min(MAX_FORMATION_COLUMNS);
    (rows, columns)
}

/// Enemy kind weights for non-boss slots. New kinds unlock as waves
/// progress; from wave 12 the mix rebalances toward specials.
pub fn kind_weights(wave: u32) -> Vec<(EnemyKind, u32)> {
    if wave >= 12 {
        return vec![
            (EnemyKind::Normal, 20),
            (EnemyKind::Fast, 20),
            (EnemyKind::Tank, 15),
            (EnemyKind::Kamikaze, 15),
            (EnemyKind::Splitter, 15),
        ];
    }

    let normal = match wave {
        0..=2 => 50,
        3..=4 => 40,
        5..=6 => 35,
        7..=8 => 30,
        _ => 25,
    };
    let mut weights = vec![(EnemyKind::Normal, normal)];
    if wave >= 3 {
        weights.push((EnemyKind::Fast, 15));
    }
    if wave >= 5 {
        weights.push((EnemyKind::Tank, 10));
    }
    if wave >= 7 {
        weights.push((EnemyKind::Kamikaze, 12));
    }
    if wave >= 9 {
        weights.push((EnemyKind::Splitter, 10));
    }
    weights
}

fn pick_kind(rng: &mut ChaCha8Rng, weights: &[(EnemyKind, u32)]) -> EnemyKind {
    match WeightedIndex::new(weights.iter().map(|(_, w)| *w)) {
        Ok(dist) => weights[dist.sample(rng)].0,
        Err(_) => EnemyKind::Normal,
    }
}

fn pick_path(rng: &mut ChaCha8Rng, kind: EnemyKind) -> PathShape {
    match kind {
        EnemyKind::Fast => PathShape::FastDive,
        EnemyKind::Kamikaze => PathShape::Straight,
        _ => PathShape::ALL.choose(rng).copied().unwrap_or_default(),
    }
}

/// Spawn wave `wave` into the world. Returns the spawned enemies.
pub fn create_wave(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    next_serial: &mut u32,
    difficulty: &DifficultyConfig,
    wave: u32,
) -> Vec<Entity> {
    if is_bonus_wave(wave) {
        return create_bonus_stage(world, rng, next_serial, difficulty);
    }

    let (rows, columns) = formation_size(wave, difficulty);
    let spacing_x = ((FIELD_WIDTH - 2.0 * FORMATION_PADDING) / columns as f64).floor();
    let weights = kind_weights(wave);

    let mut spawned = Vec::with_capacity((rows * columns) as usize);
    for row in 0..rows {
        for col in 0..columns {
            let anchor = Position::new(
                FORMATION_PADDING + col as f64 * spacing_x,
                FORMATION_TOP + row as f64 * FORMATION_ROW_SPACING,
            );
            let kind = if row == 0 {
                EnemyKind::Boss
            } else {
                pick_kind(rng, &weights)
            };
            let start_x = rng.gen_range(0.0..=FIELD_WIDTH);
            let shape = pick_path(rng, kind);

            spawned.push(world_setup::spawn_enemy(
                world,
                rng,
                next_serial,
                difficulty,
                EnemySpawn {
                    kind,
                    is_split_child: false,
                    anchor,
                    arrival: Arrival::Path { shape, start_x },
                    fire_chance_override: None,
                },
            ));
        }
    }
    spawned
}

/// Bonus stage: a grid of non-firing normal enemies weaving in on zigzags.
pub fn create_bonus_stage(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    next_serial: &mut u32,
    difficulty: &DifficultyConfig,
) -> Vec<Entity> {
    (0..BONUS_STAGE_ENEMIES)
        .map(|i| {
            let col = (i % BONUS_STAGE_COLUMNS) as f64;
            let row = (i / BONUS_STAGE_COLUMNS) as f64;
            let x = col * 150.0 + 100.0;
            let entity = world_setup::spawn_enemy(
                world,
                rng,
                next_serial,
                difficulty,
                EnemySpawn {
                    kind: EnemyKind::Normal,
                    is_split_child: false,
                    anchor: Position::new(x, 120.0 + row * 60.0),
                    arrival: Arrival::Path {
                        shape: PathShape::Zigzag,
                        start_x: x,
                    },
                    fire_chance_override: Some(0.0),
                },
            );
            // Rows queue up above one another before weaving in.
            if let Ok(mut position) = world.get::<&mut Position>(entity) {
                position.y = -100.0 - row * 80.0;
            }
            entity
        })
        .collect()
}
