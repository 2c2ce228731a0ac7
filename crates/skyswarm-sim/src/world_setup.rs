//! Entity spawn factories for the simulation world.
//!
//! Every factory stamps the entity with the next creation-order `Serial`.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyswarm_core::components::*;
use skyswarm_core::constants::*;
use skyswarm_core::difficulty::DifficultyConfig;
use skyswarm_core::enums::*;
use skyswarm_core::types::{Hitbox, Position, Velocity};
use skyswarm_core::weapons::describe;
use skyswarm_enemy_ai::paths::build_entry_path;
use skyswarm_enemy_ai::profiles::stats_for;

fn take_serial(next_serial: &mut u32) -> Serial {
    let serial = Serial(*next_serial);
    *next_serial += 1;
    serial
}

/// Spawn the player's ship at the spawn point.
pub fn spawn_player(world: &mut World, next_serial: &mut u32) -> Entity {
    world.spawn((
        PlayerShip,
        take_serial(next_serial),
        Position::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
        Hitbox::new(PLAYER_WIDTH, PLAYER_HEIGHT),
    ))
}

/// How a new enemy enters the field.
pub enum Arrival {
    /// Fly an entry path from `start_x` above the field.
    Path { shape: PathShape, start_x: f64 },
    /// Appear at `position`, already holding formation.
    InFormation { position: Position },
}

/// Everything needed to spawn one enemy.
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub is_split_child: bool,
    pub anchor: Position,
    pub arrival: Arrival,
    /// Replaces the kind's fire chance (bonus stages spawn non-firing enemies).
    pub fire_chance_override: Option<f64>,
}

/// Spawn an enemy with stats resolved against the session difficulty.
pub fn spawn_enemy(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    next_serial: &mut u32,
    difficulty: &DifficultyConfig,
    spawn: EnemySpawn,
) -> Entity {
    let stats = stats_for(spawn.kind, spawn.is_split_child, difficulty);

    let (position, path, state) = match spawn.arrival {
        Arrival::Path { shape, start_x } => (
            Position::new(start_x, ENEMY_SPAWN_Y),
            EntryPath {
                shape,
                waypoints: build_entry_path(shape, start_x, spawn.anchor),
                index: 0,
            },
            BehaviorState::Entering,
        ),
        Arrival::InFormation { position } => (
            position,
            EntryPath {
                shape: PathShape::Straight,
                waypoints: Vec::new(),
                index: 0,
            },
            BehaviorState::FormationIdle,
        ),
    };

    let enemy = Enemy {
        kind: spawn.kind,
        speed: stats.speed,
        fire_chance: spawn.fire_chance_override.unwrap_or(stats.fire_chance),
        score_value: stats.score_value,
        is_split_child: spawn.is_split_child,
        has_split: false,
        holds_captive: false,
        flashed: false,
    };

    let behavior = Behavior {
        state,
        sway_phase: rng.gen_range(0.0..FORMATION_PHASE_RANGE),
        attack_cooldown_ms: 0.0,
        beam_cooldown_ms: 0.0,
    };

    world.spawn((
        take_serial(next_serial),
        enemy,
        Health::new(stats.max_hp),
        position,
        stats.hitbox,
        FormationAnchor {
            position: spawn.anchor,
        },
        path,
        behavior,
    ))
}

/// Spawn the two children of a splitter, already in formation either side
/// of the parent.
pub fn spawn_split_children(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    next_serial: &mut u32,
    difficulty: &DifficultyConfig,
    parent_position: Position,
    parent_anchor: Position,
) -> [Entity; 2] {
    [-SPLIT_OFFSET, SPLIT_OFFSET].map(|dx| {
        spawn_enemy(
            world,
            rng,
            next_serial,
            difficulty,
            EnemySpawn {
                kind: EnemyKind::Splitter,
                is_split_child: true,
                anchor: parent_anchor.offset(dx, 0.0),
                arrival: Arrival::InFormation {
                    position: parent_position.offset(dx, 0.0),
                },
                fire_chance_override: None,
            },
        )
    })
}

/// Spawn a player projectile for `weapon`. `origin` is the muzzle point
/// (the projectile's bottom-center); angle 0 flies straight up.
pub fn spawn_player_shot(
    world: &mut World,
    next_serial: &mut u32,
    weapon: WeaponKind,
    origin: Position,
    angle_deg: f64,
    damage: i32,
) -> Entity {
    let desc = describe(weapon);
    let (width, height) = desc.size;
    let speed = BULLET_SPEED * desc.speed_factor;

    world.spawn((
        take_serial(next_serial),
        Projectile {
            faction: Faction::Player,
            weapon: Some(weapon),
            damage,
            piercing: desc.piercing,
            explosive: desc.explosive,
            wave_pattern: desc.wave_pattern,
            homing: desc.homing,
            base_speed: speed,
            wave_phase: 0.0,
            hits: Vec::new(),
            homing_target: None,
            spent: false,
        },
        origin.offset(0.0, -height / 2.0),
        Velocity::upward(angle_deg, speed),
        Hitbox::new(width, height),
    ))
}

/// Spawn an enemy bullet. `origin` is the bullet's top-center; angle 0
/// flies straight down.
pub fn spawn_enemy_shot(
    world: &mut World,
    next_serial: &mut u32,
    origin: Position,
    angle_deg: f64,
    speed: f64,
) -> Entity {
    world.spawn((
        take_serial(next_serial),
        Projectile {
            faction: Faction::Enemy,
            weapon: None,
            damage: 1,
            piercing: false,
            explosive: false,
            wave_pattern: false,
            homing: false,
            base_speed: speed,
            wave_phase: 0.0,
            hits: Vec::new(),
            homing_target: None,
            spent: false,
        },
        origin.offset(0.0, ENEMY_BULLET_HEIGHT / 2.0),
        Velocity::downward(angle_deg, speed),
        Hitbox::new(ENEMY_BULLET_WIDTH, ENEMY_BULLET_HEIGHT),
    ))
}

/// Drop a power-up pickup at `position`.
pub fn spawn_powerup(
    world: &mut World,
    next_serial: &mut u32,
    kind: PowerUpKind,
    position: Position,
    now_ms: f64,
) -> Entity {
    world.spawn((
        take_serial(next_serial),
        PowerUp {
            kind,
            spawned_at_ms: now_ms,
            visible: true,
            removed: false,
        },
        position,
        Hitbox::square(POWERUP_SIZE),
    ))
}

/// Project a tractor beam down from the bottom edge of a boss.
pub fn spawn_tractor_beam(
    world: &mut World,
    next_serial: &mut u32,
    owner: u32,
    boss_position: Position,
    boss_hitbox: Hitbox,
) -> Entity {
    let top = boss_hitbox.bottom(&boss_position);
    world.spawn((
        take_serial(next_serial),
        TractorBeam {
            owner,
            capturing: false,
            capture_started_ms: 0.0,
            destroyed: false,
        },
        Position::new(boss_position.x, top + TRACTOR_BEAM_HEIGHT / 2.0),
        Hitbox::new(TRACTOR_BEAM_WIDTH, TRACTOR_BEAM_HEIGHT),
    ))
}
