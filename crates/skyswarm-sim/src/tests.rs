//! Tests for the simulation engine, buffs, scoring, waves, and the
//! collision and resolution pipeline.

use hecs::{Entity, World};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skyswarm_core::commands::{HeldKeys, KeyPress, PlayerCommand, TickInput};
use skyswarm_core::components::*;
use skyswarm_core::constants::*;
use skyswarm_core::difficulty::DifficultyConfig;
use skyswarm_core::enums::*;
use skyswarm_core::events::GameEvent;
use skyswarm_core::types::{Position, Velocity};
use skyswarm_core::weapons::describe;

use crate::buffs::PlayerBuffs;
use crate::engine::{SimConfig, SimulationEngine};
use crate::pilot::{Capture, PilotStatus};
use crate::ranking::{sanitize_name, Ranking};
use crate::scoring::{combo_multiplier, kill_points, ComboTracker, UltimateMeter};
use crate::session::Session;
use crate::systems::collision::{self, can_split, CollisionReport};
use crate::systems::wave_spawner::{self, formation_size};
use crate::systems::{cleanup, movement, projectiles, ultimate};
use crate::world_setup::{self, Arrival, EnemySpawn};

/// A bare world with a session, for driving systems directly.
struct Arena {
    world: World,
    rng: ChaCha8Rng,
    session: Session,
}

impl Arena {
    fn new() -> Self {
        Self {
            world: World::new(),
            rng: ChaCha8Rng::seed_from_u64(7),
            session: Session::new(DifficultyConfig::default(), 0),
        }
    }

    fn enemy(&mut self, kind: EnemyKind, x: f64, y: f64) -> Entity {
        let position = Position::new(x, y);
        world_setup::spawn_enemy(
            &mut self.world,
            &mut self.rng,
            &mut self.session.next_serial,
            &self.session.difficulty,
            EnemySpawn {
                kind,
                is_split_child: false,
                anchor: position,
                arrival: Arrival::InFormation { position },
                fire_chance_override: None,
            },
        )
    }

    /// Player shot whose center sits at (x, y).
    fn shot(&mut self, weapon: WeaponKind, x: f64, y: f64) -> Entity {
        let desc = describe(weapon);
        world_setup::spawn_player_shot(
            &mut self.world,
            &mut self.session.next_serial,
            weapon,
            Position::new(x, y + desc.size.1 / 2.0),
            0.0,
            desc.damage,
        )
    }

    fn enemy_shot(&mut self, x: f64, y: f64) -> Entity {
        world_setup::spawn_enemy_shot(
            &mut self.world,
            &mut self.session.next_serial,
            Position::new(x, y - ENEMY_BULLET_HEIGHT / 2.0),
            0.0,
            5.0,
        )
    }

    fn player(&mut self) -> Entity {
        world_setup::spawn_player(&mut self.world, &mut self.session.next_serial)
    }

    fn collide(&mut self) -> CollisionReport {
        collision::run(&mut self.world, &mut self.rng, &mut self.session)
    }

    fn is_dead(&self, entity: Entity) -> bool {
        self.world
            .get::<&Behavior>(entity)
            .map(|b| b.state == BehaviorState::Dead)
            .unwrap()
    }

    fn is_spent(&self, entity: Entity) -> bool {
        self.world.get::<&Projectile>(entity).unwrap().spent
    }

    fn count_events(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.session.events.iter().filter(|e| pred(*e)).count()
    }
}

fn fire_held() -> TickInput {
    TickInput::holding(HeldKeys {
        fire: true,
        ..Default::default()
    })
}

fn started_engine(seed: u64) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::NewGame {
        difficulty: DifficultyLevel::Normal.into(),
    });
    engine
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = started_engine(12345);
    let mut engine_b = started_engine(12345);

    for _ in 0..600 {
        let snap_a = engine_a.tick(&fire_held());
        let snap_b = engine_b.tick(&fire_held());

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = started_engine(111);
    let mut engine_b = started_engine(222);

    let mut diverged = false;
    for _ in 0..60 {
        let json_a = serde_json::to_string(&engine_a.tick(&TickInput::idle())).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(&TickInput::idle())).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Engine lifecycle ----

#[test]
fn test_new_game_spawns_player_and_first_wave() {
    let mut engine = started_engine(1);
    let snap = engine.tick(&TickInput::idle());

    assert_eq!(snap.phase, GamePhase::Playing);
    assert!(snap.player.is_some());
    assert_eq!(snap.hud.wave, 1);
    assert_eq!(snap.hud.lives, 3);

    let (rows, columns) = formation_size(1, &DifficultyConfig::default());
    assert_eq!(snap.enemies.len(), (rows * columns) as usize);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::WaveStarted { wave: 1, bonus: false })));
}

#[test]
fn test_title_phase_does_not_advance() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    for _ in 0..10 {
        engine.tick(&TickInput::idle());
    }
    assert_eq!(engine.phase(), GamePhase::Title);
    assert_eq!(engine.time().tick, 0);
}

#[test]
fn test_pause_key_freezes_time() {
    let mut engine = started_engine(1);
    engine.tick(&TickInput::idle());
    let before = engine.time();

    engine.tick(&TickInput::pressing(KeyPress::Pause));
    assert_eq!(engine.phase(), GamePhase::Paused);
    for _ in 0..30 {
        engine.tick(&TickInput::idle());
    }
    assert_eq!(engine.time(), before);

    engine.tick(&TickInput::pressing(KeyPress::Pause));
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert_eq!(engine.time().tick, before.tick + 1);
}

#[test]
fn test_pause_and_resume_commands() {
    let mut engine = started_engine(1);
    engine.tick(&TickInput::idle());

    engine.queue_command(PlayerCommand::Pause);
    engine.tick(&TickInput::idle());
    assert_eq!(engine.phase(), GamePhase::Paused);

    engine.queue_command(PlayerCommand::Resume);
    engine.tick(&TickInput::idle());
    assert_eq!(engine.phase(), GamePhase::Playing);
}

#[test]
fn test_weapon_cycle_announces_name() {
    let mut engine = started_engine(1);
    engine.tick(&TickInput::idle());

    let snap = engine.tick(&TickInput::pressing(KeyPress::NextWeapon));
    assert_eq!(snap.hud.weapon, WeaponKind::Laser);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::Message { text } if text == "Laser Beam")));

    let snap = engine.tick(&TickInput::pressing(KeyPress::PreviousWeapon));
    assert_eq!(snap.hud.weapon, WeaponKind::Normal);
}

#[test]
fn test_holding_fire_spawns_player_shots() {
    let mut engine = started_engine(1);
    let snap = engine.tick(&fire_held());
    assert_eq!(
        snap.projectiles
            .iter()
            .filter(|p| p.faction == Faction::Player)
            .count(),
        1
    );
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::Sound {
            cue: SoundCue::Shoot
        }
    )));
}

#[test]
fn test_player_confined_to_lower_half() {
    let mut engine = started_engine(1);
    let up = TickInput::holding(HeldKeys {
        up: true,
        left: true,
        ..Default::default()
    });
    let mut snap = engine.tick(&up);
    for _ in 0..120 {
        snap = engine.tick(&up);
    }
    let player = snap.player.unwrap();
    assert_eq!(player.position.x, PLAYER_WIDTH / 2.0);
    assert_eq!(player.position.y, FIELD_HEIGHT / 2.0 + PLAYER_HEIGHT / 2.0);
}

#[test]
fn test_game_over_and_ranking_entry() {
    let mut engine = started_engine(1);
    engine.tick(&TickInput::idle());

    let session = engine.session_mut();
    session.pilot.lives = 1;
    session.score.score = 500;
    let mut serial = session.next_serial;
    world_setup::spawn_enemy_shot(
        engine.world_mut(),
        &mut serial,
        Position::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y - 5.0),
        0.0,
        5.0,
    );
    engine.session_mut().next_serial = serial;

    let report = engine.resolve_collisions();
    assert!(report.game_over);
    assert_eq!(engine.phase(), GamePhase::GameOver);
    assert_eq!(engine.pending_rank(), Some(1));

    let snap = engine.snapshot();
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::GameOver {
            score: 500,
            rank: Some(1)
        }
    )));

    engine.queue_command(PlayerCommand::SubmitRankingName {
        name: "ace!".to_string(),
    });
    engine.tick(&TickInput::idle());
    assert_eq!(engine.ranking().entries[0].name, "ACE");
    assert_eq!(engine.ranking().entries[0].score, 500);
    assert_eq!(engine.pending_rank(), None);

    engine.queue_command(PlayerCommand::ReturnToTitle);
    engine.tick(&TickInput::idle());
    assert_eq!(engine.phase(), GamePhase::Title);
}

#[test]
fn test_custom_difficulty_reaches_spawns_and_scoring() {
    let custom = DifficultyConfig {
        lives: 4,
        boss_hp: 12,
        score_multiplier: 2.0,
        ..DifficultyConfig::default()
    };
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::NewGame {
        difficulty: custom.clone(),
    });
    let snap = engine.tick(&TickInput::idle());
    assert_eq!(engine.session().difficulty, custom);
    assert_eq!(snap.hud.lives, 4);
    let bosses: Vec<_> = snap
        .enemies
        .iter()
        .filter(|e| e.kind == EnemyKind::Boss)
        .collect();
    assert!(!bosses.is_empty());
    assert!(bosses.iter().all(|b| b.max_hp == 12 && b.hp == 12));

    let wave: Vec<Entity> = engine
        .world()
        .query::<&Enemy>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    for entity in wave {
        engine.world_mut().despawn(entity).unwrap();
    }

    let at = Position::new(200.0, 300.0);
    let difficulty = engine.session().difficulty.clone();
    let mut serial = engine.session().next_serial;
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    world_setup::spawn_enemy(
        engine.world_mut(),
        &mut rng,
        &mut serial,
        &difficulty,
        EnemySpawn {
            kind: EnemyKind::Normal,
            is_split_child: false,
            anchor: at,
            arrival: Arrival::InFormation { position: at },
            fire_chance_override: None,
        },
    );
    let desc = describe(WeaponKind::Normal);
    world_setup::spawn_player_shot(
        engine.world_mut(),
        &mut serial,
        WeaponKind::Normal,
        at.offset(0.0, desc.size.1 / 2.0),
        0.0,
        desc.damage,
    );
    engine.session_mut().next_serial = serial;

    engine.resolve_collisions();
    assert_eq!(engine.session().score.score, 200);
}

// ---- Buffs ----

#[test]
fn test_speed_buff_caps_at_three() {
    let mut buffs = PlayerBuffs::new();
    for _ in 0..5 {
        buffs.apply(PowerUpKind::Speed, 0.0);
    }
    assert_eq!(buffs.speed.level, BUFF_MAX_LEVEL);
    assert_eq!(buffs.speed_multiplier(), 2.5);
}

#[test]
fn test_multi_shot_fan_counts() {
    let mut buffs = PlayerBuffs::new();
    assert_eq!(buffs.shot_count(), 1);
    let counts: Vec<u32> = (0..4)
        .map(|_| {
            buffs.apply(PowerUpKind::MultiShot, 0.0);
            buffs.shot_count()
        })
        .collect();
    assert_eq!(counts, vec![3, 5, 7, 7]);
}

#[test]
fn test_buff_expiry_is_strict() {
    let mut buffs = PlayerBuffs::new();
    buffs.apply(PowerUpKind::RapidFire, 1000.0);
    let expires = 1000.0 + RAPID_FIRE_DURATION_MS;

    buffs.update(expires);
    assert_eq!(buffs.rapid_fire.level, 1);
    buffs.update(expires + 1.0);
    assert_eq!(buffs.rapid_fire.level, 0);
    assert_eq!(buffs.rapid_fire.expires_at_ms, 0.0);
}

#[test]
fn test_rapid_fire_and_power_derived_values() {
    let mut buffs = PlayerBuffs::new();
    buffs.apply(PowerUpKind::RapidFire, 0.0);
    buffs.apply(PowerUpKind::ShotPower, 0.0);
    assert_eq!(buffs.fire_delay_ms(250.0), 125.0);
    assert_eq!(buffs.shot_power(), 2);
}

#[test]
fn test_extra_life_leaves_buffs_alone() {
    let mut buffs = PlayerBuffs::new();
    assert_eq!(buffs.apply(PowerUpKind::ExtraLife, 0.0), "1UP!");
    assert_eq!(buffs, PlayerBuffs::new());
}

// ---- Damage chain ----

#[test]
fn test_damage_chain_order() {
    let mut pilot = PilotStatus::new(3);
    let mut buffs = PlayerBuffs::new();
    buffs.apply(PowerUpKind::Shield, 0.0);
    pilot.double_fighter = true;

    assert_eq!(pilot.apply_hit(&mut buffs, 0.0), HitOutcome::ShieldAbsorbed);
    assert_eq!(pilot.apply_hit(&mut buffs, 100.0), HitOutcome::Ignored);
    assert_eq!(pilot.apply_hit(&mut buffs, 3000.0), HitOutcome::WingmanLost);
    assert!(!pilot.double_fighter);
    assert_eq!(pilot.apply_hit(&mut buffs, 6000.0), HitOutcome::LifeLost);
    assert_eq!(pilot.lives, 2);
}

#[test]
fn test_life_loss_resets_buffs() {
    let mut pilot = PilotStatus::new(2);
    let mut buffs = PlayerBuffs::new();
    buffs.apply(PowerUpKind::Speed, 0.0);
    buffs.apply(PowerUpKind::MultiShot, 0.0);

    assert_eq!(pilot.apply_hit(&mut buffs, 0.0), HitOutcome::LifeLost);
    assert_eq!(buffs, PlayerBuffs::new());
    assert!(pilot.is_invulnerable(PLAYER_INVULNERABLE_MS - 1.0));
    assert_eq!(
        pilot.apply_hit(&mut buffs, PLAYER_INVULNERABLE_MS),
        HitOutcome::Destroyed
    );
}

#[test]
fn test_extra_life_caps_at_five() {
    let mut pilot = PilotStatus::new(4);
    pilot.add_life();
    pilot.add_life();
    assert_eq!(pilot.lives, PLAYER_MAX_LIVES);
}

// ---- Scoring ----

#[test]
fn test_combo_band_boundaries() {
    let expected = [
        (1, 1.0),
        (5, 1.5),
        (6, 2.0),
        (10, 2.0),
        (11, 3.0),
        (20, 3.0),
        (21, 4.0),
        (50, 4.0),
        (51, 5.0),
    ];
    for (streak, multiplier) in expected {
        assert_eq!(combo_multiplier(streak), multiplier, "streak {streak}");
    }
}

#[test]
fn test_combo_timeout_resets() {
    let mut combo = ComboTracker::default();
    combo.on_kill(0.0);
    combo.on_kill(1000.0);
    assert_eq!(combo.count, 2);

    combo.tick(2999.0);
    assert_eq!(combo.count, 2);
    combo.tick(3000.0);
    assert_eq!(combo.count, 0);
    assert_eq!(combo.max_combo, 2);

    assert_eq!(combo.on_kill(10_000.0), 1.0);
    assert_eq!(combo.count, 1);
}

#[test]
fn test_ultimate_meter_fills_after_twenty_kills() {
    let mut meter = UltimateMeter::default();
    for kill in 1..=20 {
        meter.add_kill();
        assert_eq!(meter.can_use(), kill == 20, "kill {kill}");
    }
    meter.add_kill();
    assert_eq!(meter.charge, ULTIMATE_CHARGE_MAX);
    assert!(meter.use_charge());
    assert_eq!(meter.charge, 0);
    assert!(!meter.use_charge());
}

// ---- Ranking ----

#[test]
fn test_ranking_qualification() {
    let mut ranking = Ranking::default();
    assert!(!ranking.qualifies(0));
    for score in [500, 400, 300, 200, 100] {
        assert!(ranking.qualifies(score));
        ranking.insert("AAA", score);
    }
    assert!(!ranking.qualifies(100));
    assert!(ranking.qualifies(101));
    assert_eq!(ranking.potential_rank(450), Some(2));

    assert_eq!(ranking.insert("BBB", 450), Some(2));
    assert_eq!(ranking.entries.len(), RANKING_MAX);
    assert_eq!(ranking.entries.last().unwrap().score, 200);
    assert_eq!(ranking.top_score(), Some(500));
}

#[test]
fn test_sanitize_name() {
    assert_eq!(sanitize_name("ace pilot 99"), "ACE PILO");
    assert_eq!(sanitize_name("  !!  "), RANKING_DEFAULT_NAME);
    assert_eq!(sanitize_name("a-b_c"), "ABC");
}

// ---- Waves ----

#[test]
fn test_normal_wave_row_zero_is_bosses() {
    let mut arena = Arena::new();
    let diff = arena.session.difficulty.clone();
    let spawned = wave_spawner::create_wave(
        &mut arena.world,
        &mut arena.rng,
        &mut arena.session.next_serial,
        &diff,
        1,
    );
    let (rows, columns) = formation_size(1, &diff);
    assert_eq!(spawned.len(), (rows * columns) as usize);

    let mut bosses = 0;
    for entity in spawned {
        let enemy = arena.world.get::<&Enemy>(entity).unwrap();
        let anchor = arena.world.get::<&FormationAnchor>(entity).unwrap();
        if anchor.position.y == FORMATION_TOP {
            assert_eq!(enemy.kind, EnemyKind::Boss);
            bosses += 1;
        } else {
            assert_ne!(enemy.kind, EnemyKind::Boss);
        }
    }
    assert_eq!(bosses, columns);
}

#[test]
fn test_bonus_wave_never_fires() {
    let mut arena = Arena::new();
    let diff = arena.session.difficulty.clone();
    let spawned = wave_spawner::create_wave(
        &mut arena.world,
        &mut arena.rng,
        &mut arena.session.next_serial,
        &diff,
        BONUS_STAGE_INTERVAL * 2,
    );
    assert_eq!(spawned.len(), BONUS_STAGE_ENEMIES as usize);
    for entity in spawned {
        let enemy = arena.world.get::<&Enemy>(entity).unwrap();
        assert_eq!(enemy.kind, EnemyKind::Normal);
        assert_eq!(enemy.fire_chance, 0.0);
        let path = arena.world.get::<&EntryPath>(entity).unwrap();
        assert_eq!(path.shape, PathShape::Zigzag);
    }
}

#[test]
fn test_early_waves_have_no_specials() {
    let weights = wave_spawner::kind_weights(2);
    assert_eq!(weights, vec![(EnemyKind::Normal, 50)]);
    let weights = wave_spawner::kind_weights(9);
    assert_eq!(weights.len(), 5);
}

// ---- Collision pipeline ----

#[test]
fn test_kills_in_one_pass_advance_combo_per_kill() {
    let mut arena = Arena::new();
    for x in [100.0, 200.0, 300.0] {
        arena.enemy(EnemyKind::Normal, x, 300.0);
        arena.shot(WeaponKind::Normal, x, 300.0);
    }
    let report = arena.collide();

    assert_eq!(report.kills.len(), 3);
    assert_eq!(arena.session.score.score, 100 + 150 + 150);
    assert_eq!(arena.session.combo.count, 3);
    assert_eq!(arena.session.ultimate.charge, 15);
    assert_eq!(
        arena.count_events(|e| matches!(e, GameEvent::Message { text } if text.contains("COMBO"))),
        1
    );
}

#[test]
fn test_non_piercing_shot_resolves_one_enemy() {
    let mut arena = Arena::new();
    let first = arena.enemy(EnemyKind::Normal, 200.0, 300.0);
    let second = arena.enemy(EnemyKind::Normal, 200.0, 310.0);
    let shot = arena.shot(WeaponKind::Normal, 200.0, 300.0);

    let report = arena.collide();
    assert_eq!(report.kills.len(), 1);
    assert!(arena.is_dead(first));
    assert!(!arena.is_dead(second));
    assert!(arena.is_spent(shot));
}

#[test]
fn test_piercing_shot_records_each_enemy_once() {
    let mut arena = Arena::new();
    let first = arena.enemy(EnemyKind::Tank, 200.0, 300.0);
    let second = arena.enemy(EnemyKind::Tank, 200.0, 310.0);
    let shot = arena.shot(WeaponKind::Laser, 200.0, 300.0);

    arena.collide();
    let hits = arena.world.get::<&Projectile>(shot).unwrap().hits.clone();
    assert_eq!(hits.len(), 2);
    assert!(!arena.is_spent(shot));

    // A second pass at the same spot must not hit either tank again.
    arena.collide();
    for tank in [first, second] {
        let health = arena.world.get::<&Health>(tank).unwrap();
        assert_eq!(health.current, health.max - 2);
        assert!(arena.world.get::<&Enemy>(tank).unwrap().flashed);
    }
}

#[test]
fn test_splitter_produces_two_children() {
    let mut arena = Arena::new();
    let parent = arena.enemy(EnemyKind::Splitter, 300.0, 300.0);
    arena.shot(WeaponKind::Missile, 300.0, 300.0);

    let report = arena.collide();
    assert_eq!(report.splits.len(), 1);
    assert!(arena.is_dead(parent));
    assert!(!can_split(&arena.world.get::<&Enemy>(parent).unwrap()));

    let children: Vec<(Enemy, Health, Position)> = arena
        .world
        .query::<(&Enemy, &Health, &Position)>()
        .iter()
        .filter(|(_, (e, _, _))| e.is_split_child)
        .map(|(_, (e, h, p))| (e.clone(), *h, *p))
        .collect();
    assert_eq!(children.len(), 2);
    for (child, health, position) in &children {
        assert!(!can_split(child));
        assert_eq!(health.max, 1);
        assert_eq!((position.x - 300.0).abs(), SPLIT_OFFSET);
    }
}

#[test]
fn test_non_lethal_hit_does_not_split() {
    let mut arena = Arena::new();
    let parent = arena.enemy(EnemyKind::Splitter, 300.0, 300.0);
    arena.shot(WeaponKind::Normal, 300.0, 300.0);

    let report = arena.collide();
    assert!(report.splits.is_empty());
    assert!(!arena.is_dead(parent));
    assert!(can_split(&arena.world.get::<&Enemy>(parent).unwrap()));
}

#[test]
fn test_enemy_bullets_count_as_one_hit() {
    let mut arena = Arena::new();
    arena.player();
    let a = arena.enemy_shot(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
    let b = arena.enemy_shot(PLAYER_SPAWN_X + 5.0, PLAYER_SPAWN_Y);

    let report = arena.collide();
    assert_eq!(report.player_hits, vec![HitOutcome::LifeLost]);
    assert_eq!(arena.session.pilot.lives, 2);
    assert!(arena.is_spent(a) && arena.is_spent(b));

    arena.enemy_shot(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
    let report = arena.collide();
    assert_eq!(report.player_hits, vec![HitOutcome::Ignored]);
    assert_eq!(arena.session.pilot.lives, 2);
}

#[test]
fn test_contact_destroys_enemy_without_score() {
    let mut arena = Arena::new();
    arena.player();
    let rammed = arena.enemy(EnemyKind::Normal, PLAYER_SPAWN_X, PLAYER_SPAWN_Y);

    let report = arena.collide();
    assert!(arena.is_dead(rammed));
    assert_eq!(report.player_hits, vec![HitOutcome::LifeLost]);
    assert_eq!(arena.session.score.score, 0);
}

#[test]
fn test_pickups_apply_buffs_and_lives() {
    let mut arena = Arena::new();
    arena.player();
    let at = Position::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
    for kind in [PowerUpKind::Speed, PowerUpKind::ExtraLife] {
        world_setup::spawn_powerup(&mut arena.world, &mut arena.session.next_serial, kind, at, 0.0);
    }

    arena.collide();
    assert_eq!(arena.session.buffs.speed.level, 1);
    assert_eq!(arena.session.pilot.lives, 4);
    assert_eq!(
        arena.count_events(|e| matches!(e, GameEvent::PowerUpCollected { .. })),
        2
    );
}

#[test]
fn test_boss_kill_drops_from_boss_pool() {
    let mut arena = Arena::new();
    let boss = arena.enemy(EnemyKind::Boss, 300.0, 200.0);
    arena.world.get::<&mut Health>(boss).unwrap().current = 1;
    arena.shot(WeaponKind::Normal, 300.0, 200.0);

    arena.collide();
    let drops: Vec<PowerUpKind> = arena
        .world
        .query::<&PowerUp>()
        .iter()
        .map(|(_, p)| p.kind)
        .collect();
    assert_eq!(drops.len(), 1);
    assert!(PowerUpKind::BOSS_POOL.contains(&drops[0]));
    assert_eq!(
        arena.count_events(|e| matches!(
            e,
            GameEvent::ScreenShake {
                level: EffectLevel::Large
            }
        )),
        1
    );
}

#[test]
fn test_bullet_destroys_capturing_beam() {
    let mut arena = Arena::new();
    let boss = Position::new(360.0, 600.0);
    let beam = world_setup::spawn_tractor_beam(
        &mut arena.world,
        &mut arena.session.next_serial,
        99,
        boss,
        skyswarm_core::types::Hitbox::new(BOSS_WIDTH, BOSS_HEIGHT),
    );
    arena.world.get::<&mut TractorBeam>(beam).unwrap().capturing = true;
    arena.session.pilot.capture = Some(Capture {
        beam,
        boss: 99,
        started_ms: 0.0,
    });
    let beam_y = arena.world.get::<&Position>(beam).unwrap().y;
    let shot = arena.shot(WeaponKind::Normal, 360.0, beam_y);

    arena.collide();
    assert!(arena.world.get::<&TractorBeam>(beam).unwrap().destroyed);
    assert!(arena.is_spent(shot));
    assert!(arena.session.pilot.capture.is_none());
    assert_eq!(
        arena.count_events(|e| matches!(e, GameEvent::CaptureCancelled)),
        1
    );
}

#[test]
fn test_ultimate_sweeps_by_radius_with_flat_score() {
    let mut arena = Arena::new();
    let near = arena.enemy(EnemyKind::Normal, FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
    let far = arena.enemy(EnemyKind::Normal, 10.0, 10.0);

    arena.session.ultimate.charge = ULTIMATE_CHARGE_MAX;
    assert!(ultimate::trigger(&mut arena.session));
    assert!(!ultimate::trigger(&mut arena.session));

    arena.session.now_ms = 500.0;
    ultimate::run(&mut arena.world, &mut arena.rng, &mut arena.session);
    assert!(arena.is_dead(near));
    assert!(!arena.is_dead(far));
    assert_eq!(arena.session.score.score, 100);
    assert_eq!(arena.session.combo.count, 0);
    assert_eq!(arena.session.ultimate.charge, 0);

    arena.session.now_ms = ULTIMATE_DURATION_MS;
    ultimate::run(&mut arena.world, &mut arena.rng, &mut arena.session);
    assert!(arena.is_dead(far));
    assert!(arena.session.bomb.is_none());
}

#[test]
fn test_pickup_blink_and_expiry() {
    assert!(movement::blink_visible(0.0));
    assert!(movement::blink_visible(POWERUP_BLINK_AFTER_MS - 1.0));
    assert!(!movement::blink_visible(6100.0));
    assert!(movement::blink_visible(6200.0));

    let mut arena = Arena::new();
    let pickup = world_setup::spawn_powerup(
        &mut arena.world,
        &mut arena.session.next_serial,
        PowerUpKind::Shield,
        Position::new(100.0, 100.0),
        0.0,
    );
    movement::run_pickups(&mut arena.world, POWERUP_LIFETIME_MS);
    assert!(arena.world.get::<&PowerUp>(pickup).unwrap().removed);
}

#[test]
fn test_kill_points_truncate() {
    assert_eq!(kill_points(100, 1.5, 1.0), 150);
    assert_eq!(kill_points(150, 1.5, 0.8), 180);
    assert_eq!(kill_points(500, 1.0, 1.5), 750);
    // Kamikaze at x1.5 combo on hard: 292.5 drops the half.
    assert_eq!(kill_points(130, 1.5, 1.5), 292);
    assert_eq!(kill_points(100, 1.0, 0.8), 80);
}

#[test]
fn test_second_captor_stays_shootable_after_first_rescue() {
    let mut arena = Arena::new();
    arena.player();
    let first = arena.enemy(EnemyKind::Boss, 150.0, 300.0);
    let second = arena.enemy(EnemyKind::Boss, 450.0, 300.0);
    for boss in [first, second] {
        arena.world.get::<&mut Enemy>(boss).unwrap().holds_captive = true;
    }
    arena.session.pilot.captive_held = true;

    arena.shot(WeaponKind::Normal, 150.0, 300.0);
    arena.collide();
    assert!(arena.is_dead(first));
    assert!(!arena.is_dead(second));
    assert!(arena.session.pilot.captive_held, "second boss still holds a ship");
    assert_eq!(arena.session.score.rescues, 1);

    arena.shot(WeaponKind::Normal, 450.0, 300.0);
    arena.collide();
    assert!(arena.is_dead(second));
    assert!(!arena.session.pilot.captive_held);
    assert_eq!(arena.session.score.rescues, 2);
    assert_eq!(arena.session.score.score, 2 * SCORE_RESCUE);
}

#[test]
fn test_ultimate_on_one_captor_keeps_the_other_held() {
    let mut arena = Arena::new();
    let near = arena.enemy(EnemyKind::Boss, FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
    let far = arena.enemy(EnemyKind::Boss, 20.0, 20.0);
    for boss in [near, far] {
        arena.world.get::<&mut Enemy>(boss).unwrap().holds_captive = true;
    }
    arena.session.pilot.captive_held = true;
    arena.session.ultimate.charge = ULTIMATE_CHARGE_MAX;
    assert!(ultimate::trigger(&mut arena.session));

    arena.session.now_ms = 500.0;
    ultimate::run(&mut arena.world, &mut arena.rng, &mut arena.session);
    assert!(arena.is_dead(near));
    assert!(!arena.is_dead(far));
    assert!(arena.session.pilot.captive_held);
}

// ---- Projectiles ----

fn bare_projectile(homing: bool, wave_pattern: bool) -> Projectile {
    Projectile {
        faction: Faction::Player,
        weapon: None,
        damage: 1,
        piercing: false,
        explosive: false,
        wave_pattern,
        homing,
        base_speed: 7.0,
        wave_phase: 0.0,
        hits: Vec::new(),
        homing_target: None,
        spent: false,
    }
}

#[test]
fn test_homing_keeps_live_target_then_retargets() {
    let mut shot = bare_projectile(true, false);
    let mut position = Position::new(300.0, 500.0);
    let mut velocity = Velocity::new(0.0, -7.0);
    let far = (1, Position::new(100.0, 400.0));
    let near = (2, Position::new(310.0, 300.0));

    projectiles::advance(&mut shot, &mut position, &mut velocity, &[far, near], 1.0);
    assert_eq!(shot.homing_target, Some(2));

    shot.homing_target = Some(1);
    projectiles::advance(&mut shot, &mut position, &mut velocity, &[far, near], 1.0);
    assert_eq!(shot.homing_target, Some(1), "live target is kept");

    projectiles::advance(&mut shot, &mut position, &mut velocity, &[near], 1.0);
    assert_eq!(shot.homing_target, Some(2), "dead target is replaced");

    projectiles::advance(&mut shot, &mut position, &mut velocity, &[], 1.0);
    assert_eq!(shot.homing_target, None);
    assert!((velocity.speed() - 7.0).abs() < 1e-9);
}

#[test]
fn test_homing_turns_a_tenth_of_the_way() {
    let mut shot = bare_projectile(true, false);
    let mut position = Position::new(300.0, 500.0);
    let mut velocity = Velocity::new(0.0, -7.0);
    let beside = (5, Position::new(400.0, 500.0));

    projectiles::advance(&mut shot, &mut position, &mut velocity, &[beside], 1.0);
    let heading = std::f64::consts::FRAC_PI_2 * HOMING_TURN_RATE;
    assert!((velocity.heading() - heading).abs() < 1e-9);
    assert!((velocity.speed() - 7.0).abs() < 1e-9);
    assert!((position.x - (300.0 + heading.sin() * 7.0)).abs() < 1e-9);
    assert!((position.y - (500.0 - heading.cos() * 7.0)).abs() < 1e-9);
}

#[test]
fn test_wave_shot_drifts_on_a_sine() {
    let mut shot = bare_projectile(false, true);
    let mut position = Position::new(300.0, 500.0);
    let mut velocity = Velocity::new(0.0, -7.0);
    let mut expected_x = 300.0;

    for step in 1..=5 {
        projectiles::advance(&mut shot, &mut position, &mut velocity, &[], 1.0);
        let phase = step as f64 * 0.3;
        expected_x += phase.sin() * 30.0 * 0.1;
        assert!((shot.wave_phase - phase).abs() < 1e-9);
        assert!((position.x - expected_x).abs() < 1e-9, "step {step}");
    }
    assert!((position.y - 465.0).abs() < 1e-9);
}

#[test]
fn test_shots_leaving_any_side_are_swept() {
    let mut arena = Arena::new();
    let exits = [
        (Position::new(360.0, 2.0), Velocity::new(0.0, -20.0)),
        (Position::new(360.0, FIELD_HEIGHT - 2.0), Velocity::new(0.0, 20.0)),
        (Position::new(2.0, 480.0), Velocity::new(-20.0, 0.0)),
        (Position::new(FIELD_WIDTH - 2.0, 480.0), Velocity::new(20.0, 0.0)),
    ];
    let mut leaving = Vec::new();
    for (at, heading) in exits {
        let shot = arena.shot(WeaponKind::Normal, 360.0, 480.0);
        *arena.world.get::<&mut Position>(shot).unwrap() = at;
        *arena.world.get::<&mut Velocity>(shot).unwrap() = heading;
        leaving.push(shot);
    }
    let staying = arena.shot(WeaponKind::Normal, 360.0, 480.0);

    projectiles::run(&mut arena.world);
    for shot in &leaving {
        assert!(arena.is_spent(*shot));
    }
    assert!(!arena.is_spent(staying));

    cleanup::run(&mut arena.world, &mut Vec::new());
    for shot in leaving {
        assert!(!arena.world.contains(shot));
    }
    assert!(arena.world.contains(staying));
}

// ---- Properties ----

proptest! {
    #[test]
    fn prop_combo_multiplier_non_decreasing(streak in 0u32..200) {
        prop_assert!(combo_multiplier(streak + 1) >= combo_multiplier(streak));
    }

    #[test]
    fn prop_shield_absorbs_exactly_its_charges(charges in 1u32..=3) {
        let mut pilot = PilotStatus::new(3);
        let mut buffs = PlayerBuffs::new();
        for _ in 0..charges {
            buffs.apply(PowerUpKind::Shield, 0.0);
        }
        let mut now = 0.0;
        for _ in 0..charges {
            prop_assert_eq!(pilot.apply_hit(&mut buffs, now), HitOutcome::ShieldAbsorbed);
            now += PLAYER_INVULNERABLE_MS;
        }
        prop_assert!(!buffs.shield_active());
        prop_assert_eq!(pilot.apply_hit(&mut buffs, now), HitOutcome::LifeLost);
    }

    #[test]
    fn prop_ranking_stays_sorted_and_bounded(scores in proptest::collection::vec(0u64..10_000, 0..20)) {
        let mut ranking = Ranking::default();
        for score in &scores {
            ranking.insert("P", *score);
        }
        prop_assert!(ranking.entries.len() <= RANKING_MAX);
        prop_assert!(ranking.entries.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn prop_speed_multiplier_bounded(pickups in 0usize..10) {
        let mut buffs = PlayerBuffs::new();
        for _ in 0..pickups {
            buffs.apply(PowerUpKind::Speed, 0.0);
        }
        prop_assert!(buffs.speed_multiplier() <= 2.5);
    }
}
