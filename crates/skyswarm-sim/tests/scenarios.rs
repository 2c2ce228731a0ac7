//! End-to-end scenarios driven through the public engine API.

use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use skyswarm_core::commands::{KeyPress, PlayerCommand, TickInput};
use skyswarm_core::components::{Enemy, PowerUp};
use skyswarm_core::constants::*;
use skyswarm_core::enums::*;
use skyswarm_core::events::GameEvent;
use skyswarm_core::types::{Hitbox, Position};
use skyswarm_core::weapons::describe;
use skyswarm_sim::systems::wave_spawner::WaveState;
use skyswarm_sim::world_setup::{self, Arrival, EnemySpawn};
use skyswarm_sim::{SimConfig, SimulationEngine};

/// A running game with the first wave removed, so each scenario places
/// exactly the entities it needs.
fn empty_field() -> (SimulationEngine, ChaCha8Rng) {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::NewGame {
        difficulty: DifficultyLevel::Normal.into(),
    });
    engine.tick(&TickInput::idle());

    let enemies: Vec<Entity> = engine
        .world()
        .query::<&Enemy>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    for entity in enemies {
        engine.world_mut().despawn(entity).unwrap();
    }
    engine.snapshot();
    (engine, ChaCha8Rng::seed_from_u64(99))
}

fn place_enemy(
    engine: &mut SimulationEngine,
    rng: &mut ChaCha8Rng,
    kind: EnemyKind,
    position: Position,
) -> Entity {
    let difficulty = engine.session().difficulty.clone();
    let mut serial = engine.session().next_serial;
    let entity = world_setup::spawn_enemy(
        engine.world_mut(),
        rng,
        &mut serial,
        &difficulty,
        EnemySpawn {
            kind,
            is_split_child: false,
            anchor: position,
            arrival: Arrival::InFormation { position },
            fire_chance_override: None,
        },
    );
    engine.session_mut().next_serial = serial;
    entity
}

/// Normal shot centered on `at`.
fn place_shot(engine: &mut SimulationEngine, at: Position) -> Entity {
    let desc = describe(WeaponKind::Normal);
    let mut serial = engine.session().next_serial;
    let entity = world_setup::spawn_player_shot(
        engine.world_mut(),
        &mut serial,
        WeaponKind::Normal,
        at.offset(0.0, desc.size.1 / 2.0),
        0.0,
        desc.damage,
    );
    engine.session_mut().next_serial = serial;
    entity
}

#[test]
fn single_kill_scores_base_value() {
    let (mut engine, mut rng) = empty_field();
    let at = Position::new(200.0, 300.0);
    let enemy = place_enemy(&mut engine, &mut rng, EnemyKind::Normal, at);
    let shot = place_shot(&mut engine, at);

    let report = engine.resolve_collisions();
    assert_eq!(report.kills.len(), 1);
    assert_eq!(engine.session().score.score, 100);
    assert!(!engine.world().contains(enemy));
    assert!(!engine.world().contains(shot));
}

#[test]
fn speed_pickups_cap_multiplier() {
    let (mut engine, _) = empty_field();
    let at = Position::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
    let now = engine.session().now_ms;
    for _ in 0..3 {
        let mut serial = engine.session().next_serial;
        world_setup::spawn_powerup(engine.world_mut(), &mut serial, PowerUpKind::Speed, at, now);
        engine.session_mut().next_serial = serial;
    }
    engine.resolve_collisions();
    assert_eq!(engine.session().buffs.speed_multiplier(), 2.5);
    assert_eq!(engine.world().query::<&PowerUp>().iter().count(), 0);

    let snap = engine.snapshot();
    assert_eq!(snap.hud.buffs.speed_level, 3);
    assert_eq!(snap.hud.buffs.speed_multiplier, 2.5);
}

#[test]
fn twenty_kills_charge_the_ultimate() {
    let (mut engine, mut rng) = empty_field();
    let spots: Vec<Position> = (0..20)
        .map(|i| Position::new(60.0 + (i % 10) as f64 * 60.0, 200.0 + (i / 10) as f64 * 80.0))
        .collect();

    for at in &spots[..19] {
        place_enemy(&mut engine, &mut rng, EnemyKind::Normal, *at);
        place_shot(&mut engine, *at);
    }
    engine.resolve_collisions();
    assert_eq!(engine.session().ultimate.charge, 95);
    assert!(!engine.session().ultimate.can_use());

    place_enemy(&mut engine, &mut rng, EnemyKind::Normal, spots[19]);
    place_shot(&mut engine, spots[19]);
    engine.resolve_collisions();
    assert!(engine.session().ultimate.can_use());

    let snap = engine.tick(&TickInput::pressing(KeyPress::Ultimate));
    assert_eq!(snap.hud.ultimate_charge, 0);
    assert!(snap.bomb.is_some());
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::UltimateFired)));
}

#[test]
fn capture_then_rescue_grants_double_fighter() {
    let (mut engine, mut rng) = empty_field();
    let boss_at = Position::new(PLAYER_SPAWN_X, 400.0);
    place_enemy(&mut engine, &mut rng, EnemyKind::Boss, boss_at);
    let boss_serial = engine.session().next_serial - 1;

    // A beam already reaching down over the ship.
    let mut serial = engine.session().next_serial;
    let beam = world_setup::spawn_tractor_beam(
        engine.world_mut(),
        &mut serial,
        boss_serial,
        boss_at,
        Hitbox::new(BOSS_WIDTH, BOSS_HEIGHT),
    );
    engine.session_mut().next_serial = serial;
    engine.world_mut().get::<&mut Position>(beam).unwrap().y = PLAYER_SPAWN_Y;

    engine.resolve_collisions();
    assert!(engine.session().pilot.capture.is_some());
    let snap = engine.snapshot();
    assert!(snap.player.unwrap().being_captured);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::CaptureStarted { boss } if *boss == boss_serial)));

    let captured_at = engine.session().now_ms + CAPTURE_TIME_MS;
    engine.session_mut().now_ms = captured_at;
    engine.resolve_collisions();
    assert!(engine.session().pilot.capture.is_none());
    assert!(engine.session().pilot.captive_held);
    assert_eq!(engine.session().pilot.lives, 2);
    assert!(!engine.world().contains(beam));

    let snap = engine.snapshot();
    assert!(snap.player.is_some(), "ship respawns after capture");
    assert!(snap.enemies.iter().any(|e| e.holds_captive));

    // Shooting the captor frees the ship.
    let score_before = engine.session().score.score;
    place_shot(&mut engine, boss_at);
    engine.resolve_collisions();

    assert!(engine.session().pilot.double_fighter);
    assert!(!engine.session().pilot.captive_held);
    assert_eq!(engine.session().score.score, score_before + SCORE_RESCUE);
    assert_eq!(engine.session().score.rescues, 1);
    let snap = engine.snapshot();
    assert!(snap.player.unwrap().double_fighter);
    assert!(snap.enemies.is_empty());
}

#[test]
fn cleared_wave_advances_after_delay() {
    let (mut engine, _) = empty_field();
    let snap = engine.tick(&TickInput::idle());
    assert_eq!(engine.phase(), GamePhase::StageClear);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::WaveCleared { wave: 1 })));

    let mut ticks = 0;
    while engine.phase() == GamePhase::StageClear && ticks < 200 {
        engine.tick(&TickInput::idle());
        ticks += 1;
    }
    assert_eq!(engine.phase(), GamePhase::Playing);
    assert!((119..=121).contains(&ticks), "stage clear lasted {ticks} ticks");
    assert_eq!(engine.session().wave.number, 2);
}

#[test]
fn bonus_stage_timeout_clears_survivors() {
    let (mut engine, mut rng) = empty_field();
    place_enemy(
        &mut engine,
        &mut rng,
        EnemyKind::Normal,
        Position::new(100.0, 150.0),
    );
    let now = engine.session().now_ms;
    engine.session_mut().wave = WaveState {
        number: BONUS_STAGE_INTERVAL,
        bonus: true,
        started_ms: now - BONUS_STAGE_TIME_LIMIT_MS,
        cleared_at_ms: None,
    };

    let snap = engine.tick(&TickInput::idle());
    assert!(snap.events.iter().any(|e| matches!(
        e,
        GameEvent::BonusStageExpired {
            remaining: 1,
            ..
        }
    )));
    assert_eq!(engine.phase(), GamePhase::StageClear);
    assert_eq!(engine.session().score.score, 0);
}

#[test]
fn game_over_persists_high_score() {
    let (mut engine, _) = empty_field();
    engine.session_mut().pilot.lives = 1;
    engine.session_mut().score.score = 1200;
    engine.session_mut().score.high_score = 1200;

    let mut serial = engine.session().next_serial;
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

    // Frozen after game over.
    let tick = engine.time().tick;
    engine.tick(&TickInput::idle());
    assert_eq!(engine.time().tick, tick);
}
