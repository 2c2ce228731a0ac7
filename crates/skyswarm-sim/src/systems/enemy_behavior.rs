//! Enemy behavior system: runs the enemy FSM, then firing and tractor-beam
//! decisions, for every live enemy in creation order.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use skyswarm_core::components::*;
use skyswarm_core::enums::SoundCue;
use skyswarm_core::events::GameEvent;
use skyswarm_core::types::{Hitbox, Position};
use skyswarm_enemy_ai::firing::{self, FireContext, ShotPlan};
use skyswarm_enemy_ai::fsm::{self, EnemyContext, Transition};

use crate::session::Session;
use crate::world_setup;

/// Live enemies sorted by serial, so RNG draws happen in a stable order.
fn enemies_in_order(world: &World) -> Vec<(Serial, Entity)> {
    let mut order: Vec<(Serial, Entity)> = world
        .query::<(&Serial, &Enemy)>()
        .iter()
        .map(|(entity, (serial, _))| (*serial, entity))
        .collect();
    order.sort_unstable_by_key(|(serial, _)| *serial);
    order
}

pub fn player_position(world: &World) -> Option<Position> {
    world
        .query::<(&PlayerShip, &Position)>()
        .iter()
        .next()
        .map(|(_, (_, pos))| *pos)
}

/// Run enemy behavior for one tick.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, session: &mut Session) {
    let player = if session.pilot.capture.is_some() {
        None
    } else {
        player_position(world)
    };
    let capture_in_progress = session.pilot.capture.is_some();
    let now_ms = session.now_ms;

    let mut shots: Vec<ShotPlan> = Vec::new();
    let mut beams: Vec<(u32, Position, Hitbox)> = Vec::new();

    for (serial, entity) in enemies_in_order(world) {
        let Ok((enemy, behavior, position, hitbox, anchor, path)) = world
            .query_one_mut::<(
                &mut Enemy,
                &mut Behavior,
                &mut Position,
                &Hitbox,
                &FormationAnchor,
                &mut EntryPath,
            )>(entity)
        else {
            continue;
        };
        if behavior.state == BehaviorState::Dead {
            continue;
        }
        enemy.flashed = false;

        let ctx = EnemyContext {
            kind: enemy.kind,
            is_split_child: enemy.is_split_child,
            state: behavior.state,
            position: *position,
            hitbox: *hitbox,
            anchor: anchor.position,
            speed: enemy.speed,
            sway_phase: behavior.sway_phase,
            path_shape: path.shape,
            waypoints: &path.waypoints,
            path_index: path.index,
            player,
            now_ms,
        };
        let update = fsm::evaluate(&ctx, rng);

        *position = update.position;
        path.index = update.path_index;
        behavior.state = if update.exited_field {
            BehaviorState::Dead
        } else {
            update.state
        };

        match update.transition {
            Some(Transition::PatternStarted(pattern)) => {
                log::debug!("boss {} starts {:?}", serial.0, pattern);
                session.emit(GameEvent::Sound {
                    cue: SoundCue::BossWarning,
                });
            }
            Some(Transition::KamikazeLaunched) => {
                log::debug!("kamikaze {} launched", serial.0);
            }
            _ => {}
        }

        if behavior.state == BehaviorState::Dead {
            continue;
        }

        firing::tick_cooldowns(behavior);
        let fire_ctx = FireContext {
            kind: enemy.kind,
            position: *position,
            hitbox: *hitbox,
            fire_chance: enemy.fire_chance,
        };
        shots.extend(firing::plan_shots(&fire_ctx, behavior, rng));

        // A boss already holding a ship does not reach for another.
        let beam_blocked = capture_in_progress || enemy.holds_captive;
        if firing::should_project_beam(enemy.kind, behavior, beam_blocked, rng) {
            beams.push((serial.0, *position, *hitbox));
        }
    }

    if !shots.is_empty() {
        let speed = session.difficulty.enemy_bullet_speed;
        for shot in &shots {
            world_setup::spawn_enemy_shot(
                world,
                &mut session.next_serial,
                shot.origin,
                shot.angle_deg,
                speed,
            );
        }
        session.emit(GameEvent::Sound {
            cue: SoundCue::EnemyShoot,
        });
    }

    for (owner, position, hitbox) in beams {
        log::debug!("boss {owner} projects a tractor beam");
        world_setup::spawn_tractor_beam(world, &mut session.next_serial, owner, position, hitbox);
    }
}
