//! Collision and resolution pipeline.
//!
//! Runs once per tick after every entity has moved, in a fixed order:
//! bullets against enemies, split children, kill scoring and pickups,
//! enemy fire and contact against the ship, tractor-beam capture, rescue,
//! and finally bullets against beams. Every pass walks its bodies in
//! creation order, so resolution never depends on storage layout.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use skyswarm_core::components::*;
use skyswarm_core::constants::*;
use skyswarm_core::enums::*;
use skyswarm_core::events::GameEvent;
use skyswarm_core::types::{Hitbox, Position};

use crate::pilot::Capture;
use crate::session::Session;
use crate::systems::kills::{self, Credit, Kill};
use crate::systems::projectiles::can_hit;
use crate::world_setup;

/// What the pipeline did this tick.
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    pub kills: Vec<Kill>,
    /// Serials of splitters that broke apart this tick.
    pub splits: Vec<u32>,
    pub player_hits: Vec<HitOutcome>,
    pub game_over: bool,
}

/// A splitter breaks apart once, and only if it is not itself a fragment.
pub fn can_split(enemy: &Enemy) -> bool {
    enemy.kind == EnemyKind::Splitter && !enemy.is_split_child && !enemy.has_split
}

#[derive(Debug, Clone, Copy)]
struct Body {
    serial: u32,
    entity: Entity,
    position: Position,
    hitbox: Hitbox,
}

impl Body {
    fn overlaps(&self, other: &Body) -> bool {
        self.hitbox
            .overlaps(&self.position, &other.hitbox, &other.position)
    }
}

fn sorted(mut bodies: Vec<Body>) -> Vec<Body> {
    bodies.sort_unstable_by_key(|body| body.serial);
    bodies
}

fn projectiles_of(world: &World, faction: Faction) -> Vec<Body> {
    sorted(
        world
            .query::<(&Serial, &Projectile, &Position, &Hitbox)>()
            .iter()
            .filter(|(_, (_, p, _, _))| p.faction == faction && !p.spent)
            .map(|(entity, (serial, _, position, hitbox))| Body {
                serial: serial.0,
                entity,
                position: *position,
                hitbox: *hitbox,
            })
            .collect(),
    )
}

/// Live enemies, filtered on whether they hold a captured ship.
fn enemies_where(world: &World, holding_captive: bool) -> Vec<Body> {
    sorted(
        world
            .query::<(&Serial, &Enemy, &Behavior, &Position, &Hitbox)>()
            .iter()
            .filter(|(_, (_, enemy, behavior, _, _))| {
                behavior.state != BehaviorState::Dead && enemy.holds_captive == holding_captive
            })
            .map(|(entity, (serial, _, _, position, hitbox))| Body {
                serial: serial.0,
                entity,
                position: *position,
                hitbox: *hitbox,
            })
            .collect(),
    )
}

fn live_beams(world: &World) -> Vec<Body> {
    sorted(
        world
            .query::<(&Serial, &TractorBeam, &Position, &Hitbox)>()
            .iter()
            .filter(|(_, (_, beam, _, _))| !beam.destroyed)
            .map(|(entity, (serial, _, position, hitbox))| Body {
                serial: serial.0,
                entity,
                position: *position,
                hitbox: *hitbox,
            })
            .collect(),
    )
}

fn player_body(world: &World) -> Option<Body> {
    world
        .query::<(&PlayerShip, &Serial, &Position, &Hitbox)>()
        .iter()
        .next()
        .map(|(entity, (_, serial, position, hitbox))| Body {
            serial: serial.0,
            entity,
            position: *position,
            hitbox: *hitbox,
        })
}

fn is_live_enemy(world: &World, entity: Entity) -> bool {
    world
        .get::<&Behavior>(entity)
        .map(|behavior| behavior.state != BehaviorState::Dead)
        .unwrap_or(false)
}

fn is_spent(world: &World, entity: Entity) -> bool {
    world
        .get::<&Projectile>(entity)
        .map(|projectile| projectile.spent)
        .unwrap_or(true)
}

fn mark_spent(world: &mut World, entity: Entity) {
    if let Ok(mut projectile) = world.get::<&mut Projectile>(entity) {
        projectile.spent = true;
    }
}

/// Run one hit through the pilot's damage chain and announce it.
fn hit_player(session: &mut Session, report: &mut CollisionReport) -> HitOutcome {
    let now = session.now_ms;
    let outcome = session.pilot.apply_hit(&mut session.buffs, now);
    report.player_hits.push(outcome);
    session.emit(GameEvent::PlayerHit { outcome });
    match outcome {
        HitOutcome::Ignored => {}
        HitOutcome::Destroyed => report.game_over = true,
        _ => {
            session.emit(GameEvent::ScreenShake {
                level: EffectLevel::Medium,
            });
            session.emit(GameEvent::Sound {
                cue: SoundCue::Explosion,
            });
        }
    }
    outcome
}

/// Resolve every collision for this tick.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, session: &mut Session) -> CollisionReport {
    let mut report = CollisionReport::default();

    let splits = bullets_vs_enemies(world, &mut report);
    for (position, anchor) in splits {
        world_setup::spawn_split_children(
            world,
            rng,
            &mut session.next_serial,
            &session.difficulty,
            position,
            anchor,
        );
    }
    kills::resolve(world, rng, session, &report.kills, Credit::Combat);
    collect_pickups(world, session);

    if let Some(player) = player_body(world) {
        enemy_fire_vs_player(world, session, &player, &mut report);
        if !report.game_over {
            contact_vs_player(world, session, &player, &mut report);
        }
        if !report.game_over {
            beams_vs_player(world, session, &player, &mut report);
        }
    }

    rescue(world, session);
    bullets_vs_beams(world, session);

    if report.game_over {
        log::info!("player destroyed at {:.0} ms", session.now_ms);
    }
    report
}

/// Player bullets against enemies not holding a captive. Returns the
/// position and anchor of each splitter that broke apart.
fn bullets_vs_enemies(world: &mut World, report: &mut CollisionReport) -> Vec<(Position, Position)> {
    let bullets = projectiles_of(world, Faction::Player);
    let enemies = enemies_where(world, false);
    let mut splits = Vec::new();

    for bullet in &bullets {
        for target in &enemies {
            if !bullet.overlaps(target) || !is_live_enemy(world, target.entity) {
                continue;
            }

            let damage = {
                let Ok(mut projectile) = world.get::<&mut Projectile>(bullet.entity) else {
                    break;
                };
                if projectile.spent {
                    break;
                }
                if !can_hit(&projectile, target.serial) {
                    continue;
                }
                if projectile.piercing {
                    projectile.hits.push(target.serial);
                } else {
                    projectile.spent = true;
                }
                projectile.damage
            };

            let Ok((enemy, health, behavior, anchor)) = world
                .query_one_mut::<(&mut Enemy, &mut Health, &mut Behavior, &FormationAnchor)>(
                    target.entity,
                )
            else {
                continue;
            };

            if health.is_lethal(damage) && can_split(enemy) {
                enemy.has_split = true;
                report.splits.push(target.serial);
                splits.push((target.position, anchor.position));
            }
            if health.take_damage(damage) {
                behavior.state = BehaviorState::Dead;
                report.kills.push(Kill {
                    serial: target.serial,
                    kind: enemy.kind,
                    position: target.position,
                    raw_score: enemy.score_value,
                });
            } else {
                enemy.flashed = true;
            }

            if is_spent(world, bullet.entity) {
                break;
            }
        }
    }
    splits
}

/// The ship sweeps up any pickup it touches.
fn collect_pickups(world: &mut World, session: &mut Session) {
    let Some(player) = player_body(world) else {
        return;
    };
    let mut touched: Vec<(u32, PowerUpKind)> = Vec::new();
    for (_entity, (serial, powerup, position, hitbox)) in
        world.query_mut::<(&Serial, &mut PowerUp, &Position, &Hitbox)>()
    {
        if powerup.removed || !player.hitbox.overlaps(&player.position, hitbox, position) {
            continue;
        }
        powerup.removed = true;
        touched.push((serial.0, powerup.kind));
    }
    touched.sort_unstable_by_key(|(serial, _)| *serial);

    let now = session.now_ms;
    for (_, kind) in touched {
        let text = session.buffs.apply(kind, now);
        if kind == PowerUpKind::ExtraLife {
            session.pilot.add_life();
        }
        session.emit(GameEvent::PowerUpCollected { kind });
        session.emit(GameEvent::Message { text });
        session.emit(GameEvent::Sound {
            cue: SoundCue::PowerUp,
        });
    }
}

/// Every enemy bullet touching the ship is destroyed; together they count
/// as a single hit.
fn enemy_fire_vs_player(
    world: &mut World,
    session: &mut Session,
    player: &Body,
    report: &mut CollisionReport,
) {
    let mut struck = false;
    for bullet in projectiles_of(world, Faction::Enemy) {
        if bullet.overlaps(player) {
            mark_spent(world, bullet.entity);
            struck = true;
        }
    }
    if struck {
        hit_player(session, report);
    }
}

/// The first enemy rammed by the ship is destroyed without score.
fn contact_vs_player(
    world: &mut World,
    session: &mut Session,
    player: &Body,
    report: &mut CollisionReport,
) {
    let mut rammed = enemies_where(world, false);
    rammed.extend(enemies_where(world, true));
    let rammed = sorted(rammed);
    let Some(enemy) = rammed.iter().find(|enemy| enemy.overlaps(player)) else {
        return;
    };

    let mut captive_lost = false;
    if let Ok((e, behavior)) = world.query_one_mut::<(&Enemy, &mut Behavior)>(enemy.entity) {
        behavior.state = BehaviorState::Dead;
        captive_lost = e.holds_captive;
    }
    if captive_lost {
        session.pilot.captive_held = false;
    }
    session.emit(GameEvent::Explosion {
        position: enemy.position,
        large: false,
    });
    hit_player(session, report);
}

/// Beam latch, then capture completion once the beam has held the ship
/// long enough.
fn beams_vs_player(
    world: &mut World,
    session: &mut Session,
    player: &Body,
    report: &mut CollisionReport,
) {
    let now = session.now_ms;

    if session.pilot.capture.is_none() {
        let latched = live_beams(world)
            .into_iter()
            .find(|beam| beam.overlaps(player));
        if let Some(beam) = latched {
            let owner = match world.get::<&mut TractorBeam>(beam.entity) {
                Ok(mut tractor) => {
                    tractor.capturing = true;
                    tractor.capture_started_ms = now;
                    tractor.owner
                }
                Err(_) => return,
            };
            session.pilot.capture = Some(Capture {
                beam: beam.entity,
                boss: owner,
                started_ms: now,
            });
            log::debug!("tractor beam {} latched onto the ship", beam.serial);
            session.emit(GameEvent::CaptureStarted { boss: owner });
            session.emit(GameEvent::Sound {
                cue: SoundCue::Capture,
            });
        }
        return;
    }

    let Some(capture) = session.pilot.capture else {
        return;
    };
    if now - capture.started_ms < CAPTURE_TIME_MS {
        return;
    }

    session.pilot.capture = None;
    if let Ok(mut tractor) = world.get::<&mut TractorBeam>(capture.beam) {
        tractor.destroyed = true;
    }

    let captor = enemies_where(world, false)
        .into_iter()
        .find(|enemy| enemy.serial == capture.boss);
    let boss = match captor {
        Some(body) => {
            if let Ok(mut enemy) = world.get::<&mut Enemy>(body.entity) {
                enemy.holds_captive = true;
            }
            session.pilot.captive_held = true;
            Some(capture.boss)
        }
        None => None,
    };

    let _ = world.despawn(player.entity);
    log::info!("ship captured by boss {:?}", boss);
    session.emit(GameEvent::PlayerCaptured { boss });

    if hit_player(session, report) != HitOutcome::Destroyed {
        world_setup::spawn_player(world, &mut session.next_serial);
    }
}

/// Whether any live boss still holds a captured ship.
pub fn any_captive_held(world: &World) -> bool {
    !enemies_where(world, true).is_empty()
}

/// A player bullet striking a boss that holds a captured ship frees it.
/// Every captor is checked, so a boss that captured a later ship stays
/// shootable after an earlier rescue.
fn rescue(world: &mut World, session: &mut Session) {
    let captors = enemies_where(world, true);
    if captors.is_empty() {
        session.pilot.captive_held = false;
        return;
    }
    let bullets = projectiles_of(world, Faction::Player);

    for bullet in &bullets {
        let Some(captor) = captors.iter().find(|captor| bullet.overlaps(captor)) else {
            continue;
        };
        mark_spent(world, bullet.entity);
        if let Ok(mut behavior) = world.get::<&mut Behavior>(captor.entity) {
            behavior.state = BehaviorState::Dead;
        }
        if let Ok(mut enemy) = world.get::<&mut Enemy>(captor.entity) {
            enemy.holds_captive = false;
        }

        session.pilot.captive_held = any_captive_held(world);
        session.pilot.double_fighter = true;
        session.score.rescues += 1;
        session.award(SCORE_RESCUE);
        log::info!("captured ship rescued from boss {}", captor.serial);
        session.emit(GameEvent::PlayerRescued {
            boss: captor.serial,
        });
        session.emit(GameEvent::Explosion {
            position: captor.position,
            large: true,
        });
        session.emit(GameEvent::Sound {
            cue: SoundCue::Rescue,
        });
        return;
    }
}

/// Player bullets and tractor beams destroy each other.
fn bullets_vs_beams(world: &mut World, session: &mut Session) {
    let beams = live_beams(world);
    if beams.is_empty() {
        return;
    }
    let mut destroyed_any = false;

    for bullet in projectiles_of(world, Faction::Player) {
        if is_spent(world, bullet.entity) {
            continue;
        }
        for beam in &beams {
            if !bullet.overlaps(beam) {
                continue;
            }
            let live = match world.get::<&mut TractorBeam>(beam.entity) {
                Ok(mut tractor) if !tractor.destroyed => {
                    tractor.destroyed = true;
                    true
                }
                _ => false,
            };
            if !live {
                continue;
            }
            mark_spent(world, bullet.entity);
            destroyed_any = true;

            if session.pilot.capture.map(|c| c.beam) == Some(beam.entity) {
                session.pilot.capture = None;
                log::debug!("capture cancelled, beam {} destroyed", beam.serial);
                session.emit(GameEvent::CaptureCancelled);
            }
            break;
        }
    }

    if destroyed_any {
        session.emit(GameEvent::Sound {
            cue: SoundCue::Explosion,
        });
    }
}
