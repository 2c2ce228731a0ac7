//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! Read-only: it never modifies the world.

use hecs::World;

use skyswarm_core::components::*;
use skyswarm_core::enums::*;
use skyswarm_core::events::GameEvent;
use skyswarm_core::state::*;
use skyswarm_core::types::{Hitbox, Position, SimTime, Velocity};
use skyswarm_core::weapons::{self, describe};
use skyswarm_enemy_ai::fsm::pattern_kind;

use crate::ranking::Ranking;
use crate::session::Session;

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    session: &Session,
    ranking: &Ranking,
    pending_rank: Option<usize>,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    GameStateSnapshot {
        time: *time,
        phase,
        player: build_player(world, session),
        enemies: build_enemies(world),
        projectiles: build_projectiles(world),
        powerups: build_powerups(world),
        beams: build_beams(world),
        bomb: session.bomb.map(|bomb| BombView {
            center: bomb.center,
            radius: bomb.radius(session.now_ms),
            progress: bomb.progress(session.now_ms),
        }),
        hud: build_hud(session, ranking, pending_rank),
        events,
    }
}

fn build_player(world: &World, session: &Session) -> Option<PlayerView> {
    world
        .query::<(&PlayerShip, &Position)>()
        .iter()
        .next()
        .map(|(_, (_, pos))| PlayerView {
            position: *pos,
            invulnerable: session.pilot.is_invulnerable(session.now_ms),
            double_fighter: session.pilot.double_fighter,
            being_captured: session.pilot.capture.is_some(),
            shield_active: session.buffs.shield_active(),
        })
}

fn state_view(state: &BehaviorState) -> Option<EnemyStateView> {
    match state {
        BehaviorState::Entering => Some(EnemyStateView::Entering),
        BehaviorState::FormationIdle => Some(EnemyStateView::Formation),
        BehaviorState::BossPattern { maneuver, .. } => Some(EnemyStateView::BossPattern {
            pattern: pattern_kind(maneuver),
        }),
        BehaviorState::KamikazeChase => Some(EnemyStateView::KamikazeChase),
        BehaviorState::Dead => None,
    }
}

/// Live enemies in creation order.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Serial, &Enemy, &Health, &Behavior, &Position, &Hitbox)>()
        .iter()
        .filter_map(|(_, (serial, enemy, health, behavior, pos, hitbox))| {
            Some(EnemyView {
                serial: serial.0,
                kind: enemy.kind,
                position: *pos,
                width: hitbox.width,
                height: hitbox.height,
                hp: health.current,
                max_hp: health.max,
                state: state_view(&behavior.state)?,
                is_split_child: enemy.is_split_child,
                holds_captive: enemy.holds_captive,
                flashed: enemy.flashed,
            })
        })
        .collect();
    enemies.sort_by_key(|e| e.serial);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Serial, &Projectile, &Position, &Velocity)>()
        .iter()
        .filter(|(_, (_, projectile, _, _))| !projectile.spent)
        .map(|(_, (serial, projectile, pos, vel))| ProjectileView {
            serial: serial.0,
            faction: projectile.faction,
            weapon: projectile.weapon,
            position: *pos,
            velocity: *vel,
            color: projectile
                .weapon
                .map(|kind| describe(kind).color)
                .unwrap_or(weapons::RED),
        })
        .collect();
    projectiles.sort_by_key(|p| p.serial);
    projectiles
}

fn build_powerups(world: &World) -> Vec<PowerUpView> {
    let mut powerups: Vec<PowerUpView> = world
        .query::<(&Serial, &PowerUp, &Position)>()
        .iter()
        .filter(|(_, (_, powerup, _))| !powerup.removed)
        .map(|(_, (serial, powerup, pos))| PowerUpView {
            serial: serial.0,
            kind: powerup.kind,
            position: *pos,
            visible: powerup.visible,
        })
        .collect();
    powerups.sort_by_key(|p| p.serial);
    powerups
}

fn build_beams(world: &World) -> Vec<BeamView> {
    let mut beams: Vec<BeamView> = world
        .query::<(&Serial, &TractorBeam, &Position)>()
        .iter()
        .filter(|(_, (_, beam, _))| !beam.destroyed)
        .map(|(_, (serial, beam, pos))| BeamView {
            serial: serial.0,
            owner: beam.owner,
            position: *pos,
            capturing: beam.capturing,
        })
        .collect();
    beams.sort_by_key(|b| b.serial);
    beams
}

fn build_hud(session: &Session, ranking: &Ranking, pending_rank: Option<usize>) -> HudView {
    let weapon = session.pilot.weapon;
    HudView {
        score: session.score.score,
        high_score: session.score.high_score,
        lives: session.pilot.lives,
        wave: session.wave.number,
        bonus_stage: session.wave.bonus,
        bonus_time_remaining_ms: session.wave.bonus_time_remaining(session.now_ms),
        difficulty: session.difficulty.level,
        weapon,
        weapon_name: describe(weapon).name.to_string(),
        combo: session.combo.count,
        combo_multiplier: session.combo.multiplier(),
        max_combo: session.combo.max_combo,
        ultimate_charge: session.ultimate.charge,
        ultimate_ready: session.ultimate.can_use(),
        buffs: session.buffs.view(),
        pending_rank,
        ranking: ranking.entries.clone(),
    }
}
