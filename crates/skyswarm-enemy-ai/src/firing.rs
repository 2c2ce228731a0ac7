//! Enemy firing and tractor-beam decisions.
//!
//! Decides *whether* and *where* an enemy shoots this tick; the simulation
//! turns the returned plans into projectile entities.

use rand::Rng;

use skyswarm_core::components::{Behavior, BehaviorState, BossManeuver};
use skyswarm_core::constants::*;
use skyswarm_core::enums::EnemyKind;
use skyswarm_core::types::{Hitbox, Position};

/// Input to the firing decision for one enemy.
pub struct FireContext {
    pub kind: EnemyKind,
    pub position: Position,
    pub hitbox: Hitbox,
    pub fire_chance: f64,
}

/// One bullet to spawn. Angle 0 points straight down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    pub origin: Position,
    pub angle_deg: f64,
}

/// Count down the attack and beam cooldowns by one tick.
pub fn tick_cooldowns(behavior: &mut Behavior) {
    if behavior.attack_cooldown_ms > 0.0 {
        behavior.attack_cooldown_ms -= TICK_MS;
    }
    if behavior.beam_cooldown_ms > 0.0 {
        behavior.beam_cooldown_ms -= TICK_MS;
    }
}

/// Decide this tick's shots. Sets the attack cooldown when a boss fires.
pub fn plan_shots<R: Rng + ?Sized>(
    ctx: &FireContext,
    behavior: &mut Behavior,
    rng: &mut R,
) -> Vec<ShotPlan> {
    // Entering, chasing and dead enemies hold fire.
    if !matches!(
        behavior.state,
        BehaviorState::FormationIdle | BehaviorState::BossPattern { .. }
    ) {
        return Vec::new();
    }

    let muzzle = Position::new(ctx.position.x, ctx.hitbox.bottom(&ctx.position));

    if ctx.kind != EnemyKind::Boss {
        if rng.gen::<f64>() < ctx.fire_chance {
            return vec![ShotPlan {
                origin: muzzle,
                angle_deg: 0.0,
            }];
        }
        return Vec::new();
    }

    if behavior.attack_cooldown_ms > 0.0 {
        return Vec::new();
    }

    match behavior.state {
        BehaviorState::BossPattern { maneuver, .. } => match maneuver {
            BossManeuver::Dive { .. } => {
                if rng.gen::<f64>() < BOSS_DIVE_FIRE_CHANCE {
                    behavior.attack_cooldown_ms = BOSS_DIVE_FIRE_COOLDOWN_MS;
                    return vec![ShotPlan {
                        origin: muzzle,
                        angle_deg: 0.0,
                    }];
                }
                Vec::new()
            }
            BossManeuver::Spiral { angle_deg } => {
                behavior.attack_cooldown_ms = BOSS_SPIRAL_FIRE_COOLDOWN_MS;
                (0..3)
                    .map(|i| ShotPlan {
                        origin: ctx.position,
                        angle_deg: angle_deg + i as f64 * 120.0,
                    })
                    .collect()
            }
            BossManeuver::Strafe { .. } => {
                if rng.gen::<f64>() < BOSS_STRAFE_FIRE_CHANCE {
                    behavior.attack_cooldown_ms = BOSS_STRAFE_FIRE_COOLDOWN_MS;
                    return BOSS_STRAFE_SPREAD
                        .iter()
                        .map(|dx| ShotPlan {
                            origin: muzzle.offset(*dx, 0.0),
                            angle_deg: 0.0,
                        })
                        .collect();
                }
                Vec::new()
            }
        },
        _ => {
            if rng.gen::<f64>() < ctx.fire_chance * 2.0 {
                behavior.attack_cooldown_ms = BOSS_IDLE_FIRE_COOLDOWN_MS;
                return vec![ShotPlan {
                    origin: muzzle,
                    angle_deg: 0.0,
                }];
            }
            Vec::new()
        }
    }
}

/// Decide whether a boss projects a tractor beam this tick. Sets the beam
/// cooldown when it does.
pub fn should_project_beam<R: Rng + ?Sized>(
    kind: EnemyKind,
    behavior: &mut Behavior,
    capture_in_progress: bool,
    rng: &mut R,
) -> bool {
    if kind != EnemyKind::Boss
        || behavior.state != BehaviorState::FormationIdle
        || behavior.beam_cooldown_ms > 0.0
        || capture_in_progress
    {
        return false;
    }
    if rng.gen::<f64>() < TRACTOR_BEAM_CHANCE {
        behavior.beam_cooldown_ms = TRACTOR_BEAM_COOLDOWN_MS;
        return true;
    }
    false
}
