//! Projectile subsystem: advances bullets and retires those leaving the field.

use std::f64::consts::PI;

use glam::DVec2;
use hecs::World;

use skyswarm_core::components::{Behavior, BehaviorState, Enemy, Projectile, Serial};
use skyswarm_core::constants::*;
use skyswarm_core::enums::Faction;
use skyswarm_core::types::{Hitbox, Position, Velocity};

/// Whether a projectile may still damage the enemy with `serial`.
/// Piercing shots damage each enemy at most once.
pub fn can_hit(projectile: &Projectile, serial: u32) -> bool {
    !projectile.piercing || !projectile.hits.contains(&serial)
}

/// Serial and position of every live enemy.
pub fn live_enemies(world: &World) -> Vec<(u32, Position)> {
    let mut enemies: Vec<(u32, Position)> = world
        .query::<(&Serial, &Enemy, &Behavior, &Position)>()
        .iter()
        .filter(|(_, (_, _, behavior, _))| behavior.state != BehaviorState::Dead)
        .map(|(_, (serial, _, _, pos))| (serial.0, *pos))
        .collect();
    enemies.sort_unstable_by_key(|(serial, _)| *serial);
    enemies
}

fn nearest(from: &Position, enemies: &[(u32, Position)]) -> Option<(u32, Position)> {
    enemies
        .iter()
        .min_by(|a, b| from.range_to(&a.1).total_cmp(&from.range_to(&b.1)))
        .copied()
}

/// Turn `velocity` a fraction of the way toward `target`, keeping `speed`.
fn steer(position: &Position, velocity: &mut Velocity, target: &Position, speed: f64) {
    let to_target: DVec2 = target.to_vec() - position.to_vec();
    if to_target == DVec2::ZERO {
        return;
    }
    let desired = to_target.x.atan2(-to_target.y);
    let current = velocity.heading();
    let mut delta = desired - current;
    while delta > PI {
        delta -= 2.0 * PI;
    }
    while delta < -PI {
        delta += 2.0 * PI;
    }
    let heading = current + delta * HOMING_TURN_RATE;
    *velocity = Velocity::new(heading.sin() * speed, -heading.cos() * speed);
}

/// Advance one projectile by `dt_ticks` ticks.
pub fn advance(
    projectile: &mut Projectile,
    position: &mut Position,
    velocity: &mut Velocity,
    live_enemies: &[(u32, Position)],
    dt_ticks: f64,
) {
    if projectile.homing && projectile.faction == Faction::Player {
        // Keep the current target while it lives, otherwise take the nearest.
        let tracked = projectile
            .homing_target
            .and_then(|serial| live_enemies.iter().find(|(s, _)| *s == serial).copied());
        let target = tracked.or_else(|| nearest(position, live_enemies));
        projectile.homing_target = target.map(|(serial, _)| serial);
        if let Some((_, target_pos)) = target {
            steer(position, velocity, &target_pos, projectile.base_speed);
        }
    }

    position.x += velocity.x * dt_ticks;
    position.y += velocity.y * dt_ticks;

    if projectile.wave_pattern {
        projectile.wave_phase += WAVE_PHASE_STEP * dt_ticks;
        position.x += projectile.wave_phase.sin() * WAVE_AMPLITUDE * WAVE_DRIFT_SCALE * dt_ticks;
    }
}

/// Advance every live projectile one tick; mark off-field ones spent.
pub fn run(world: &mut World) {
    let enemies = live_enemies(world);
    for (_entity, (projectile, position, velocity, hitbox)) in
        world.query_mut::<(&mut Projectile, &mut Position, &mut Velocity, &Hitbox)>()
    {
        if projectile.spent {
            continue;
        }
        advance(projectile, position, velocity, &enemies, 1.0);
        if hitbox.is_off_field(position) {
            projectile.spent = true;
        }
    }
}
