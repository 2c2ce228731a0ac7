//! Cleanup system: compacts the world at the end of a tick, removing every
//! entity marked dead, spent, collected, or destroyed during the tick.

use hecs::{Entity, World};

use skyswarm_core::components::{Behavior, BehaviorState, PowerUp, Projectile, TractorBeam};

/// Despawn marked entities. Uses a pre-allocated buffer to avoid per-tick
/// allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, behavior) in world.query_mut::<&Behavior>() {
        if behavior.state == BehaviorState::Dead {
            despawn_buffer.push(entity);
        }
    }

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        if projectile.spent {
            despawn_buffer.push(entity);
        }
    }

    for (entity, powerup) in world.query_mut::<&PowerUp>() {
        if powerup.removed {
            despawn_buffer.push(entity);
        }
    }

    for (entity, beam) in world.query_mut::<&TractorBeam>() {
        if beam.destroyed {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
