//! Movement of the passive falling entities: tractor beams and power-up pickups.

use hecs::World;

use skyswarm_core::components::{PowerUp, TractorBeam};
use skyswarm_core::constants::*;
use skyswarm_core::types::{Hitbox, Position};

/// Beams slide down until they latch onto the ship or leave the field.
pub fn run_beams(world: &mut World) {
    for (_entity, (beam, position, hitbox)) in
        world.query_mut::<(&mut TractorBeam, &mut Position, &Hitbox)>()
    {
        if beam.destroyed || beam.capturing {
            continue;
        }
        position.y += TRACTOR_BEAM_SPEED;
        if hitbox.top(position) > FIELD_HEIGHT {
            beam.destroyed = true;
        }
    }
}

/// Whether a pickup of age `age_ms` is drawn this tick.
pub fn blink_visible(age_ms: f64) -> bool {
    if age_ms < POWERUP_BLINK_AFTER_MS {
        return true;
    }
    ((age_ms / POWERUP_BLINK_PERIOD_MS) as u64) % 2 == 0
}

/// Pickups fall, blink near the end of their life, and expire.
pub fn run_pickups(world: &mut World, now_ms: f64) {
    for (_entity, (powerup, position, hitbox)) in
        world.query_mut::<(&mut PowerUp, &mut Position, &Hitbox)>()
    {
        if powerup.removed {
            continue;
        }
        position.y += POWERUP_FALL_SPEED;
        let age = now_ms - powerup.spawned_at_ms;
        powerup.visible = blink_visible(age);
        if age >= POWERUP_LIFETIME_MS || hitbox.top(position) > FIELD_HEIGHT {
            powerup.removed = true;
        }
    }
}
