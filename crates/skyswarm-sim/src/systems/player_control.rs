//! Player ship system: movement from held keys and weapon fire.

use hecs::World;

use skyswarm_core::commands::HeldKeys;
use skyswarm_core::components::PlayerShip;
use skyswarm_core::constants::*;
use skyswarm_core::enums::SoundCue;
use skyswarm_core::events::GameEvent;
use skyswarm_core::types::{Hitbox, Position};
use skyswarm_core::weapons::describe;

use crate::buffs::PlayerBuffs;
use crate::pilot::PilotStatus;
use crate::session::Session;
use crate::world_setup;

/// Muzzle points and launch angles for one trigger pull. Priority:
/// multi-shot fan, spread weapon, double-fighter twin shot, single shot.
pub fn shot_layout(
    pilot: &PilotStatus,
    buffs: &PlayerBuffs,
    position: &Position,
    hitbox: &Hitbox,
) -> Vec<(Position, f64)> {
    let muzzle = Position::new(position.x, hitbox.top(position));
    let fan = |count: u32| -> Vec<(Position, f64)> {
        let half = (count / 2) as i32;
        (-half..=half).map(|i| (muzzle, i as f64 * 15.0)).collect()
    };

    let shot_count = buffs.shot_count();
    if shot_count > 1 {
        return fan(shot_count);
    }
    if describe(pilot.weapon).spread {
        return fan(5);
    }
    if pilot.double_fighter {
        return vec![
            (
                Position::new(hitbox.left(position) + TWIN_SHOT_INSET, muzzle.y),
                0.0,
            ),
            (
                Position::new(hitbox.right(position) - TWIN_SHOT_INSET, muzzle.y),
                0.0,
            ),
        ];
    }
    vec![(muzzle, 0.0)]
}

/// Move the ship and fire if the trigger is held. A ship held in a tractor
/// beam ignores input.
pub fn run(world: &mut World, session: &mut Session, held: &HeldKeys) {
    if session.pilot.capture.is_some() {
        return;
    }

    let Some((position, hitbox)) = move_ship(world, session, held) else {
        return;
    };

    let now = session.now_ms;
    if !held.fire || !session.pilot.ready_to_fire(&session.buffs, now) {
        return;
    }
    session.pilot.last_shot_ms = Some(now);

    let damage = describe(session.pilot.weapon).damage * session.buffs.shot_power();
    let weapon = session.pilot.weapon;
    for (origin, angle) in shot_layout(&session.pilot, &session.buffs, &position, &hitbox) {
        world_setup::spawn_player_shot(world, &mut session.next_serial, weapon, origin, angle, damage);
    }
    session.emit(GameEvent::Sound {
        cue: SoundCue::Shoot,
    });
}

fn move_ship(world: &mut World, session: &Session, held: &HeldKeys) -> Option<(Position, Hitbox)> {
    let speed = session.difficulty.player_speed * session.buffs.speed_multiplier();
    let (_, (_, position, hitbox)) = world
        .query_mut::<(&PlayerShip, &mut Position, &Hitbox)>()
        .into_iter()
        .next()?;

    let mut dx = 0.0;
    let mut dy = 0.0;
    if held.left {
        dx -= speed;
    }
    if held.right {
        dx += speed;
    }
    if held.up {
        dy -= speed;
    }
    if held.down {
        dy += speed;
    }

    // Horizontally anywhere on the field, vertically the lower half only.
    let half_w = hitbox.width / 2.0;
    let half_h = hitbox.height / 2.0;
    position.x = (position.x + dx).clamp(half_w, FIELD_WIDTH - half_w);
    position.y = (position.y + dy).clamp(
        FIELD_HEIGHT / 2.0 + half_h,
        FIELD_HEIGHT - PLAYER_BOTTOM_MARGIN - half_h,
    );

    Some((*position, *hitbox))
}
