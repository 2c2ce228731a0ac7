//! Field-clearing ultimate: trigger and per-tick blast sweep.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use skyswarm_core::components::{Behavior, BehaviorState, Enemy, Health, Serial};
use skyswarm_core::constants::ULTIMATE_DAMAGE;
use skyswarm_core::enums::{EffectLevel, SoundCue};
use skyswarm_core::events::GameEvent;
use skyswarm_core::types::Position;

use crate::scoring::NuclearBomb;
use crate::session::Session;
use crate::systems::collision;
use crate::systems::kills::{self, Credit, Kill};

/// Fire the ultimate if the meter is full and no blast is running.
pub fn trigger(session: &mut Session) -> bool {
    if session.bomb.is_some() || !session.ultimate.use_charge() {
        return false;
    }
    session.bomb = Some(NuclearBomb::new(session.now_ms));
    log::debug!("ultimate fired at {:.0} ms", session.now_ms);
    session.emit(GameEvent::UltimateFired);
    session.emit(GameEvent::Message {
        text: "NUCLEAR BOMB!".to_string(),
    });
    session.emit(GameEvent::Flash {
        level: EffectLevel::Large,
    });
    session.emit(GameEvent::ScreenShake {
        level: EffectLevel::Large,
    });
    session.emit(GameEvent::Sound {
        cue: SoundCue::Explosion,
    });
    true
}

/// Destroy every live enemy inside the blast's current radius.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, session: &mut Session) {
    let Some(bomb) = session.bomb else {
        return;
    };
    let now = session.now_ms;
    let radius = bomb.radius(now);

    let mut swept: Vec<Kill> = Vec::new();
    let mut captive_lost = false;
    for (_entity, (serial, enemy, health, behavior, position)) in world.query_mut::<(
        &Serial,
        &Enemy,
        &mut Health,
        &mut Behavior,
        &Position,
    )>() {
        if behavior.state == BehaviorState::Dead || bomb.center.range_to(position) > radius {
            continue;
        }
        if health.take_damage(ULTIMATE_DAMAGE) {
            behavior.state = BehaviorState::Dead;
            captive_lost |= enemy.holds_captive;
            swept.push(Kill {
                serial: serial.0,
                kind: enemy.kind,
                position: Position::new(position.x, position.y),
                raw_score: enemy.score_value,
            });
        }
    }
    swept.sort_unstable_by_key(|kill| kill.serial);

    if captive_lost {
        session.pilot.captive_held = collision::any_captive_held(world);
    }
    kills::resolve(world, rng, session, &swept, Credit::Ultimate);

    if bomb.is_finished(now) {
        session.bomb = None;
    }
}
