//! Kill resolution: scoring, meters, effect events and power-up drops for
//! enemies destroyed this tick.

use hecs::World;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyswarm_core::constants::COMBO_ANNOUNCE_THRESHOLD;
use skyswarm_core::enums::*;
use skyswarm_core::events::GameEvent;
use skyswarm_core::types::Position;

use crate::scoring::kill_points;
use crate::session::Session;
use crate::world_setup;

/// One enemy destroyed this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub serial: u32,
    pub kind: EnemyKind,
    pub position: Position,
    pub raw_score: u64,
}

/// How a kill is credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credit {
    /// Shot down: advances the combo, charges the ultimate, rolls a drop.
    Combat,
    /// Swept by the ultimate: flat difficulty-scaled score only.
    Ultimate,
}

/// Draw a drop kind from the weighted table.
pub fn roll_drop_kind(rng: &mut ChaCha8Rng) -> PowerUpKind {
    let table = PowerUpKind::DROP_WEIGHTS;
    match WeightedIndex::new(table.iter().map(|(_, w)| *w)) {
        Ok(dist) => table[dist.sample(rng)].0,
        Err(_) => PowerUpKind::Speed,
    }
}

/// Apply every kill in order. Combo state advances once per kill, so each
/// kill is scored with the multiplier current at that kill.
pub fn resolve(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    session: &mut Session,
    kills: &[Kill],
    credit: Credit,
) {
    let now = session.now_ms;
    let score_multiplier = session.difficulty.score_multiplier;

    for kill in kills {
        let points = match credit {
            Credit::Combat => {
                let combo = session.combo.on_kill(now);
                session.ultimate.add_kill();
                kill_points(kill.raw_score, combo, score_multiplier)
            }
            Credit::Ultimate => kill_points(kill.raw_score, 1.0, score_multiplier),
        };
        session.award(points);
        session.score.enemies_destroyed += 1;

        let boss = kill.kind.is_boss();
        let level = if boss {
            EffectLevel::Large
        } else {
            EffectLevel::Small
        };
        session.emit(GameEvent::EnemyDestroyed {
            serial: kill.serial,
            kind: kill.kind,
            position: kill.position,
            score: points,
        });
        session.emit(GameEvent::Explosion {
            position: kill.position,
            large: boss,
        });
        session.emit(GameEvent::ScreenShake { level });
        session.emit(GameEvent::Flash { level });

        if credit == Credit::Combat && session.combo.is_active() {
            let count = session.combo.count;
            session.emit(GameEvent::ComboUpdated {
                count,
                multiplier: session.combo.multiplier(),
            });
            if count >= COMBO_ANNOUNCE_THRESHOLD {
                session.emit(GameEvent::Message {
                    text: format!("{count} COMBO! x{:.1}", session.combo.multiplier()),
                });
            }
        }

        let drop = if boss {
            PowerUpKind::BOSS_POOL.choose(rng).copied()
        } else if credit == Credit::Combat
            && rng.gen::<f64>() < session.difficulty.powerup_drop_chance
        {
            Some(roll_drop_kind(rng))
        } else {
            None
        };
        if let Some(kind) = drop {
            world_setup::spawn_powerup(world, &mut session.next_serial, kind, kill.position, now);
        }
    }

    if !kills.is_empty() {
        session.emit(GameEvent::Sound {
            cue: SoundCue::Explosion,
        });
    }
}
