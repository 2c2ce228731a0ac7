//! Stacking power-up buffs carried by the player ship.
//!
//! Each buff has a level (capped at 3) and an expiry timestamp. Derived
//! values (speed multiplier, shot count, fire delay) are computed from the
//! current levels on demand, never cached.

use skyswarm_core::constants::*;
use skyswarm_core::enums::PowerUpKind;
use skyswarm_core::state::BuffView;

/// One timed, levelled buff.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Buff {
    pub level: u32,
    pub expires_at_ms: f64,
}

impl Buff {
    fn stack(&mut self, now_ms: f64, duration_ms: f64) {
        self.level = (self.level + 1).min(BUFF_MAX_LEVEL);
        self.expires_at_ms = now_ms + duration_ms;
    }

    fn expire(&mut self, now_ms: f64) {
        if self.level > 0 && now_ms > self.expires_at_ms {
            *self = Buff::default();
        }
    }
}

/// All buffs the player currently holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerBuffs {
    pub speed: Buff,
    pub power: Buff,
    pub multi_shot: Buff,
    /// Level doubles as the remaining shield charges.
    pub shield: Buff,
    pub rapid_fire: Buff,
}

/// Duration granted by picking up `kind`. Extra life is instant.
pub fn duration_ms(kind: PowerUpKind) -> f64 {
    match kind {
        PowerUpKind::Speed => SPEED_BUFF_DURATION_MS,
        PowerUpKind::ShotPower => POWER_BUFF_DURATION_MS,
        PowerUpKind::MultiShot => MULTI_SHOT_DURATION_MS,
        PowerUpKind::Shield => SHIELD_DURATION_MS,
        PowerUpKind::RapidFire => RAPID_FIRE_DURATION_MS,
        PowerUpKind::ExtraLife => 0.0,
    }
}

impl PlayerBuffs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every buff.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Stack a picked-up power-up and return its display label.
    /// Extra life does not touch the buffs; the caller grants the life.
    pub fn apply(&mut self, kind: PowerUpKind, now_ms: f64) -> String {
        let duration = duration_ms(kind);
        match kind {
            PowerUpKind::Speed => {
                self.speed.stack(now_ms, duration);
                format!("SPEED x{:.1}!", self.speed_multiplier())
            }
            PowerUpKind::ShotPower => {
                self.power.stack(now_ms, duration);
                format!("POWER x{}!", self.shot_power())
            }
            PowerUpKind::MultiShot => {
                self.multi_shot.stack(now_ms, duration);
                format!("{}-WAY SHOT!", self.shot_count())
            }
            PowerUpKind::Shield => {
                self.shield.stack(now_ms, duration);
                format!("SHIELD x{}!", self.shield.level)
            }
            PowerUpKind::RapidFire => {
                self.rapid_fire.stack(now_ms, duration);
                format!("RAPID LV{}!", self.rapid_fire.level)
            }
            PowerUpKind::ExtraLife => "1UP!".to_string(),
        }
    }

    /// Expire buffs whose time ran out. Expiry is strict: a buff is still
    /// active at exactly its expiry timestamp.
    pub fn update(&mut self, now_ms: f64) {
        self.speed.expire(now_ms);
        self.power.expire(now_ms);
        self.multi_shot.expire(now_ms);
        self.shield.expire(now_ms);
        self.rapid_fire.expire(now_ms);
    }

    pub fn speed_multiplier(&self) -> f64 {
        1.0 + self.speed.level as f64 * SPEED_BUFF_STEP
    }

    /// Damage multiplier for player shots.
    pub fn shot_power(&self) -> i32 {
        1 + self.power.level as i32
    }

    /// Number of bullets in the multi-shot fan (1 when inactive).
    pub fn shot_count(&self) -> u32 {
        1 + self.multi_shot.level * 2
    }

    /// Fire delay after rapid-fire reduction.
    pub fn fire_delay_ms(&self, base_ms: f64) -> f64 {
        base_ms / (1 + self.rapid_fire.level) as f64
    }

    pub fn shield_active(&self) -> bool {
        self.shield.level > 0
    }

    /// Spend one shield charge. Returns false when no shield was up.
    pub fn use_shield(&mut self) -> bool {
        if self.shield.level == 0 {
            return false;
        }
        self.shield.level -= 1;
        if self.shield.level == 0 {
            self.shield = Buff::default();
        }
        true
    }

    pub fn view(&self) -> BuffView {
        BuffView {
            speed_level: self.speed.level,
            power_level: self.power.level,
            multi_shot_level: self.multi_shot.level,
            shield_count: self.shield.level,
            rapid_level: self.rapid_fire.level,
            speed_multiplier: self.speed_multiplier(),
            shot_count: self.shot_count(),
        }
    }
}
