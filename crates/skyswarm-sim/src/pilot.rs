//! Player ship status that outlives the ship entity: lives, weapon,
//! wingman, invulnerability, capture bookkeeping.
//!
//! Stored in `SimulationEngine`, NOT as ECS components, because a captured
//! ship is despawned and respawned while its status carries over.

use skyswarm_core::constants::*;
use skyswarm_core::enums::{HitOutcome, WeaponKind};
use skyswarm_core::weapons::describe;

use crate::buffs::PlayerBuffs;

/// Tractor-beam capture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capture {
    /// Beam holding the ship.
    pub beam: hecs::Entity,
    /// Serial of the boss that projected the beam.
    pub boss: u32,
    pub started_ms: f64,
}

#[derive(Debug, Clone)]
pub struct PilotStatus {
    pub lives: u32,
    pub weapon: WeaponKind,
    pub double_fighter: bool,
    pub invulnerable_until_ms: f64,
    pub last_shot_ms: Option<f64>,
    pub capture: Option<Capture>,
    /// A captured ship is held by a boss and can be rescued.
    pub captive_held: bool,
}

impl PilotStatus {
    pub fn new(lives: u32) -> Self {
        Self {
            lives,
            weapon: WeaponKind::default(),
            double_fighter: false,
            invulnerable_until_ms: 0.0,
            last_shot_ms: None,
            capture: None,
            captive_held: false,
        }
    }

    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        now_ms < self.invulnerable_until_ms
    }

    pub fn add_life(&mut self) {
        self.lives = (self.lives + 1).min(PLAYER_MAX_LIVES);
    }

    /// Run one hit through the damage chain: invulnerability, shield,
    /// wingman, then a life.
    pub fn apply_hit(&mut self, buffs: &mut PlayerBuffs, now_ms: f64) -> HitOutcome {
        if self.is_invulnerable(now_ms) {
            return HitOutcome::Ignored;
        }

        if buffs.use_shield() {
            self.invulnerable_until_ms = now_ms + PLAYER_INVULNERABLE_MS;
            return HitOutcome::ShieldAbsorbed;
        }

        if self.double_fighter {
            self.double_fighter = false;
            self.invulnerable_until_ms = now_ms + PLAYER_INVULNERABLE_MS;
            return HitOutcome::WingmanLost;
        }

        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            return HitOutcome::Destroyed;
        }
        self.invulnerable_until_ms = now_ms + PLAYER_INVULNERABLE_MS;
        buffs.reset();
        HitOutcome::LifeLost
    }

    /// Current fire delay for the equipped weapon.
    pub fn fire_delay_ms(&self, buffs: &PlayerBuffs) -> f64 {
        buffs.fire_delay_ms(describe(self.weapon).cooldown_ms)
    }

    pub fn ready_to_fire(&self, buffs: &PlayerBuffs, now_ms: f64) -> bool {
        match self.last_shot_ms {
            Some(last) => now_ms - last >= self.fire_delay_ms(buffs),
            None => true,
        }
    }

    /// Step through the weapon roster; returns the new weapon's name.
    pub fn cycle_weapon(&mut self, direction: i32) -> &'static str {
        self.weapon = self.weapon.cycled(direction);
        describe(self.weapon).name
    }
}
