//! Score, kill-streak combo, and ultimate meter state tracked by the engine.

use skyswarm_core::constants::*;
use skyswarm_core::types::Position;

/// Combo multiplier for a streak length.
pub fn combo_multiplier(streak: u32) -> f64 {
    match streak {
        0..=1 => 1.0,
        2..=5 => 1.5,
        6..=10 => 2.0,
        11..=20 => 3.0,
        21..=50 => 4.0,
        _ => 5.0,
    }
}

/// Kill-streak tracker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComboTracker {
    pub count: u32,
    pub last_kill_ms: Option<f64>,
    pub max_combo: u32,
}

impl ComboTracker {
    /// Register a kill at `now_ms`; returns the multiplier for that kill.
    pub fn on_kill(&mut self, now_ms: f64) -> f64 {
        self.count = match self.last_kill_ms {
            Some(last) if now_ms - last < COMBO_TIMEOUT_MS => self.count + 1,
            _ => 1,
        };
        self.last_kill_ms = Some(now_ms);
        self.max_combo = self.max_combo.max(self.count);
        combo_multiplier(self.count)
    }

    /// Drop the streak once the timeout window has elapsed.
    pub fn tick(&mut self, now_ms: f64) {
        if let Some(last) = self.last_kill_ms {
            if self.count > 0 && now_ms - last >= COMBO_TIMEOUT_MS {
                self.count = 0;
            }
        }
    }

    pub fn multiplier(&self) -> f64 {
        combo_multiplier(self.count)
    }

    /// A streak worth showing (two or more kills).
    pub fn is_active(&self) -> bool {
        self.count >= 2
    }
}

/// Charge meter gating the field-clearing ultimate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UltimateMeter {
    pub charge: u32,
}

impl UltimateMeter {
    pub fn add_kill(&mut self) {
        self.charge = (self.charge + ULTIMATE_CHARGE_PER_KILL).min(ULTIMATE_CHARGE_MAX);
    }

    pub fn can_use(&self) -> bool {
        self.charge >= ULTIMATE_CHARGE_MAX
    }

    /// Spend the full meter. Returns false (and changes nothing) when not full.
    pub fn use_charge(&mut self) -> bool {
        if !self.can_use() {
            return false;
        }
        self.charge = 0;
        true
    }
}

/// Field-clearing blast in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NuclearBomb {
    pub center: Position,
    pub started_ms: f64,
}

impl NuclearBomb {
    pub fn new(started_ms: f64) -> Self {
        Self {
            center: Position::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0),
            started_ms,
        }
    }

    /// Fraction of the blast elapsed, clamped to [0, 1].
    pub fn progress(&self, now_ms: f64) -> f64 {
        ((now_ms - self.started_ms) / ULTIMATE_DURATION_MS).clamp(0.0, 1.0)
    }

    pub fn radius(&self, now_ms: f64) -> f64 {
        ULTIMATE_MAX_RADIUS * self.progress(now_ms)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.started_ms >= ULTIMATE_DURATION_MS
    }
}

/// Running score for the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreState {
    pub score: u64,
    pub high_score: u64,
    pub enemies_destroyed: u32,
    pub rescues: u32,
}

impl ScoreState {
    /// Add points; returns true when this pushed the score past the high score.
    pub fn add(&mut self, points: u64) -> bool {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            return true;
        }
        false
    }
}

/// Points for one kill after combo and difficulty multipliers, truncated.
pub fn kill_points(raw: u64, combo_multiplier: f64, difficulty_multiplier: f64) -> u64 {
    (raw as f64 * combo_multiplier * difficulty_multiplier).trunc() as u64
}
