//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position on the play field (screen units).
/// x grows to the right, y grows downward; entity positions are centers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in screen units per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed session time in milliseconds. Sampled once per tick; every
    /// timer in the session compares against this value.
    pub elapsed_ms: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Copy of this position shifted by (dx, dy).
    pub fn offset(&self, dx: f64, dy: f64) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Speed magnitude (units per tick).
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Velocity of magnitude `speed` along `angle_deg`, where 0° points
    /// straight up the screen and positive angles lean right.
    pub fn upward(angle_deg: f64, speed: f64) -> Self {
        let a = angle_deg.to_radians();
        Self::new(a.sin() * speed, -a.cos() * speed)
    }

    /// Velocity of magnitude `speed` along `angle_deg`, where 0° points
    /// straight down the screen.
    pub fn downward(angle_deg: f64, speed: f64) -> Self {
        let a = angle_deg.to_radians();
        Self::new(a.sin() * speed, a.cos() * speed)
    }

    /// Heading in radians measured from "up the screen", clockwise.
    pub fn heading(&self) -> f64 {
        self.x.atan2(-self.y)
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl SimTime {
    /// Milliseconds per tick at the fixed tick rate.
    pub fn dt_ms(&self) -> f64 {
        crate::constants::TICK_MS
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_ms += self.dt_ms();
    }
}

/// Axis-aligned hitbox, centered on its entity's position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f64,
    pub height: f64,
}

impl Hitbox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(size: f64) -> Self {
        Self::new(size, size)
    }

    pub fn left(&self, at: &Position) -> f64 {
        at.x - self.width / 2.0
    }

    pub fn right(&self, at: &Position) -> f64 {
        at.x + self.width / 2.0
    }

    pub fn top(&self, at: &Position) -> f64 {
        at.y - self.height / 2.0
    }

    pub fn bottom(&self, at: &Position) -> f64 {
        at.y + self.height / 2.0
    }

    /// Strict rectangle overlap; touching edges do not count.
    pub fn overlaps(&self, at: &Position, other: &Hitbox, other_at: &Position) -> bool {
        self.left(at) < other.right(other_at)
            && other.left(other_at) < self.right(at)
            && self.top(at) < other.bottom(other_at)
            && other.top(other_at) < self.bottom(at)
    }

    /// True once the box lies completely outside the play field.
    pub fn is_off_field(&self, at: &Position) -> bool {
        use crate::constants::{FIELD_HEIGHT, FIELD_WIDTH};
        self.bottom(at) < 0.0
            || self.top(at) > FIELD_HEIGHT
            || self.right(at) < 0.0
            || self.left(at) > FIELD_WIDTH
    }
}
