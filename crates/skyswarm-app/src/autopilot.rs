//! Scripted pilot used by the headless runner.
//!
//! Reads only the published snapshot, the same view a human player gets,
//! and produces the keyboard state for the next tick.

use skyswarm_core::commands::{HeldKeys, KeyPress, TickInput};
use skyswarm_core::enums::{Faction, GamePhase};
use skyswarm_core::state::GameStateSnapshot;
use skyswarm_core::types::Position;

/// How far above the ship an enemy bullet counts as incoming.
const THREAT_RANGE: f64 = 120.0;
/// Horizontal distance inside which a bullet is on a collision course.
const THREAT_HALF_WIDTH: f64 = 30.0;
/// Horizontal error tolerated before steering.
const DEADZONE: f64 = 6.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl Autopilot {
    pub fn new() -> Self {
        Self
    }

    /// Keyboard state for the next tick.
    pub fn decide(&self, snapshot: &GameStateSnapshot) -> TickInput {
        if snapshot.phase != GamePhase::Playing {
            return TickInput::idle();
        }
        let Some(player) = &snapshot.player else {
            return TickInput::idle();
        };
        if player.being_captured {
            return TickInput::idle();
        }

        let ship = player.position;
        let mut held = HeldKeys {
            fire: true,
            ..Default::default()
        };

        if let Some(dx) = nearest_threat(snapshot, &ship) {
            // Step away from the bullet's side.
            if dx >= 0.0 {
                held.left = true;
            } else {
                held.right = true;
            }
        } else if let Some(target_x) = target_column(snapshot, &ship) {
            let dx = target_x - ship.x;
            if dx > DEADZONE {
                held.right = true;
            } else if dx < -DEADZONE {
                held.left = true;
            }
        }

        let mut input = TickInput::holding(held);
        if snapshot.hud.ultimate_ready && snapshot.bomb.is_none() {
            input.presses.push(KeyPress::Ultimate);
        }
        input
    }
}

/// Horizontal offset (bullet minus ship) of the closest incoming enemy bullet.
fn nearest_threat(snapshot: &GameStateSnapshot, ship: &Position) -> Option<f64> {
    snapshot
        .projectiles
        .iter()
        .filter(|p| p.faction == Faction::Enemy)
        .filter(|p| {
            let above = ship.y - p.position.y;
            (0.0..=THREAT_RANGE).contains(&above)
                && (p.position.x - ship.x).abs() < THREAT_HALF_WIDTH
        })
        .min_by(|a, b| b.position.y.total_cmp(&a.position.y))
        .map(|p| p.position.x - ship.x)
}

/// Column to line up under: a visible pickup first, else the nearest enemy.
fn target_column(snapshot: &GameStateSnapshot, ship: &Position) -> Option<f64> {
    let by_distance = |a: &Position, b: &Position| {
        (a.x - ship.x).abs().total_cmp(&(b.x - ship.x).abs())
    };

    snapshot
        .powerups
        .iter()
        .filter(|p| p.visible)
        .map(|p| p.position)
        .min_by(by_distance)
        .or_else(|| {
            snapshot
                .enemies
                .iter()
                .map(|e| e.position)
                .min_by(by_distance)
        })
        .map(|p| p.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyswarm_core::enums::{EnemyKind, PowerUpKind};
    use skyswarm_core::state::{EnemyStateView, EnemyView, PlayerView, PowerUpView, ProjectileView};
    use skyswarm_core::types::Velocity;

    fn playing(ship: Position) -> GameStateSnapshot {
        GameStateSnapshot {
            phase: GamePhase::Playing,
            player: Some(PlayerView {
                position: ship,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn enemy_at(x: f64, y: f64) -> EnemyView {
        EnemyView {
            serial: 1,
            kind: EnemyKind::Normal,
            position: Position::new(x, y),
            width: 30.0,
            height: 30.0,
            hp: 1,
            max_hp: 1,
            state: EnemyStateView::Formation,
            is_split_child: false,
            holds_captive: false,
            flashed: false,
        }
    }

    fn enemy_bullet(x: f64, y: f64) -> ProjectileView {
        ProjectileView {
            serial: 2,
            faction: Faction::Enemy,
            weapon: None,
            position: Position::new(x, y),
            velocity: Velocity::new(0.0, 5.0),
            color: (255, 0, 0),
        }
    }

    #[test]
    fn test_idle_outside_play() {
        let mut snap = playing(Position::new(360.0, 900.0));
        snap.phase = GamePhase::Title;
        assert_eq!(Autopilot::new().decide(&snap), TickInput::idle());
    }

    #[test]
    fn test_always_fires_and_tracks_enemy() {
        let mut snap = playing(Position::new(360.0, 900.0));
        snap.enemies.push(enemy_at(200.0, 200.0));
        let input = Autopilot::new().decide(&snap);
        assert!(input.held.fire);
        assert!(input.held.left);
        assert!(!input.held.right);
    }

    #[test]
    fn test_holds_still_inside_deadzone() {
        let mut snap = playing(Position::new(360.0, 900.0));
        snap.enemies.push(enemy_at(363.0, 200.0));
        let input = Autopilot::new().decide(&snap);
        assert!(!input.held.left && !input.held.right);
    }

    #[test]
    fn test_dodges_incoming_bullet() {
        let mut snap = playing(Position::new(360.0, 900.0));
        snap.enemies.push(enemy_at(100.0, 200.0));
        snap.projectiles.push(enemy_bullet(350.0, 850.0));
        let input = Autopilot::new().decide(&snap);
        assert!(input.held.right, "bullet on the left, step right");

        // Far above the ship is not yet a threat.
        let mut snap = playing(Position::new(360.0, 900.0));
        snap.projectiles.push(enemy_bullet(350.0, 500.0));
        let input = Autopilot::new().decide(&snap);
        assert!(!input.held.left && !input.held.right);
    }

    #[test]
    fn test_prefers_visible_pickup() {
        let mut snap = playing(Position::new(360.0, 900.0));
        snap.enemies.push(enemy_at(350.0, 200.0));
        snap.powerups.push(PowerUpView {
            serial: 3,
            kind: PowerUpKind::Speed,
            position: Position::new(500.0, 700.0),
            visible: true,
        });
        assert!(Autopilot::new().decide(&snap).held.right);

        snap.powerups[0].visible = false;
        let input = Autopilot::new().decide(&snap);
        assert!(!input.held.right);
    }

    #[test]
    fn test_presses_ultimate_when_ready() {
        let mut snap = playing(Position::new(360.0, 900.0));
        snap.hud.ultimate_ready = true;
        let input = Autopilot::new().decide(&snap);
        assert_eq!(input.presses, vec![KeyPress::Ultimate]);
    }
}
