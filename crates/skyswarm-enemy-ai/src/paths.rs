//! Entry flight paths.
//!
//! Every path starts just above the field and ends at the enemy's
//! formation anchor.

use std::f64::consts::PI;

use skyswarm_core::constants::*;
use skyswarm_core::enums::PathShape;
use skyswarm_core::types::Position;

/// Build the waypoint list for an entry path starting at `start_x`.
pub fn build_entry_path(shape: PathShape, start_x: f64, anchor: Position) -> Vec<Position> {
    let mut waypoints: Vec<Position> = match shape {
        PathShape::Circle => {
            let center = Position::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 4.0);
            (0..CIRCLE_PATH_STEPS)
                .map(|i| {
                    let angle = PI + PI * i as f64 / CIRCLE_PATH_STEPS as f64;
                    center.offset(
                        angle.cos() * CIRCLE_PATH_RADIUS,
                        angle.sin() * CIRCLE_PATH_RADIUS,
                    )
                })
                .collect()
        }
        PathShape::Zigzag => (0..20)
            .map(|i| {
                let i = i as f64;
                Position::new(start_x + 100.0 * (i * 0.5).sin(), ENEMY_SPAWN_Y + i * 30.0)
            })
            .collect(),
        PathShape::FastDive => (0..10)
            .map(|i| {
                let i = i as f64;
                Position::new(start_x + 50.0 * (i * 0.3).sin(), ENEMY_SPAWN_Y + i * 50.0)
            })
            .collect(),
        PathShape::Straight => (0..15)
            .map(|i| Position::new(start_x, ENEMY_SPAWN_Y + i as f64 * 30.0))
            .collect(),
    };
    waypoints.push(anchor);
    waypoints
}
