//! Enemy behavior finite state machine.
//!
//! Pure functions that compute state transitions and movement for one
//! enemy from its kind, current state, and situation. No ECS dependency;
//! randomness comes from the caller's RNG so sessions stay reproducible.

use glam::DVec2;
use rand::Rng;

use skyswarm_core::components::{BehaviorState, BossManeuver};
use skyswarm_core::constants::*;
use skyswarm_core::enums::{BossPatternKind, EnemyKind, PathShape};
use skyswarm_core::types::{Hitbox, Position};

use crate::profiles::get_profile;

/// Input to the enemy FSM for a single entity.
pub struct EnemyContext<'a> {
    pub kind: EnemyKind,
    pub is_split_child: bool,
    pub state: BehaviorState,
    pub position: Position,
    pub hitbox: Hitbox,
    pub anchor: Position,
    pub speed: f64,
    pub sway_phase: f64,
    pub path_shape: PathShape,
    pub waypoints: &'a [Position],
    pub path_index: usize,
    /// Player ship position, if a ship is on the field.
    pub player: Option<Position>,
    /// Session clock (ms).
    pub now_ms: f64,
}

/// Notable state changes, reported for logging and events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    JoinedFormation,
    PatternStarted(BossPatternKind),
    PatternEnded,
    KamikazeLaunched,
}

/// Output from the enemy FSM.
#[derive(Debug, Clone, Copy)]
pub struct EnemyUpdate {
    pub position: Position,
    pub state: BehaviorState,
    pub path_index: usize,
    pub transition: Option<Transition>,
    /// The enemy left the bottom of the field and should be removed.
    pub exited_field: bool,
}

/// Pattern kind of a maneuver.
pub fn pattern_kind(maneuver: &BossManeuver) -> BossPatternKind {
    match maneuver {
        BossManeuver::Dive { .. } => BossPatternKind::Dive,
        BossManeuver::Spiral { .. } => BossPatternKind::Spiral,
        BossManeuver::Strafe { .. } => BossPatternKind::Strafe,
    }
}

/// Evaluate the FSM for one enemy.
pub fn evaluate<R: Rng + ?Sized>(ctx: &EnemyContext, rng: &mut R) -> EnemyUpdate {
    match ctx.state {
        BehaviorState::Dead => unchanged(ctx),
        BehaviorState::Entering => evaluate_entering(ctx),
        BehaviorState::FormationIdle => evaluate_idle(ctx, rng),
        BehaviorState::BossPattern {
            maneuver,
            remaining_ms,
        } => evaluate_pattern(ctx, maneuver, remaining_ms),
        BehaviorState::KamikazeChase => evaluate_chase(ctx),
    }
}

fn unchanged(ctx: &EnemyContext) -> EnemyUpdate {
    EnemyUpdate {
        position: ctx.position,
        state: ctx.state,
        path_index: ctx.path_index,
        transition: None,
        exited_field: false,
    }
}

/// Position in formation with the idle sway applied.
pub fn idle_position(anchor: Position, sway_phase: f64, now_ms: f64) -> Position {
    let sway = (now_ms * FORMATION_SWAY_RATE + sway_phase).sin() * FORMATION_SWAY_AMPLITUDE;
    anchor.offset(sway, 0.0)
}

/// Step from `from` toward `to` by at most `speed`, never overshooting.
fn step_toward(from: Position, to: Position, speed: f64) -> Position {
    let delta = to.to_vec() - from.to_vec();
    let distance = delta.length();
    if distance <= speed {
        return to;
    }
    Position::from_vec(from.to_vec() + delta / distance * speed)
}

fn evaluate_entering(ctx: &EnemyContext) -> EnemyUpdate {
    let Some(target) = ctx.waypoints.get(ctx.path_index) else {
        return join_formation(ctx);
    };

    if ctx.position.range_to(target) < PATH_ARRIVAL_THRESHOLD {
        let next = ctx.path_index + 1;
        if next >= ctx.waypoints.len() {
            return join_formation(ctx);
        }
        return EnemyUpdate {
            path_index: next,
            ..unchanged(ctx)
        };
    }

    let profile = get_profile(ctx.kind, ctx.is_split_child);
    let speed = ctx.speed * profile.entry_speed_factor;
    EnemyUpdate {
        position: step_toward(ctx.position, *target, speed),
        ..unchanged(ctx)
    }
}

fn join_formation(ctx: &EnemyContext) -> EnemyUpdate {
    // Kamikazes that flew straight in go for the player immediately.
    if ctx.kind == EnemyKind::Kamikaze && ctx.path_shape == PathShape::Straight {
        return EnemyUpdate {
            position: ctx.anchor,
            state: BehaviorState::KamikazeChase,
            path_index: ctx.waypoints.len(),
            transition: Some(Transition::KamikazeLaunched),
            exited_field: false,
        };
    }

    EnemyUpdate {
        position: ctx.anchor,
        state: BehaviorState::FormationIdle,
        path_index: ctx.waypoints.len(),
        transition: Some(Transition::JoinedFormation),
        exited_field: false,
    }
}

fn evaluate_idle<R: Rng + ?Sized>(ctx: &EnemyContext, rng: &mut R) -> EnemyUpdate {
    let position = idle_position(ctx.anchor, ctx.sway_phase, ctx.now_ms);

    match ctx.kind {
        EnemyKind::Boss if rng.gen::<f64>() < BOSS_PATTERN_CHANCE => {
            let (maneuver, duration) = pick_maneuver(rng);
            EnemyUpdate {
                position,
                state: BehaviorState::BossPattern {
                    maneuver,
                    remaining_ms: duration,
                },
                path_index: ctx.path_index,
                transition: Some(Transition::PatternStarted(pattern_kind(&maneuver))),
                exited_field: false,
            }
        }
        EnemyKind::Kamikaze if rng.gen::<f64>() < KAMIKAZE_ACTIVATION_CHANCE => EnemyUpdate {
            position,
            state: BehaviorState::KamikazeChase,
            path_index: ctx.path_index,
            transition: Some(Transition::KamikazeLaunched),
            exited_field: false,
        },
        _ => EnemyUpdate {
            position,
            ..unchanged(ctx)
        },
    }
}

fn pick_maneuver<R: Rng + ?Sized>(rng: &mut R) -> (BossManeuver, f64) {
    match rng.gen_range(0..3) {
        0 => {
            let x = rng.gen_range(BOSS_DIVE_MARGIN_X..=FIELD_WIDTH - BOSS_DIVE_MARGIN_X);
            let target = Position::new(x, FIELD_HEIGHT - BOSS_DIVE_FLOOR_OFFSET);
            (
                BossManeuver::Dive {
                    target,
                    returning: false,
                },
                BOSS_DIVE_DURATION_MS,
            )
        }
        1 => (
            BossManeuver::Spiral { angle_deg: 0.0 },
            BOSS_SPIRAL_DURATION_MS,
        ),
        _ => {
            let direction = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
            (BossManeuver::Strafe { direction }, BOSS_STRAFE_DURATION_MS)
        }
    }
}

fn evaluate_pattern(ctx: &EnemyContext, maneuver: BossManeuver, remaining_ms: f64) -> EnemyUpdate {
    let remaining_ms = remaining_ms - TICK_MS;
    if remaining_ms <= 0.0 {
        return back_to_formation(ctx, idle_position(ctx.anchor, ctx.sway_phase, ctx.now_ms));
    }

    let continuing = |position: Position, maneuver: BossManeuver| EnemyUpdate {
        position,
        state: BehaviorState::BossPattern {
            maneuver,
            remaining_ms,
        },
        ..unchanged(ctx)
    };

    match maneuver {
        BossManeuver::Dive {
            target,
            returning: false,
        } => {
            let position = step_toward(ctx.position, target, ctx.speed * BOSS_DIVE_SPEED_FACTOR);
            let returning = position.range_to(&target) < BOSS_DIVE_ARRIVAL_THRESHOLD;
            continuing(position, BossManeuver::Dive { target, returning })
        }
        BossManeuver::Dive {
            returning: true, ..
        } => {
            let position = step_toward(ctx.position, ctx.anchor, ctx.speed * BOSS_RETURN_SPEED_FACTOR);
            if position.range_to(&ctx.anchor) < BOSS_DIVE_ARRIVAL_THRESHOLD {
                back_to_formation(ctx, ctx.anchor)
            } else {
                continuing(position, maneuver)
            }
        }
        BossManeuver::Spiral { angle_deg } => {
            let angle_deg = angle_deg + BOSS_SPIRAL_STEP_DEG;
            let a = angle_deg.to_radians();
            let position = ctx
                .anchor
                .offset(a.cos() * BOSS_SPIRAL_RADIUS_X, (a * 0.5).sin() * BOSS_SPIRAL_RADIUS_Y);
            continuing(position, BossManeuver::Spiral { angle_deg })
        }
        BossManeuver::Strafe { mut direction } => {
            let position = ctx
                .position
                .offset(ctx.speed * BOSS_STRAFE_SPEED_FACTOR * direction, 0.0);
            if ctx.hitbox.left(&position) < BOSS_STRAFE_MARGIN {
                direction = 1.0;
            } else if ctx.hitbox.right(&position) > FIELD_WIDTH - BOSS_STRAFE_MARGIN {
                direction = -1.0;
            }
            continuing(position, BossManeuver::Strafe { direction })
        }
    }
}

fn back_to_formation(ctx: &EnemyContext, position: Position) -> EnemyUpdate {
    EnemyUpdate {
        position,
        state: BehaviorState::FormationIdle,
        path_index: ctx.path_index,
        transition: Some(Transition::PatternEnded),
        exited_field: false,
    }
}

fn evaluate_chase(ctx: &EnemyContext) -> EnemyUpdate {
    let speed = ctx.speed * KAMIKAZE_CHASE_FACTOR;
    let step = match ctx.player {
        Some(player) => (player.to_vec() - ctx.position.to_vec()).normalize_or_zero() * speed,
        None => DVec2::new(0.0, speed),
    };
    let position = Position::from_vec(ctx.position.to_vec() + step);
    EnemyUpdate {
        position,
        exited_field: ctx.hitbox.top(&position) > FIELD_HEIGHT,
        ..unchanged(ctx)
    }
}
