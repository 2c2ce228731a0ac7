//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus the session state they
//! need. Per-entity state lives in components; per-session state lives in
//! [`crate::session::Session`].

pub mod cleanup;
pub mod collision;
pub mod enemy_behavior;
pub mod kills;
pub mod movement;
pub mod player_control;
pub mod projectiles;
pub mod snapshot;
pub mod ultimate;
pub mod wave_spawner;
