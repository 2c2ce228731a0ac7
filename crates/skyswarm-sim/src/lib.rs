//! Gameplay simulation for Skyswarm.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the host.

pub mod buffs;
pub mod engine;
pub mod pilot;
pub mod ranking;
pub mod scoring;
pub mod session;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use skyswarm_core as core;

#[cfg(test)]
mod tests;
