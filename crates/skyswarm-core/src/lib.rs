//! Core types and definitions for the SKYSWARM simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, constants, difficulty
//! presets and the weapon catalog. It has no dependency on the ECS,
//! the RNG, or any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod difficulty;
pub mod enums;
pub mod events;
pub mod persistence;
pub mod state;
pub mod types;
pub mod weapons;
