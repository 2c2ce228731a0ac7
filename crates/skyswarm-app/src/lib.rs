//! Skyswarm host application.
//!
//! This crate wires the simulation to a real clock and real storage:
//! a 60Hz game loop thread, host entry points for a front end, a JSON
//! score store, and a scripted autopilot for headless runs.

pub mod autopilot;
pub mod game_loop;
pub mod host;
pub mod state;
pub mod store;

pub use skyswarm_core as core;
