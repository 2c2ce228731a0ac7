//! Enemy AI for SKYSWARM.
//!
//! Implements the per-enemy behavior state machine, entry flight paths,
//! kind-driven stat profiles, and the firing / tractor-beam decisions.

pub mod firing;
pub mod fsm;
pub mod paths;
pub mod profiles;

pub use skyswarm_core as core;
