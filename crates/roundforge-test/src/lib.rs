//! Shared test fixtures for RoundForge crates.
//!
//! This crate provides ready-made planning problems for testing.
//! It depends only on `roundforge-core` so every other crate can use it
//! as a dev-dependency without cycles.
//!
//! - [`missions`] - The spacecraft mission scenarios
//! - [`hazards`] - Problems exercising decay and cumulative hazard
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! roundforge-test = { workspace = true }
//! ```
//!
//! ```
//! use roundforge_test::missions;
//!
//! let mission = missions::dummy();
//! assert_eq!(mission.max_rounds, 4);
//! ```

pub mod hazards;
pub mod missions;

use roundforge_core::PlanningProblem;

pub use hazards::{exposure_problem, radiation_problem, thrust_decay};
pub use missions::{dummy, mars_flyby, venus_crasher};

/// A named planning problem with the round budget it is meant to be solved in.
#[derive(Debug, Clone)]
pub struct Mission {
    pub name: &'static str,
    pub problem: PlanningProblem,
    pub max_rounds: u32,
}
