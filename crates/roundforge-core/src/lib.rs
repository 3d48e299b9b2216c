//! RoundForge Core - Data model for round-budgeted resource planning
//!
//! This crate provides the fundamental abstractions for RoundForge:
//! - Resources and zero-default resource vectors
//! - Transformations (one-round rules consuming inputs, producing outputs)
//! - Objectives with exact or ranged targets
//! - Periodic side-effects (decay, hazard, reset)
//! - The copy-on-branch planning state
//! - Plans and planning problems

pub mod effects;
pub mod error;
pub mod objective;
pub mod plan;
pub mod problem;
pub mod resource;
pub mod state;
pub mod transformation;

pub use effects::{
    DecayEffect, EffectConfig, EffectOutcome, HazardBreach, HazardEffect, ResetEffect,
    DEFAULT_DECAY_DECREMENT, DEFAULT_HAZARD_INCREMENT, DEFAULT_PERIOD,
};
pub use error::{Result, RoundForgeError};
pub use objective::{Objective, ObjectiveTarget};
pub use plan::Plan;
pub use problem::PlanningProblem;
pub use resource::{Resource, ResourceVector};
pub use state::State;
pub use transformation::Transformation;
