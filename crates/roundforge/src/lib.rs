//! RoundForge - A Round-Budgeted Planner in Rust
//!
//! Describe resources, transformations and an objective, then ask for the
//! shortest plan that fits a round budget.
//!
//! # Example
//!
//! ```rust
//! use roundforge::prelude::*;
//!
//! let problem = PlanningProblem::new(resources! { "electricity" => 2 })
//!     .with_transformations([
//!         Transformation::produce(resources! { "electricity" => 1 }),
//!         Transformation::new(resources! { "electricity" => 1 }, resources! { "data" => 1 }),
//!     ])
//!     .with_objective(Objective::new().with_exact("data", 2));
//!
//! let planner = Planner::from_config(&PlannerConfig::default()).unwrap();
//! let best = planner.find_shortest_plan(&problem, 5).unwrap().best.unwrap();
//! assert_eq!(best.rounds_used, 2);
//! ```

// Data model
pub use roundforge_core::{
    resources, EffectConfig, EffectOutcome, HazardBreach, Objective, ObjectiveTarget, Plan,
    PlanningProblem, Resource, ResourceVector, RoundForgeError, State, Transformation,
};

// Configuration
pub use roundforge_config::{ConfigError, MoveThreadCount, PlannerConfig, ScenarioConfig};

// Planning
pub use roundforge_solver::{
    find_shortest_plan, find_shortest_plan_observed, plan, replay, AttemptEvent, AttemptListener,
    AttemptOutcome, DeepeningReport, Planner, SearchOutcome, ShortestPlan, Trace,
};

pub use roundforge_solver::{event, termination};

#[cfg(feature = "console")]
pub use roundforge_console as console;

mod scenario;
pub use scenario::{solve_scenario, solve_scenario_with_channel, ScenarioSolution};

pub mod prelude {
    pub use super::resources;
    pub use super::{
        EffectConfig, Objective, ObjectiveTarget, Plan, PlanningProblem, Resource,
        ResourceVector, State, Transformation,
    };
    pub use super::{AttemptOutcome, Planner, PlannerConfig, ScenarioConfig, ShortestPlan};
}
