//! Depth-limited, heuristically ordered search.
//!
//! A single attempt explores states reachable within a round budget, trying
//! affordable transformations in ascending order of the heuristic distance
//! of their successor. The first success in that order wins.
//!
//! The search is deliberately incomplete: visited states are not
//! memoized, and the ordering is greedy rather than a priority search.

mod engine;
mod parallel;

use roundforge_core::{EffectConfig, Objective, Plan, State, Transformation};

pub use engine::SearchEngine;

/// Read-only inputs shared by every branch of a search.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub transformations: &'a [Transformation],
    pub objective: &'a Objective,
    pub effects: &'a EffectConfig,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        transformations: &'a [Transformation],
        objective: &'a Objective,
        effects: &'a EffectConfig,
    ) -> Self {
        Self {
            transformations,
            objective,
            effects,
        }
    }
}

/// Result of one search attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A plan achieving the objective within budget.
    Found {
        plan: Plan,
        /// States on the successful branch: the initial state first, then the
        /// post-effect state after every step.
        trajectory: Vec<State>,
    },
    /// Every branch failed within the budget.
    Infeasible,
    /// A termination fired before the search could conclude.
    Cancelled,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    /// Returns the plan if one was found.
    pub fn plan(&self) -> Option<&Plan> {
        match self {
            SearchOutcome::Found { plan, .. } => Some(plan),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the plan if one was found.
    pub fn into_plan(self) -> Option<Plan> {
        match self {
            SearchOutcome::Found { plan, .. } => Some(plan),
            _ => None,
        }
    }

    /// Short label used in log events.
    pub fn label(&self) -> &'static str {
        match self {
            SearchOutcome::Found { .. } => "found",
            SearchOutcome::Infeasible => "infeasible",
            SearchOutcome::Cancelled => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests;
