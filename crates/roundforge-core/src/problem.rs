//! Owning bundle of everything a planning call reads.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::effects::EffectConfig;
use crate::error::Result;
use crate::objective::Objective;
use crate::resource::ResourceVector;
use crate::state::State;
use crate::transformation::Transformation;

/// A complete planning problem: rules, target, starting point and effects.
///
/// All parts stay read-only for the duration of a planning call.
///
/// # Examples
///
/// ```
/// use roundforge_core::{resources, Objective, PlanningProblem, Transformation};
///
/// let problem = PlanningProblem::new(resources! { "electricity" => 2 })
///     .with_transformation(Transformation::produce(resources! { "electricity" => 1 }))
///     .with_objective(Objective::new().with_exact("electricity", 3));
///
/// assert_eq!(problem.transformations.len(), 1);
/// assert!(problem.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanningProblem {
    pub transformations: Vec<Transformation>,
    pub objective: Objective,
    pub initial: State,
    pub effects: EffectConfig,
}

impl PlanningProblem {
    /// Creates a problem starting from `initial` with no rules and no effects.
    pub fn new(initial: impl Into<State>) -> Self {
        Self {
            initial: initial.into(),
            ..Self::default()
        }
    }

    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformations.push(transformation);
        self
    }

    pub fn with_transformations(
        mut self,
        transformations: impl IntoIterator<Item = Transformation>,
    ) -> Self {
        self.transformations.extend(transformations);
        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_effects(mut self, effects: EffectConfig) -> Self {
        self.effects = effects;
        self
    }

    /// Initial resource stock.
    pub fn initial_resources(&self) -> &ResourceVector {
        self.initial.resources()
    }

    /// Checks the objective and the effect schedule.
    ///
    /// # Errors
    ///
    /// Returns the first [`MalformedObjective`](crate::RoundForgeError::MalformedObjective)
    /// or [`MalformedEffectConfig`](crate::RoundForgeError::MalformedEffectConfig) found.
    pub fn validate(&self) -> Result<()> {
        self.objective.validate()?;
        self.effects.validate()
    }
}

impl fmt::Display for PlanningProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "initial: {}", self.initial)?;
        writeln!(f, "objective: {}", self.objective)?;
        writeln!(f, "effects: {}", self.effects)?;
        write!(f, "transformations:")?;
        for transformation in &self.transformations {
            write!(f, "\n  {}", transformation)?;
        }
        Ok(())
    }
}
