//! The copy-on-branch planning state.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::effects::{EffectConfig, EffectOutcome, HazardBreach};
use crate::objective::Objective;
use crate::resource::{Resource, ResourceVector};
use crate::transformation::Transformation;

/// A resource snapshot together with the round index it represents.
///
/// States have value semantics: [`apply`](Self::apply) returns a new state
/// and never mutates the receiver, so sibling branches cannot observe each
/// other.
///
/// # Examples
///
/// ```
/// use roundforge_core::{resources, Objective, State, Transformation};
///
/// let state = State::new(resources! { "electricity" => 2 });
/// let transmit =
///     Transformation::new(resources! { "electricity" => 1 }, resources! { "data" => 1 });
/// let objective = Objective::new().with_exact("data", 2);
///
/// assert!(state.can_apply(&transmit));
/// assert_eq!(state.distance(&objective), 4);
///
/// let next = state.apply(&transmit).apply(&transmit);
/// assert_eq!(next.round(), 2);
/// assert!(next.achieved(&objective));
/// assert!(!next.can_apply(&transmit));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct State {
    resources: ResourceVector,
    round: u32,
}

impl State {
    /// Creates a state at round zero.
    pub fn new(resources: ResourceVector) -> Self {
        Self::at_round(resources, 0)
    }

    /// Creates a state at an explicit round index.
    pub fn at_round(resources: ResourceVector, round: u32) -> Self {
        Self { resources, round }
    }

    /// The resource ledger.
    #[inline]
    pub fn resources(&self) -> &ResourceVector {
        &self.resources
    }

    /// Rounds played to reach this state.
    #[inline]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Quantity of `resource`, zero if absent.
    #[inline]
    pub fn quantity(&self, resource: &Resource) -> i64 {
        self.resources.get(resource)
    }

    /// Returns true if every constrained input is covered by current stock.
    pub fn can_apply(&self, transformation: &Transformation) -> bool {
        transformation
            .inputs()
            .iter()
            .filter(|(resource, _)| !resource.is_unconstrained())
            .all(|(resource, required)| self.quantity(resource) >= required)
    }

    /// Returns the successor state one round later.
    ///
    /// Inputs are debited and outputs credited; missing entries start at
    /// zero. Affordability is not checked here.
    pub fn apply(&self, transformation: &Transformation) -> State {
        let mut resources = self.resources.clone();
        for (resource, quantity) in transformation.inputs().iter() {
            resources.debit(resource.clone(), quantity);
        }
        for (resource, quantity) in transformation.outputs().iter() {
            resources.credit(resource.clone(), quantity);
        }
        State {
            resources,
            round: self.round.saturating_add(1),
        }
    }

    /// Applies the periodic schedule as of `elapsed` rounds into the attempt.
    ///
    /// # Errors
    ///
    /// Returns [`HazardBreach`] when the hazard threshold was already met; the
    /// state is then unusable and must be discarded.
    pub fn apply_effects(
        &mut self,
        effects: &EffectConfig,
        elapsed: u32,
    ) -> Result<EffectOutcome, HazardBreach> {
        effects.apply(elapsed, &mut self.resources)
    }

    /// Heuristic distance to `objective`: sum of per-target squared shortfalls.
    ///
    /// Only used to order candidates; it is not an admissible bound.
    pub fn distance(&self, objective: &Objective) -> u64 {
        objective
            .iter()
            .map(|(resource, target)| target.distance(self.quantity(resource)))
            .fold(0u64, u64::saturating_add)
    }

    /// Returns true if every target of `objective` is satisfied.
    pub fn achieved(&self, objective: &Objective) -> bool {
        objective
            .iter()
            .all(|(resource, target)| target.is_satisfied_by(self.quantity(resource)))
    }
}

impl From<ResourceVector> for State {
    fn from(resources: ResourceVector) -> Self {
        State::new(resources)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.resources, f)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
