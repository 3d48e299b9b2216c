//! Sequential recursive search.

use roundforge_core::{Plan, State};
use smallvec::SmallVec;
use tracing::{debug, trace};

use super::{SearchContext, SearchOutcome};
use crate::scope::SearchScope;
use crate::termination::Termination;

/// A depth-limited search over one round budget.
///
/// The engine holds no mutable state; every branch owns its copy of
/// [`State`], so the same engine can drive parallel subtrees.
///
/// # Examples
///
/// ```
/// use roundforge_core::{resources, EffectConfig, Objective, State, Transformation};
/// use roundforge_solver::search::{SearchContext, SearchEngine};
/// use roundforge_solver::termination::NoTermination;
/// use roundforge_solver::SearchScope;
///
/// let transformations = vec![
///     Transformation::produce(resources! { "electricity" => 1 }),
///     Transformation::new(resources! { "electricity" => 1 }, resources! { "data" => 1 }),
/// ];
/// let objective = Objective::new().with_exact("data", 1);
/// let effects = EffectConfig::new();
///
/// let context = SearchContext::new(&transformations, &objective, &effects);
/// let engine = SearchEngine::new(context, 2, &NoTermination);
/// let outcome = engine.solve(&State::default(), &SearchScope::new(2));
///
/// assert_eq!(outcome.plan().map(|p| p.len()), Some(2));
/// ```
#[derive(Debug)]
pub struct SearchEngine<'a, T: ?Sized> {
    context: SearchContext<'a>,
    budget: u32,
    termination: &'a T,
}

/// A successful branch, accumulated leaf-first while unwinding.
#[derive(Debug)]
pub(super) struct Path {
    steps: Vec<usize>,
    states: Vec<State>,
}

impl Path {
    pub(super) fn ending_at(state: State) -> Self {
        Self {
            steps: Vec::new(),
            states: vec![state],
        }
    }

    /// Records that `state` reached the rest of the path via `step`.
    pub(super) fn extend(&mut self, step: usize, state: State) {
        self.steps.push(step);
        self.states.push(state);
    }
}

#[derive(Debug)]
pub(super) enum Branch {
    Found(Path),
    Failed,
    Cancelled,
}

/// What a recursive entry decided before expanding children.
pub(super) enum Entry {
    Achieved,
    Stop(Branch),
    Expand(SmallVec<[Candidate; 8]>),
}

/// An affordable transformation and its successor before effects.
#[derive(Debug)]
pub(super) struct Candidate {
    pub(super) index: usize,
    pub(super) successor: State,
    pub(super) distance: u64,
}

impl<'a, T: Termination + ?Sized> SearchEngine<'a, T> {
    pub fn new(context: SearchContext<'a>, budget: u32, termination: &'a T) -> Self {
        Self {
            context,
            budget,
            termination,
        }
    }

    /// Round budget of this search.
    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn context(&self) -> SearchContext<'a> {
        self.context
    }

    pub(super) fn termination(&self) -> &'a T {
        self.termination
    }

    /// Searches for a plan from `initial`, trying candidates one at a time.
    pub fn solve(&self, initial: &State, scope: &SearchScope) -> SearchOutcome {
        let branch = self.descend(initial.clone(), 0, scope);
        self.finish(branch, scope)
    }

    pub(super) fn finish(&self, branch: Branch, scope: &SearchScope) -> SearchOutcome {
        let outcome = match branch {
            Branch::Found(path) => {
                let Path {
                    mut steps,
                    mut states,
                } = path;
                steps.reverse();
                states.reverse();
                let plan: Plan = steps
                    .into_iter()
                    .map(|i| self.context.transformations[i].clone())
                    .collect();
                SearchOutcome::Found {
                    plan,
                    trajectory: states,
                }
            }
            Branch::Failed => SearchOutcome::Infeasible,
            Branch::Cancelled => SearchOutcome::Cancelled,
        };
        debug!(
            event = "search_end",
            budget = self.budget,
            outcome = outcome.label(),
            plan_len = outcome.plan().map(|p| p.len()).unwrap_or(0),
            nodes = scope.nodes(),
        );
        outcome
    }

    /// Recursive entry: checks cancellation, achievement, budget and
    /// affordability, then orders the candidates.
    pub(super) fn enter(&self, state: &State, elapsed: u32, scope: &SearchScope) -> Entry {
        if self.termination.is_terminated(scope) {
            return Entry::Stop(Branch::Cancelled);
        }
        let statistics = scope.statistics();
        statistics.record_node();

        if state.achieved(self.context.objective) {
            return Entry::Achieved;
        }
        if elapsed >= self.budget {
            statistics.record_budget_exhausted();
            return Entry::Stop(Branch::Failed);
        }

        let candidates = self.candidates(state);
        if candidates.is_empty() {
            statistics.record_dead_end();
            return Entry::Stop(Branch::Failed);
        }
        Entry::Expand(candidates)
    }

    fn candidates(&self, state: &State) -> SmallVec<[Candidate; 8]> {
        let mut candidates: SmallVec<[Candidate; 8]> = self
            .context
            .transformations
            .iter()
            .enumerate()
            .filter(|(_, t)| state.can_apply(t))
            .map(|(index, t)| {
                let successor = state.apply(t);
                let distance = successor.distance(self.context.objective);
                Candidate {
                    index,
                    successor,
                    distance,
                }
            })
            .collect();
        // Stable: ties keep declaration order.
        candidates.sort_by_key(|c| c.distance);

        trace!(
            event = "candidates",
            round = state.round(),
            count = candidates.len(),
            best_distance = candidates.first().map_or(0, |c| c.distance),
        );
        candidates
    }

    /// Applies the effect schedule after the round bringing the total to
    /// `elapsed`. Returns `None` when the hazard threshold is breached.
    pub(super) fn settle(
        &self,
        mut successor: State,
        elapsed: u32,
        scope: &SearchScope,
    ) -> Option<State> {
        match successor.apply_effects(self.context.effects, elapsed) {
            Ok(outcome) => {
                if outcome.fired() {
                    scope.statistics().record_effects_fired();
                }
                Some(successor)
            }
            Err(breach) => {
                scope.statistics().record_hazard_failure();
                debug!(
                    event = "hazard_failure",
                    round = breach.round,
                    accumulated = breach.accumulated,
                    threshold = breach.threshold,
                );
                None
            }
        }
    }

    pub(super) fn descend(&self, state: State, elapsed: u32, scope: &SearchScope) -> Branch {
        let candidates = match self.enter(&state, elapsed, scope) {
            Entry::Achieved => return Branch::Found(Path::ending_at(state)),
            Entry::Stop(branch) => return branch,
            Entry::Expand(candidates) => candidates,
        };

        for candidate in candidates {
            let Some(next) = self.settle(candidate.successor, elapsed + 1, scope) else {
                continue;
            };
            match self.descend(next, elapsed + 1, scope) {
                Branch::Found(mut path) => {
                    path.extend(candidate.index, state);
                    return Branch::Found(path);
                }
                Branch::Cancelled => return Branch::Cancelled,
                Branch::Failed => {}
            }
        }
        Branch::Failed
    }
}
