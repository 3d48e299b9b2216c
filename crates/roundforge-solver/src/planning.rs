//! One-call planning entry points.
//!
//! These validate the objective and effect schedule, then run the search
//! sequentially without any config. Use [`Planner`](crate::Planner) for
//! config-driven runs.

use std::sync::Arc;
use std::time::Duration;

use roundforge_core::{EffectConfig, Objective, Plan, Result, State, Transformation};

use crate::deepening::{IterativeDeepening, ShortestPlan};
use crate::event::{AttemptOutcome, FnAttemptListener};
use crate::scope::SearchScope;
use crate::search::{SearchContext, SearchEngine};
use crate::termination::NoTermination;

fn validated<'a>(
    transformations: &'a [Transformation],
    objective: &'a Objective,
    effects: &'a EffectConfig,
) -> Result<SearchContext<'a>> {
    objective.validate()?;
    effects.validate()?;
    Ok(SearchContext::new(transformations, objective, effects))
}

/// Finds a plan reaching `objective` from `initial` within `budget` rounds.
///
/// Returns `Ok(None)` when no plan fits the budget.
///
/// # Errors
///
/// Returns [`MalformedObjective`](roundforge_core::RoundForgeError::MalformedObjective)
/// or [`MalformedEffectConfig`](roundforge_core::RoundForgeError::MalformedEffectConfig)
/// before any search starts.
///
/// # Examples
///
/// ```
/// use roundforge_core::{resources, EffectConfig, Objective, State, Transformation};
///
/// let transformations = vec![
///     Transformation::produce(resources! { "electricity" => 1 }),
///     Transformation::new(resources! { "electricity" => 1 }, resources! { "data" => 1 }),
/// ];
/// let objective = Objective::new().with_exact("data", 1);
///
/// let found = roundforge_solver::plan(
///     &transformations,
///     &objective,
///     &State::default(),
///     2,
///     &EffectConfig::new(),
/// )
/// .unwrap();
/// assert_eq!(found.map(|p| p.len()), Some(2));
/// ```
pub fn plan(
    transformations: &[Transformation],
    objective: &Objective,
    initial: &State,
    budget: u32,
    effects: &EffectConfig,
) -> Result<Option<Plan>> {
    let context = validated(transformations, objective, effects)?;
    let outcome = SearchEngine::new(context, budget, &NoTermination)
        .solve(initial, &SearchScope::new(budget));
    Ok(outcome.into_plan())
}

/// Finds the shortest plan, probing budgets from `max_rounds` downward.
///
/// A timed-out attempt ends the probing like a failed one.
pub fn find_shortest_plan(
    transformations: &[Transformation],
    objective: &Objective,
    initial: &State,
    max_rounds: u32,
    effects: &EffectConfig,
    per_attempt_timeout: Option<Duration>,
) -> Result<Option<ShortestPlan>> {
    let context = validated(transformations, objective, effects)?;
    let deepening = IterativeDeepening::new().with_attempt_time_limit(per_attempt_timeout);
    Ok(deepening.solve(context, initial, max_rounds).into_best())
}

/// Like [`find_shortest_plan`], reporting each attempt to `observer`.
#[allow(clippy::too_many_arguments)]
pub fn find_shortest_plan_observed<F>(
    transformations: &[Transformation],
    objective: &Objective,
    initial: &State,
    max_rounds: u32,
    effects: &EffectConfig,
    per_attempt_timeout: Option<Duration>,
    observer: F,
) -> Result<Option<ShortestPlan>>
where
    F: Fn(u32, AttemptOutcome) + Send + Sync + 'static,
{
    let context = validated(transformations, objective, effects)?;
    let mut deepening = IterativeDeepening::new().with_attempt_time_limit(per_attempt_timeout);
    deepening.add_listener(Arc::new(FnAttemptListener::new(observer)));
    Ok(deepening.solve(context, initial, max_rounds).into_best())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use roundforge_core::{resources, RoundForgeError};
    use roundforge_test::{exposure_problem, missions};

    use super::*;

    #[test]
    fn test_plan_dummy() {
        let problem = missions::dummy().problem;
        let found = plan(
            &problem.transformations,
            &problem.objective,
            &problem.initial,
            4,
            &problem.effects,
        )
        .unwrap();
        assert_eq!(found.map(|p| p.len()), Some(4));

        let none = plan(
            &problem.transformations,
            &problem.objective,
            &problem.initial,
            3,
            &problem.effects,
        )
        .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_hazard_infeasible_is_none() {
        let problem = exposure_problem().problem;
        let found = plan(
            &problem.transformations,
            &problem.objective,
            &problem.initial,
            12,
            &problem.effects,
        )
        .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_malformed_effects_rejected() {
        let problem = missions::dummy().problem;
        let err = plan(
            &problem.transformations,
            &problem.objective,
            &problem.initial,
            4,
            &EffectConfig::new().with_period(0),
        )
        .unwrap_err();
        assert!(matches!(err, RoundForgeError::MalformedEffectConfig(_)));
    }

    #[test]
    fn test_find_shortest_plan_with_observer() {
        let problem = missions::dummy().problem;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let best = find_shortest_plan_observed(
            &problem.transformations,
            &problem.objective,
            &problem.initial,
            5,
            &problem.effects,
            Some(Duration::from_secs(10)),
            move |budget, outcome| sink.lock().unwrap().push((budget, outcome)),
        )
        .unwrap()
        .unwrap();

        assert_eq!(best.budget, 4);
        assert_eq!(best.rounds_used, 4);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (5, AttemptOutcome::Ok),
                (4, AttemptOutcome::Ok),
                (3, AttemptOutcome::NotFound),
            ]
        );
    }

    #[test]
    fn test_find_shortest_plan_no_plan() {
        let objective = Objective::new().with_exact("data", 1);
        let best = find_shortest_plan(
            &[],
            &objective,
            &State::new(resources! {}),
            3,
            &EffectConfig::new(),
            None,
        )
        .unwrap();
        assert!(best.is_none());
    }
}
