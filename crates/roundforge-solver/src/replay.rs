//! Replaying plans into state trajectories.
//!
//! Replay re-applies a plan from its initial state under the same effect
//! schedule the search used. The boundary rule is shared with the search
//! through [`EffectConfig::apply`], so a plan returned by the search always
//! replays cleanly; a hazard breach here is reported as
//! [`RoundForgeError::ReplayInconsistency`].

use std::fmt;

use roundforge_core::{
    EffectConfig, EffectOutcome, Objective, Plan, Result, RoundForgeError, State, Transformation,
};

/// One row of a trace: a state and the transformation applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    /// State before the step.
    pub state: State,
    /// Transformation applied next, `None` for the final state.
    pub transformation: Option<Transformation>,
    /// Whether periodic effects fired right after this step.
    pub effects: EffectOutcome,
}

/// The full trajectory of a replayed plan.
///
/// # Examples
///
/// ```
/// use roundforge_core::{resources, EffectConfig, Objective, Plan, State, Transformation};
/// use roundforge_solver::replay;
///
/// let charge = Transformation::produce(resources! { "electricity" => 1 });
/// let plan = Plan::from(vec![charge.clone(), charge]);
///
/// let trace = replay(&plan, &State::default(), &EffectConfig::new()).unwrap();
/// assert_eq!(trace.plan_len(), 2);
/// assert_eq!(trace.steps().len(), 3);
/// assert!(trace.achieved(&Objective::new().with_exact("electricity", 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    steps: Vec<TraceStep>,
}

impl Trace {
    /// Rows in order, the last one carrying the final state.
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// Number of transformations replayed.
    pub fn plan_len(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// The state after the last step.
    pub fn final_state(&self) -> &State {
        // Replay always records at least the final row.
        &self.steps[self.steps.len() - 1].state
    }

    /// Returns true if the final state satisfies `objective`.
    pub fn achieved(&self, objective: &Objective) -> bool {
        self.final_state().achieved(objective)
    }

    /// Iterates `(state, next transformation)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&State, Option<&Transformation>)> + '_ {
        self.steps
            .iter()
            .map(|step| (&step.state, step.transformation.as_ref()))
    }

    /// States in order, including the initial and final ones.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.steps.iter().map(|step| &step.state)
    }

    /// Renders the diagnostic table.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{:>3} | {}", i, step.state)?;
            match &step.transformation {
                Some(transformation) => write!(f, " | {}", transformation)?,
                None => f.write_str(" | done")?,
            }
            if step.effects.fired() {
                f.write_str(" (effects)")?;
            }
        }
        Ok(())
    }
}

/// Replays `plan` from `initial` under `effects`.
///
/// # Errors
///
/// Returns [`RoundForgeError::MalformedEffectConfig`] for an invalid
/// schedule, and [`RoundForgeError::ReplayInconsistency`] when a boundary
/// breaches the hazard threshold.
pub fn replay(plan: &Plan, initial: &State, effects: &EffectConfig) -> Result<Trace> {
    effects.validate()?;

    let mut steps = Vec::with_capacity(plan.len() + 1);
    let mut state = initial.clone();
    for (index, transformation) in plan.iter().enumerate() {
        let mut next = state.apply(transformation);
        let elapsed = u32::try_from(index + 1).unwrap_or(u32::MAX);
        let outcome = next
            .apply_effects(effects, elapsed)
            .map_err(|breach| RoundForgeError::ReplayInconsistency {
                step: index,
                breach,
            })?;
        steps.push(TraceStep {
            state,
            transformation: Some(transformation.clone()),
            effects: outcome,
        });
        state = next;
    }
    steps.push(TraceStep {
        state,
        transformation: None,
        effects: EffectOutcome::Quiet,
    });

    Ok(Trace { steps })
}

#[cfg(test)]
mod tests {
    use roundforge_core::{resources, HazardBreach, Resource};
    use roundforge_test::{missions, radiation_problem, thrust_decay};

    use super::*;
    use crate::scope::SearchScope;
    use crate::search::{SearchContext, SearchEngine, SearchOutcome};
    use crate::termination::NoTermination;

    fn search(problem: &roundforge_core::PlanningProblem, budget: u32) -> (Plan, Vec<State>) {
        let context = SearchContext::new(
            &problem.transformations,
            &problem.objective,
            &problem.effects,
        );
        let outcome = SearchEngine::new(context, budget, &NoTermination)
            .solve(&problem.initial, &SearchScope::new(budget));
        match outcome {
            SearchOutcome::Found { plan, trajectory } => (plan, trajectory),
            other => panic!("expected a plan, got {:?}", other),
        }
    }

    #[test]
    fn test_replay_dummy_mission() {
        let mission = missions::dummy();
        let problem = &mission.problem;
        let (plan, _) = search(problem, mission.max_rounds);

        let trace = replay(&plan, &problem.initial, &problem.effects).unwrap();
        assert!(trace.plan_len() <= 4);
        assert!(trace.achieved(&problem.objective));
        assert!(trace.final_state().quantity(&Resource::new("data")) >= 2);
        assert!(trace.final_state().quantity(&Resource::new("coms")) >= 1);

        let (last_state, last_step) = trace.pairs().last().unwrap();
        assert_eq!(last_state, trace.final_state());
        assert!(last_step.is_none());
    }

    #[test]
    fn test_replay_reproduces_search_trajectory() {
        for mission in [missions::dummy(), thrust_decay(), radiation_problem()] {
            let problem = &mission.problem;
            let (plan, trajectory) = search(problem, mission.max_rounds);
            let trace = replay(&plan, &problem.initial, &problem.effects).unwrap();

            let replayed: Vec<State> = trace.states().cloned().collect();
            assert_eq!(replayed, trajectory, "{}", mission.name);
        }
    }

    #[test]
    fn test_replay_marks_effect_rounds() {
        let mission = thrust_decay();
        let problem = &mission.problem;
        let (plan, _) = search(problem, mission.max_rounds);
        let trace = replay(&plan, &problem.initial, &problem.effects).unwrap();

        let fired: Vec<usize> = trace
            .steps()
            .iter()
            .enumerate()
            .filter(|(_, step)| step.effects.fired())
            .map(|(i, _)| i)
            .collect();
        // Boundaries after rounds 3, 6 and 9.
        assert_eq!(fired, vec![2, 5, 8]);
    }

    #[test]
    fn test_hazard_breach_is_inconsistency() {
        let scoop = Transformation::produce(resources! { "data" => 1, "radiation" => 3 });
        let plan = Plan::from(vec![scoop.clone(), scoop.clone(), scoop]);
        let effects = EffectConfig::new().with_hazard("radiation", 5);

        let err = replay(&plan, &State::default(), &effects).unwrap_err();
        assert_eq!(
            err,
            RoundForgeError::ReplayInconsistency {
                step: 2,
                breach: HazardBreach {
                    round: 3,
                    accumulated: 9,
                    threshold: 5,
                },
            }
        );
    }

    #[test]
    fn test_empty_plan_trace() {
        let initial = State::new(resources! { "data" => 1 });
        let trace = replay(&Plan::empty(), &initial, &EffectConfig::new()).unwrap();

        assert_eq!(trace.plan_len(), 0);
        assert_eq!(trace.final_state(), &initial);
        assert_eq!(trace.render(), "  0 | 1 data | done");
    }

    #[test]
    fn test_render_rows() {
        let charge = Transformation::produce(resources! { "electricity" => 1 });
        let plan = Plan::from(vec![charge]);
        let effects = EffectConfig::new().with_period(1).with_decay("electricity");
        let trace = replay(&plan, &State::default(), &effects).unwrap();

        assert_eq!(
            trace.render(),
            "  0 | nothing | nothing => 1 electricity (effects)\n  1 | 0 electricity | done"
        );
    }

    #[test]
    fn test_zero_period_rejected() {
        let result = replay(
            &Plan::empty(),
            &State::default(),
            &EffectConfig::new().with_period(0),
        );
        assert!(matches!(result, Err(RoundForgeError::MalformedEffectConfig(_))));
    }
}
