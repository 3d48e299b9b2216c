//! Config-driven planner facade.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use roundforge_config::{ConfigError, PlannerConfig};
use roundforge_core::{EffectConfig, Plan, PlanningProblem, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::deepening::{DeepeningReport, IterativeDeepening};
use crate::event::{AttemptEvent, AttemptEventSupport, AttemptListener, ChannelAttemptListener};
use crate::replay::{replay, Trace};
use crate::search::{SearchContext, SearchOutcome};

/// Planner built from a [`PlannerConfig`].
///
/// Every call validates the problem before any search starts. An effect
/// schedule in the config replaces the problem's own.
///
/// # Examples
///
/// ```
/// use roundforge_config::PlannerConfig;
/// use roundforge_core::{resources, Objective, PlanningProblem, Transformation};
/// use roundforge_solver::Planner;
///
/// let problem = PlanningProblem::new(resources! {})
///     .with_transformation(Transformation::produce(resources! { "data" => 1 }))
///     .with_objective(Objective::new().with_exact("data", 3));
///
/// let planner = Planner::from_config(&PlannerConfig::default()).unwrap();
/// let report = planner.find_shortest_plan(&problem, 8).unwrap();
/// assert_eq!(report.best.map(|b| b.rounds_used), Some(3));
/// ```
#[derive(Debug)]
pub struct Planner {
    deepening: IterativeDeepening,
    effects: Option<EffectConfig>,
    max_rounds: Option<u32>,
    events: AttemptEventSupport,
}

impl Planner {
    /// Builds a planner from `config`.
    ///
    /// # Errors
    ///
    /// Returns the config's validation error.
    pub fn from_config(config: &PlannerConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let effects = config
            .effects
            .as_ref()
            .map(|effects| effects.to_effect_config())
            .transpose()?;
        let deepening = IterativeDeepening::new()
            .with_attempt_time_limit(config.attempt_time_limit())
            .with_node_limit(config.deepening.node_limit)
            .with_continue_on_timeout(config.deepening.continue_on_timeout)
            .with_threads(config.move_thread_count.resolve());

        Ok(Self {
            deepening,
            effects,
            max_rounds: config.deepening.max_rounds,
            events: AttemptEventSupport::new(),
        })
    }

    /// Maximum budget configured for deepening runs, if any.
    pub fn max_rounds(&self) -> Option<u32> {
        self.max_rounds
    }

    pub fn add_listener(&mut self, listener: Arc<dyn AttemptListener>) {
        self.events.add_listener(listener);
    }

    /// Handle that stops the current and every later run once set.
    pub fn terminate_flag(&self) -> Arc<AtomicBool> {
        self.deepening.terminate_flag()
    }

    pub fn terminate_early(&self) {
        self.deepening.terminate_flag().store(true, Ordering::SeqCst);
    }

    /// Clears a previous [`terminate_early`](Self::terminate_early) request.
    pub fn reset_termination(&self) {
        self.deepening.terminate_flag().store(false, Ordering::SeqCst);
    }

    /// The effect schedule used for `problem`.
    pub fn effects_for<'a>(&'a self, problem: &'a PlanningProblem) -> &'a EffectConfig {
        self.effects.as_ref().unwrap_or(&problem.effects)
    }

    fn context<'a>(&'a self, problem: &'a PlanningProblem) -> Result<SearchContext<'a>> {
        problem.validate()?;
        let effects = self.effects_for(problem);
        effects.validate()?;
        Ok(SearchContext::new(
            &problem.transformations,
            &problem.objective,
            effects,
        ))
    }

    /// Runs a single attempt at `budget`.
    ///
    /// # Errors
    ///
    /// Returns a model error for a malformed objective or effect schedule.
    pub fn plan(&self, problem: &PlanningProblem, budget: u32) -> Result<SearchOutcome> {
        let context = self.context(problem)?;
        let (outcome, statistics) = self.deepening.attempt(context, &problem.initial, budget);
        info!(
            event = "plan_end",
            budget,
            outcome = outcome.label(),
            nodes = statistics.nodes,
        );
        Ok(outcome)
    }

    /// Finds the shortest plan, probing budgets from `max_rounds` down.
    ///
    /// # Errors
    ///
    /// Returns a model error for a malformed objective or effect schedule.
    pub fn find_shortest_plan(
        &self,
        problem: &PlanningProblem,
        max_rounds: u32,
    ) -> Result<DeepeningReport> {
        let context = self.context(problem)?;
        Ok(self
            .deepening
            .solve_with_events(context, &problem.initial, max_rounds, &self.events))
    }

    /// Like [`find_shortest_plan`](Self::find_shortest_plan), also streaming
    /// every attempt event through `sender`.
    pub fn find_shortest_plan_with_channel(
        &self,
        problem: &PlanningProblem,
        max_rounds: u32,
        sender: mpsc::UnboundedSender<AttemptEvent>,
    ) -> Result<DeepeningReport> {
        let context = self.context(problem)?;
        let mut events = self.events.clone();
        events.add_listener(Arc::new(ChannelAttemptListener::new(sender)));
        Ok(self
            .deepening
            .solve_with_events(context, &problem.initial, max_rounds, &events))
    }

    /// Replays `plan` under the effect schedule this planner searches with.
    pub fn replay(&self, problem: &PlanningProblem, plan: &Plan) -> Result<Trace> {
        replay(plan, &problem.initial, self.effects_for(problem))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use roundforge_config::{EffectsConfig, HazardConfig, MoveThreadCount};
    use roundforge_core::RoundForgeError;
    use roundforge_test::{missions, radiation_problem, thrust_decay};

    use super::*;
    use crate::event::{AttemptOutcome, CountingAttemptListener};

    fn planner() -> Planner {
        Planner::from_config(&PlannerConfig::default()).unwrap()
    }

    #[test]
    fn test_find_shortest_plan_dummy() {
        let mission = missions::dummy();
        let report = planner().find_shortest_plan(&mission.problem, 6).unwrap();

        let best = report.best.unwrap();
        assert_eq!(best.budget, 4);
        assert_eq!(best.plan.len(), 4);
    }

    #[test]
    fn test_plan_single_attempt() {
        let mission = thrust_decay();
        let outcome = planner().plan(&mission.problem, 5).unwrap();
        assert_eq!(outcome, SearchOutcome::Infeasible);

        let outcome = planner().plan(&mission.problem, 6).unwrap();
        assert_eq!(outcome.plan().map(|p| p.len()), Some(6));
    }

    #[test]
    fn test_listener_sees_attempts() {
        let mission = missions::dummy();
        let counter = Arc::new(CountingAttemptListener::new());
        let mut planner = planner();
        planner.add_listener(counter.clone());

        planner.find_shortest_plan(&mission.problem, 5).unwrap();
        assert_eq!(counter.ok_count(), 2);
        assert_eq!(counter.not_found_count(), 1);
    }

    #[test]
    fn test_channel_streaming() {
        let mission = missions::dummy();
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let report = planner()
            .find_shortest_plan_with_channel(&mission.problem, 4, sender)
            .unwrap();

        assert_eq!(report.best.map(|b| b.budget), Some(4));
        let mut outcomes = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            if let AttemptEvent::AttemptFinished {
                budget, outcome, ..
            } = event
            {
                outcomes.push((budget, outcome));
            }
        }
        assert_eq!(
            outcomes,
            vec![(4, AttemptOutcome::Ok), (3, AttemptOutcome::NotFound)]
        );
    }

    #[test]
    fn test_effect_override_from_config() {
        let mission = radiation_problem();
        let config = PlannerConfig::default().with_effects(EffectsConfig {
            hazard: Some(HazardConfig {
                resource: "radiation".to_string(),
                increment: 2,
                threshold: 1,
            }),
            ..EffectsConfig::default()
        });
        let planner = Planner::from_config(&config).unwrap();

        let effects = planner.effects_for(&mission.problem);
        assert_eq!(effects.period, 3);
        assert_ne!(effects, &mission.problem.effects);

        // The second boundary always breaches, so plans finish by round 5.
        let outcome = planner.plan(&mission.problem, mission.max_rounds).unwrap();
        let plan = outcome.into_plan().unwrap();
        assert!(plan.len() <= 5);
    }

    #[test]
    fn test_malformed_objective_rejected_before_search() {
        let mut problem = missions::dummy().problem;
        problem.objective = roundforge_core::Objective::new().with_range("data", 5, 1);

        let err = planner().find_shortest_plan(&problem, 4).unwrap_err();
        assert!(matches!(err, RoundForgeError::MalformedObjective(_)));
    }

    #[test]
    fn test_invalid_thread_count_rejected() {
        let config = PlannerConfig::default().with_move_thread_count(MoveThreadCount::Count(0));
        assert!(matches!(
            Planner::from_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_terminate_early() {
        let mission = missions::dummy();
        let planner = planner();
        planner.terminate_early();
        assert!(planner.terminate_flag().load(Ordering::SeqCst));

        let report = planner.find_shortest_plan(&mission.problem, 6).unwrap();
        assert!(report.terminated_early);

        planner.reset_termination();
        let report = planner.find_shortest_plan(&mission.problem, 6).unwrap();
        assert_eq!(report.best.map(|b| b.budget), Some(4));
    }

    #[test]
    fn test_replay_uses_planner_effects() {
        let mission = thrust_decay();
        let planner = planner();
        let report = planner
            .find_shortest_plan(&mission.problem, mission.max_rounds)
            .unwrap();
        let best = report.best.unwrap();

        let trace = planner.replay(&mission.problem, &best.plan).unwrap();
        assert!(trace.achieved(&mission.problem.objective));
    }
}
