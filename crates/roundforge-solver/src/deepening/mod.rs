//! Iterative deepening over round budgets.
//!
//! Budgets are probed from a maximum downward, one attempt per budget, each
//! with a fresh [`SearchScope`] and its own termination. The loop stops at
//! budget zero or at the first failed attempt, keeping the plan of the last
//! successful one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rayon::{ThreadPool, ThreadPoolBuilder};
use roundforge_core::{Plan, State};
use tracing::{debug, info, warn};

use crate::event::{AttemptEventSupport, AttemptListener, AttemptOutcome};
use crate::scope::SearchScope;
use crate::search::{SearchContext, SearchEngine, SearchOutcome};
use crate::statistics::SearchStatistics;
use crate::termination::{
    ExternalTermination, NodeCountTermination, OrTermination, TimeTermination,
};

/// The shortest plan found by a deepening run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPlan {
    pub plan: Plan,
    /// Budget of the last successful attempt.
    pub budget: u32,
    /// Rounds the plan actually takes.
    pub rounds_used: usize,
}

/// One attempt of a deepening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    pub budget: u32,
    pub outcome: AttemptOutcome,
    pub statistics: SearchStatistics,
}

/// Everything a deepening run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepeningReport {
    pub best: Option<ShortestPlan>,
    /// Attempts in the order they ran, largest budget first.
    pub attempts: Vec<AttemptRecord>,
    /// True when the external flag stopped the run.
    pub terminated_early: bool,
    /// Counters summed over all attempts.
    pub statistics: SearchStatistics,
}

impl DeepeningReport {
    pub fn into_best(self) -> Option<ShortestPlan> {
        self.best
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    fn record(&mut self, budget: u32, outcome: AttemptOutcome, statistics: SearchStatistics) {
        self.statistics.accumulate(&statistics);
        self.attempts.push(AttemptRecord {
            budget,
            outcome,
            statistics,
        });
    }
}

type AttemptTermination =
    OrTermination<(Option<TimeTermination>, Option<NodeCountTermination>, ExternalTermination)>;

/// Finds the shortest plan by shrinking the round budget one attempt at a time.
///
/// # Examples
///
/// ```
/// use roundforge_core::{resources, EffectConfig, Objective, State, Transformation};
/// use roundforge_solver::deepening::IterativeDeepening;
/// use roundforge_solver::search::SearchContext;
///
/// let transformations = vec![Transformation::produce(resources! { "data" => 1 })];
/// let objective = Objective::new().with_exact("data", 2);
/// let effects = EffectConfig::new();
/// let context = SearchContext::new(&transformations, &objective, &effects);
///
/// let report = IterativeDeepening::new().solve(context, &State::default(), 5);
/// let best = report.best.unwrap();
/// assert_eq!(best.budget, 2);
/// assert_eq!(best.rounds_used, 2);
/// ```
#[derive(Debug, Default)]
pub struct IterativeDeepening {
    attempt_time_limit: Option<Duration>,
    node_limit: Option<u64>,
    continue_on_timeout: bool,
    pool: Option<ThreadPool>,
    terminate: Arc<AtomicBool>,
    events: AttemptEventSupport,
}

impl IterativeDeepening {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock limit for each attempt.
    pub fn with_attempt_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.attempt_time_limit = limit;
        self
    }

    /// Node limit for each attempt.
    pub fn with_node_limit(mut self, limit: Option<u64>) -> Self {
        self.node_limit = limit;
        self
    }

    /// Keeps probing smaller budgets after an attempt times out.
    pub fn with_continue_on_timeout(mut self, enabled: bool) -> Self {
        self.continue_on_timeout = enabled;
        self
    }

    /// Explores root candidates on `threads` workers. One thread or fewer
    /// keeps the search sequential.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.pool = None;
        if threads > 1 {
            match ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => self.pool = Some(pool),
                Err(err) => warn!(
                    event = "thread_pool_unavailable",
                    threads,
                    error = %err,
                ),
            }
        }
        self
    }

    /// Shares an externally owned terminate-early flag.
    pub fn with_terminate_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate = flag;
        self
    }

    pub fn add_listener(&mut self, listener: Arc<dyn AttemptListener>) {
        self.events.add_listener(listener);
    }

    pub fn events(&self) -> &AttemptEventSupport {
        &self.events
    }

    /// Flag that stops the run at the next recursive entry once set.
    pub fn terminate_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate)
    }

    pub fn attempt_time_limit(&self) -> Option<Duration> {
        self.attempt_time_limit
    }

    /// Worker threads used for the root, 1 when sequential.
    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(1, ThreadPool::current_num_threads)
    }

    fn termination(&self) -> AttemptTermination {
        OrTermination((
            self.attempt_time_limit.map(TimeTermination::new),
            self.node_limit.map(NodeCountTermination::new),
            ExternalTermination::new(Arc::clone(&self.terminate)),
        ))
    }

    /// Runs one attempt bounded by `budget` rounds.
    pub fn attempt(
        &self,
        context: SearchContext<'_>,
        initial: &State,
        budget: u32,
    ) -> (SearchOutcome, SearchStatistics) {
        let termination = self.termination();
        let scope = SearchScope::new(budget);
        let engine = SearchEngine::new(context, budget, &termination);
        let outcome = match &self.pool {
            Some(pool) => engine.solve_parallel(initial, &scope, pool),
            None => engine.solve(initial, &scope),
        };
        (outcome, scope.snapshot())
    }

    /// Probes budgets from `max_rounds` down to 1.
    pub fn solve(
        &self,
        context: SearchContext<'_>,
        initial: &State,
        max_rounds: u32,
    ) -> DeepeningReport {
        self.solve_with_events(context, initial, max_rounds, &self.events)
    }

    /// Like [`solve`](Self::solve), notifying `events` instead of the
    /// listeners registered on this instance.
    pub fn solve_with_events(
        &self,
        context: SearchContext<'_>,
        initial: &State,
        max_rounds: u32,
        events: &AttemptEventSupport,
    ) -> DeepeningReport {
        info!(
            event = "deepening_start",
            max_rounds,
            transformation_count = context.transformations.len(),
            attempt_limit_ms = self
                .attempt_time_limit
                .map_or(0, |limit| limit.as_millis() as u64),
        );
        events.fire_deepening_started(max_rounds);

        let mut report = DeepeningReport::default();
        let mut budget = max_rounds;
        while budget > 0 {
            debug!(event = "attempt_start", budget);
            events.fire_attempt_started(budget);

            let (outcome, statistics) = self.attempt(context, initial, budget);
            let verdict = match &outcome {
                SearchOutcome::Found { .. } => AttemptOutcome::Ok,
                SearchOutcome::Infeasible => AttemptOutcome::NotFound,
                SearchOutcome::Cancelled => AttemptOutcome::Timeout,
            };
            info!(
                event = "attempt_end",
                budget,
                outcome = verdict.as_str(),
                duration_ms = statistics.duration.as_millis() as u64,
                nodes = statistics.nodes,
            );
            events.fire_attempt_finished(budget, verdict, &statistics);
            report.record(budget, verdict, statistics);

            match outcome {
                SearchOutcome::Found { plan, .. } => {
                    report.best = Some(ShortestPlan {
                        rounds_used: plan.len(),
                        plan,
                        budget,
                    });
                }
                SearchOutcome::Infeasible => break,
                SearchOutcome::Cancelled => {
                    if self.terminate.load(Ordering::SeqCst) {
                        report.terminated_early = true;
                        break;
                    }
                    if !self.continue_on_timeout {
                        break;
                    }
                }
            }
            budget -= 1;
        }

        match &report.best {
            Some(best) => info!(
                event = "deepening_end",
                rounds = best.rounds_used,
                budget = best.budget,
                attempts = report.attempts.len(),
            ),
            None => info!(
                event = "deepening_end",
                outcome = "no_plan",
                attempts = report.attempts.len(),
                terminated_early = report.terminated_early,
            ),
        }
        events.fire_deepening_ended(
            report.best.as_ref().map(|best| best.rounds_used),
            report.terminated_early,
        );
        report
    }
}
