//! Event system for deepening progress.
//!
//! Listeners receive one notification per attempted round budget, plus the
//! start and end of the whole deepening run. Events are fired synchronously
//! in registration order.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use roundforge_solver::event::{AttemptEventSupport, AttemptOutcome, CountingAttemptListener};
//! use roundforge_solver::SearchStatistics;
//!
//! let counter = Arc::new(CountingAttemptListener::new());
//! let mut support = AttemptEventSupport::new();
//! support.add_listener(counter.clone());
//!
//! support.fire_attempt_finished(4, AttemptOutcome::Ok, &SearchStatistics::default());
//! assert_eq!(counter.ok_count(), 1);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::statistics::SearchStatistics;

/// How one attempt at a fixed round budget ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptOutcome {
    /// A plan was found within the budget.
    Ok,
    /// The search concluded that no plan fits the budget.
    NotFound,
    /// The attempt hit its time or node limit first.
    Timeout,
}

impl AttemptOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            AttemptOutcome::Ok => "ok",
            AttemptOutcome::NotFound => "not_found",
            AttemptOutcome::Timeout => "timeout",
        }
    }

    pub fn is_ok(self) -> bool {
        self == AttemptOutcome::Ok
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned event, as streamed over a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptEvent {
    DeepeningStarted {
        max_rounds: u32,
    },
    AttemptStarted {
        budget: u32,
    },
    AttemptFinished {
        budget: u32,
        outcome: AttemptOutcome,
        statistics: SearchStatistics,
    },
    DeepeningEnded {
        /// Rounds used by the shortest plan, if any was found.
        rounds_used: Option<usize>,
        terminated_early: bool,
    },
}

/// Listener for deepening progress.
pub trait AttemptListener: Send + Sync + fmt::Debug {
    /// Called after each attempt with its budget and outcome.
    fn on_attempt_finished(
        &self,
        budget: u32,
        outcome: AttemptOutcome,
        statistics: &SearchStatistics,
    );

    /// Called before the first attempt.
    fn on_deepening_started(&self, _max_rounds: u32) {}

    /// Called before each attempt.
    fn on_attempt_started(&self, _budget: u32) {}

    /// Called once the loop stops.
    fn on_deepening_ended(&self, _rounds_used: Option<usize>, _terminated_early: bool) {}
}

/// Central broadcaster for attempt events.
#[derive(Default, Clone)]
pub struct AttemptEventSupport {
    listeners: Vec<Arc<dyn AttemptListener>>,
}

impl AttemptEventSupport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn AttemptListener>) {
        self.listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn fire_deepening_started(&self, max_rounds: u32) {
        for listener in &self.listeners {
            listener.on_deepening_started(max_rounds);
        }
    }

    pub fn fire_attempt_started(&self, budget: u32) {
        for listener in &self.listeners {
            listener.on_attempt_started(budget);
        }
    }

    pub fn fire_attempt_finished(
        &self,
        budget: u32,
        outcome: AttemptOutcome,
        statistics: &SearchStatistics,
    ) {
        for listener in &self.listeners {
            listener.on_attempt_finished(budget, outcome, statistics);
        }
    }

    pub fn fire_deepening_ended(&self, rounds_used: Option<usize>, terminated_early: bool) {
        for listener in &self.listeners {
            listener.on_deepening_ended(rounds_used, terminated_early);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }
}

impl fmt::Debug for AttemptEventSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Logs one progress line per attempt at INFO level.
///
/// Lines read `Trying to solve in 12 rounds... OK`.
#[derive(Debug, Clone, Default)]
pub struct LoggingAttemptListener {
    prefix: String,
}

impl LoggingAttemptListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The line printed for an attempt.
    pub fn progress_line(&self, budget: u32, outcome: AttemptOutcome) -> String {
        let verdict = match outcome {
            AttemptOutcome::Ok => "OK",
            AttemptOutcome::NotFound => "NOK",
            AttemptOutcome::Timeout => "TIMEOUT",
        };
        format!(
            "{}Trying to solve in {} rounds... {}",
            self.prefix, budget, verdict
        )
    }
}

impl AttemptListener for LoggingAttemptListener {
    fn on_attempt_finished(
        &self,
        budget: u32,
        outcome: AttemptOutcome,
        _statistics: &SearchStatistics,
    ) {
        info!("{}", self.progress_line(budget, outcome));
    }

    fn on_deepening_ended(&self, rounds_used: Option<usize>, terminated_early: bool) {
        match rounds_used {
            Some(rounds) => info!("{}Shortest plan uses {} rounds", self.prefix, rounds),
            None if terminated_early => info!("{}Terminated before any plan", self.prefix),
            None => info!("{}No plan found", self.prefix),
        }
    }
}

/// Counts events; useful in tests.
#[derive(Debug, Default)]
pub struct CountingAttemptListener {
    deepening_started: AtomicUsize,
    attempts_started: AtomicUsize,
    ok: AtomicUsize,
    not_found: AtomicUsize,
    timeout: AtomicUsize,
    deepening_ended: AtomicUsize,
}

impl CountingAttemptListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deepening_started_count(&self) -> usize {
        self.deepening_started.load(Ordering::SeqCst)
    }

    pub fn attempts_started_count(&self) -> usize {
        self.attempts_started.load(Ordering::SeqCst)
    }

    pub fn ok_count(&self) -> usize {
        self.ok.load(Ordering::SeqCst)
    }

    pub fn not_found_count(&self) -> usize {
        self.not_found.load(Ordering::SeqCst)
    }

    pub fn timeout_count(&self) -> usize {
        self.timeout.load(Ordering::SeqCst)
    }

    /// Attempts finished with any outcome.
    pub fn attempts_finished_count(&self) -> usize {
        self.ok_count() + self.not_found_count() + self.timeout_count()
    }

    pub fn deepening_ended_count(&self) -> usize {
        self.deepening_ended.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.deepening_started,
            &self.attempts_started,
            &self.ok,
            &self.not_found,
            &self.timeout,
            &self.deepening_ended,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

impl AttemptListener for CountingAttemptListener {
    fn on_attempt_finished(
        &self,
        _budget: u32,
        outcome: AttemptOutcome,
        _statistics: &SearchStatistics,
    ) {
        let counter = match outcome {
            AttemptOutcome::Ok => &self.ok,
            AttemptOutcome::NotFound => &self.not_found,
            AttemptOutcome::Timeout => &self.timeout,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn on_deepening_started(&self, _max_rounds: u32) {
        self.deepening_started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_attempt_started(&self, _budget: u32) {
        self.attempts_started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_deepening_ended(&self, _rounds_used: Option<usize>, _terminated_early: bool) {
        self.deepening_ended.fetch_add(1, Ordering::SeqCst);
    }
}

/// Streams events over an unbounded tokio channel.
///
/// Sending never blocks; events are dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelAttemptListener {
    sender: mpsc::UnboundedSender<AttemptEvent>,
}

impl ChannelAttemptListener {
    pub fn new(sender: mpsc::UnboundedSender<AttemptEvent>) -> Self {
        Self { sender }
    }

    fn send(&self, event: AttemptEvent) {
        // A closed receiver only means nobody is watching anymore.
        let _ = self.sender.send(event);
    }
}

impl AttemptListener for ChannelAttemptListener {
    fn on_attempt_finished(
        &self,
        budget: u32,
        outcome: AttemptOutcome,
        statistics: &SearchStatistics,
    ) {
        self.send(AttemptEvent::AttemptFinished {
            budget,
            outcome,
            statistics: *statistics,
        });
    }

    fn on_deepening_started(&self, max_rounds: u32) {
        self.send(AttemptEvent::DeepeningStarted { max_rounds });
    }

    fn on_attempt_started(&self, budget: u32) {
        self.send(AttemptEvent::AttemptStarted { budget });
    }

    fn on_deepening_ended(&self, rounds_used: Option<usize>, terminated_early: bool) {
        self.send(AttemptEvent::DeepeningEnded {
            rounds_used,
            terminated_early,
        });
    }
}

/// Adapts a closure `(budget, outcome)` into a listener.
pub struct FnAttemptListener<F> {
    observer: F,
}

impl<F> FnAttemptListener<F>
where
    F: Fn(u32, AttemptOutcome) + Send + Sync,
{
    pub fn new(observer: F) -> Self {
        Self { observer }
    }
}

impl<F> fmt::Debug for FnAttemptListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAttemptListener").finish_non_exhaustive()
    }
}

impl<F> AttemptListener for FnAttemptListener<F>
where
    F: Fn(u32, AttemptOutcome) + Send + Sync,
{
    fn on_attempt_finished(
        &self,
        budget: u32,
        outcome: AttemptOutcome,
        _statistics: &SearchStatistics,
    ) {
        (self.observer)(budget, outcome);
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
