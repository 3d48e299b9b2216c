//! Search statistics collection and reporting.
//!
//! Counters are atomics so the parallel root search can share one collector
//! across worker threads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Statistics for a single search attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Time spent in the attempt.
    pub duration: Duration,
    /// Recursive entries, including the root.
    pub nodes: u64,
    /// States where no transformation was affordable.
    pub dead_ends: u64,
    /// States that ran out of rounds without achieving the objective.
    pub budget_exhausted: u64,
    /// Candidates discarded because a boundary breached the hazard threshold.
    pub hazard_failures: u64,
    /// Boundaries at which the effect schedule fired.
    pub effects_fired: u64,
}

impl SearchStatistics {
    /// Nodes explored per second, or zero for an instantaneous attempt.
    pub fn nodes_per_second(&self) -> u64 {
        let millis = self.duration.as_millis() as u64;
        if millis == 0 {
            0
        } else {
            self.nodes.saturating_mul(1000) / millis
        }
    }

    /// Adds another attempt's counters to this one.
    pub fn accumulate(&mut self, other: &SearchStatistics) {
        self.duration += other.duration;
        self.nodes += other.nodes;
        self.dead_ends += other.dead_ends;
        self.budget_exhausted += other.budget_exhausted;
        self.hazard_failures += other.hazard_failures;
        self.effects_fired += other.effects_fired;
    }
}

/// Thread-safe collector for search statistics.
///
/// The start time is recorded at construction.
#[derive(Debug)]
pub struct StatisticsCollector {
    start_time: Instant,
    nodes: AtomicU64,
    dead_ends: AtomicU64,
    budget_exhausted: AtomicU64,
    hazard_failures: AtomicU64,
    effects_fired: AtomicU64,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            nodes: AtomicU64::new(0),
            dead_ends: AtomicU64::new(0),
            budget_exhausted: AtomicU64::new(0),
            hazard_failures: AtomicU64::new(0),
            effects_fired: AtomicU64::new(0),
        }
    }

    pub fn record_node(&self) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dead_end(&self) {
        self.dead_ends.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_budget_exhausted(&self) {
        self.budget_exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hazard_failure(&self) {
        self.hazard_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_effects_fired(&self) {
        self.effects_fired.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the elapsed time since the collector was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current node count.
    pub fn current_nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Takes a snapshot of current statistics without consuming the collector.
    pub fn snapshot(&self) -> SearchStatistics {
        SearchStatistics {
            duration: self.start_time.elapsed(),
            nodes: self.nodes.load(Ordering::Relaxed),
            dead_ends: self.dead_ends.load(Ordering::Relaxed),
            budget_exhausted: self.budget_exhausted.load(Ordering::Relaxed),
            hazard_failures: self.hazard_failures.load(Ordering::Relaxed),
            effects_fired: self.effects_fired.load(Ordering::Relaxed),
        }
    }
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_counts() {
        let collector = StatisticsCollector::new();

        collector.record_node();
        collector.record_node();
        collector.record_dead_end();
        collector.record_hazard_failure();
        collector.record_effects_fired();

        let stats = collector.snapshot();
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.dead_ends, 1);
        assert_eq!(stats.budget_exhausted, 0);
        assert_eq!(stats.hazard_failures, 1);
        assert_eq!(stats.effects_fired, 1);
    }

    #[test]
    fn test_collector_snapshot() {
        let collector = StatisticsCollector::new();

        collector.record_node();
        let snapshot = collector.snapshot();
        assert_eq!(snapshot.nodes, 1);

        // Can still use collector after snapshot
        collector.record_node();
        assert_eq!(collector.current_nodes(), 2);
    }

    #[test]
    fn test_collector_thread_safety() {
        let collector = StatisticsCollector::new();

        rayon::scope(|s| {
            for _ in 0..4 {
                s.spawn(|_| {
                    for _ in 0..1000 {
                        collector.record_node();
                        collector.record_budget_exhausted();
                    }
                });
            }
        });

        assert_eq!(collector.current_nodes(), 4000);
        assert_eq!(collector.snapshot().budget_exhausted, 4000);
    }

    #[test]
    fn test_accumulate() {
        let mut total = SearchStatistics::default();
        let attempt = SearchStatistics {
            duration: Duration::from_millis(20),
            nodes: 10,
            dead_ends: 1,
            budget_exhausted: 2,
            hazard_failures: 3,
            effects_fired: 4,
        };

        total.accumulate(&attempt);
        total.accumulate(&attempt);

        assert_eq!(total.nodes, 20);
        assert_eq!(total.hazard_failures, 6);
        assert_eq!(total.duration, Duration::from_millis(40));
        assert_eq!(total.nodes_per_second(), 500);
    }
}
