//! Per-attempt search scope.

use std::time::Duration;

use crate::statistics::{SearchStatistics, StatisticsCollector};

/// State shared by every branch of one search attempt.
///
/// Terminations read the scope at each recursive entry. A fresh scope is
/// created per attempt, so work never straddles attempt boundaries.
#[derive(Debug, Default)]
pub struct SearchScope {
    budget: u32,
    statistics: StatisticsCollector,
}

impl SearchScope {
    /// Starts the attempt clock for a search bounded by `budget` rounds.
    pub fn new(budget: u32) -> Self {
        Self {
            budget,
            statistics: StatisticsCollector::new(),
        }
    }

    /// Round budget of the attempt.
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Wall-clock time since the attempt started.
    pub fn elapsed(&self) -> Duration {
        self.statistics.elapsed()
    }

    /// Nodes explored so far.
    pub fn nodes(&self) -> u64 {
        self.statistics.current_nodes()
    }

    pub fn statistics(&self) -> &StatisticsCollector {
        &self.statistics
    }

    pub fn snapshot(&self) -> SearchStatistics {
        self.statistics.snapshot()
    }
}
