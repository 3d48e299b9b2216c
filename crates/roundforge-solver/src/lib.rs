//! RoundForge Solver Engine
//!
//! This crate provides the planner implementation including:
//! - Depth-limited search with greedy candidate ordering
//! - Parallel root exploration on a rayon pool
//! - Iterative deepening over round budgets
//! - Termination conditions (cooperative cancellation)
//! - Event system for attempt progress
//! - Plan replay and trace rendering
//! - Config-driven [`Planner`] facade

pub mod deepening;
pub mod event;
pub mod manager;
pub mod planning;
pub mod replay;
pub mod scope;
pub mod search;
pub mod statistics;
pub mod termination;

pub use deepening::{AttemptRecord, DeepeningReport, IterativeDeepening, ShortestPlan};
pub use event::{
    AttemptEvent, AttemptEventSupport, AttemptListener, AttemptOutcome, ChannelAttemptListener,
    CountingAttemptListener, FnAttemptListener, LoggingAttemptListener,
};
pub use manager::Planner;
pub use planning::{find_shortest_plan, find_shortest_plan_observed, plan};
pub use replay::{replay, Trace, TraceStep};
pub use scope::SearchScope;
pub use search::{SearchContext, SearchEngine, SearchOutcome};
pub use statistics::{SearchStatistics, StatisticsCollector};
pub use termination::{
    ExternalTermination, NoTermination, NodeCountTermination, OrTermination, Termination,
    TimeTermination,
};
