//! Error types for RoundForge

use thiserror::Error;

use crate::effects::HazardBreach;

/// Main error type for RoundForge operations.
///
/// Only fatal conditions live here. A branch that runs out of rounds, hits a
/// dead end, or breaches the hazard threshold is ordinary backtracking and is
/// reported through result types instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundForgeError {
    /// An objective entry cannot be evaluated (e.g. an inverted range)
    #[error("Malformed objective: {0}")]
    MalformedObjective(String),

    /// The periodic effect configuration is invalid (e.g. a zero period)
    #[error("Malformed effect configuration: {0}")]
    MalformedEffectConfig(String),

    /// Replaying a plan breached the hazard threshold although search accepted it
    #[error("Replay inconsistency at step {step}: {breach}")]
    ReplayInconsistency {
        /// Zero-based index of the plan step whose effects failed.
        step: usize,
        /// The breach observed during replay.
        breach: HazardBreach,
    },
}

/// Result type alias for RoundForge operations
pub type Result<T> = std::result::Result<T, RoundForgeError>;
