//! Configuration system for RoundForge.
//!
//! Load planner settings and scenario files from TOML or YAML so budgets,
//! timeouts and periodic effects can change without code changes.
//!
//! # Examples
//!
//! Load planner configuration from a TOML string:
//!
//! ```
//! use roundforge_config::PlannerConfig;
//! use std::time::Duration;
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     [deepening]
//!     max_rounds = 12
//!     attempt_millis_limit = 250
//!
//!     [effects]
//!     period = 3
//!     [effects.decay]
//!     resource = "thrust"
//! "#).unwrap();
//!
//! assert_eq!(config.attempt_time_limit(), Some(Duration::from_millis(250)));
//! assert_eq!(config.deepening.max_rounds, Some(12));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use roundforge_config::PlannerConfig;
//!
//! let config = PlannerConfig::load("planner.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

mod scenario;

use std::path::Path;
use std::time::Duration;

use roundforge_core::{EffectConfig, RoundForgeError, DEFAULT_PERIOD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use scenario::{ObjectiveTargetConfig, ScenarioConfig, TransformationConfig};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Model(#[from] RoundForgeError),
}

/// Main planner configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Number of threads exploring root candidates in parallel.
    #[serde(default)]
    pub move_thread_count: MoveThreadCount,

    /// Iterative-deepening settings.
    #[serde(default)]
    pub deepening: DeepeningConfig,

    /// Effect schedule overriding the one declared by a scenario.
    #[serde(default)]
    pub effects: Option<EffectsConfig>,
}

impl PlannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the largest round budget to probe.
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.deepening.max_rounds = Some(rounds);
        self
    }

    /// Sets the per-attempt wall-clock limit in milliseconds.
    pub fn with_attempt_millis(mut self, millis: u64) -> Self {
        self.deepening.attempt_millis_limit = Some(millis);
        self
    }

    /// Sets the per-attempt node limit.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.deepening.node_limit = Some(nodes);
        self
    }

    /// Keeps deepening after a timed-out attempt.
    pub fn with_continue_on_timeout(mut self, enabled: bool) -> Self {
        self.deepening.continue_on_timeout = enabled;
        self
    }

    pub fn with_move_thread_count(mut self, count: MoveThreadCount) -> Self {
        self.move_thread_count = count;
        self
    }

    pub fn with_effects(mut self, effects: EffectsConfig) -> Self {
        self.effects = Some(effects);
        self
    }

    /// Returns the per-attempt time limit, if configured.
    ///
    /// Convenience method that delegates to `deepening.attempt_time_limit()`.
    pub fn attempt_time_limit(&self) -> Option<Duration> {
        self.deepening.attempt_time_limit()
    }

    /// Checks values serde cannot reject on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero thread count, and
    /// [`ConfigError::Model`] when the effect override is malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_thread_count == MoveThreadCount::Count(0) {
            return Err(ConfigError::Invalid(
                "move_thread_count must be at least 1".to_string(),
            ));
        }
        if let Some(effects) = &self.effects {
            effects.to_effect_config()?;
        }
        Ok(())
    }
}

/// Move thread count configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveThreadCount {
    /// One thread per available core.
    Auto,

    /// Sequential search.
    #[default]
    None,

    /// Specific number of threads.
    Count(usize),
}

impl MoveThreadCount {
    /// Resolves to a concrete thread count, `1` meaning sequential search.
    pub fn resolve(&self) -> usize {
        match self {
            MoveThreadCount::Auto => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            MoveThreadCount::None => 1,
            MoveThreadCount::Count(n) => (*n).max(1),
        }
    }
}

/// Iterative-deepening configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeepeningConfig {
    /// Largest round budget to probe; overrides the scenario's own.
    pub max_rounds: Option<u32>,

    /// Seconds allowed per attempt.
    pub attempt_seconds_limit: Option<u64>,

    /// Milliseconds allowed per attempt, added to the seconds limit.
    pub attempt_millis_limit: Option<u64>,

    /// Nodes explored per attempt before it is abandoned.
    pub node_limit: Option<u64>,

    /// Keep probing smaller budgets after an attempt times out.
    #[serde(default)]
    pub continue_on_timeout: bool,
}

impl DeepeningConfig {
    /// Returns the per-attempt time limit as a Duration, if any.
    pub fn attempt_time_limit(&self) -> Option<Duration> {
        let millis = self
            .attempt_seconds_limit
            .unwrap_or(0)
            .saturating_mul(1000)
            .saturating_add(self.attempt_millis_limit.unwrap_or(0));
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

/// Periodic effect configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EffectsConfig {
    /// Rounds between two effect firings.
    #[serde(default = "default_period")]
    pub period: u32,

    pub decay: Option<DecayConfig>,

    pub hazard: Option<HazardConfig>,

    pub reset: Option<ResetConfig>,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            decay: None,
            hazard: None,
            reset: None,
        }
    }
}

impl EffectsConfig {
    /// Converts into the core schedule and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty resource name and
    /// [`ConfigError::Model`] for a schedule the planner would reject.
    pub fn to_effect_config(&self) -> Result<EffectConfig, ConfigError> {
        let mut effects = EffectConfig::new().with_period(self.period);
        if let Some(decay) = &self.decay {
            effects = effects
                .with_decay_amount(resource_name("decay", &decay.resource)?, decay.decrement);
        }
        if let Some(hazard) = &self.hazard {
            effects = effects.with_hazard_increment(
                resource_name("hazard", &hazard.resource)?,
                hazard.increment,
                hazard.threshold,
            );
        }
        if let Some(reset) = &self.reset {
            effects = effects.with_reset(resource_name("reset", &reset.resource)?, reset.value);
        }
        effects.validate()?;
        Ok(effects)
    }
}

fn resource_name(effect: &str, name: &str) -> Result<String, ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Invalid(format!(
            "{} effect needs a resource name",
            effect
        )));
    }
    Ok(name.to_string())
}

/// Decay effect configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DecayConfig {
    pub resource: String,

    #[serde(default = "default_decrement")]
    pub decrement: i64,
}

/// Hazard effect configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HazardConfig {
    pub resource: String,

    #[serde(default = "default_increment")]
    pub increment: i64,

    /// Accumulated hazard at which a boundary fails the branch.
    pub threshold: i64,
}

/// Reset effect configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ResetConfig {
    pub resource: String,
    pub value: i64,
}

fn default_period() -> u32 {
    DEFAULT_PERIOD
}

fn default_decrement() -> i64 {
    roundforge_core::DEFAULT_DECAY_DECREMENT
}

fn default_increment() -> i64 {
    roundforge_core::DEFAULT_HAZARD_INCREMENT
}
