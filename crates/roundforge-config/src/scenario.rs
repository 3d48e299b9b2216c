//! Scenario files: a planning problem plus its round budget.

use std::collections::BTreeMap;
use std::path::Path;

use roundforge_core::{
    Objective, ObjectiveTarget, PlanningProblem, ResourceVector, Transformation,
};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, EffectsConfig};

/// A declarative planning scenario.
///
/// ```
/// use roundforge_config::ScenarioConfig;
///
/// let scenario = ScenarioConfig::from_toml_str(r#"
///     name = "dummy"
///     max_rounds = 4
///
///     [initial]
///     coms = 0
///     electricity = 2
///
///     [objective]
///     data = 2
///     coms = 1
///
///     [[transformations]]
///     outputs = { electricity = 1 }
///
///     [[transformations]]
///     inputs = { electricity = 1 }
///     outputs = { data = 1 }
/// "#).unwrap();
///
/// let problem = scenario.to_problem().unwrap();
/// assert_eq!(problem.transformations.len(), 2);
/// assert_eq!(problem.objective.len(), 2);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ScenarioConfig {
    #[serde(default)]
    pub name: String,

    /// Largest round budget the scenario is meant to be solved in.
    pub max_rounds: u32,

    /// Starting stock; absent resources start at zero.
    #[serde(default)]
    pub initial: BTreeMap<String, i64>,

    #[serde(default)]
    pub objective: BTreeMap<String, ObjectiveTargetConfig>,

    #[serde(default)]
    pub transformations: Vec<TransformationConfig>,

    #[serde(default)]
    pub effects: EffectsConfig,
}

/// An objective entry: a plain number or an inclusive `[lo, hi]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ObjectiveTargetConfig {
    AtLeast(i64),
    Between([i64; 2]),
}

impl From<ObjectiveTargetConfig> for ObjectiveTarget {
    fn from(config: ObjectiveTargetConfig) -> Self {
        match config {
            ObjectiveTargetConfig::AtLeast(n) => ObjectiveTarget::Exact(n),
            ObjectiveTargetConfig::Between([lo, hi]) => ObjectiveTarget::Range(lo, hi),
        }
    }
}

/// One transformation rule.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TransformationConfig {
    #[serde(default)]
    pub inputs: BTreeMap<String, i64>,

    #[serde(default)]
    pub outputs: BTreeMap<String, i64>,
}

impl TransformationConfig {
    fn to_transformation(&self, index: usize) -> Result<Transformation, ConfigError> {
        let inputs = vector(&self.inputs, &format!("transformation {}", index + 1))?;
        let outputs = vector(&self.outputs, &format!("transformation {}", index + 1))?;
        let negative = inputs
            .iter()
            .find(|(resource, quantity)| *quantity < 0 && !resource.is_unconstrained());
        if let Some((resource, quantity)) = negative {
            return Err(ConfigError::Invalid(format!(
                "transformation {} consumes a negative amount of {} ({})",
                index + 1,
                resource,
                quantity
            )));
        }
        Ok(Transformation::new(inputs, outputs))
    }
}

fn vector(entries: &BTreeMap<String, i64>, owner: &str) -> Result<ResourceVector, ConfigError> {
    if entries.keys().any(|name| name.trim().is_empty()) {
        return Err(ConfigError::Invalid(format!(
            "{} uses an empty resource name",
            owner
        )));
    }
    Ok(entries
        .iter()
        .map(|(name, quantity)| (name.clone(), *quantity))
        .collect())
}

impl ScenarioConfig {
    /// Loads a scenario, choosing the format from the file extension.
    ///
    /// `.yaml` and `.yml` files are read as YAML, everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Builds and validates the planning problem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for structural mistakes such as empty
    /// resource names, and [`ConfigError::Model`] for a malformed objective
    /// or effect schedule.
    pub fn to_problem(&self) -> Result<PlanningProblem, ConfigError> {
        let initial = vector(&self.initial, "initial state")?;
        let objective = self.objective()?;
        let transformations = self
            .transformations
            .iter()
            .enumerate()
            .map(|(i, t)| t.to_transformation(i))
            .collect::<Result<Vec<_>, _>>()?;
        let effects = self.effects.to_effect_config()?;

        let problem = PlanningProblem::new(initial)
            .with_transformations(transformations)
            .with_objective(objective)
            .with_effects(effects);
        problem.validate()?;
        Ok(problem)
    }

    fn objective(&self) -> Result<Objective, ConfigError> {
        if self.objective.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "objective uses an empty resource name".to_string(),
            ));
        }
        let objective: Objective = self
            .objective
            .iter()
            .map(|(name, target)| (name.clone(), ObjectiveTarget::from(*target)))
            .collect();
        objective.validate()?;
        Ok(objective)
    }
}
