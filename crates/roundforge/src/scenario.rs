//! Solving scenario files end to end.

use roundforge_config::{ConfigError, PlannerConfig, ScenarioConfig};
use roundforge_core::PlanningProblem;
use roundforge_solver::{AttemptEvent, DeepeningReport, Planner, Trace};
use tokio::sync::mpsc;
use tracing::info;

/// A solved scenario: the deepening report and, when a plan was found,
/// its replayed trace.
#[derive(Debug, Clone)]
pub struct ScenarioSolution {
    pub name: String,
    pub problem: PlanningProblem,
    pub max_rounds: u32,
    pub report: DeepeningReport,
    pub trace: Option<Trace>,
}

impl ScenarioSolution {
    pub fn is_solved(&self) -> bool {
        self.report.best.is_some()
    }
}

/// Finds the shortest plan for `scenario` using `config`.
///
/// The config's `max_rounds` overrides the scenario's own.
///
/// # Errors
///
/// Returns [`ConfigError`] for a malformed scenario or config, and
/// [`ConfigError::Model`] if replay disagrees with the search.
pub fn solve_scenario(
    scenario: &ScenarioConfig,
    config: &PlannerConfig,
) -> Result<ScenarioSolution, ConfigError> {
    run(scenario, config, None)
}

/// Like [`solve_scenario`], streaming attempt events through `sender`.
pub fn solve_scenario_with_channel(
    scenario: &ScenarioConfig,
    config: &PlannerConfig,
    sender: mpsc::UnboundedSender<AttemptEvent>,
) -> Result<ScenarioSolution, ConfigError> {
    run(scenario, config, Some(sender))
}

fn run(
    scenario: &ScenarioConfig,
    config: &PlannerConfig,
    sender: Option<mpsc::UnboundedSender<AttemptEvent>>,
) -> Result<ScenarioSolution, ConfigError> {
    #[cfg(feature = "console")]
    roundforge_console::init();

    let problem = scenario.to_problem()?;
    let planner = Planner::from_config(config)?;
    let max_rounds = planner.max_rounds().unwrap_or(scenario.max_rounds);

    info!(
        event = "scenario_start",
        scenario = %scenario.name,
        max_rounds,
    );
    let report = match sender {
        Some(sender) => planner.find_shortest_plan_with_channel(&problem, max_rounds, sender)?,
        None => planner.find_shortest_plan(&problem, max_rounds)?,
    };
    let trace = match &report.best {
        Some(best) => Some(planner.replay(&problem, &best.plan)?),
        None => None,
    };

    Ok(ScenarioSolution {
        name: scenario.name.clone(),
        problem,
        max_rounds,
        report,
        trace,
    })
}
