use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use roundforge::{
    console, solve_scenario, MoveThreadCount, PlannerConfig, ScenarioConfig, ScenarioSolution,
};

/// Planner settings picked up from the working directory when present.
const DEFAULT_CONFIG: &str = "planner.toml";

#[derive(Parser)]
#[command(name = "roundforge", about = "Round-budgeted resource planner")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the shortest plan for a scenario and print its trace
    Solve(SolveArgs),

    /// Check a scenario for malformed objectives or effects
    Validate {
        /// Scenario file (TOML, or YAML by extension)
        scenario: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
struct SolveArgs {
    /// Scenario file (TOML, or YAML by extension)
    scenario: PathBuf,

    /// Planner settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Largest round budget to probe
    #[arg(long)]
    max_rounds: Option<u32>,

    /// Wall-clock limit per attempt, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Worker threads for the root search
    #[arg(long)]
    threads: Option<usize>,

    /// Skip the banner and progress lines
    #[arg(short, long)]
    quiet: bool,
}

/// Command-line flags win over the settings file.
fn apply_overrides(mut config: PlannerConfig, args: &SolveArgs) -> PlannerConfig {
    if let Some(rounds) = args.max_rounds {
        config = config.with_max_rounds(rounds);
    }
    if let Some(millis) = args.timeout_ms {
        config.deepening.attempt_seconds_limit = None;
        config = config.with_attempt_millis(millis);
    }
    if let Some(threads) = args.threads {
        config = config.with_move_thread_count(MoveThreadCount::Count(threads));
    }
    config
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Solve(args) => solve(&args),
        Commands::Validate { scenario } => validate(&scenario),
    }
}

fn load_config(path: Option<&Path>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::load(path)
            .with_context(|| format!("reading planner config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => PlannerConfig::load(DEFAULT_CONFIG)
            .with_context(|| format!("reading planner config {}", DEFAULT_CONFIG)),
        None => Ok(PlannerConfig::default()),
    }
}

fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    ScenarioConfig::load(path).with_context(|| format!("reading scenario {}", path.display()))
}

fn solve(args: &SolveArgs) -> Result<ExitCode> {
    let scenario = load_scenario(&args.scenario)?;
    let config = apply_overrides(load_config(args.config.as_deref())?, args);
    config.validate().context("invalid planner config")?;

    if !args.quiet {
        console::init();
    }
    let solution = solve_scenario(&scenario, &config)
        .with_context(|| format!("solving {}", args.scenario.display()))?;

    print_solution(&solution);
    Ok(if solution.is_solved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_solution(solution: &ScenarioSolution) {
    let name = if solution.name.is_empty() {
        "scenario"
    } else {
        solution.name.as_str()
    };
    println!();
    match (&solution.report.best, &solution.trace) {
        (Some(best), Some(trace)) => {
            println!(
                "{} {} solved in {} rounds (budget {})",
                "✓".bright_green().bold(),
                name.bold(),
                best.rounds_used.bright_green(),
                best.budget,
            );
            println!("\n{}\n", best.plan);
            println!("{}", console::render_trace(trace));
        }
        _ => {
            let reason = if solution.report.terminated_early {
                "terminated before a plan was found"
            } else {
                "no plan within"
            };
            println!(
                "{} {} {} {} rounds",
                "✗".bright_red().bold(),
                name.bold(),
                reason,
                solution.max_rounds,
            );
        }
    }
}

fn validate(path: &Path) -> Result<ExitCode> {
    let scenario = load_scenario(path)?;
    match scenario.to_problem() {
        Ok(problem) => {
            println!(
                "{} {}: {} transformations, {} objective entries, budget {}",
                "✓".bright_green().bold(),
                path.display(),
                problem.transformations.len(),
                problem.objective.len(),
                scenario.max_rounds,
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{} {}: {}", "✗".bright_red().bold(), path.display(), err);
            Ok(ExitCode::FAILURE)
        }
    }
}
