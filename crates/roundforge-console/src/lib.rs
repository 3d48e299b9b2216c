//! Colorful console output for planner progress.
//!
//! Provides a custom `tracing` layer that formats planner events with colors,
//! and a colored rendering of replayed traces.
//!
//! ## Log Levels
//!
//! - **INFO**: Deepening start/end and one line per attempt
//! - **DEBUG**: Attempt start, hazard failures, search summaries
//! - **TRACE**: Candidate ordering

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use roundforge_solver::Trace;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static DEEPENING_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_FILTER: &str = "roundforge_solver=info,roundforge=info";

/// Initializes the planner console output.
///
/// Safe to call multiple times - only the first call has effect.
/// `RUST_LOG` overrides the default filter.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(PlannerConsoleLayer)
            .try_init();
    });
}

fn mark_deepening_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    DEEPENING_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = DEEPENING_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let title = format!("RoundForge v{} - round-budgeted planner", VERSION);
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", title.bright_cyan().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats planner events with colors.
pub struct PlannerConsoleLayer;

impl<S: Subscriber> Layer<S> for PlannerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("roundforge_solver") && !target.starts_with("roundforge::") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    outcome: Option<String>,
    message: Option<String>,
    max_rounds: Option<u64>,
    transformation_count: Option<u64>,
    attempt_limit_ms: Option<u64>,
    budget: Option<u64>,
    rounds: Option<u64>,
    attempts: Option<u64>,
    duration_ms: Option<u64>,
    nodes: Option<u64>,
    round: Option<u64>,
    accumulated: Option<i64>,
    threshold: Option<i64>,
    terminated_early: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "outcome" => self.outcome = Some(s.trim_matches('"').to_string()),
            "message" => self.message = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "max_rounds" => self.max_rounds = Some(value),
            "transformation_count" => self.transformation_count = Some(value),
            "attempt_limit_ms" => self.attempt_limit_ms = Some(value),
            "budget" => self.budget = Some(value),
            "rounds" => self.rounds = Some(value),
            "attempts" => self.attempts = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "nodes" => self.nodes = Some(value),
            "round" => self.round = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "accumulated" => self.accumulated = Some(value),
            "threshold" => self.threshold = Some(value),
            _ => self.record_u64(field, value.max(0) as u64),
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "terminated_early" {
            self.terminated_early = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "outcome" => self.outcome = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "deepening_start" => format_deepening_start(v),
        "attempt_end" => format_attempt_end(v),
        "deepening_end" => format_deepening_end(v),
        "hazard_failure" => format_hazard_failure(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_deepening_start(v: &EventVisitor) -> String {
    mark_deepening_start();
    let max_rounds = v.max_rounds.unwrap_or(0);
    let transformations = v.transformation_count.unwrap_or(0);

    let mut output = format!(
        "{} {} Planning │ {} transformations │ up to {} rounds",
        format_elapsed(),
        "▶".bright_green().bold(),
        transformations
            .to_formatted_string(&Locale::en)
            .bright_yellow(),
        max_rounds.to_formatted_string(&Locale::en).bright_yellow(),
    );

    if let Some(limit) = v.attempt_limit_ms.filter(|ms| *ms > 0) {
        output.push_str(&format!(
            " │ {} per attempt",
            format_duration_ms(limit).bright_yellow()
        ));
    }

    output
}

fn format_attempt_end(v: &EventVisitor) -> String {
    let budget = v.budget.unwrap_or(0);
    let nodes = v.nodes.unwrap_or(0);
    let duration = v.duration_ms.unwrap_or(0);

    let verdict = match v.outcome.as_deref() {
        Some("ok") => "OK".bright_green().bold().to_string(),
        Some("timeout") => "TIMEOUT".yellow().bold().to_string(),
        _ => "NOK".bright_red().bold().to_string(),
    };

    format!(
        "{} {} Trying to solve in {:>3} rounds... {} │ {} │ {} nodes",
        format_elapsed(),
        "⚡".bright_cyan(),
        budget,
        verdict,
        format_duration_ms(duration).yellow(),
        nodes.to_formatted_string(&Locale::en).white(),
    )
}

fn format_deepening_end(v: &EventVisitor) -> String {
    let attempts = v.attempts.unwrap_or(0);
    match v.rounds {
        Some(rounds) => format!(
            "{} {} Shortest plan │ {} rounds │ {} attempts",
            format_elapsed(),
            "■".bright_cyan().bold(),
            rounds.to_formatted_string(&Locale::en).bright_green().bold(),
            attempts,
        ),
        None => {
            let reason = if v.terminated_early.unwrap_or(false) {
                "TERMINATED"
            } else {
                "NO PLAN"
            };
            format!(
                "{} {} {} │ {} attempts",
                format_elapsed(),
                "■".bright_cyan().bold(),
                reason.bright_red().bold(),
                attempts,
            )
        }
    }
}

fn format_hazard_failure(v: &EventVisitor) -> String {
    format!(
        "{} {} Hazard at round {} │ {} ≥ {}",
        format_elapsed(),
        "✗".bright_red(),
        v.round.unwrap_or(0),
        v.accumulated.unwrap_or(0).bright_red(),
        v.threshold.unwrap_or(0),
    )
    .bright_black()
    .to_string()
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Renders a replayed trace with colors, one row per round.
///
/// Rounds where periodic effects fired are marked with `⟳`.
pub fn render_trace(trace: &Trace) -> String {
    let mut lines = Vec::with_capacity(trace.steps().len());
    for (round, step) in trace.steps().iter().enumerate() {
        let index = format!("{:>3}", round).bright_black().to_string();
        let state = step.state.to_string();
        let line = match &step.transformation {
            Some(transformation) => {
                let marker = if step.effects.fired() {
                    format!(" {}", "⟳".bright_magenta())
                } else {
                    String::new()
                };
                format!(
                    "{} │ {} │ {}{}",
                    index,
                    state.white(),
                    transformation.to_string().bright_yellow(),
                    marker,
                )
            }
            None => format!(
                "{} │ {} │ {}",
                index,
                state.bright_green().bold(),
                "done".bright_green(),
            ),
        };
        lines.push(line);
    }
    lines.join("\n")
}
