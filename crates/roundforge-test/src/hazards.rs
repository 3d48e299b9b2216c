//! Problems that only make sense with periodic effects switched on.

use roundforge_core::{resources, EffectConfig, Objective, PlanningProblem, Transformation};

use crate::Mission;

/// Thrust decays by one every three rounds while the plan tries to bank three.
///
/// Because of the leak, any plan must fire the thrust rule more than twice
/// when it runs the full budget. The shortest plan needs six rounds.
pub fn thrust_decay() -> Mission {
    let problem = PlanningProblem::new(resources! { "apple" => 3 })
        .with_transformations([
            Transformation::produce(resources! { "electricity" => 1 }),
            Transformation::new(resources! { "electricity" => 2 }, resources! { "thrust" => 2 }),
        ])
        .with_objective(Objective::new().with_exact("thrust", 3))
        .with_effects(EffectConfig::new().with_decay("thrust"));

    Mission {
        name: "thrust-decay",
        problem,
        max_rounds: 12,
    }
}

/// Data can be scooped quickly at the cost of radiation, or refined slowly.
///
/// Greedy ordering prefers scooping, which breaches the radiation threshold
/// at the first boundary unless the plan mixes in clean rounds.
pub fn radiation_problem() -> Mission {
    let problem = PlanningProblem::new(resources! {})
        .with_transformations([
            Transformation::produce(resources! { "electricity" => 1 }),
            Transformation::new(resources! { "electricity" => 2 }, resources! { "data" => 1 }),
            Transformation::produce(resources! { "data" => 1, "radiation" => 3 }),
        ])
        .with_objective(Objective::new().with_exact("data", 3))
        .with_effects(EffectConfig::new().with_hazard("radiation", 5));

    Mission {
        name: "radiation",
        problem,
        max_rounds: 12,
    }
}

/// Twelve rounds of collecting one data each, under ambient radiation.
///
/// The objective is reachable only on round twelve, where accumulated
/// hazard (six) already exceeds the threshold of five.
pub fn exposure_problem() -> Mission {
    let problem = PlanningProblem::new(resources! {})
        .with_transformation(Transformation::produce(resources! { "data" => 1 }))
        .with_objective(Objective::new().with_exact("data", 12))
        .with_effects(EffectConfig::new().with_hazard("radiation", 5));

    Mission {
        name: "exposure",
        problem,
        max_rounds: 12,
    }
}
