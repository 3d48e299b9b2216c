//! Spacecraft mission scenarios.
//!
//! Every mission starts from a small electricity reserve and must reach a
//! target mix of communications, data, navigation or thrust.

use roundforge_core::{
    resources, EffectConfig, Objective, PlanningProblem, ResourceVector, Transformation,
};

use crate::Mission;

fn rule(inputs: ResourceVector, outputs: ResourceVector) -> Transformation {
    Transformation::new(inputs, outputs)
}

/// The smallest mission: two data and one coms link from two electricity.
///
/// Four rounds are both enough and necessary.
pub fn dummy() -> Mission {
    let problem = PlanningProblem::new(resources! { "coms" => 0, "electricity" => 2 })
        .with_transformations([
            Transformation::produce(resources! { "electricity" => 1 }),
            rule(resources! { "electricity" => 1 }, resources! { "data" => 1 }),
            rule(resources! { "electricity" => 1 }, resources! { "coms" => 1 }),
        ])
        .with_objective(Objective::new().with_exact("data", 2).with_exact("coms", 1));

    Mission {
        name: "dummy",
        problem,
        max_rounds: 4,
    }
}

/// Mars flyby: a ten-rule economy converting electricity into coms, data and nav.
pub fn mars_flyby() -> Mission {
    let problem = PlanningProblem::new(resources! { "electricity" => 5 })
        .with_transformations([
            Transformation::produce(resources! { "electricity" => 1 }),
            rule(resources! { "electricity" => 2 }, resources! { "coms" => 2 }),
            rule(resources! { "data" => 1 }, resources! { "coms" => 2, "nav" => 1 }),
            rule(resources! { "nav" => 1 }, resources! { "coms" => 2, "data" => 1 }),
            rule(resources! { "electricity" => 1 }, resources! { "data" => 2 }),
            rule(
                resources! { "electricity" => 1, "coms" => 2 },
                resources! { "data" => 3 },
            ),
            rule(resources! { "nav" => 2 }, resources! { "data" => 3 }),
            rule(resources! { "electricity" => 1 }, resources! { "nav" => 2 }),
            rule(resources! { "data" => 1 }, resources! { "coms" => 1, "nav" => 2 }),
            rule(
                resources! { "coms" => 1, "electricity" => 1 },
                resources! { "nav" => 4 },
            ),
        ])
        .with_objective(
            Objective::new()
                .with_exact("coms", 5)
                .with_exact("data", 8)
                .with_exact("nav", 3),
        );

    Mission {
        name: "mars-flyby",
        problem,
        max_rounds: 12,
    }
}

/// Venus crasher: thrust leaks one unit every three rounds.
pub fn venus_crasher() -> Mission {
    let problem = PlanningProblem::new(resources! { "electricity" => 5 })
        .with_transformations([
            Transformation::produce(resources! { "electricity" => 1 }),
            rule(resources! { "electricity" => 1 }, resources! { "coms" => 2 }),
            rule(resources! { "data" => 2 }, resources! { "coms" => 2, "nav" => 2 }),
            rule(resources! { "data" => 1, "nav" => 1 }, resources! { "coms" => 4 }),
            rule(resources! { "electricity" => 2 }, resources! { "data" => 2 }),
            rule(resources! { "nav" => 1 }, resources! { "data" => 2, "coms" => 1 }),
            rule(resources! { "coms" => 1, "nav" => 1 }, resources! { "data" => 4 }),
            rule(resources! { "electricity" => 2 }, resources! { "nav" => 2 }),
            rule(resources! { "coms" => 2 }, resources! { "nav" => 1, "thrust" => 4 }),
            rule(resources! { "data" => 2 }, resources! { "nav" => 3, "coms" => 1 }),
        ])
        .with_objective(
            Objective::new()
                .with_exact("coms", 6)
                .with_exact("nav", 6)
                .with_exact("thrust", 8),
        )
        .with_effects(EffectConfig::new().with_decay("thrust"));

    Mission {
        name: "venus-crasher",
        problem,
        max_rounds: 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missions_are_well_formed() {
        for mission in [dummy(), mars_flyby(), venus_crasher()] {
            assert!(mission.problem.validate().is_ok(), "{}", mission.name);
            assert!(!mission.problem.transformations.is_empty());
        }
    }

    #[test]
    fn test_only_venus_has_effects() {
        assert!(dummy().problem.effects.is_inert());
        assert!(mars_flyby().problem.effects.is_inert());
        assert!(!venus_crasher().problem.effects.is_inert());
    }
}
