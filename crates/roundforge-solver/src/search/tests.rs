//! Tests for the sequential and parallel search engine.

use proptest::prelude::*;
use rayon::ThreadPoolBuilder;
use roundforge_core::{
    resources, EffectConfig, Objective, PlanningProblem, Resource, State, Transformation,
};
use roundforge_test::{exposure_problem, missions, radiation_problem, thrust_decay};

use super::*;
use crate::scope::SearchScope;
use crate::termination::{NoTermination, NodeCountTermination};

fn solve(problem: &PlanningProblem, budget: u32) -> (SearchOutcome, SearchScope) {
    let context = SearchContext::new(
        &problem.transformations,
        &problem.objective,
        &problem.effects,
    );
    let scope = SearchScope::new(budget);
    let outcome =
        SearchEngine::new(context, budget, &NoTermination).solve(&problem.initial, &scope);
    (outcome, scope)
}

fn solve_parallel(problem: &PlanningProblem, budget: u32, threads: usize) -> SearchOutcome {
    let pool = ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
    let context = SearchContext::new(
        &problem.transformations,
        &problem.objective,
        &problem.effects,
    );
    let scope = SearchScope::new(budget);
    SearchEngine::new(context, budget, &NoTermination).solve_parallel(
        &problem.initial,
        &scope,
        &pool,
    )
}

fn uses(plan: &roundforge_core::Plan, transformation: &Transformation) -> usize {
    plan.iter().filter(|t| *t == transformation).count()
}

#[test]
fn test_dummy_mission_plan() {
    let mission = missions::dummy();
    let problem = &mission.problem;
    let (outcome, _) = solve(problem, mission.max_rounds);

    let t = &problem.transformations;
    let SearchOutcome::Found { plan, trajectory } = outcome else {
        panic!("dummy mission must be solvable in four rounds");
    };
    assert_eq!(plan.steps(), &[t[1].clone(), t[1].clone(), t[0].clone(), t[2].clone()]);
    assert_eq!(trajectory.len(), plan.len() + 1);
    assert_eq!(trajectory[0], problem.initial);

    let last = trajectory.last().unwrap();
    assert!(last.achieved(&problem.objective));
    assert_eq!(last.quantity(&Resource::new("data")), 2);
    assert_eq!(last.quantity(&Resource::new("coms")), 1);
    assert_eq!(last.round(), 4);
}

#[test]
fn test_already_achieved_returns_empty_plan() {
    let problem = PlanningProblem::new(resources! { "data" => 3 })
        .with_objective(Objective::new().with_exact("data", 2));
    let (outcome, scope) = solve(&problem, 0);

    assert_eq!(outcome.plan().map(|p| p.len()), Some(0));
    assert_eq!(scope.nodes(), 1);
}

#[test]
fn test_zero_budget_is_infeasible() {
    let mission = missions::dummy();
    let (outcome, scope) = solve(&mission.problem, 0);

    assert_eq!(outcome, SearchOutcome::Infeasible);
    assert_eq!(scope.snapshot().budget_exhausted, 1);
}

#[test]
fn test_dead_end_is_infeasible() {
    let problem = PlanningProblem::new(resources! {})
        .with_transformation(Transformation::new(
            resources! { "electricity" => 1 },
            resources! { "data" => 1 },
        ))
        .with_objective(Objective::new().with_exact("data", 1));
    let (outcome, scope) = solve(&problem, 5);

    assert_eq!(outcome, SearchOutcome::Infeasible);
    assert_eq!(scope.snapshot().dead_ends, 1);
    assert_eq!(scope.nodes(), 1);
}

#[test]
fn test_ties_keep_declaration_order() {
    let plain = Transformation::produce(resources! { "data" => 1 });
    let noisy = Transformation::produce(resources! { "data" => 1, "noise" => 1 });
    let problem = PlanningProblem::new(resources! {})
        .with_transformations([noisy.clone(), plain.clone()])
        .with_objective(Objective::new().with_exact("data", 1));

    let (outcome, _) = solve(&problem, 1);
    assert_eq!(outcome.into_plan().unwrap().steps(), &[noisy]);
}

#[test]
fn test_decay_forces_extra_thrust() {
    let mission = thrust_decay();
    let problem = &mission.problem;
    let (outcome, scope) = solve(problem, mission.max_rounds);

    let SearchOutcome::Found { plan, trajectory } = outcome else {
        panic!("thrust mission must be solvable");
    };
    let thrust_rule = &problem.transformations[1];
    assert_eq!(plan.len(), 9);
    assert!(uses(&plan, thrust_rule) > 2);

    let last = trajectory.last().unwrap();
    assert_eq!(last.quantity(&Resource::new("thrust")), 3);
    assert_eq!(scope.snapshot().effects_fired, 3);
}

#[test]
fn test_hazard_fails_branch_even_if_objective_reachable() {
    let mission = exposure_problem();
    let (outcome, scope) = solve(&mission.problem, mission.max_rounds);
    assert_eq!(outcome, SearchOutcome::Infeasible);
    assert_eq!(scope.snapshot().hazard_failures, 1);

    let harmless = mission.problem.clone().with_effects(EffectConfig::new());
    let (outcome, _) = solve(&harmless, mission.max_rounds);
    assert_eq!(outcome.plan().map(|p| p.len()), Some(12));
}

#[test]
fn test_hazard_steers_search_to_clean_rounds() {
    let mission = radiation_problem();
    let problem = &mission.problem;
    let (outcome, scope) = solve(problem, mission.max_rounds);

    let SearchOutcome::Found { plan, trajectory } = outcome else {
        panic!("radiation mission must be solvable");
    };
    assert!(plan.len() <= 12);
    assert!(trajectory.last().unwrap().achieved(&problem.objective));
    assert!(scope.snapshot().hazard_failures >= 1);
}

#[test]
fn test_termination_cancels_search() {
    let mission = missions::mars_flyby();
    let problem = &mission.problem;
    let context = SearchContext::new(
        &problem.transformations,
        &problem.objective,
        &problem.effects,
    );
    let limit = NodeCountTermination::new(1);
    let scope = SearchScope::new(mission.max_rounds);
    let outcome =
        SearchEngine::new(context, mission.max_rounds, &limit).solve(&problem.initial, &scope);

    assert_eq!(outcome, SearchOutcome::Cancelled);
    assert_eq!(scope.nodes(), 1);
}

#[test]
fn test_mars_flyby_within_twelve_rounds() {
    let mission = missions::mars_flyby();
    let (outcome, _) = solve(&mission.problem, mission.max_rounds);

    let plan = outcome.into_plan().expect("mars flyby is solvable in twelve rounds");
    assert!(plan.len() <= 12);
}

#[test]
fn test_parallel_matches_sequential() {
    let fixtures = [
        missions::dummy(),
        missions::mars_flyby(),
        thrust_decay(),
        radiation_problem(),
        exposure_problem(),
    ];
    for mission in fixtures {
        let (sequential, _) = solve(&mission.problem, mission.max_rounds);
        let parallel = solve_parallel(&mission.problem, mission.max_rounds, 4);
        assert_eq!(sequential, parallel, "{}", mission.name);
    }
}

#[test]
fn test_parallel_root_achieved() {
    let problem = PlanningProblem::new(State::default());
    let outcome = solve_parallel(&problem, 3, 2);
    assert_eq!(outcome.plan().map(|p| p.len()), Some(0));
}

const NAMES: [&str; 4] = ["coms", "data", "electricity", "nav"];

fn side() -> impl Strategy<Value = roundforge_core::ResourceVector> {
    prop::collection::btree_map(0..NAMES.len(), 1i64..3, 0..3)
        .prop_map(|m| m.into_iter().map(|(i, q)| (NAMES[i], q)).collect())
}

fn problem_strategy() -> impl Strategy<Value = PlanningProblem> {
    (
        prop::collection::vec((side(), side()), 1..5),
        side(),
        prop::collection::btree_map(0..NAMES.len(), 0i64..4, 1..3),
        prop::bool::ANY,
    )
        .prop_map(|(rules, initial, targets, decay)| {
            let objective = targets
                .into_iter()
                .map(|(i, n)| (NAMES[i], roundforge_core::ObjectiveTarget::Exact(n)))
                .collect();
            let effects = if decay {
                EffectConfig::new().with_decay("data")
            } else {
                EffectConfig::new()
            };
            PlanningProblem::new(initial)
                .with_transformations(rules.into_iter().map(|(i, o)| Transformation::new(i, o)))
                .with_objective(objective)
                .with_effects(effects)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_plan_fits_budget(problem in problem_strategy(), budget in 0u32..5) {
        let (outcome, _) = solve(&problem, budget);
        if let SearchOutcome::Found { plan, trajectory } = outcome {
            prop_assert!(plan.len() <= budget as usize);
            prop_assert_eq!(trajectory.len(), plan.len() + 1);
            prop_assert!(trajectory.last().unwrap().achieved(&problem.objective));
        }
    }

    #[test]
    fn prop_larger_budget_never_loses_plans(problem in problem_strategy(), budget in 0u32..4) {
        let (small, _) = solve(&problem, budget);
        let (large, _) = solve(&problem, budget + 1);
        if small.is_found() {
            prop_assert!(large.is_found());
        }
    }
}
