//! End-to-end sizing behavior: formulation, solve, server evaluation,
//! and batch aggregation working together.

use pansel_algo::{
    build_boq, build_matrix, evaluate_server_options, solve_sizing, FormulationMode,
    PanelSelection, SizingProblem, SolveConfig, SolveOutcome,
};
use pansel_core::{
    AccessoryRule, Catalog, ComponentSpec, OptionKind, PanelRequirement, SparePolicy,
};

fn comp(name: &str, cost: f64, counts: [u32; 7]) -> ComponentSpec {
    ComponentSpec {
        name: name.into(),
        part_number: format!("PN-{name}"),
        cost,
        digital_in: counts[0],
        digital_out: counts[1],
        analog_in: counts[2],
        analog_out: counts[3],
        universal_in: counts[4],
        universal_out: counts[5],
        universal_io: counts[6],
    }
}

fn req(name: &str, di: u32, dout: u32, ai: u32, ao: u32) -> PanelRequirement {
    PanelRequirement {
        panel_name: name.into(),
        digital_in: di,
        digital_out: dout,
        analog_in: ai,
        analog_out: ao,
    }
}

fn solve(
    candidates: &[ComponentSpec],
    requirement: &PanelRequirement,
    spare: SparePolicy,
) -> SolveOutcome {
    let problem = SizingProblem::new(candidates, requirement, spare);
    solve_sizing(&problem, &SolveConfig::default())
}

#[test]
fn exact_sizing_needs_two_units() {
    // One controller with 8 DI; a 10-DI panel needs two of them.
    let candidates = vec![comp("C8", 100.0, [8, 8, 0, 0, 0, 0, 0])];
    let outcome = solve(&candidates, &req("P", 10, 0, 0, 0), SparePolicy::none());
    let solution = outcome.into_solution().expect("feasible");
    assert_eq!(solution.quantities.get("C8"), Some(&2));
    assert!((solution.total_cost - 200.0).abs() < 1e-6);
}

#[test]
fn universal_points_split_across_demand_types() {
    // Four UIO points cover DI=2 and DO=2 with a single unit.
    let candidates = vec![comp("U4", 50.0, [0, 0, 0, 0, 0, 0, 4])];
    let outcome = solve(&candidates, &req("P", 2, 2, 0, 0), SparePolicy::none());
    let solution = outcome.into_solution().expect("feasible");
    assert_eq!(solution.quantities.get("U4"), Some(&1));
    assert!((solution.total_cost - 50.0).abs() < 1e-6);
}

#[test]
fn analog_demand_without_analog_capacity_is_infeasible() {
    let candidates = vec![comp("D", 80.0, [8, 8, 0, 0, 0, 0, 0])];
    let outcome = solve(&candidates, &req("P", 0, 0, 1, 0), SparePolicy::none());
    assert_eq!(outcome, SolveOutcome::Infeasible);
}

#[test]
fn universal_inputs_cannot_serve_outputs() {
    let candidates = vec![comp("UI8", 60.0, [0, 0, 0, 0, 8, 0, 0])];
    let outcome = solve(&candidates, &req("P", 0, 0, 0, 1), SparePolicy::none());
    assert_eq!(outcome, SolveOutcome::Infeasible);
}

#[test]
fn zero_demand_solves_to_nothing() {
    let candidates = vec![comp("C8", 100.0, [8, 8, 0, 0, 0, 0, 0])];
    let outcome = solve(&candidates, &req("P", 0, 0, 0, 0), SparePolicy::default());
    let solution = outcome.into_solution().expect("trivially feasible");
    assert!(solution.is_empty());
    assert_eq!(solution.total_cost, 0.0);
}

#[test]
fn cheaper_combination_wins_unique_optimum() {
    let candidates = vec![
        comp("BIG", 150.0, [16, 0, 0, 0, 0, 0, 0]),
        comp("SMALL", 100.0, [8, 0, 0, 0, 0, 0, 0]),
    ];
    let outcome = solve(&candidates, &req("P", 16, 0, 0, 0), SparePolicy::none());
    let solution = outcome.into_solution().expect("feasible");
    assert_eq!(solution.quantities.get("BIG"), Some(&1));
    assert_eq!(solution.quantities.get("SMALL"), None);
    assert!((solution.total_cost - 150.0).abs() < 1e-6);
}

#[test]
fn spare_margin_never_reduces_cost() {
    let candidates = vec![
        comp("C8", 100.0, [8, 8, 0, 0, 0, 0, 0]),
        comp("U4", 60.0, [0, 0, 0, 0, 0, 0, 4]),
    ];
    let requirement = req("P", 7, 3, 1, 0);
    let mut last_cost = 0.0;
    for percent in [0.0, 10.0, 20.0, 50.0, 100.0] {
        let spare = SparePolicy::new(percent).unwrap();
        let solution = solve(&candidates, &requirement, spare)
            .into_solution()
            .expect("feasible at every margin");
        assert!(
            solution.total_cost >= last_cost - 1e-9,
            "cost dropped from {last_cost} to {} at spare {percent}%",
            solution.total_cost
        );
        last_cost = solution.total_cost;
    }
}

#[test]
fn aggregate_mode_ignores_digital_analog_distinction() {
    // A DI-only controller cannot serve analog inputs in the split
    // formulation, but the legacy aggregate mode only counts inputs.
    let candidates = vec![comp("DI8", 100.0, [8, 0, 0, 0, 0, 0, 0])];
    let requirement = req("P", 4, 0, 4, 0);

    let split = SizingProblem::new(&candidates, &requirement, SparePolicy::none());
    assert_eq!(
        solve_sizing(&split, &SolveConfig::default()),
        SolveOutcome::Infeasible
    );

    let legacy = SizingProblem::new(&candidates, &requirement, SparePolicy::none())
        .with_mode(FormulationMode::Aggregate);
    let solution = solve_sizing(&legacy, &SolveConfig::default())
        .into_solution()
        .expect("aggregate mode feasible");
    assert_eq!(solution.quantities.get("DI8"), Some(&1));
}

#[test]
fn modular_option_prices_server_modules_and_accessories() {
    let catalog = Catalog {
        primary_server: Some(comp("AS-P", 1000.0, [0; 7])),
        modules: vec![
            comp("IO-DI16", 200.0, [16, 0, 0, 0, 0, 0, 0]),
            comp("IO-DI8", 120.0, [8, 0, 0, 0, 0, 0, 0]),
        ],
        accessories: vec![AccessoryRule {
            parent_part_number: "PN-AS-P".into(),
            accessory_part_number: "PN-PSU".into(),
            accessory_name: "Power supply".into(),
            accessory_cost: 50.0,
        }],
        ..Default::default()
    };

    let options = evaluate_server_options(
        &catalog,
        &req("SRV", 10, 0, 0, 0),
        SparePolicy::none(),
        &SolveConfig::default(),
    );
    assert_eq!(options.len(), 1);
    let modular = &options[0];
    assert_eq!(modular.kind, OptionKind::Modular);
    assert!(modular.valid);
    // Server 1000 + one 16-DI module 200 + server PSU 50.
    assert!((modular.cost - 1250.0).abs() < 1e-6);
    assert_eq!(modular.components.get("AS-P"), Some(&1));
    assert_eq!(modular.components.get("IO-DI16"), Some(&1));
}

#[test]
fn modular_option_goes_invalid_when_modules_cannot_cover() {
    let catalog = Catalog {
        primary_server: Some(comp("AS-P", 1000.0, [0; 7])),
        modules: vec![comp("IO-DO8", 90.0, [0, 8, 0, 0, 0, 0, 0])],
        ..Default::default()
    };
    let options = evaluate_server_options(
        &catalog,
        &req("SRV", 0, 0, 2, 0),
        SparePolicy::none(),
        &SolveConfig::default(),
    );
    assert_eq!(options.len(), 1);
    assert!(!options[0].valid);
}

#[test]
fn infeasible_panel_never_blocks_the_batch() {
    let controllers = vec![comp("C8", 100.0, [8, 8, 0, 0, 0, 0, 0])];
    let catalog = Catalog {
        controllers: controllers.clone(),
        ..Default::default()
    };

    let mut selections = Vec::new();
    for requirement in [req("P-OK", 4, 2, 0, 0), req("P-BAD", 0, 0, 1, 0)] {
        let outcome = solve(&controllers, &requirement, SparePolicy::none());
        selections.push(match outcome {
            SolveOutcome::Optimal(solution) => {
                PanelSelection::solved(requirement.panel_name.clone(), solution)
            }
            _ => PanelSelection::unsolved(requirement.panel_name.clone()),
        });
    }

    let matrix = build_matrix(&selections);
    assert_eq!(matrix.rows.len(), 2);
    let bad_row = matrix
        .rows
        .iter()
        .find(|r| r.panel_name == "P-BAD")
        .expect("infeasible panel keeps its row");
    assert_eq!(bad_row.sum, 0);

    let boq = build_boq(&selections, &catalog).expect("boq builds");
    let (total, lines) = boq.split_last().expect("grand total present");
    assert!(lines.iter().all(|l| l.name != "No Solution Found"));
    let sum: f64 = lines.iter().map(|l| l.total_cost).sum();
    assert!((total.total_cost - sum).abs() < 1e-9);
}
