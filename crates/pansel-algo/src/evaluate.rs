//! Server alternative evaluation.
//!
//! For panels designated as server panels, compares a modular build
//! (primary server plus optimally sized expansion modules) against each
//! fixed-capacity standalone unit, and returns every option with a
//! validity flag so the caller makes the final selection.

use pansel_core::{
    Catalog, ComponentSpec, OptionKind, PanelOption, PanelRequirement, PartLine, PointDemand,
    SparePolicy,
};
use std::collections::BTreeMap;

use crate::expand::{accessory_cost, expand_accessories};
use crate::formulate::SizingProblem;
use crate::solver::{solve_sizing, SolveConfig, SolveOutcome};

/// Evaluate every server build option for one panel.
///
/// Valid options come first, sorted ascending by total cost, so "pick
/// cheapest" is simply the first element. Invalid options are retained
/// at the tail with `valid = false` for visibility.
pub fn evaluate_server_options(
    catalog: &Catalog,
    requirement: &PanelRequirement,
    spare: SparePolicy,
    config: &SolveConfig,
) -> Vec<PanelOption> {
    let mut options = Vec::new();

    if let Some(primary) = &catalog.primary_server {
        options.push(modular_option(primary, catalog, requirement, spare, config));
    }

    let demand = PointDemand::required(requirement, spare);
    for unit in &catalog.standalone_servers {
        options.push(standalone_option(unit, demand, catalog));
    }

    options.sort_by(|a, b| {
        b.valid
            .cmp(&a.valid)
            .then_with(|| a.cost.total_cmp(&b.cost))
            .then_with(|| a.name.cmp(&b.name))
    });
    options
}

/// Size the modular build: the primary server fixed at quantity 1, with
/// expansion modules covering the panel's point demand.
fn modular_option(
    primary: &ComponentSpec,
    catalog: &Catalog,
    requirement: &PanelRequirement,
    spare: SparePolicy,
    config: &SolveConfig,
) -> PanelOption {
    let name = format!("{} System", primary.name);

    // The primary server must never appear as its own expansion module.
    let modules: Vec<ComponentSpec> = catalog
        .modules
        .iter()
        .filter(|m| m.name != primary.name)
        .cloned()
        .collect();

    let problem = SizingProblem::new(&modules, requirement, spare);
    match solve_sizing(&problem, config) {
        SolveOutcome::Optimal(solution) => {
            let mut parts = vec![PartLine {
                name: primary.name.clone(),
                part_number: primary.part_number.clone(),
                quantity: 1,
                unit_cost: primary.cost,
            }];
            for (module_name, qty) in &solution.quantities {
                // Module names come straight out of the candidate set,
                // so the lookup cannot miss.
                if let Some(spec) = modules.iter().find(|m| &m.name == module_name) {
                    parts.push(PartLine {
                        name: spec.name.clone(),
                        part_number: spec.part_number.clone(),
                        quantity: *qty,
                        unit_cost: spec.cost,
                    });
                }
            }
            let accessories = expand_accessories(&parts, &catalog.accessories);
            let cost = primary.cost + solution.total_cost + accessory_cost(&accessories);

            let mut components = solution.quantities;
            components.insert(primary.name.clone(), 1);

            PanelOption {
                kind: OptionKind::Modular,
                name,
                cost,
                valid: true,
                components,
            }
        }
        // Infeasible, unbounded, and solver failures all mean the
        // modular build cannot be offered for this panel.
        _ => PanelOption {
            kind: OptionKind::Modular,
            name,
            cost: 0.0,
            valid: false,
            components: BTreeMap::new(),
        },
    }
}

/// Closed-form feasibility check for one standalone unit at quantity 1:
/// total capacity, maximum inputs, and maximum outputs must each cover
/// the spare-adjusted demand.
fn standalone_option(unit: &ComponentSpec, demand: PointDemand, catalog: &Catalog) -> PanelOption {
    let fits = unit.total_points() >= demand.total()
        && unit.max_inputs() >= demand.inputs()
        && unit.max_outputs() >= demand.outputs();

    if !fits {
        return PanelOption {
            kind: OptionKind::Standalone,
            name: unit.name.clone(),
            cost: 0.0,
            valid: false,
            components: BTreeMap::new(),
        };
    }

    let parts = [PartLine {
        name: unit.name.clone(),
        part_number: unit.part_number.clone(),
        quantity: 1,
        unit_cost: unit.cost,
    }];
    let accessories = expand_accessories(&parts, &catalog.accessories);

    PanelOption {
        kind: OptionKind::Standalone,
        name: unit.name.clone(),
        cost: unit.cost + accessory_cost(&accessories),
        valid: true,
        components: BTreeMap::from([(unit.name.clone(), 1)]),
    }
}
