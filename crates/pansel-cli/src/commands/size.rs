use anyhow::Result;
use pansel_algo::{
    evaluate_server_options, solve_sizing, FormulationMode, SizingProblem, SolveOutcome,
};
use pansel_cli::cli::SizeArgs;
use pansel_core::{PanelOption, PanselError};
use pansel_io::{CatalogSource, CsvDemandSource, DemandSource};
use std::io::{self, Write};
use tabwriter::TabWriter;
use tracing::info;

use super::{catalog_source, solve_config};

pub fn run(args: &SizeArgs) -> Result<()> {
    let catalog = catalog_source(&args.catalog).load_catalog()?;
    let demand = CsvDemandSource::new(&args.panels).load_demand()?;
    let requirement = demand.get(&args.panel)?.clone();
    let (spare, config) = solve_config(&args.solve)?;

    info!(
        "sizing panel '{}' with {}% spare via {}",
        args.panel,
        spare.percent,
        config.solver.as_str()
    );

    if args.server {
        let options = evaluate_server_options(&catalog, &requirement, spare, &config);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&options)?);
        } else {
            print_options(&options)?;
        }
        return Ok(());
    }

    let mode = if args.aggregate_io {
        FormulationMode::Aggregate
    } else {
        FormulationMode::Split
    };
    let problem = SizingProblem::new(&catalog.controllers, &requirement, spare).with_mode(mode);

    match solve_sizing(&problem, &config) {
        SolveOutcome::Optimal(solution) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&solution)?);
            } else {
                let mut writer = TabWriter::new(io::stdout());
                writeln!(writer, "COMPONENT\tQTY")?;
                for (name, qty) in &solution.quantities {
                    writeln!(writer, "{name}\t{qty}")?;
                }
                writer.flush()?;
                println!("Total cost: {:.2}", solution.total_cost);
            }
            Ok(())
        }
        SolveOutcome::Infeasible => {
            println!("No Solution Found");
            Ok(())
        }
        SolveOutcome::Unbounded => Err(PanselError::Solver(format!(
            "sizing model for panel '{}' is unbounded; check the catalog for negative costs",
            args.panel
        ))
        .into()),
        SolveOutcome::SolverError(message) => Err(PanselError::Solver(format!(
            "solver failed for panel '{}': {message}",
            args.panel
        ))
        .into()),
    }
}

fn print_options(options: &[PanelOption]) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "OPTION\tKIND\tVALID\tTOTAL COST")?;
    for option in options {
        if option.valid {
            writeln!(
                writer,
                "{}\t{}\tyes\t{:.2}",
                option.name, option.kind, option.cost
            )?;
        } else {
            writeln!(writer, "{}\t{}\tno\t-", option.name, option.kind)?;
        }
    }
    writer.flush()?;

    if let Some(best) = options.iter().find(|o| o.valid) {
        println!();
        println!("Cheapest valid option: {}", best.name);
        let mut writer = TabWriter::new(io::stdout());
        writeln!(writer, "COMPONENT\tQTY")?;
        for (name, qty) in &best.components {
            writeln!(writer, "{name}\t{qty}")?;
        }
        writer.flush()?;
    } else {
        println!();
        println!("No Solution Found");
    }
    Ok(())
}
