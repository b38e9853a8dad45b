use anyhow::{anyhow, Result};
use pansel_batch::{run_batch, BatchReport, BatchRunnerConfig};
use pansel_cli::cli::ReportArgs;
use pansel_io::{CatalogSource, CsvDemandSource, DemandSource};
use std::collections::BTreeMap;
use std::io::{self, Write};
use tabwriter::TabWriter;
use tracing::info;

use super::{catalog_source, solve_config};

pub fn run(args: &ReportArgs) -> Result<()> {
    let catalog = catalog_source(&args.catalog).load_catalog()?;
    let demand = CsvDemandSource::new(&args.panels).load_demand()?;
    let (spare, solve) = solve_config(&args.solve)?;

    info!(
        "sizing {} panels with {}% spare via {}",
        demand.len(),
        spare.percent,
        solve.solver.as_str()
    );

    let mut choices = BTreeMap::new();
    for entry in &args.choices {
        let (panel, option) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid --choice '{entry}'; expected PANEL=OPTION"))?;
        choices.insert(panel.to_string(), option.to_string());
    }

    let config = BatchRunnerConfig {
        catalog,
        demand,
        spare,
        solve,
        server_panels: args.server_panels.clone(),
        choices,
        threads: args.threads,
        output_root: args.out.clone(),
    };
    let report = run_batch(&config)?;

    if args.json {
        let payload = serde_json::json!({
            "matrix": report.matrix,
            "boq": report.boq,
            "panels": report.panels,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_matrix(&report)?;
        println!();
        print_boq(&report)?;
    }

    let solved = report.panels.iter().filter(|r| r.is_ok()).count();
    info!("{} of {} panels solved", solved, report.panels.len());
    if let Some(path) = &report.manifest_path {
        info!("batch manifest written to {}", path.display());
    }
    Ok(())
}

fn print_matrix(report: &BatchReport) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    write!(writer, "PANEL")?;
    for name in &report.matrix.component_names {
        write!(writer, "\t{name}")?;
    }
    writeln!(writer, "\tSUM")?;
    for row in &report.matrix.rows {
        write!(writer, "{}", row.panel_name)?;
        for qty in &row.quantities {
            write!(writer, "\t{qty}")?;
        }
        writeln!(writer, "\t{}", row.sum)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_boq(report: &BatchReport) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(writer, "NAME\tPART NUMBER\tQTY\tUNIT COST\tTOTAL COST")?;
    for line in &report.boq {
        if line.is_grand_total() {
            writeln!(writer, "{}\t\t\t\t{:.2}", line.name, line.total_cost)?;
        } else {
            writeln!(
                writer,
                "{}\t{}\t{}\t{:.2}\t{:.2}",
                line.name, line.part_number, line.quantity, line.unit_cost, line.total_cost
            )?;
        }
    }
    writer.flush()?;
    Ok(())
}
