use anyhow::Result;
use pansel_algo::SolveConfig;
use pansel_cli::cli::{CatalogArgs, SolveArgs};
use pansel_core::SparePolicy;
use pansel_io::CsvCatalogSource;

pub mod report;
pub mod size;

pub fn catalog_source(args: &CatalogArgs) -> CsvCatalogSource {
    let mut source = CsvCatalogSource::new().with_primary_marker(&args.primary_marker);
    if let Some(path) = &args.controllers {
        source = source.with_controllers(path);
    }
    if let Some(path) = &args.servers {
        source = source.with_servers(path);
    }
    if let Some(path) = &args.modules {
        source = source.with_modules(path);
    }
    if let Some(path) = &args.accessories {
        source = source.with_accessories(path);
    }
    source
}

pub fn solve_config(args: &SolveArgs) -> Result<(SparePolicy, SolveConfig)> {
    let spare = SparePolicy::new(args.spare)?;
    let config = SolveConfig {
        solver: args.solver.parse()?,
        max_time_seconds: args.max_time,
        ..Default::default()
    };
    Ok((spare, config))
}
