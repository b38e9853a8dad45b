use crate::job::{jobs_from_demand, PanelJob, PanelKind, PanelRecord};
use crate::manifest::{write_batch_manifest, BatchManifest};
use anyhow::{Context, Result};
use chrono::Utc;
use pansel_algo::{
    build_boq, build_matrix, evaluate_server_options, solve_sizing, PanelSelection,
    ProcurementMatrix, SizingProblem, SolveConfig, SolveOutcome,
};
use pansel_core::{BoqLine, Catalog, DemandSet, SparePolicy};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Everything one batch run needs: the catalog and demand snapshots,
/// the sizing parameters, and where to put the artifacts.
pub struct BatchRunnerConfig {
    pub catalog: Catalog,
    pub demand: DemandSet,
    pub spare: SparePolicy,
    pub solve: SolveConfig,
    /// Panels sized through the server-alternative route.
    pub server_panels: Vec<String>,
    /// Explicit option choice per server panel, by option name. Panels
    /// without an entry take the cheapest valid option.
    pub choices: BTreeMap<String, String>,
    /// 0 means auto-detect the CPU count.
    pub threads: usize,
    /// When set, matrix.json, boq.json, and the manifest land here.
    pub output_root: Option<PathBuf>,
}

/// Aggregated result of a batch run. Every panel appears in the matrix
/// and in `panels`, whether or not it could be sized.
pub struct BatchReport {
    pub matrix: ProcurementMatrix,
    pub boq: Vec<BoqLine>,
    pub panels: Vec<PanelRecord>,
    pub manifest_path: Option<PathBuf>,
}

pub fn run_batch(config: &BatchRunnerConfig) -> Result<BatchReport> {
    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building thread pool for batch sizing")?;

    let jobs = jobs_from_demand(&config.demand, &config.server_panels);

    // Panels are independent: the catalog snapshot is read-only and the
    // solver holds no shared state, so they size in parallel.
    let results: Vec<(PanelSelection, PanelRecord)> =
        pool.install(|| jobs.par_iter().map(|job| size_panel(job, config)).collect());

    let (selections, panels): (Vec<_>, Vec<_>) = results.into_iter().unzip();

    let matrix = build_matrix(&selections);
    let boq = build_boq(&selections, &config.catalog)?;

    let solved = panels.iter().filter(|r| r.status == "ok").count();
    let unsolved = panels.iter().filter(|r| r.status == "no_solution").count();
    let failed = panels.len() - solved - unsolved;

    let manifest_path = match &config.output_root {
        Some(root) => {
            fs::create_dir_all(root)
                .with_context(|| format!("creating batch output root '{}'", root.display()))?;
            let matrix_json = serde_json::to_string_pretty(&matrix)
                .context("serializing procurement matrix to JSON")?;
            fs::write(root.join("matrix.json"), matrix_json)
                .context("writing procurement matrix")?;
            let boq_json =
                serde_json::to_string_pretty(&boq).context("serializing BOQ to JSON")?;
            fs::write(root.join("boq.json"), boq_json).context("writing BOQ")?;

            let manifest = BatchManifest {
                created_at: Utc::now(),
                spare_percent: config.spare.percent,
                num_panels: panels.len(),
                solved,
                unsolved,
                failed,
                panels: panels.clone(),
            };
            let path = root.join("batch_manifest.json");
            write_batch_manifest(&path, &manifest)?;
            Some(path)
        }
        None => None,
    };

    Ok(BatchReport {
        matrix,
        boq,
        panels,
        manifest_path,
    })
}

/// Size one panel. Failure of any kind leaves the panel in the batch as
/// an unsolved row; a sizing problem with no answer is a result, not a
/// reason to abort the other panels.
fn size_panel(job: &PanelJob, config: &BatchRunnerConfig) -> (PanelSelection, PanelRecord) {
    let panel_name = job.requirement.panel_name.clone();
    let record = |status: &str, error: Option<String>, total_cost: f64, option: Option<String>| {
        PanelRecord {
            panel_name: panel_name.clone(),
            kind: job.kind.as_str().to_string(),
            status: status.to_string(),
            error,
            total_cost,
            option,
        }
    };

    match job.kind {
        PanelKind::Server => {
            let options = evaluate_server_options(
                &config.catalog,
                &job.requirement,
                config.spare,
                &config.solve,
            );
            // Options come back valid-first, cheapest-first.
            match config.choices.get(&panel_name) {
                Some(wanted) => match options.into_iter().find(|o| o.valid && &o.name == wanted) {
                    Some(option) => (
                        PanelSelection::from_components(&panel_name, option.components),
                        record("ok", None, option.cost, Some(option.name)),
                    ),
                    None => (
                        PanelSelection::unsolved(&panel_name),
                        record(
                            "error",
                            Some(format!("chosen option '{wanted}' is not valid for this panel")),
                            0.0,
                            None,
                        ),
                    ),
                },
                None => match options.into_iter().find(|o| o.valid) {
                    Some(option) => (
                        PanelSelection::from_components(&panel_name, option.components),
                        record("ok", None, option.cost, Some(option.name)),
                    ),
                    None => (
                        PanelSelection::unsolved(&panel_name),
                        record("no_solution", None, 0.0, None),
                    ),
                },
            }
        }
        PanelKind::Controller => {
            let problem =
                SizingProblem::new(&config.catalog.controllers, &job.requirement, config.spare);
            match solve_sizing(&problem, &config.solve) {
                SolveOutcome::Optimal(solution) => {
                    let total_cost = solution.total_cost;
                    (
                        PanelSelection::solved(&panel_name, solution),
                        record("ok", None, total_cost, None),
                    )
                }
                SolveOutcome::Infeasible | SolveOutcome::Unbounded => (
                    PanelSelection::unsolved(&panel_name),
                    record("no_solution", None, 0.0, None),
                ),
                SolveOutcome::SolverError(message) => {
                    eprintln!("panel {panel_name} failed to solve: {message}");
                    (
                        PanelSelection::unsolved(&panel_name),
                        record("error", Some(message), 0.0, None),
                    )
                }
            }
        }
    }
}
