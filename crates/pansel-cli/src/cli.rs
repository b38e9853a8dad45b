use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pansel", author, version, about = "Control panel hardware sizing", long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Size a single panel
    Size(SizeArgs),
    /// Size every panel in a schedule and emit the procurement matrix
    /// and consolidated BOQ
    Report(ReportArgs),
}

/// Catalog CSV locations shared by every subcommand. Absent files leave
/// the corresponding hardware tier empty.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Controllers catalog CSV
    #[arg(long)]
    pub controllers: Option<PathBuf>,

    /// Servers catalog CSV
    #[arg(long)]
    pub servers: Option<PathBuf>,

    /// Expansion modules catalog CSV
    #[arg(long)]
    pub modules: Option<PathBuf>,

    /// Accessory rules CSV
    #[arg(long)]
    pub accessories: Option<PathBuf>,

    /// Name substring marking the primary server when the server sheet
    /// has no Role column
    #[arg(long, default_value = "AS-P")]
    pub primary_marker: String,
}

/// Sizing parameters shared by every subcommand.
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Spare point margin in percent
    #[arg(long, default_value_t = 20.0)]
    pub spare: f64,

    /// MIP backend to use
    #[arg(long, default_value = "highs")]
    pub solver: String,

    /// Time budget per solve, in seconds; 0 disables the limit
    #[arg(long, default_value_t = 60.0)]
    pub max_time: f64,
}

#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Name of the panel to size
    pub panel: String,

    /// Panel demand CSV
    #[arg(long)]
    pub panels: PathBuf,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    #[command(flatten)]
    pub solve: SolveArgs,

    /// Evaluate server build options instead of the controller catalog
    #[arg(long)]
    pub server: bool,

    /// Legacy sizing against input/output totals only, ignoring the
    /// digital/analog distinction
    #[arg(long)]
    pub aggregate_io: bool,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Panel demand CSV
    #[arg(long)]
    pub panels: PathBuf,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    #[command(flatten)]
    pub solve: SolveArgs,

    /// Panels to size through the server-alternative route (repeatable)
    #[arg(long = "server-panel")]
    pub server_panels: Vec<String>,

    /// Server option choice as PANEL=OPTION; panels without one take the
    /// cheapest valid option (repeatable)
    #[arg(long = "choice")]
    pub choices: Vec<String>,

    /// Worker threads; 0 auto-detects the CPU count
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Directory for matrix.json, boq.json, and the batch manifest
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Emit JSON instead of tables
    #[arg(long)]
    pub json: bool,
}
