//! # pansel-batch: parallel sizing across a panel schedule
//!
//! Fans a demand set out over a thread pool, sizes every panel (server
//! panels through the alternative evaluation, the rest through the MIP
//! formulation), and folds the results into the procurement matrix and
//! consolidated BOQ. Each run can leave a JSON manifest alongside its
//! artifacts for downstream reporting.

pub mod job;
pub mod manifest;
pub mod runner;

pub use job::{jobs_from_demand, PanelJob, PanelKind, PanelRecord};
pub use manifest::{load_batch_manifest, write_batch_manifest, BatchManifest};
pub use runner::{run_batch, BatchReport, BatchRunnerConfig};
