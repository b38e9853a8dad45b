use pansel_core::{DemandSet, PanelRequirement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a panel gets sized within a batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PanelKind {
    /// Sized against the controller catalog with the MIP formulation.
    Controller,
    /// Sized by comparing the modular server build against every
    /// standalone unit, then taking the cheapest valid option.
    Server,
}

impl PanelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKind::Controller => "controller",
            PanelKind::Server => "server",
        }
    }
}

/// One unit of batch work: a panel plus the sizing route it takes.
#[derive(Debug, Clone)]
pub struct PanelJob {
    pub requirement: PanelRequirement,
    pub kind: PanelKind,
}

/// Per-panel outcome recorded in the batch manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelRecord {
    pub panel_name: String,
    pub kind: String,
    /// "ok", "no_solution", or "error".
    pub status: String,
    pub error: Option<String>,
    pub total_cost: f64,
    /// For server panels, the name of the chosen build option.
    pub option: Option<String>,
}

impl PanelRecord {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Expand a demand set into jobs. Panels named in `server_panels` take
/// the server route; everything else is a controller panel.
pub fn jobs_from_demand(demand: &DemandSet, server_panels: &[String]) -> Vec<PanelJob> {
    let server_names: BTreeSet<&str> = server_panels.iter().map(String::as_str).collect();
    demand
        .iter()
        .map(|requirement| PanelJob {
            kind: if server_names.contains(requirement.panel_name.as_str()) {
                PanelKind::Server
            } else {
                PanelKind::Controller
            },
            requirement: requirement.clone(),
        })
        .collect()
}
