//! Solution and parts-list types shared by the sizing pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display name used in place of a component when a panel could not be
/// sized. Flows through aggregation so a batch report always carries one
/// row per panel, but is excluded from cost totals.
pub const NO_SOLUTION: &str = "No Solution Found";

/// Display name of the synthetic trailing BOQ row.
pub const GRAND_TOTAL: &str = "Grand Total";

/// Result of one optimization run: chosen components with strictly
/// positive quantity and the minimized total cost. Ephemeral, produced
/// per solve call.
///
/// Quantities are keyed by component display name in a `BTreeMap` so
/// iteration order is deterministic regardless of solver internals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SizingSolution {
    pub total_cost: f64,
    pub quantities: BTreeMap<String, u32>,
}

impl SizingSolution {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

/// Kind of server build a [`PanelOption`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Primary server plus optimally sized expansion modules.
    Modular,
    /// A single fixed-capacity server unit.
    Standalone,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionKind::Modular => write!(f, "modular"),
            OptionKind::Standalone => write!(f, "standalone"),
        }
    }
}

/// One mutually exclusive build option for a server panel, offered to
/// the caller for final selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelOption {
    pub kind: OptionKind,
    pub name: String,
    /// Total cost including accessories. Meaningful only when `valid`.
    pub cost: f64,
    pub valid: bool,
    /// Component quantities making up the option (empty when invalid).
    pub components: BTreeMap<String, u32>,
}

/// One row of a chosen parts list: the unit of work for accessory
/// expansion and BOQ assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartLine {
    pub name: String,
    pub part_number: String,
    pub quantity: u32,
    pub unit_cost: f64,
}

impl PartLine {
    pub fn extended_cost(&self) -> f64 {
        f64::from(self.quantity) * self.unit_cost
    }
}

/// One costed line of the consolidated bill of quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoqLine {
    pub name: String,
    pub part_number: String,
    pub quantity: u32,
    pub unit_cost: f64,
    pub total_cost: f64,
}

impl BoqLine {
    /// The synthetic trailing summary row.
    pub fn grand_total(total: f64) -> Self {
        Self {
            name: GRAND_TOTAL.to_string(),
            part_number: String::new(),
            quantity: 0,
            unit_cost: 0.0,
            total_cost: total,
        }
    }

    pub fn is_grand_total(&self) -> bool {
        self.name == GRAND_TOTAL
    }
}
