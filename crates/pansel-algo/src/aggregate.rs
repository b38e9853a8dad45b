//! Cross-panel aggregation: procurement matrix and consolidated BOQ.

use pansel_core::{BoqLine, Catalog, PanselError, PanselResult, PartLine, SizingSolution, NO_SOLUTION};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::expand::expand_accessories;

/// The components chosen for one panel, ready for aggregation. A panel
/// that could not be sized carries the sentinel pseudo-component at
/// quantity 0, so it still occupies a row in the matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSelection {
    pub panel_name: String,
    pub components: BTreeMap<String, u32>,
}

impl PanelSelection {
    pub fn solved(panel_name: impl Into<String>, solution: SizingSolution) -> Self {
        Self {
            panel_name: panel_name.into(),
            components: solution.quantities,
        }
    }

    pub fn from_components(
        panel_name: impl Into<String>,
        components: BTreeMap<String, u32>,
    ) -> Self {
        Self {
            panel_name: panel_name.into(),
            components,
        }
    }

    pub fn unsolved(panel_name: impl Into<String>) -> Self {
        Self {
            panel_name: panel_name.into(),
            components: BTreeMap::from([(NO_SOLUTION.to_string(), 0)]),
        }
    }

    pub fn is_unsolved(&self) -> bool {
        self.components.contains_key(NO_SOLUTION)
    }
}

/// One matrix row: per-component quantities in column order, plus the
/// trailing SUM cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub panel_name: String,
    pub quantities: Vec<u32>,
    pub sum: u32,
}

/// Procurement matrix: one row per panel, one column per component name
/// appearing in any selection, columns in lexical order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcurementMatrix {
    pub component_names: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

/// Pivot per-panel selections into the procurement matrix. Rows are
/// ordered by panel name, columns by component name.
pub fn build_matrix(selections: &[PanelSelection]) -> ProcurementMatrix {
    let mut names: BTreeSet<&str> = BTreeSet::new();
    for selection in selections {
        for name in selection.components.keys() {
            names.insert(name);
        }
    }
    let component_names: Vec<String> = names.iter().map(|n| n.to_string()).collect();

    let mut ordered: Vec<&PanelSelection> = selections.iter().collect();
    ordered.sort_by(|a, b| a.panel_name.cmp(&b.panel_name));

    let rows = ordered
        .into_iter()
        .map(|selection| {
            let quantities: Vec<u32> = component_names
                .iter()
                .map(|name| selection.components.get(name).copied().unwrap_or(0))
                .collect();
            let sum = quantities.iter().sum();
            MatrixRow {
                panel_name: selection.panel_name.clone(),
                quantities,
                sum,
            }
        })
        .collect();

    ProcurementMatrix {
        component_names,
        rows,
    }
}

/// Build the consolidated BOQ: per-component quantities summed across
/// panels, joined against the catalog for part numbers and unit costs,
/// unioned with the accessory expansion of the aggregated parts list,
/// grouped, costed, and closed with the Grand Total row.
///
/// The "No Solution Found" sentinel never reaches the BOQ; it is
/// visible in the matrix instead.
pub fn build_boq(selections: &[PanelSelection], catalog: &Catalog) -> PanselResult<Vec<BoqLine>> {
    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
    for selection in selections {
        for (name, qty) in &selection.components {
            if name != NO_SOLUTION {
                *totals.entry(name).or_insert(0) += qty;
            }
        }
    }
    if totals.is_empty() {
        return Ok(Vec::new());
    }

    let mut primary: Vec<PartLine> = Vec::with_capacity(totals.len());
    for (name, quantity) in totals {
        let spec = catalog.find_by_name(name).ok_or_else(|| {
            PanselError::Data(format!("component '{name}' missing from catalog"))
        })?;
        primary.push(PartLine {
            name: spec.name.clone(),
            part_number: spec.part_number.clone(),
            quantity,
            unit_cost: spec.cost,
        });
    }

    let accessories = expand_accessories(&primary, &catalog.accessories);

    // Group by (name, part number, unit cost). Costs are non-negative,
    // so their bit patterns order the same way the values do.
    let mut grouped: BTreeMap<(String, String, u64), u32> = BTreeMap::new();
    for line in primary.into_iter().chain(accessories) {
        let key = (line.name, line.part_number, line.unit_cost.to_bits());
        *grouped.entry(key).or_insert(0) += line.quantity;
    }

    let mut boq: Vec<BoqLine> = Vec::with_capacity(grouped.len() + 1);
    let mut grand_total = 0.0;
    for ((name, part_number, cost_bits), quantity) in grouped {
        let unit_cost = f64::from_bits(cost_bits);
        let total_cost = f64::from(quantity) * unit_cost;
        grand_total += total_cost;
        boq.push(BoqLine {
            name,
            part_number,
            quantity,
            unit_cost,
            total_cost,
        });
    }
    boq.push(BoqLine::grand_total(grand_total));
    Ok(boq)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pansel_core::{AccessoryRule, ComponentSpec};

    fn selection(panel: &str, entries: &[(&str, u32)]) -> PanelSelection {
        PanelSelection::from_components(
            panel,
            entries
                .iter()
                .map(|(n, q)| (n.to_string(), *q))
                .collect(),
        )
    }

    fn catalog_with(controllers: &[(&str, &str, f64)]) -> Catalog {
        Catalog {
            controllers: controllers
                .iter()
                .map(|(name, pn, cost)| ComponentSpec {
                    name: name.to_string(),
                    part_number: pn.to_string(),
                    cost: *cost,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn matrix_rows_satisfy_sum_invariant() {
        let selections = vec![
            selection("P2", &[("B", 1)]),
            selection("P1", &[("A", 2), ("B", 3)]),
        ];
        let matrix = build_matrix(&selections);
        assert_eq!(matrix.component_names, vec!["A", "B"]);
        // Rows come back ordered by panel name.
        assert_eq!(matrix.rows[0].panel_name, "P1");
        assert_eq!(matrix.rows[0].quantities, vec![2, 3]);
        assert_eq!(matrix.rows[1].quantities, vec![0, 1]);
        for row in &matrix.rows {
            assert_eq!(row.sum, row.quantities.iter().sum::<u32>());
        }
    }

    #[test]
    fn unsolved_panel_still_gets_a_row() {
        let selections = vec![
            selection("P1", &[("A", 1)]),
            PanelSelection::unsolved("P2"),
        ];
        let matrix = build_matrix(&selections);
        assert_eq!(matrix.rows.len(), 2);
        assert!(matrix.component_names.contains(&NO_SOLUTION.to_string()));
        assert_eq!(matrix.rows[1].sum, 0);
    }

    #[test]
    fn boq_sums_quantities_across_panels() {
        let selections = vec![
            selection("P1", &[("A", 2)]),
            selection("P2", &[("A", 1), ("B", 4)]),
        ];
        let catalog = catalog_with(&[("A", "PN-A", 100.0), ("B", "PN-B", 10.0)]);
        let boq = build_boq(&selections, &catalog).unwrap();
        assert_eq!(boq.len(), 3);
        assert_eq!(boq[0].quantity, 3);
        assert!((boq[0].total_cost - 300.0).abs() < 1e-9);
        assert!(boq[2].is_grand_total());
        assert!((boq[2].total_cost - 340.0).abs() < 1e-9);
    }

    #[test]
    fn boq_grand_total_matches_line_sum_with_accessories() {
        let selections = vec![selection("P1", &[("A", 2)])];
        let mut catalog = catalog_with(&[("A", "PN-A", 100.0)]);
        catalog.accessories.push(AccessoryRule {
            parent_part_number: "PN-A".into(),
            accessory_part_number: "PN-PSU".into(),
            accessory_name: "PSU".into(),
            accessory_cost: 30.0,
        });
        let boq = build_boq(&selections, &catalog).unwrap();
        let (total_row, lines) = boq.split_last().unwrap();
        let line_sum: f64 = lines.iter().map(|l| l.total_cost).sum();
        assert!((total_row.total_cost - line_sum).abs() < 1e-9);
        // Accessory inherits the aggregated parent quantity.
        assert!(lines
            .iter()
            .any(|l| l.part_number == "PN-PSU" && l.quantity == 2));
    }

    #[test]
    fn boq_excludes_sentinel_and_empty_when_nothing_solved() {
        let selections = vec![PanelSelection::unsolved("P1")];
        let catalog = catalog_with(&[]);
        let boq = build_boq(&selections, &catalog).unwrap();
        assert!(boq.is_empty());
    }

    #[test]
    fn boq_rejects_component_missing_from_catalog() {
        let selections = vec![selection("P1", &[("ghost", 1)])];
        let catalog = catalog_with(&[]);
        assert!(matches!(
            build_boq(&selections, &catalog),
            Err(PanselError::Data(_))
        ));
    }
}
