//! Accessory expansion: transitive closure of mandatory accessories.
//!
//! Each parts row is joined against the accessory rules by part number
//! (trimmed of surrounding whitespace) and emits one accessory row per
//! match, carrying the parent row's quantity unchanged. Emitted rows
//! are expanded in turn, so accessories can pull in accessories of
//! their own, and a part reached through two different parents
//! contributes its accessory set once per parent row.
//!
//! Rule chains could in principle be cyclic, so each chain tracks the
//! part numbers of its own ancestors and stops descending when one
//! recurs; an independent occurrence of the same part elsewhere in the
//! graph still expands normally. Chain depth is additionally capped.

use pansel_core::{AccessoryRule, PartLine};
use std::collections::HashSet;

/// Hard cap on accessory chain depth.
pub const MAX_EXPANSION_ROUNDS: usize = 64;

/// Resolve every accessory required by `parts`, transitively.
///
/// Returns only the emitted accessory rows; the input rows are not
/// echoed back. An empty result means no rule matched.
pub fn expand_accessories(parts: &[PartLine], rules: &[AccessoryRule]) -> Vec<PartLine> {
    let mut emitted: Vec<PartLine> = Vec::new();
    let mut ancestors: HashSet<String> = HashSet::new();
    for parent in parts {
        expand_parent(parent, rules, &mut ancestors, 0, &mut emitted);
    }
    emitted
}

fn expand_parent(
    parent: &PartLine,
    rules: &[AccessoryRule],
    ancestors: &mut HashSet<String>,
    depth: usize,
    emitted: &mut Vec<PartLine>,
) {
    if depth >= MAX_EXPANSION_ROUNDS {
        return;
    }
    let parent_pn = parent.part_number.trim();
    // A part number recurring among its own ancestors closes a cycle;
    // its row is already emitted, only the descent stops here.
    if parent_pn.is_empty() || !ancestors.insert(parent_pn.to_string()) {
        return;
    }
    for rule in rules {
        if rule.parent_part_number.trim() == parent_pn {
            let row = PartLine {
                name: rule.accessory_name.clone(),
                part_number: rule.accessory_part_number.clone(),
                quantity: parent.quantity,
                unit_cost: rule.accessory_cost,
            };
            emitted.push(row.clone());
            expand_parent(&row, rules, ancestors, depth + 1, emitted);
        }
    }
    ancestors.remove(parent_pn);
}

/// Quantity-weighted cost of an expanded accessory list.
pub fn accessory_cost(accessories: &[PartLine]) -> f64 {
    accessories.iter().map(PartLine::extended_cost).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(pn: &str, qty: u32) -> PartLine {
        PartLine {
            name: format!("part {pn}"),
            part_number: pn.into(),
            quantity: qty,
            unit_cost: 10.0,
        }
    }

    fn rule(parent: &str, accessory: &str, cost: f64) -> AccessoryRule {
        AccessoryRule {
            parent_part_number: parent.into(),
            accessory_part_number: accessory.into(),
            accessory_name: format!("accessory {accessory}"),
            accessory_cost: cost,
        }
    }

    fn total_quantity(rows: &[PartLine], pn: &str) -> u32 {
        rows.iter()
            .filter(|r| r.part_number == pn)
            .map(|r| r.quantity)
            .sum()
    }

    #[test]
    fn no_rules_no_rows() {
        let rows = expand_accessories(&[part("A", 2)], &[]);
        assert!(rows.is_empty());
    }

    #[test]
    fn quantity_carries_through_unchanged() {
        let rows = expand_accessories(&[part("A", 3)], &[rule("A", "A-PSU", 25.0)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].part_number, "A-PSU");
        assert_eq!(rows[0].quantity, 3);
        assert!((rows[0].unit_cost - 25.0).abs() < 1e-9);
    }

    #[test]
    fn nested_accessories_resolve_transitively() {
        let rules = vec![rule("A", "B", 5.0), rule("B", "C", 1.0)];
        let rows = expand_accessories(&[part("A", 2)], &rules);
        let pns: Vec<&str> = rows.iter().map(|r| r.part_number.as_str()).collect();
        assert_eq!(pns, vec!["B", "C"]);
        assert!(rows.iter().all(|r| r.quantity == 2));
    }

    #[test]
    fn shared_accessory_expands_once_per_parent_row() {
        // Diamond: A pulls B and C, C pulls B again, B pulls D. The B
        // reached through C is a second independent requirement, so D
        // must be counted twice.
        let rules = vec![
            rule("A", "B", 5.0),
            rule("A", "C", 2.0),
            rule("C", "B", 5.0),
            rule("B", "D", 1.0),
        ];
        let rows = expand_accessories(&[part("A", 1)], &rules);
        assert_eq!(total_quantity(&rows, "B"), 2);
        assert_eq!(total_quantity(&rows, "D"), 2);
        assert_eq!(total_quantity(&rows, "C"), 1);
    }

    #[test]
    fn part_numbers_match_after_trimming() {
        let rows = expand_accessories(&[part("  A  ", 1)], &[rule("A ", "B", 5.0)]);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn cyclic_rules_terminate() {
        let rules = vec![rule("A", "B", 5.0), rule("B", "A", 5.0)];
        let rows = expand_accessories(&[part("A", 1)], &rules);
        // A pulls B, B pulls A back in, then the cycle stops.
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn self_referencing_rule_emits_once() {
        let rules = vec![rule("A", "A", 5.0)];
        let rows = expand_accessories(&[part("A", 2)], &rules);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 2);
    }

    #[test]
    fn expansion_is_idempotent_on_its_own_output() {
        let rules = vec![rule("A", "B", 5.0), rule("B", "C", 1.0)];
        let first = expand_accessories(&[part("A", 1)], &rules);
        let again = expand_accessories(&first, &rules);
        // Everything the output pulls in was already in the output.
        for row in &again {
            assert!(first.iter().any(|r| r.part_number == row.part_number
                && r.quantity == row.quantity));
        }
    }

    #[test]
    fn accessory_cost_weights_by_quantity() {
        let rows = vec![part("X", 4)];
        assert!((accessory_cost(&rows) - 40.0).abs() < 1e-9);
    }
}
