//! Rollup Report
//!
//! Sums allocated amounts bottom-up through the expense-object tree: leaf
//! totals come straight from the allocation table, every parent total is the
//! sum of its children's totals, and the grand total is the sum over level 1.
//!
//! Totals are always computed over the full tree. Display filters such as a
//! leaf-only view only decide which rows [`RollupReport::rows`] returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::{ExpenseObjectId, Money};
use crate::services::{AllocationTable, ExpenseObjectTree};

/// Which rows a rollup listing shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupView {
    /// Every node, parents before children
    #[default]
    Full,
    /// Only childless nodes
    LeafOnly,
}

/// One display row of a rollup listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupRow {
    pub id: ExpenseObjectId,
    pub name: String,
    pub level: u8,
    /// Root-to-node names joined with " > "
    pub path: String,
    pub is_leaf: bool,
    pub total: Money,
    /// Share of the grand total, in percent
    pub share_pct: f64,
}

/// Bottom-up totals for every node of the tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollupReport {
    /// Allocated sum per childless node
    pub leaf_totals: BTreeMap<ExpenseObjectId, Money>,
    /// Rolled-up total per node
    pub node_totals: BTreeMap<ExpenseObjectId, Money>,
    /// Rolled-up totals grouped by recorded level
    pub totals_by_level: BTreeMap<u8, BTreeMap<ExpenseObjectId, Money>>,
    /// Sum of level-1 totals
    pub grand_total: Money,
    /// Sum of parentless nodes below level 1; not part of `grand_total`
    pub unrooted_total: Money,
}

impl RollupReport {
    /// Roll up the amounts of an allocation table
    pub fn generate(tree: &ExpenseObjectTree, table: &AllocationTable) -> Self {
        let mut leaf_amounts: BTreeMap<ExpenseObjectId, Money> = BTreeMap::new();

        for line in &table.lines {
            for (id, cell) in &line.allocations {
                if cell.amount.is_zero() {
                    continue;
                }
                if tree.is_leaf(*id) {
                    *leaf_amounts.entry(*id).or_default() += cell.amount;
                } else {
                    warn!(%id, amount = %cell.amount, "allocation on a non-leaf or unknown object left out of rollup");
                }
            }
        }

        Self::from_leaf_totals(tree, &leaf_amounts)
    }

    /// Roll up precomputed leaf totals. Entries for ids that are not leaves
    /// of `tree` are ignored; leaves without an entry count as zero.
    pub fn from_leaf_totals(
        tree: &ExpenseObjectTree,
        leaf_amounts: &BTreeMap<ExpenseObjectId, Money>,
    ) -> Self {
        let leaf_totals: BTreeMap<ExpenseObjectId, Money> = tree
            .leaves()
            .into_iter()
            .map(|id| (id, leaf_amounts.get(&id).copied().unwrap_or_default()))
            .collect();

        // Reversed pre-order visits every child before its parent
        let mut node_totals: BTreeMap<ExpenseObjectId, Money> = BTreeMap::new();
        for id in tree.pre_order().into_iter().rev() {
            let total = if tree.has_children(id) {
                tree.children_of(id)
                    .iter()
                    .map(|child| node_totals.get(child).copied().unwrap_or_default())
                    .sum()
            } else {
                leaf_totals.get(&id).copied().unwrap_or_default()
            };
            node_totals.insert(id, total);
        }

        let mut totals_by_level: BTreeMap<u8, BTreeMap<ExpenseObjectId, Money>> = BTreeMap::new();
        for node in tree.iter() {
            let total = node_totals.get(&node.id).copied().unwrap_or_default();
            totals_by_level
                .entry(node.level)
                .or_default()
                .insert(node.id, total);
        }

        let grand_total: Money = totals_by_level
            .get(&1)
            .map(|level| level.values().sum())
            .unwrap_or_default();

        let unrooted_total: Money = tree
            .roots()
            .iter()
            .filter(|id| tree.get(**id).map_or(false, |node| node.level > 1))
            .map(|id| node_totals.get(id).copied().unwrap_or_default())
            .sum();

        debug!(
            nodes = node_totals.len(),
            grand_total = %grand_total,
            unrooted_total = %unrooted_total,
            "computed rollup"
        );

        Self {
            leaf_totals,
            node_totals,
            totals_by_level,
            grand_total,
            unrooted_total,
        }
    }

    /// Rolled-up total of `id`, zero for unknown ids
    pub fn total_for(&self, id: ExpenseObjectId) -> Money {
        self.node_totals.get(&id).copied().unwrap_or_default()
    }

    /// Sum of all node totals at `level`
    pub fn level_total(&self, level: u8) -> Money {
        self.totals_by_level
            .get(&level)
            .map(|totals| totals.values().sum())
            .unwrap_or_default()
    }

    /// Display rows in tree pre-order, filtered by `view`
    pub fn rows(&self, tree: &ExpenseObjectTree, view: RollupView) -> Vec<RollupRow> {
        tree.pre_order()
            .into_iter()
            .filter(|id| match view {
                RollupView::Full => true,
                RollupView::LeafOnly => !tree.has_children(*id),
            })
            .filter_map(|id| {
                let node = tree.get(id)?;
                let total = self.total_for(id);
                Some(RollupRow {
                    id,
                    name: node.name.clone(),
                    level: node.level,
                    path: tree.path_of(id).join(" > "),
                    is_leaf: !tree.has_children(id),
                    total,
                    share_pct: total.ratio_pct(self.grand_total),
                })
            })
            .collect()
    }

    /// Format the rollup for terminal display
    pub fn format_terminal(&self, tree: &ExpenseObjectTree, view: RollupView) -> String {
        let mut output = String::new();

        output.push_str("Cost Rollup\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<44} {:>5} {:>12} {:>8}\n",
            "Expense Object", "Level", "Total", "Share"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for row in self.rows(tree, view) {
            let label = match view {
                RollupView::Full => {
                    let indent = "  ".repeat(usize::from(row.level.saturating_sub(1)));
                    format!("{}{}", indent, row.name)
                }
                RollupView::LeafOnly => row.path.clone(),
            };
            output.push_str(&format!(
                "{:<44} {:>5} {:>12} {:>7.1}%\n",
                label, row.level, row.total, row.share_pct
            ));
        }

        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!("{:<50} {:>12}\n", "GRAND TOTAL", self.grand_total));
        if !self.unrooted_total.is_zero() {
            output.push_str(&format!(
                "{:<50} {:>12}\n",
                "Unrooted (not in grand total)", self.unrooted_total
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocationInput, ExpenseObject, LineItem};
    use crate::services::AllocationEngine;

    fn id(raw: u64) -> ExpenseObjectId {
        ExpenseObjectId::new(raw)
    }

    fn tree() -> ExpenseObjectTree {
        ExpenseObjectTree::build(vec![
            ExpenseObject::new(1, "Suppliers", 1),
            ExpenseObject::new(2, "Aluminum", 2).with_parent(1),
            ExpenseObject::new(3, "Glass", 2).with_parent(1),
            ExpenseObject::new(9, "A", 3).with_parent(2),
            ExpenseObject::new(10, "B", 3).with_parent(2),
            ExpenseObject::new(11, "C", 3).with_parent(3),
            ExpenseObject::new(20, "Labor", 1),
            ExpenseObject::new(21, "Crew", 2).with_parent(20),
        ])
        .unwrap()
    }

    fn leaf_amounts(pairs: &[(u64, i64)]) -> BTreeMap<ExpenseObjectId, Money> {
        pairs
            .iter()
            .map(|(raw, major)| (id(*raw), Money::from_major(*major)))
            .collect()
    }

    #[test]
    fn test_bottom_up_totals() {
        let tree = tree();
        let report = RollupReport::from_leaf_totals(&tree, &leaf_amounts(&[(9, 300), (10, 200), (11, 50), (21, 1000)]));

        assert_eq!(report.total_for(id(2)), Money::from_major(500));
        assert_eq!(report.total_for(id(3)), Money::from_major(50));
        assert_eq!(report.total_for(id(1)), Money::from_major(550));
        assert_eq!(report.total_for(id(20)), Money::from_major(1000));
        assert_eq!(report.grand_total, Money::from_major(1550));
        assert_eq!(report.level_total(2), Money::from_major(1550));
        assert_eq!(report.level_total(3), Money::from_major(550));
        assert!(report.unrooted_total.is_zero());
    }

    #[test]
    fn test_grand_total_equals_nested_sum_of_leaves() {
        let tree = tree();
        let report = RollupReport::from_leaf_totals(&tree, &leaf_amounts(&[(9, 7), (10, 11), (11, 13), (21, 17)]));

        let mut nested = Money::zero();
        for l1 in tree.nodes_at_level(1) {
            for l2 in tree.children_of(l1) {
                if tree.has_children(*l2) {
                    for l3 in tree.children_of(*l2) {
                        nested += report.leaf_totals[l3];
                    }
                } else {
                    nested += report.leaf_totals[l2];
                }
            }
        }
        assert_eq!(report.grand_total, nested);
    }

    #[test]
    fn test_zero_allocations_contribute_zero() {
        let tree = tree();
        let report = RollupReport::from_leaf_totals(&tree, &BTreeMap::new());

        assert_eq!(report.leaf_totals.len(), 5);
        assert!(report.leaf_totals.values().all(Money::is_zero));
        assert!(report.grand_total.is_zero());
        assert_eq!(report.totals_by_level[&1].len(), 2);
    }

    #[test]
    fn test_non_leaf_entries_are_ignored() {
        let tree = tree();
        let report = RollupReport::from_leaf_totals(&tree, &leaf_amounts(&[(2, 999), (9, 1), (404, 5)]));
        assert_eq!(report.total_for(id(2)), Money::from_major(1));
        assert_eq!(report.grand_total, Money::from_major(1));
    }

    #[test]
    fn test_leaf_only_view_does_not_change_totals() {
        let tree = tree();
        let report = RollupReport::from_leaf_totals(&tree, &leaf_amounts(&[(9, 300), (10, 100)]));

        let full = report.rows(&tree, RollupView::Full);
        let leaves = report.rows(&tree, RollupView::LeafOnly);

        assert_eq!(full.len(), tree.len());
        assert_eq!(
            leaves.iter().map(|row| row.id).collect::<Vec<_>>(),
            vec![id(9), id(10), id(11), id(21)]
        );
        assert_eq!(full[0].total, Money::from_major(400));
        assert_eq!(full[0].share_pct, 100.0);
        assert_eq!(leaves[0].path, "Suppliers > Aluminum > A");
        assert_eq!(leaves[0].share_pct, 75.0);
        assert_eq!(report.grand_total, Money::from_major(400));
    }

    #[test]
    fn test_unrooted_nodes_are_reported_separately() {
        let tree = ExpenseObjectTree::build(vec![
            ExpenseObject::new(1, "Root", 1),
            ExpenseObject::new(9, "Leaf", 2).with_parent(1),
            ExpenseObject::new(30, "Detached", 2),
        ])
        .unwrap();
        let report = RollupReport::from_leaf_totals(&tree, &leaf_amounts(&[(9, 10), (30, 4)]));

        assert_eq!(report.grand_total, Money::from_major(10));
        assert_eq!(report.unrooted_total, Money::from_major(4));
    }

    #[test]
    fn test_generate_from_allocation_table() {
        let tree = tree();
        let items = vec![
            LineItem::new("Sheet", Money::from_major(1_000))
                .allocate(9, AllocationInput::percentage(30.0))
                .allocate(10, AllocationInput::amount(Money::from_major(200))),
            LineItem::new("Install", Money::from_major(500))
                .allocate(21, AllocationInput::percentage(100.0)),
        ];
        let table = AllocationEngine::default().compute_allocations(&items, &[id(9), id(10), id(21)]);
        let report = RollupReport::generate(&tree, &table);

        assert_eq!(report.leaf_totals[&id(9)], Money::from_major(300));
        assert_eq!(report.total_for(id(1)), Money::from_major(500));
        assert_eq!(report.total_for(id(20)), Money::from_major(500));
        assert_eq!(report.grand_total, table.total_allocated);
    }

    #[test]
    fn test_extreme_leaf_totals_saturate() {
        let tree = tree();
        let huge = Money::from_minor(i64::MAX - 1);
        let items = vec![
            LineItem::new("Sheet", huge)
                .allocate(9, AllocationInput::amount(huge))
                .allocate(10, AllocationInput::amount(huge)),
            LineItem::new("Install", huge).allocate(21, AllocationInput::amount(huge)),
        ];
        let table = AllocationEngine::default().compute_allocations(&items, &[id(9), id(10), id(21)]);
        let report = RollupReport::generate(&tree, &table);

        assert_eq!(report.leaf_totals[&id(9)], huge);
        assert_eq!(report.total_for(id(2)), Money::MAX);
        assert_eq!(report.total_for(id(1)), Money::MAX);
        assert_eq!(report.level_total(1), Money::MAX);
        assert_eq!(report.grand_total, Money::MAX);
    }

    #[test]
    fn test_terminal_format() {
        let tree = tree();
        let report = RollupReport::from_leaf_totals(&tree, &leaf_amounts(&[(9, 300), (21, 100)]));

        let output = report.format_terminal(&tree, RollupView::Full);
        assert!(output.contains("Cost Rollup"));
        assert!(output.contains("    A"));
        assert!(output.contains("GRAND TOTAL"));
        assert!(output.contains("400.00"));
        assert!(!output.contains("Unrooted"));

        let leaf_only = report.format_terminal(&tree, RollupView::LeafOnly);
        assert!(leaf_only.contains("Labor > Crew"));
        assert_eq!(output.lines().count() - leaf_only.lines().count(), 4);
    }
}
