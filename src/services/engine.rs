//! Engine facade
//!
//! Exposes the four public operations over one validated tree and one set
//! of settings. Every call takes immutable inputs and returns a new value.

use tracing::info;

use crate::config::Settings;
use crate::export::CostReport;
use crate::models::{ExpenseObjectId, LineItem, Money, SelectionState};
use crate::reports::{FinancialSummary, RevenueInputs, RollupReport};

use super::allocation::AllocationTable;
use super::selection::{SelectionAction, SelectionPropagator};
use super::tree::ExpenseObjectTree;

/// Caller-supplied revenue figures and budget for a summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryInputs {
    pub quote_total: Option<Money>,
    pub raw_amount: Option<Money>,
    pub budget: Option<Money>,
}

/// Cost allocation and rollup over one expense-object tree
pub struct CostEngine<'a> {
    tree: &'a ExpenseObjectTree,
    settings: &'a Settings,
}

impl<'a> CostEngine<'a> {
    pub fn new(tree: &'a ExpenseObjectTree, settings: &'a Settings) -> Self {
        Self { tree, settings }
    }

    pub fn tree(&self) -> &ExpenseObjectTree {
        self.tree
    }

    pub fn propagator(&self) -> SelectionPropagator<'a> {
        SelectionPropagator::new(self.tree)
    }

    /// Toggle `id` in `selected`; unknown ids leave it unchanged
    pub fn toggle_selection(&self, selected: &SelectionState, id: ExpenseObjectId) -> SelectionState {
        self.propagator().reduce(selected, SelectionAction::Toggle(id))
    }

    /// Allocate `items` over the selected leaves of `selected`
    pub fn compute_allocations(&self, items: &[LineItem], selected: &SelectionState) -> AllocationTable {
        let columns = self.propagator().selected_leaves(selected);
        self.settings
            .allocation_engine()
            .compute_allocations(items, &columns)
    }

    /// Roll allocated amounts up through the full tree
    pub fn compute_rollup(&self, table: &AllocationTable) -> RollupReport {
        RollupReport::generate(self.tree, table)
    }

    /// Derive revenue, profit and margin against the rolled-up cost
    pub fn compute_financial_summary(
        &self,
        items: &[LineItem],
        rollup: &RollupReport,
        inputs: SummaryInputs,
    ) -> FinancialSummary {
        let revenue = RevenueInputs::from_line_items(items, inputs.quote_total, inputs.raw_amount);
        self.settings
            .summary_calculator()
            .calculate(&revenue, rollup.grand_total, inputs.budget)
    }

    /// Run allocation, rollup and summary in one pass
    pub fn compute_report(
        &self,
        items: &[LineItem],
        selected: &SelectionState,
        inputs: SummaryInputs,
    ) -> CostReport {
        let allocations = self.compute_allocations(items, selected);
        let rollup = self.compute_rollup(&allocations);
        let summary = self.compute_financial_summary(items, &rollup, inputs);

        info!(
            lines = items.len(),
            columns = allocations.columns.len(),
            grand_total = %rollup.grand_total,
            status = %summary.status,
            "computed cost report"
        );

        CostReport::new(selected.clone(), allocations, rollup, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocationInput, ExpenseObject};
    use crate::reports::MarginStatus;

    fn tree() -> ExpenseObjectTree {
        ExpenseObjectTree::build(vec![
            ExpenseObject::new(1, "Supplier-root", 1),
            ExpenseObject::new(2, "Aluminum", 2).with_parent(1),
            ExpenseObject::new(9, "X", 3).with_parent(2),
            ExpenseObject::new(10, "Y", 3).with_parent(2),
        ])
        .unwrap()
    }

    fn items() -> Vec<LineItem> {
        vec![LineItem::new("Facade", Money::from_major(1_000_000))
            .allocate(9, AllocationInput::percentage(30.0))
            .allocate(10, AllocationInput::quantity_price(2.0, Money::from_major(100_000)))]
    }

    #[test]
    fn test_end_to_end() {
        let tree = tree();
        let settings = Settings::default();
        let engine = CostEngine::new(&tree, &settings);

        let s = engine.toggle_selection(&SelectionState::new(), ExpenseObjectId::new(2));
        assert_eq!(s, SelectionState::from([1, 2, 9, 10]));

        let table = engine.compute_allocations(&items(), &s);
        assert_eq!(table.total_allocated, Money::from_major(500_000));
        assert_eq!(table.lines[0].reconciliation.delta, Money::from_major(500_000));

        let rollup = engine.compute_rollup(&table);
        assert_eq!(rollup.grand_total, Money::from_major(500_000));

        let summary = engine.compute_financial_summary(
            &items(),
            &rollup,
            SummaryInputs {
                quote_total: Some(Money::from_major(2_000_000)),
                ..Default::default()
            },
        );
        assert_eq!(summary.profit, Money::from_major(1_500_000));
        assert_eq!(summary.margin_pct, 75.0);
        assert_eq!(summary.status, MarginStatus::Safe);
    }

    #[test]
    fn test_unselected_leaves_are_not_allocated() {
        let tree = tree();
        let settings = Settings::default();
        let engine = CostEngine::new(&tree, &settings);

        let s = engine.toggle_selection(&SelectionState::new(), ExpenseObjectId::new(9));
        let report = engine.compute_report(&items(), &s, SummaryInputs::default());

        assert_eq!(report.allocations.columns, vec![ExpenseObjectId::new(9)]);
        assert_eq!(report.rollup.grand_total, Money::from_major(300_000));
        assert_eq!(report.allocations.lines[0].ignored, vec![ExpenseObjectId::new(10)]);
        // Revenue falls back to the line item sum
        assert_eq!(report.summary.revenue, Money::from_major(1_000_000));
        assert_eq!(report.summary.margin_pct, 70.0);
    }
}
