//! Allocation engine
//!
//! Turns the raw allocation inputs of each line item into one canonical
//! amount per allocation column (selected leaf expense object).
//!
//! When several input forms are filled in for the same (line, object) pair
//! the most specific one wins:
//!
//! 1. an explicit amount,
//! 2. otherwise quantity x unit price,
//! 3. otherwise percentage x line total.
//!
//! This lets users enter whatever is most convenient (a coarse percentage or
//! detailed quantity and price) while every cell still resolves to a single
//! number. The reported percentage is always recomputed from the resolved
//! amount so that all cells display consistently.
//!
//! Allocated sums are not required to match the line total. The difference is
//! reported as a delta on each line; nothing is rejected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::{AllocationInput, ExpenseObjectId, LineItem, LineItemId, Money};

/// Which input form produced an allocated amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationSource {
    /// The explicit amount field
    Explicit,
    /// Quantity x unit price
    QuantityPrice,
    /// Percentage of the line total
    Percentage,
    /// Nothing entered for this column
    Unallocated,
}

/// A resolved allocation cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAllocation {
    /// Share of the line total, recomputed from `amount`
    pub percentage: f64,
    /// Quantity as entered (0 when not entered)
    pub quantity: f64,
    /// Unit price as entered (0 when not entered)
    pub unit_price: Money,
    /// Canonical allocated amount
    pub amount: Money,
    /// Input form the amount was taken from
    pub source: AllocationSource,
}

/// Allocated total versus recorded line total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Line total the allocations are measured against
    pub line_total: Money,
    /// Sum of allocated amounts
    pub allocated: Money,
    /// `line_total - allocated`; positive means under-allocated
    pub delta: Money,
    /// Whether `|delta|` is within the configured tolerance
    pub within_tolerance: bool,
}

/// Allocation result for one line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAllocation {
    pub line_item_id: LineItemId,
    pub product_name: String,
    pub line_total: Money,
    /// One cell per allocation column
    pub allocations: BTreeMap<ExpenseObjectId, ResolvedAllocation>,
    pub total_allocated: Money,
    pub reconciliation: Reconciliation,
    /// Objects that carry inputs on this line but are not allocation columns
    /// (unselected, non-leaf or unknown); their inputs are not counted
    pub ignored: Vec<ExpenseObjectId>,
}

/// Allocation results for a batch of line items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationTable {
    /// Allocation columns in display order
    pub columns: Vec<ExpenseObjectId>,
    pub lines: Vec<LineAllocation>,
    /// Per-column sum over all lines
    pub column_totals: BTreeMap<ExpenseObjectId, Money>,
    pub total_line_value: Money,
    pub total_allocated: Money,
    /// `total_line_value - total_allocated`
    pub total_delta: Money,
    /// Lines whose delta exceeds the tolerance
    pub unreconciled_lines: usize,
}

/// Resolves allocation inputs into amounts
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationEngine {
    tolerance: Money,
}

impl AllocationEngine {
    /// Create an engine that treats deltas up to `tolerance` as reconciled
    pub fn new(tolerance: Money) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    /// Resolve one cell against `line_total`
    pub fn resolve(line_total: Money, input: &AllocationInput) -> ResolvedAllocation {
        let (amount, source) = if !input.amount.is_zero() {
            (input.amount, AllocationSource::Explicit)
        } else if input.quantity != 0.0 && !input.unit_price.is_zero() {
            (input.unit_price.scale(input.quantity), AllocationSource::QuantityPrice)
        } else if input.percentage != 0.0 {
            (line_total.scale(input.percentage / 100.0), AllocationSource::Percentage)
        } else {
            (Money::zero(), AllocationSource::Unallocated)
        };

        ResolvedAllocation {
            percentage: amount.ratio_pct(line_total),
            quantity: input.quantity,
            unit_price: input.unit_price,
            amount,
            source,
        }
    }

    /// Allocate one line item over `columns`
    pub fn allocate_line(&self, item: &LineItem, columns: &[ExpenseObjectId]) -> LineAllocation {
        let line_total = item.line_total;

        let allocations: BTreeMap<ExpenseObjectId, ResolvedAllocation> = columns
            .iter()
            .map(|column| {
                let input = item.allocations.get(column).copied().unwrap_or_default();
                (*column, Self::resolve(line_total, &input))
            })
            .collect();

        let ignored: Vec<ExpenseObjectId> = item
            .allocations
            .iter()
            .filter(|(id, input)| !columns.contains(*id) && !input.is_empty())
            .map(|(id, _)| *id)
            .collect();
        if !ignored.is_empty() {
            warn!(
                line = %item.id,
                product = %item.product_name,
                ?ignored,
                "allocation inputs outside the selected columns were not counted"
            );
        }

        let total_allocated: Money = allocations.values().map(|cell| cell.amount).sum();
        let reconciliation = self.reconcile(line_total, total_allocated);
        if !reconciliation.within_tolerance {
            debug!(
                line = %item.id,
                delta = %reconciliation.delta,
                "line allocation does not reconcile"
            );
        }

        LineAllocation {
            line_item_id: item.id,
            product_name: item.product_name.clone(),
            line_total,
            allocations,
            total_allocated,
            reconciliation,
            ignored,
        }
    }

    /// Sum of allocated amounts for one line over `columns`
    pub fn total_allocated(&self, item: &LineItem, columns: &[ExpenseObjectId]) -> Money {
        let line_total = item.line_total;
        columns
            .iter()
            .filter_map(|column| item.allocations.get(column))
            .map(|input| Self::resolve(line_total, input).amount)
            .sum()
    }

    /// Compare an allocated sum with a line total
    pub fn reconcile(&self, line_total: Money, allocated: Money) -> Reconciliation {
        let delta = line_total - allocated;
        Reconciliation {
            line_total,
            allocated,
            delta,
            within_tolerance: delta.abs() <= self.tolerance,
        }
    }

    /// Allocate every line item over `columns`
    pub fn compute_allocations(&self, items: &[LineItem], columns: &[ExpenseObjectId]) -> AllocationTable {
        let lines: Vec<LineAllocation> = items
            .iter()
            .map(|item| self.allocate_line(item, columns))
            .collect();

        let mut column_totals: BTreeMap<ExpenseObjectId, Money> =
            columns.iter().map(|column| (*column, Money::zero())).collect();
        for line in &lines {
            for (column, cell) in &line.allocations {
                *column_totals.entry(*column).or_default() += cell.amount;
            }
        }

        let total_line_value: Money = lines.iter().map(|line| line.line_total).sum();
        let total_allocated: Money = lines.iter().map(|line| line.total_allocated).sum();
        let unreconciled_lines = lines
            .iter()
            .filter(|line| !line.reconciliation.within_tolerance)
            .count();

        debug!(
            lines = lines.len(),
            columns = columns.len(),
            unreconciled_lines,
            "computed allocations"
        );

        AllocationTable {
            columns: columns.to_vec(),
            lines,
            column_totals,
            total_line_value,
            total_allocated,
            total_delta: total_line_value - total_allocated,
            unreconciled_lines,
        }
    }
}
