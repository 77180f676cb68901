//! CSV Export functionality
//!
//! Exports allocation cells and rollup rows to CSV. Amounts are written as
//! plain decimals in major units.

use std::io::Write;

use crate::error::{CostrollError, CostrollResult};
use crate::reports::{RollupReport, RollupView};
use crate::services::{AllocationSource, AllocationTable, ExpenseObjectTree};

fn source_label(source: AllocationSource) -> &'static str {
    match source {
        AllocationSource::Explicit => "explicit",
        AllocationSource::QuantityPrice => "quantity_price",
        AllocationSource::Percentage => "percentage",
        AllocationSource::Unallocated => "",
    }
}

/// Export one row per (line item, allocation column) cell
pub fn export_allocations_csv<W: Write>(
    table: &AllocationTable,
    tree: &ExpenseObjectTree,
    writer: &mut W,
) -> CostrollResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let export_err = |e: csv::Error| CostrollError::Export(e.to_string());

    wtr.write_record([
        "Line ID",
        "Product",
        "Line Total",
        "Expense Object ID",
        "Expense Object",
        "Source",
        "Percentage",
        "Quantity",
        "Unit Price",
        "Amount",
        "Total Allocated",
        "Delta",
    ])
    .map_err(export_err)?;

    for line in &table.lines {
        for (id, cell) in &line.allocations {
            let name = tree.get(*id).map(|node| node.name.as_str()).unwrap_or("");
            wtr.write_record([
                line.line_item_id.to_string(),
                line.product_name.clone(),
                line.line_total.to_string(),
                id.to_string(),
                name.to_string(),
                source_label(cell.source).to_string(),
                format!("{:.2}", cell.percentage),
                cell.quantity.to_string(),
                cell.unit_price.to_string(),
                cell.amount.to_string(),
                line.total_allocated.to_string(),
                line.reconciliation.delta.to_string(),
            ])
            .map_err(export_err)?;
        }
    }

    wtr.flush()
        .map_err(|e| CostrollError::Export(e.to_string()))?;
    Ok(())
}

/// Export rollup rows for `view`, followed by the grand total
pub fn export_rollup_csv<W: Write>(
    report: &RollupReport,
    tree: &ExpenseObjectTree,
    view: RollupView,
    writer: &mut W,
) -> CostrollResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let export_err = |e: csv::Error| CostrollError::Export(e.to_string());

    wtr.write_record(["ID", "Name", "Level", "Path", "Is Leaf", "Total", "Share %"])
        .map_err(export_err)?;

    for row in report.rows(tree, view) {
        wtr.write_record([
            row.id.to_string(),
            row.name,
            row.level.to_string(),
            row.path,
            row.is_leaf.to_string(),
            row.total.to_string(),
            format!("{:.2}", row.share_pct),
        ])
        .map_err(export_err)?;
    }

    let grand_total = report.grand_total.to_string();
    wtr.write_record(["", "GRAND TOTAL", "", "", "", grand_total.as_str(), "100.00"])
        .map_err(export_err)?;

    wtr.flush()
        .map_err(|e| CostrollError::Export(e.to_string()))?;
    Ok(())
}
