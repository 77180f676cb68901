//! Allocation table display
//!
//! Renders the per-line allocation matrix with `tabled`: one row per line
//! item, one column per selected leaf, plus allocated and delta columns.

use tabled::builder::Builder;
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Modify, Style};

use crate::services::{AllocationSource, AllocationTable, ExpenseObjectTree};

use super::format_percentage;

/// Format the allocation matrix. Lines outside tolerance are marked `*`.
pub fn format_allocation_table(table: &AllocationTable, tree: &ExpenseObjectTree) -> String {
    if table.lines.is_empty() {
        return "No line items.".to_string();
    }
    if table.columns.is_empty() {
        return "No expense objects selected; nothing to allocate.".to_string();
    }

    let mut builder = Builder::default();

    let mut header = vec!["Product".to_string(), "Line Total".to_string()];
    header.extend(table.columns.iter().map(|id| {
        tree.get(*id)
            .map(|node| format!("{} #{}", node.name, id))
            .unwrap_or_else(|| format!("#{}", id))
    }));
    header.push("Allocated".to_string());
    header.push("Delta".to_string());
    builder.push_record(header);

    for line in &table.lines {
        let mut record = vec![line.product_name.clone(), line.line_total.to_string()];
        for id in &table.columns {
            let cell = match line.allocations.get(id) {
                Some(cell) if cell.source != AllocationSource::Unallocated => {
                    format!("{} ({})", cell.amount, format_percentage(cell.percentage))
                }
                _ => "-".to_string(),
            };
            record.push(cell);
        }
        record.push(line.total_allocated.to_string());
        let marker = if line.reconciliation.within_tolerance { "" } else { " *" };
        record.push(format!("{}{}", line.reconciliation.delta, marker));
        builder.push_record(record);
    }

    let mut footer = vec!["TOTAL".to_string(), table.total_line_value.to_string()];
    footer.extend(table.columns.iter().map(|id| {
        table
            .column_totals
            .get(id)
            .copied()
            .unwrap_or_default()
            .to_string()
    }));
    footer.push(table.total_allocated.to_string());
    footer.push(table.total_delta.to_string());
    builder.push_record(footer);

    let mut rendered = builder.build();
    rendered
        .with(Style::psql())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    let mut output = rendered.to_string();
    output.push('\n');
    if table.unreconciled_lines > 0 {
        output.push_str(&format!(
            "\n* = allocated amount differs from line total ({} line(s))\n",
            table.unreconciled_lines
        ));
    }
    output
}

/// List lines that do not reconcile and inputs that were not counted
pub fn format_reconciliation(table: &AllocationTable) -> String {
    let mut output = String::new();

    for line in &table.lines {
        if !line.reconciliation.within_tolerance {
            output.push_str(&format!(
                "{}: allocated {} of {} (delta {})\n",
                line.product_name,
                line.reconciliation.allocated,
                line.reconciliation.line_total,
                line.reconciliation.delta
            ));
        }
        if !line.ignored.is_empty() {
            let ids: Vec<String> = line.ignored.iter().map(|id| format!("#{}", id)).collect();
            output.push_str(&format!(
                "{}: inputs for {} not counted (not selected leaves)\n",
                line.product_name,
                ids.join(", ")
            ));
        }
    }

    if output.is_empty() {
        output.push_str("All lines reconcile.\n");
    }
    output
}
