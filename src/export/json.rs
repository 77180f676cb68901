//! JSON Export functionality
//!
//! Bundles selection, allocation table, rollup and summary into one
//! versioned document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{CostrollError, CostrollResult};
use crate::models::{Money, SelectionState};
use crate::reports::{FinancialSummary, RollupReport};
use crate::services::AllocationTable;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Everything one computation produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub generated_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Consistent selection the allocation columns were taken from
    pub selection: SelectionState,

    pub allocations: AllocationTable,

    pub rollup: RollupReport,

    pub summary: FinancialSummary,
}

impl CostReport {
    pub fn new(
        selection: SelectionState,
        allocations: AllocationTable,
        rollup: RollupReport,
        summary: FinancialSummary,
    ) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            selection,
            allocations,
            rollup,
            summary,
        }
    }

    /// Check the schema version and that the parts agree with each other
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        for column in &self.allocations.columns {
            if !self.selection.contains(*column) {
                return Err(format!("Allocation column {} is not selected", column));
            }
        }

        for line in &self.allocations.lines {
            if let Some(id) = line
                .allocations
                .keys()
                .find(|id| !self.allocations.columns.contains(id))
            {
                return Err(format!(
                    "Line '{}' has a cell for {} outside the allocation columns",
                    line.product_name, id
                ));
            }
        }

        let expected_cost = if self.rollup.grand_total.is_positive() {
            self.rollup.grand_total
        } else {
            Money::zero()
        };
        if self.summary.cost != expected_cost {
            return Err(format!(
                "Summary cost {} does not match rollup grand total {}",
                self.summary.cost, self.rollup.grand_total
            ));
        }

        Ok(())
    }
}

/// Export a report to JSON
pub fn export_report_json<W: Write>(
    report: &CostReport,
    writer: &mut W,
    pretty: bool,
) -> CostrollResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, report)
    } else {
        serde_json::to_writer(writer, report)
    }
    .map_err(|e| CostrollError::Export(e.to_string()))?;

    Ok(())
}

/// Read a JSON report back (for verification)
pub fn import_report_json(json_str: &str) -> CostrollResult<CostReport> {
    let report: CostReport =
        serde_json::from_str(json_str).map_err(|e| CostrollError::Input(e.to_string()))?;

    report.validate().map_err(CostrollError::Validation)?;

    Ok(report)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{AllocationInput, ExpenseObject, LineItem};
    use crate::services::{CostEngine, ExpenseObjectTree, SummaryInputs};

    pub(crate) fn sample_tree() -> ExpenseObjectTree {
        ExpenseObjectTree::build(vec![
            ExpenseObject::new(1, "Suppliers", 1),
            ExpenseObject::new(2, "Aluminum", 2).with_parent(1),
            ExpenseObject::new(9, "Alu, Inc.", 3).with_parent(2),
            ExpenseObject::new(10, "Metals Co", 3).with_parent(2),
        ])
        .unwrap()
    }

    pub(crate) fn sample_report(tree: &ExpenseObjectTree) -> CostReport {
        let settings = Settings::default();
        let engine = CostEngine::new(tree, &settings);
        let items = vec![LineItem::new("Facade \"A\"", Money::from_major(1_000_000))
            .allocate(9, AllocationInput::percentage(30.0))
            .allocate(10, AllocationInput::quantity_price(2.0, Money::from_major(100_000)))];
        let selection = SelectionState::from([1, 2, 9, 10]);
        engine.compute_report(
            &items,
            &selection,
            SummaryInputs {
                quote_total: Some(Money::from_major(800_000)),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_report_json() {
        let tree = sample_tree();
        let report = sample_report(&tree);
        assert!(report.validate().is_ok());

        let mut output = Vec::new();
        export_report_json(&report, &mut output, true).unwrap();
        let json = String::from_utf8(output).unwrap();

        assert!(json.contains("\"schema_version\": \"1.0.0\""));
        assert!(json.contains("\"status\": \"safe\""));
        // Money is exported in minor units
        assert!(json.contains("\"grand_total\": 50000000"));

        let imported = import_report_json(&json).unwrap();
        assert_eq!(imported.summary, report.summary);
        assert_eq!(imported.rollup, report.rollup);
    }

    #[test]
    fn test_import_rejects_inconsistent_report() {
        let tree = sample_tree();
        let mut report = sample_report(&tree);
        report.summary.cost = Money::from_major(1);

        let json = serde_json::to_string(&report).unwrap();
        let err = import_report_json(&json).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().starts_with("Validation error"));

        let err = import_report_json("{ not json").unwrap_err();
        assert!(matches!(err, CostrollError::Input(_)));
    }

    #[test]
    fn test_validate_schema_version() {
        let tree = sample_tree();
        let mut report = sample_report(&tree);
        report.schema_version = "0.1.0".into();
        assert!(report.validate().is_err());
    }
}
