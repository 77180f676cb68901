//! YAML Export functionality
//!
//! Writes the [`CostReport`] bundle as YAML for human review.

use std::io::Write;

use crate::error::{CostrollError, CostrollResult};
use crate::export::json::CostReport;

/// Export a report to YAML with a short comment header
pub fn export_report_yaml<W: Write>(report: &CostReport, writer: &mut W) -> CostrollResult<()> {
    writeln!(writer, "# costroll cost report")
        .map_err(|e| CostrollError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", report.generated_at)
        .map_err(|e| CostrollError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", report.app_version)
        .map_err(|e| CostrollError::Export(e.to_string()))?;
    writeln!(writer, "# Money amounts are in minor units (hundredths).")
        .map_err(|e| CostrollError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| CostrollError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, report).map_err(|e| CostrollError::Export(e.to_string()))?;

    Ok(())
}

/// Read a YAML report back (for verification)
pub fn import_report_yaml(yaml_str: &str) -> CostrollResult<CostReport> {
    let report: CostReport =
        serde_yaml::from_str(yaml_str).map_err(|e| CostrollError::Input(e.to_string()))?;

    report.validate().map_err(CostrollError::Validation)?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::tests::{sample_report, sample_tree};

    #[test]
    fn test_yaml_export() {
        let tree = sample_tree();
        let report = sample_report(&tree);

        let mut output = Vec::new();
        export_report_yaml(&report, &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();

        assert!(yaml.starts_with("# costroll cost report"));
        assert!(yaml.contains("grand_total: 50000000"));
        assert!(yaml.contains("status: safe"));

        let imported = import_report_yaml(&yaml).unwrap();
        assert_eq!(imported.summary.status, report.summary.status);
        assert_eq!(imported.allocations.total_allocated, report.allocations.total_allocated);
    }
}
