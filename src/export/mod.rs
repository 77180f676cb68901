//! Export module for costroll
//!
//! Serialises computed results for downstream report generators:
//! - CSV: allocation cells and rollup rows (spreadsheet-compatible)
//! - JSON: the full [`CostReport`] bundle with schema versioning
//! - YAML: the same bundle in human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_allocations_csv, export_rollup_csv};
pub use json::{export_report_json, import_report_json, CostReport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_report_yaml, import_report_yaml};
