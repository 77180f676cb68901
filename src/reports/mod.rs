//! Reports module for costroll
//!
//! Derived views over allocation results: bottom-up cost rollups and the
//! financial summary with its margin classification.

pub mod rollup;
pub mod summary;

pub use rollup::{RollupReport, RollupRow, RollupView};
pub use summary::{
    classify, legacy_planned_cost, FinancialSummary, FinancialSummaryCalculator,
    LegacyCostCheck, MarginClassification, MarginStatus, MarginThresholds, RevenueInputs,
    RevenuePrecedence, RevenueSource,
};
