//! Display formatting for terminal output
//!
//! Plain-text renderings of the tree, selections and allocation tables.
//! Amounts print as plain decimals; no currency or locale formatting.

pub mod allocation;
pub mod tree;

pub use allocation::{format_allocation_table, format_reconciliation};
pub use tree::{format_selection, format_tree};

/// Format a percentage with two decimals
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(30.0), "30.00%");
        assert_eq!(format_percentage(12.345), "12.35%");
        assert_eq!(format_percentage(-5.0), "-5.00%");
    }
}
