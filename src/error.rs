//! Error types for costroll
//!
//! The computational core has exactly one hard failure mode: a malformed
//! expense-object tree, reported once at construction time as [`TreeError`].
//! Everything else (missing numbers, unknown ids, allocation deltas) is
//! surfaced as data on the results. The remaining variants of
//! [`CostrollError`] belong to the outer layers: config, input files, export.

use thiserror::Error;

use crate::models::ExpenseObjectId;

/// Structural problems detected while building an expense-object tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Two records share the same id
    #[error("Duplicate expense object id: {0}")]
    DuplicateId(ExpenseObjectId),

    /// A record points at a parent that is not in the input
    #[error("Expense object {id} references missing parent {parent_id}")]
    MissingParent {
        id: ExpenseObjectId,
        parent_id: ExpenseObjectId,
    },

    /// Following parent links from a record leads back to itself
    #[error("Expense object {0} is part of a parent cycle")]
    Cycle(ExpenseObjectId),

    /// Level 0 is not a valid level
    #[error("Expense object {id} has invalid level {level}")]
    InvalidLevel { id: ExpenseObjectId, level: u8 },

    /// Level-1 nodes are roots and cannot have a parent
    #[error("Level-1 expense object {0} must not have a parent")]
    RootWithParent(ExpenseObjectId),

    /// A child's level must be exactly one below its parent's
    #[error(
        "Expense object {id} at level {level} has parent {parent_id} at level {parent_level}"
    )]
    LevelMismatch {
        id: ExpenseObjectId,
        level: u8,
        parent_id: ExpenseObjectId,
        parent_level: u8,
    },
}

/// The main error type for costroll operations
#[derive(Error, Debug)]
pub enum CostrollError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// CSV writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Report bundles that parse but are internally inconsistent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed expense-object tree
    #[error("Invalid expense object tree: {0}")]
    Tree(#[from] TreeError),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Input file errors
    #[error("Input error: {0}")]
    Input(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl CostrollError {
    /// Create a "not found" error for expense objects
    pub fn expense_object_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense object",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a structural tree error
    pub fn is_tree_error(&self) -> bool {
        matches!(self, Self::Tree(_))
    }
}

impl From<std::io::Error> for CostrollError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CostrollError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for CostrollError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

impl From<csv::Error> for CostrollError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for costroll operations
pub type CostrollResult<T> = Result<T, CostrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CostrollError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = CostrollError::expense_object_not_found("42");
        assert_eq!(err.to_string(), "Expense object not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_tree_error_display() {
        let err = TreeError::MissingParent {
            id: ExpenseObjectId::new(9),
            parent_id: ExpenseObjectId::new(7),
        };
        assert_eq!(
            err.to_string(),
            "Expense object 9 references missing parent 7"
        );

        let wrapped: CostrollError = err.into();
        assert!(wrapped.is_tree_error());
        assert!(wrapped.to_string().starts_with("Invalid expense object tree:"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CostrollError = io_err.into();
        assert!(matches!(err, CostrollError::Io(_)));
    }
}
