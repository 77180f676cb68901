//! Expense object model
//!
//! Expense objects are the nodes of the cost-category hierarchy, e.g.
//! supplier root (level 1) / material category (level 2) / specific supplier
//! (level 3). Records are created and edited elsewhere; the engine reads
//! them as an immutable snapshot per computation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseObjectId;

/// A node of the expense-object hierarchy as fetched by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseObject {
    /// Record id
    pub id: ExpenseObjectId,

    /// Display name
    pub name: String,

    /// Parent node, absent for roots
    #[serde(default, alias = "parentId")]
    pub parent_id: Option<ExpenseObjectId>,

    /// Hierarchy level, 1 for roots
    pub level: u8,

    /// Optional category tag (e.g. "supplier", "material")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Whether the object is still offered for new allocations
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ExpenseObject {
    /// Create a new active root-less node
    pub fn new(id: impl Into<ExpenseObjectId>, name: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
            level,
            role: None,
            is_active: true,
        }
    }

    /// Attach this node under `parent_id`
    pub fn with_parent(mut self, parent_id: impl Into<ExpenseObjectId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Tag this node with a role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Mark this node inactive
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Whether this record claims to be a root
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl fmt::Display for ExpenseObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let node = ExpenseObject::new(9, "A", 3)
            .with_parent(2)
            .with_role("supplier");

        assert_eq!(node.id, ExpenseObjectId::new(9));
        assert_eq!(node.parent_id, Some(ExpenseObjectId::new(2)));
        assert_eq!(node.role.as_deref(), Some("supplier"));
        assert!(node.is_active);
        assert!(!node.is_root());
    }

    #[test]
    fn test_deserialize_defaults_and_aliases() {
        let json = r#"{"id": 2, "name": "Aluminum", "parentId": 1, "level": 2}"#;
        let node: ExpenseObject = serde_json::from_str(json).unwrap();
        assert_eq!(node.parent_id, Some(ExpenseObjectId::new(1)));
        assert!(node.is_active);
        assert!(node.role.is_none());

        let json = r#"{"id": 1, "name": "Root", "parent_id": null, "level": 1, "is_active": false}"#;
        let node: ExpenseObject = serde_json::from_str(json).unwrap();
        assert!(node.is_root());
        assert!(!node.is_active);
    }
}
