//! Selection state
//!
//! The set of expense objects currently chosen as allocation columns. Values
//! are immutable from the engine's point of view: every transition returns a
//! new set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::ids::ExpenseObjectId;

/// An ordered set of selected expense object ids
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionState(BTreeSet<ExpenseObjectId>);

impl SelectionState {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is selected
    pub fn contains(&self, id: ExpenseObjectId) -> bool {
        self.0.contains(&id)
    }

    /// Number of selected ids
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate selected ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = ExpenseObjectId> + '_ {
        self.0.iter().copied()
    }

    pub(crate) fn insert(&mut self, id: ExpenseObjectId) -> bool {
        self.0.insert(id)
    }

    pub(crate) fn remove(&mut self, id: ExpenseObjectId) -> bool {
        self.0.remove(&id)
    }
}

impl FromIterator<ExpenseObjectId> for SelectionState {
    fn from_iter<I: IntoIterator<Item = ExpenseObjectId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[u64; N]> for SelectionState {
    fn from(ids: [u64; N]) -> Self {
        ids.into_iter().map(ExpenseObjectId::new).collect()
    }
}
