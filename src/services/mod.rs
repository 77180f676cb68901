//! Service layer for costroll
//!
//! The computational core: tree construction and queries, selection
//! propagation, allocation resolution, and the facade tying them together.

pub mod allocation;
pub mod engine;
pub mod selection;
pub mod tree;

pub use allocation::{
    AllocationEngine, AllocationSource, AllocationTable, LineAllocation, Reconciliation,
    ResolvedAllocation,
};
pub use engine::{CostEngine, SummaryInputs};
pub use selection::{SelectionAction, SelectionPropagator};
pub use tree::ExpenseObjectTree;
