//! Core data models for costroll
//!
//! This module contains the input records the engine reads (expense objects,
//! line items with allocation inputs) and the small value types shared by
//! every computation (ids, money, selection state).

pub mod expense_object;
pub mod ids;
pub mod lenient;
pub mod line_item;
pub mod money;
pub mod selection;

pub use expense_object::ExpenseObject;
pub use ids::{ExpenseObjectId, LineItemId};
pub use line_item::{AllocationInput, LineItem};
pub use money::Money;
pub use selection::SelectionState;
