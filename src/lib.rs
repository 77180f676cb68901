//! costroll - hierarchical cost allocation and financial rollup
//!
//! This library computes how the value of priced line items is distributed
//! over a tree of expense objects (cost categories), rolls the allocated
//! amounts up the tree, and derives profit and a margin classification.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Core data types (ids, money, expense objects, line items, selections)
//! - `services`: Tree queries, selection propagation, allocation, engine facade
//! - `reports`: Rollup totals and the financial summary
//! - `config`: Configuration and path management
//! - `input`: Loading records from JSON or YAML files
//! - `export`: CSV, JSON and YAML output
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `costroll` binary
//! - `error`: Custom error types
//!
//! Every computation takes immutable inputs and returns a new value; the
//! only hard failure is a malformed tree, reported by
//! [`ExpenseObjectTree::build`](services::ExpenseObjectTree::build).
//!
//! # Example
//!
//! ```rust
//! use costroll::config::Settings;
//! use costroll::models::{
//!     AllocationInput, ExpenseObject, ExpenseObjectId, LineItem, Money, SelectionState,
//! };
//! use costroll::services::{CostEngine, ExpenseObjectTree, SummaryInputs};
//!
//! let tree = ExpenseObjectTree::build(vec![
//!     ExpenseObject::new(1, "Suppliers", 1),
//!     ExpenseObject::new(9, "Aluminum", 2).with_parent(1),
//! ])?;
//! let settings = Settings::default();
//! let engine = CostEngine::new(&tree, &settings);
//!
//! let selection = engine.toggle_selection(&SelectionState::new(), ExpenseObjectId::new(9));
//! let items = vec![LineItem::new("Sheet", Money::from_major(1_000))
//!     .allocate(9, AllocationInput::percentage(60.0))];
//!
//! let report = engine.compute_report(&items, &selection, SummaryInputs::default());
//! assert_eq!(report.rollup.grand_total, Money::from_major(600));
//! assert_eq!(report.summary.margin_pct, 40.0);
//! # Ok::<(), costroll::error::TreeError>(())
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod input;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{CostrollError, CostrollResult};
