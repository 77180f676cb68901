//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the engine.

pub mod allocate;
pub mod report;
pub mod selection;
pub mod tree;

pub use allocate::{handle_allocate_command, AllocateArgs};
pub use report::{
    handle_report_command, handle_rollup_command, handle_summary_command, ReportArgs,
    ReportFormat, RollupArgs, SummaryArgs,
};
pub use selection::{handle_toggle_command, ToggleArgs};
pub use tree::{handle_tree_command, TreeArgs};

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::warn;

use crate::error::{CostrollError, CostrollResult};
use crate::input;
use crate::models::{ExpenseObjectId, LineItem, Money, SelectionState};
use crate::services::{ExpenseObjectTree, SelectionAction, SelectionPropagator, SummaryInputs};

/// Expense object records shared by every command
#[derive(Args, Debug, Clone)]
pub struct TreeInput {
    /// Expense object records (.json, .yaml or .yml)
    #[arg(short = 'e', long = "objects", env = "COSTROLL_OBJECTS")]
    pub objects: PathBuf,
}

impl TreeInput {
    pub fn load(&self) -> CostrollResult<ExpenseObjectTree> {
        input::load_tree(&self.objects)
    }
}

/// Line item records
#[derive(Args, Debug, Clone)]
pub struct ItemsInput {
    /// Line items with allocation inputs (.json, .yaml or .yml)
    #[arg(short = 'i', long = "items", env = "COSTROLL_ITEMS")]
    pub items: PathBuf,
}

impl ItemsInput {
    pub fn load(&self) -> CostrollResult<Vec<LineItem>> {
        input::load_line_items(&self.items)
    }
}

/// Where the starting selection comes from
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Selected expense object ids, comma separated
    #[arg(short = 's', long, value_delimiter = ',')]
    pub selected: Vec<ExpenseObjectId>,

    /// Read the selection from a file holding a list of ids
    #[arg(long, conflicts_with = "selected")]
    pub selection_file: Option<PathBuf>,
}

impl SelectionArgs {
    /// Whether any selection source was given
    pub fn is_given(&self) -> bool {
        !self.selected.is_empty() || self.selection_file.is_some()
    }

    /// Load the selection and make it consistent with `tree`.
    ///
    /// Ids missing from the tree are dropped. With no source given the
    /// result is `when_missing` applied to an empty selection.
    pub fn resolve(
        &self,
        tree: &ExpenseObjectTree,
        when_missing: SelectionAction,
    ) -> CostrollResult<SelectionState> {
        let propagator = SelectionPropagator::new(tree);

        let raw: SelectionState = match &self.selection_file {
            Some(path) => input::load_selection(path)?,
            None if self.selected.is_empty() => {
                return Ok(propagator.reduce(&SelectionState::new(), when_missing));
            }
            None => self.selected.iter().copied().collect(),
        };

        let known: SelectionState = raw
            .iter()
            .filter(|id| {
                let present = tree.contains(*id);
                if !present {
                    warn!(%id, "selected id not in tree, dropped");
                }
                present
            })
            .collect();

        Ok(propagator.propagate(&known))
    }
}

/// Revenue figures and budget for the financial summary
#[derive(Args, Debug, Clone, Default)]
pub struct RevenueArgs {
    /// Authoritative revenue total, such as a quote
    #[arg(long)]
    pub quote_total: Option<Money>,

    /// Fallback revenue amount
    #[arg(long)]
    pub raw_amount: Option<Money>,

    /// Budget for the legacy flat-ratio planned cost comparison
    #[arg(long)]
    pub budget: Option<Money>,
}

impl From<&RevenueArgs> for SummaryInputs {
    fn from(args: &RevenueArgs) -> Self {
        SummaryInputs {
            quote_total: args.quote_total,
            raw_amount: args.raw_amount,
            budget: args.budget,
        }
    }
}

/// Open `path` for writing, or stdout when `None`
pub(crate) fn open_output(path: Option<&Path>) -> CostrollResult<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CostrollError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
