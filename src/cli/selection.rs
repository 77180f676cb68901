//! CLI command for toggling expense objects in a selection

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::display::format_selection;
use crate::error::{CostrollError, CostrollResult};
use crate::models::ExpenseObjectId;
use crate::services::{SelectionAction, SelectionPropagator};

use super::{SelectionArgs, TreeInput};

/// Arguments for `costroll toggle`
#[derive(Args, Debug)]
pub struct ToggleArgs {
    #[command(flatten)]
    pub input: TreeInput,

    /// Ids to toggle, applied in order
    #[arg(required = true)]
    pub ids: Vec<ExpenseObjectId>,

    // Default: nothing selected
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Write the resulting selection to this JSON file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Print the resulting selection as a JSON list
    #[arg(long)]
    pub json: bool,
}

/// Apply each toggle and print the resulting selection
pub fn handle_toggle_command(args: ToggleArgs) -> CostrollResult<()> {
    let tree = args.input.load()?;
    let propagator = SelectionPropagator::new(&tree);

    let start = args.selection.resolve(&tree, SelectionAction::Clear)?;
    let selection = args
        .ids
        .iter()
        .fold(start, |s, id| propagator.reduce(&s, SelectionAction::Toggle(*id)));

    if let Some(path) = &args.save {
        let contents = serde_json::to_string_pretty(&selection)?;
        std::fs::write(path, contents).map_err(|e| {
            CostrollError::Io(format!("Failed to write {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "selection saved");
    }

    if args.json {
        println!("{}", serde_json::to_string(&selection)?);
    } else {
        print!("{}", format_selection(&tree, &selection));
        println!();
        println!("Allocation columns: {}", propagator.selected_leaves(&selection).len());
    }

    Ok(())
}
