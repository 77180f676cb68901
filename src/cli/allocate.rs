//! CLI command for computing the per-line allocation table

use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::display::{format_allocation_table, format_reconciliation};
use crate::error::CostrollResult;
use crate::export::export_allocations_csv;
use crate::services::{CostEngine, SelectionAction};

use super::{open_output, ItemsInput, SelectionArgs, TreeInput};

/// Arguments for `costroll allocate`
#[derive(Args, Debug)]
pub struct AllocateArgs {
    #[command(flatten)]
    pub input: TreeInput,

    #[command(flatten)]
    pub items: ItemsInput,

    // Default: everything selected
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Write the allocation cells as CSV to this file instead
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Allocate every line item over the selected leaves
pub fn handle_allocate_command(settings: &Settings, args: AllocateArgs) -> CostrollResult<()> {
    let tree = args.input.load()?;
    let items = args.items.load()?;
    let selection = args.selection.resolve(&tree, SelectionAction::SelectAll)?;

    let engine = CostEngine::new(&tree, settings);
    let table = engine.compute_allocations(&items, &selection);

    match &args.csv {
        Some(path) => {
            let mut writer = open_output(Some(path.as_path()))?;
            export_allocations_csv(&table, &tree, &mut writer)?;
            println!(
                "Allocated {} line(s) over {} column(s) to: {}",
                table.lines.len(),
                table.columns.len(),
                path.display()
            );
        }
        None => {
            print!("{}", format_allocation_table(&table, &tree));
            println!();
            print!("{}", format_reconciliation(&table));
        }
    }

    Ok(())
}
