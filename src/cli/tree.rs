//! CLI command for inspecting the expense object tree

use clap::Args;

use crate::display::format_tree;
use crate::error::{CostrollError, CostrollResult};
use crate::models::ExpenseObjectId;
use crate::services::SelectionAction;

use super::{SelectionArgs, TreeInput};

/// Arguments for `costroll tree`
#[derive(Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub input: TreeInput,

    // Marks selected nodes in the output
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Show only the subtree under this id
    #[arg(long)]
    pub root: Option<ExpenseObjectId>,
}

/// Validate the tree and print it
pub fn handle_tree_command(args: TreeArgs) -> CostrollResult<()> {
    let tree = args.input.load()?;

    let selection = if args.selection.is_given() {
        Some(args.selection.resolve(&tree, SelectionAction::Clear)?)
    } else {
        None
    };

    match args.root {
        Some(root) => {
            let node = tree
                .get(root)
                .ok_or_else(|| CostrollError::expense_object_not_found(root.to_string()))?;
            println!("{}", tree.path_of(root).join(" > "));
            let descendants = tree.descendants_of(root);
            println!(
                "  level {}, {} descendant(s), {}",
                node.level,
                descendants.len(),
                if tree.is_leaf(root) { "leaf" } else { "group" }
            );
            for id in descendants {
                let marker = match &selection {
                    Some(s) if s.contains(id) => "[x] ",
                    Some(_) => "[ ] ",
                    None => "",
                };
                println!("  {}{}", marker, tree.path_of(id).join(" > "));
            }
        }
        None => {
            print!("{}", format_tree(&tree, selection.as_ref()));
            println!();
            println!(
                "{} expense object(s), {} leaf/leaves, {} level(s)",
                tree.len(),
                tree.leaves().len(),
                tree.max_level()
            );
        }
    }

    Ok(())
}
