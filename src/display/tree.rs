//! Expense object tree display
//!
//! Formats the hierarchy as an indented tree, optionally marking which
//! nodes are selected.

use crate::models::{ExpenseObjectId, SelectionState};
use crate::services::ExpenseObjectTree;

/// Format the tree; with a selection, each node is prefixed by `[x]` or `[ ]`
pub fn format_tree(tree: &ExpenseObjectTree, selection: Option<&SelectionState>) -> String {
    if tree.is_empty() {
        return "No expense objects found.".to_string();
    }

    let mut output = String::new();

    // (id, prefix for its children, connector for itself)
    let mut stack: Vec<(ExpenseObjectId, String, &str)> = tree
        .roots()
        .iter()
        .rev()
        .map(|id| (*id, String::new(), ""))
        .collect();

    while let Some((id, indent, connector)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };

        let mark = match selection {
            Some(s) if s.contains(id) => "[x] ",
            Some(_) => "[ ] ",
            None => "",
        };
        let inactive = if node.is_active { "" } else { " (inactive)" };
        output.push_str(&format!(
            "{}{}{}{} #{}{}\n",
            indent, connector, mark, node.name, id, inactive
        ));

        let child_indent = match connector {
            "├── " => format!("{}│   ", indent),
            "└── " => format!("{}    ", indent),
            _ => indent.clone(),
        };
        let children = tree.children_of(id);
        for (i, child) in children.iter().enumerate().rev() {
            let is_last = i == children.len() - 1;
            let connector = if is_last { "└── " } else { "├── " };
            stack.push((*child, child_indent.clone(), connector));
        }
    }

    output
}

/// One line per selected id, with its breadcrumb path
pub fn format_selection(tree: &ExpenseObjectTree, selection: &SelectionState) -> String {
    if selection.is_empty() {
        return "Nothing selected.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("Selected ({}):\n", selection.len()));

    for id in tree.pre_order() {
        if selection.contains(id) {
            let leaf = if tree.is_leaf(id) { "" } else { "  (group)" };
            output.push_str(&format!("  #{:<6} {}{}\n", id.get(), tree.path_of(id).join(" > "), leaf));
        }
    }

    output
}
