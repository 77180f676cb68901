//! Selection propagation
//!
//! Maintains the parent/child consistency rule of a selection: a node that
//! has children is selected exactly when all of its direct children are.
//! Every transition is a pure function from one [`SelectionState`] to the
//! next, so the propagator can be used as a reducer.

use tracing::{debug, warn};

use crate::models::{ExpenseObjectId, SelectionState};

use super::tree::ExpenseObjectTree;

/// Transitions accepted by [`SelectionPropagator::reduce`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// Flip a node together with its whole subtree
    Toggle(ExpenseObjectId),
    /// Select every node of the tree
    SelectAll,
    /// Deselect everything
    Clear,
}

/// Applies selection transitions against a tree
pub struct SelectionPropagator<'a> {
    tree: &'a ExpenseObjectTree,
}

impl<'a> SelectionPropagator<'a> {
    /// Create a propagator for `tree`
    pub fn new(tree: &'a ExpenseObjectTree) -> Self {
        Self { tree }
    }

    /// Apply `action` to `selected`, returning the next state
    pub fn reduce(&self, selected: &SelectionState, action: SelectionAction) -> SelectionState {
        match action {
            SelectionAction::Toggle(id) => self.toggle_selection(selected, id),
            SelectionAction::SelectAll => self.tree.iter().map(|node| node.id).collect(),
            SelectionAction::Clear => SelectionState::new(),
        }
    }

    /// Flip `id` and all of its descendants, then restore consistency.
    ///
    /// Unknown ids leave the selection unchanged.
    pub fn toggle_selection(&self, selected: &SelectionState, id: ExpenseObjectId) -> SelectionState {
        if !self.tree.contains(id) {
            warn!(%id, "toggle ignored: expense object not in tree");
            return selected.clone();
        }

        let mut next = selected.clone();
        let subtree = std::iter::once(id).chain(self.tree.descendants_of(id));

        if selected.contains(id) {
            for member in subtree {
                next.remove(member);
            }
        } else {
            for member in subtree {
                next.insert(member);
            }
        }

        self.propagate(&next)
    }

    /// Alternate auto-select and auto-deselect passes until neither changes
    /// the selection.
    pub fn propagate(&self, selected: &SelectionState) -> SelectionState {
        let mut current = selected.clone();
        let mut rounds = 0usize;

        loop {
            rounds += 1;
            let after_select = self.auto_select_parents(&current);
            let after_deselect = self.auto_deselect_parents(&after_select);
            if after_deselect == current {
                break;
            }
            current = after_deselect;
        }

        debug!(rounds, selected = current.len(), "selection propagated");
        current
    }

    /// Add every parent whose direct children are all selected, repeating
    /// full passes until a pass adds nothing.
    pub fn auto_select_parents(&self, selected: &SelectionState) -> SelectionState {
        let mut next = selected.clone();

        loop {
            let mut changed = false;
            for parent in self.tree.parents() {
                if !next.contains(parent) && self.all_children_selected(&next, parent) {
                    next.insert(parent);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        next
    }

    /// Remove every selected parent that has an unselected direct child,
    /// repeating full passes until a pass removes nothing.
    pub fn auto_deselect_parents(&self, selected: &SelectionState) -> SelectionState {
        let mut next = selected.clone();

        loop {
            let mut changed = false;
            for parent in self.tree.parents() {
                if next.contains(parent) && !self.all_children_selected(&next, parent) {
                    next.remove(parent);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        next
    }

    /// Whether every parent is selected iff all of its children are
    pub fn is_consistent(&self, selected: &SelectionState) -> bool {
        self.tree
            .parents()
            .all(|parent| selected.contains(parent) == self.all_children_selected(selected, parent))
    }

    /// Selected leaves in tree input order; these are the allocation columns
    pub fn selected_leaves(&self, selected: &SelectionState) -> Vec<ExpenseObjectId> {
        self.tree
            .leaves()
            .into_iter()
            .filter(|id| selected.contains(*id))
            .collect()
    }

    fn all_children_selected(&self, selected: &SelectionState, parent: ExpenseObjectId) -> bool {
        self.tree
            .children_of(parent)
            .iter()
            .all(|child| selected.contains(*child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseObject;

    fn scenario_tree() -> ExpenseObjectTree {
        ExpenseObjectTree::build(vec![
            ExpenseObject::new(1, "Supplier-root", 1),
            ExpenseObject::new(2, "Aluminum", 2).with_parent(1),
            ExpenseObject::new(9, "A", 3).with_parent(2),
            ExpenseObject::new(10, "B", 3).with_parent(2),
        ])
        .unwrap()
    }

    fn wide_tree() -> ExpenseObjectTree {
        ExpenseObjectTree::build(vec![
            ExpenseObject::new(1, "Suppliers", 1),
            ExpenseObject::new(2, "Aluminum", 2).with_parent(1),
            ExpenseObject::new(3, "Glass", 2).with_parent(1),
            ExpenseObject::new(9, "A", 3).with_parent(2),
            ExpenseObject::new(10, "B", 3).with_parent(2),
            ExpenseObject::new(11, "C", 3).with_parent(3),
            ExpenseObject::new(12, "D", 3).with_parent(3),
            ExpenseObject::new(13, "E", 3).with_parent(3),
            ExpenseObject::new(20, "Labor", 1),
        ])
        .unwrap()
    }

    fn id(raw: u64) -> ExpenseObjectId {
        ExpenseObjectId::new(raw)
    }

    #[test]
    fn test_scenario_a_walkthrough() {
        let tree = scenario_tree();
        let propagator = SelectionPropagator::new(&tree);

        let s = propagator.toggle_selection(&SelectionState::new(), id(9));
        assert_eq!(s, SelectionState::from([9]));

        let s = propagator.toggle_selection(&s, id(10));
        assert_eq!(s, SelectionState::from([9, 10, 2, 1]));

        let s = propagator.toggle_selection(&s, id(9));
        assert_eq!(s, SelectionState::from([10]));
    }

    #[test]
    fn test_toggle_parent_selects_subtree() {
        let tree = wide_tree();
        let propagator = SelectionPropagator::new(&tree);

        let s = propagator.toggle_selection(&SelectionState::new(), id(3));
        assert_eq!(s, SelectionState::from([3, 11, 12, 13]));

        let s = propagator.toggle_selection(&s, id(2));
        assert_eq!(s, SelectionState::from([1, 2, 3, 9, 10, 11, 12, 13]));

        let s = propagator.toggle_selection(&s, id(1));
        assert!(s.is_empty());
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let tree = scenario_tree();
        let propagator = SelectionPropagator::new(&tree);
        let s = SelectionState::from([9]);
        assert_eq!(propagator.toggle_selection(&s, id(404)), s);
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let tree = wide_tree();
        let propagator = SelectionPropagator::new(&tree);
        let leaves = tree.leaves();

        // Every consistent state reachable by up to two leaf toggles from
        // empty must round-trip under a double toggle of any leaf.
        let mut states = vec![SelectionState::new()];
        for first in &leaves {
            let s1 = propagator.toggle_selection(&SelectionState::new(), *first);
            for second in &leaves {
                states.push(propagator.toggle_selection(&s1, *second));
            }
        }

        for s in &states {
            assert!(propagator.is_consistent(s));
            for leaf in &leaves {
                let once = propagator.toggle_selection(s, *leaf);
                let twice = propagator.toggle_selection(&once, *leaf);
                assert_eq!(&twice, s, "double toggle of {} changed {:?}", leaf, s);
            }
        }
    }

    #[test]
    fn test_toggle_twice_on_uniform_subtree() {
        let tree = wide_tree();
        let propagator = SelectionPropagator::new(&tree);

        let s = SelectionState::from([3, 11, 12, 13]);
        for parent in [2u64, 3] {
            let once = propagator.toggle_selection(&s, id(parent));
            assert_eq!(propagator.toggle_selection(&once, id(parent)), s);
        }
    }

    #[test]
    fn test_toggle_partially_selected_parent_selects_whole_subtree() {
        let tree = scenario_tree();
        let propagator = SelectionPropagator::new(&tree);

        let s = propagator.toggle_selection(&SelectionState::from([9]), id(2));
        assert_eq!(s, SelectionState::from([1, 2, 9, 10]));
    }

    #[test]
    fn test_invariant_closure_after_every_toggle() {
        let tree = wide_tree();
        let propagator = SelectionPropagator::new(&tree);
        let sequence = [9, 11, 10, 1, 12, 20, 3, 13, 9, 2, 20];

        let mut s = SelectionState::new();
        for raw in sequence {
            s = propagator.toggle_selection(&s, id(raw));
            assert!(propagator.is_consistent(&s), "inconsistent after toggling {}", raw);
        }
    }

    #[test]
    fn test_leaf_toggle_order_independence() {
        let tree = wide_tree();
        let propagator = SelectionPropagator::new(&tree);
        let leaves = [9u64, 10, 11, 12];

        let expected = leaves
            .iter()
            .fold(SelectionState::new(), |s, leaf| propagator.toggle_selection(&s, id(*leaf)));
        assert_eq!(expected, SelectionState::from([2, 9, 10, 11, 12]));

        for permutation in permutations(&leaves) {
            let s = permutation
                .iter()
                .fold(SelectionState::new(), |s, leaf| propagator.toggle_selection(&s, id(*leaf)));
            assert_eq!(propagator.propagate(&s), expected, "order {:?}", permutation);
        }
    }

    #[test]
    fn test_propagate_repairs_restored_state() {
        let tree = wide_tree();
        let propagator = SelectionPropagator::new(&tree);

        // Parent stored without its children, children of 3 stored without 3
        let restored = SelectionState::from([2, 11, 12, 13]);
        assert!(!propagator.is_consistent(&restored));

        let repaired = propagator.propagate(&restored);
        assert!(propagator.is_consistent(&repaired));
        assert_eq!(repaired, SelectionState::from([3, 11, 12, 13]));
    }

    #[test]
    fn test_auto_passes_individually() {
        let tree = scenario_tree();
        let propagator = SelectionPropagator::new(&tree);

        let s = propagator.auto_select_parents(&SelectionState::from([9, 10]));
        assert_eq!(s, SelectionState::from([1, 2, 9, 10]));

        let s = propagator.auto_deselect_parents(&SelectionState::from([1, 2, 10]));
        assert_eq!(s, SelectionState::from([10]));
    }

    #[test]
    fn test_reduce_and_selected_leaves() {
        let tree = wide_tree();
        let propagator = SelectionPropagator::new(&tree);

        let all = propagator.reduce(&SelectionState::new(), SelectionAction::SelectAll);
        assert_eq!(all.len(), tree.len());
        assert!(propagator.is_consistent(&all));
        assert_eq!(
            propagator.selected_leaves(&all),
            vec![id(9), id(10), id(11), id(12), id(13), id(20)]
        );

        let s = propagator.reduce(&all, SelectionAction::Toggle(id(3)));
        assert_eq!(propagator.selected_leaves(&s), vec![id(9), id(10), id(20)]);

        assert!(propagator.reduce(&s, SelectionAction::Clear).is_empty());
    }

    fn permutations(items: &[u64]) -> Vec<Vec<u64>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for (i, head) in items.iter().enumerate() {
            let mut rest = items.to_vec();
            rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, *head);
                out.push(tail);
            }
        }
        out
    }
}
