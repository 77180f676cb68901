//! Expense object tree
//!
//! Builds an in-memory index over the flat list of expense-object records the
//! caller fetched and answers structural queries against it. All structural
//! validation happens once, in [`ExpenseObjectTree::build`]; afterwards every
//! query is infallible and unknown ids simply yield empty results.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::TreeError;
use crate::models::{ExpenseObject, ExpenseObjectId};

/// Read-only index over an expense-object forest
#[derive(Debug, Clone, Default)]
pub struct ExpenseObjectTree {
    /// Records in input order
    nodes: Vec<ExpenseObject>,
    /// id -> position in `nodes`
    index: HashMap<ExpenseObjectId, usize>,
    /// parent -> direct children, in input order
    children: HashMap<ExpenseObjectId, Vec<ExpenseObjectId>>,
    /// Parentless nodes, in input order
    roots: Vec<ExpenseObjectId>,
}

impl ExpenseObjectTree {
    /// Build the tree, rejecting duplicate ids, dangling or cyclic parent
    /// links and inconsistent levels.
    pub fn build<I>(records: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = ExpenseObject>,
    {
        let nodes: Vec<ExpenseObject> = records.into_iter().collect();

        let mut index = HashMap::with_capacity(nodes.len());
        for (pos, node) in nodes.iter().enumerate() {
            if node.level == 0 {
                return Err(TreeError::InvalidLevel {
                    id: node.id,
                    level: node.level,
                });
            }
            if index.insert(node.id, pos).is_some() {
                return Err(TreeError::DuplicateId(node.id));
            }
        }

        for node in &nodes {
            if let Some(parent_id) = node.parent_id {
                if !index.contains_key(&parent_id) {
                    return Err(TreeError::MissingParent {
                        id: node.id,
                        parent_id,
                    });
                }
                if node.level == 1 {
                    return Err(TreeError::RootWithParent(node.id));
                }
            }
        }

        Self::check_acyclic(&nodes, &index)?;

        for node in &nodes {
            if let Some(parent_id) = node.parent_id {
                let parent_level = nodes[index[&parent_id]].level;
                if parent_level.checked_add(1) != Some(node.level) {
                    return Err(TreeError::LevelMismatch {
                        id: node.id,
                        level: node.level,
                        parent_id,
                        parent_level,
                    });
                }
            }
        }

        let mut children: HashMap<ExpenseObjectId, Vec<ExpenseObjectId>> = HashMap::new();
        let mut roots = Vec::new();
        for node in &nodes {
            match node.parent_id {
                Some(parent_id) => children.entry(parent_id).or_default().push(node.id),
                None => roots.push(node.id),
            }
        }

        debug!(
            nodes = nodes.len(),
            roots = roots.len(),
            parents = children.len(),
            "built expense object tree"
        );

        Ok(Self {
            nodes,
            index,
            children,
            roots,
        })
    }

    /// Walk every parent chain once; a chain that revisits a node is a cycle.
    /// Nodes already proven to reach a root are not walked again.
    fn check_acyclic(
        nodes: &[ExpenseObject],
        index: &HashMap<ExpenseObjectId, usize>,
    ) -> Result<(), TreeError> {
        let mut reaches_root: HashSet<ExpenseObjectId> = HashSet::with_capacity(nodes.len());

        for node in nodes {
            let mut chain = Vec::new();
            let mut on_chain = HashSet::new();
            let mut current = Some(node.id);

            while let Some(id) = current {
                if reaches_root.contains(&id) {
                    break;
                }
                if !on_chain.insert(id) {
                    return Err(TreeError::Cycle(id));
                }
                chain.push(id);
                current = nodes[index[&id]].parent_id;
            }

            reaches_root.extend(chain);
        }

        Ok(())
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate all nodes in input order
    pub fn iter(&self) -> impl Iterator<Item = &ExpenseObject> {
        self.nodes.iter()
    }

    /// Look up a node
    pub fn get(&self, id: ExpenseObjectId) -> Option<&ExpenseObject> {
        self.index.get(&id).map(|&pos| &self.nodes[pos])
    }

    /// Whether `id` is part of the tree
    pub fn contains(&self, id: ExpenseObjectId) -> bool {
        self.index.contains_key(&id)
    }

    /// Direct children of `id`; empty for leaves and unknown ids
    pub fn children_of(&self, id: ExpenseObjectId) -> &[ExpenseObjectId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `id` has at least one child
    pub fn has_children(&self, id: ExpenseObjectId) -> bool {
        !self.children_of(id).is_empty()
    }

    /// Whether `id` is a known node without children
    pub fn is_leaf(&self, id: ExpenseObjectId) -> bool {
        self.contains(id) && !self.has_children(id)
    }

    /// Parent of `id`, if any
    pub fn parent_of(&self, id: ExpenseObjectId) -> Option<ExpenseObjectId> {
        self.get(id).and_then(|node| node.parent_id)
    }

    /// Parentless nodes in input order
    pub fn roots(&self) -> &[ExpenseObjectId] {
        &self.roots
    }

    /// Ids of every node that has children, in input order
    pub fn parents(&self) -> impl Iterator<Item = ExpenseObjectId> + '_ {
        self.nodes
            .iter()
            .map(|node| node.id)
            .filter(|id| self.has_children(*id))
    }

    /// Ids of every childless node, in input order
    pub fn leaves(&self) -> Vec<ExpenseObjectId> {
        self.nodes
            .iter()
            .map(|node| node.id)
            .filter(|id| !self.has_children(*id))
            .collect()
    }

    /// All transitive children of `id` in pre-order, excluding `id` itself.
    ///
    /// Uses an explicit stack so arbitrarily deep trees cannot overflow.
    pub fn descendants_of(&self, id: ExpenseObjectId) -> Vec<ExpenseObjectId> {
        let mut out = Vec::new();
        let mut stack: Vec<ExpenseObjectId> = self.children_of(id).iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children_of(current).iter().rev().copied());
        }

        out
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors_of(&self, id: ExpenseObjectId) -> Vec<ExpenseObjectId> {
        let mut out = Vec::new();
        let mut current = self.parent_of(id);

        while let Some(parent) = current {
            out.push(parent);
            current = self.parent_of(parent);
        }

        out
    }

    /// Depth of `id` counted from its root (roots have depth 1)
    pub fn depth_of(&self, id: ExpenseObjectId) -> Option<usize> {
        self.contains(id).then(|| self.ancestors_of(id).len() + 1)
    }

    /// Nodes whose recorded level equals `level`, in input order
    pub fn nodes_at_level(&self, level: u8) -> Vec<ExpenseObjectId> {
        self.nodes
            .iter()
            .filter(|node| node.level == level)
            .map(|node| node.id)
            .collect()
    }

    /// Deepest recorded level (0 for an empty tree)
    pub fn max_level(&self) -> u8 {
        self.nodes.iter().map(|node| node.level).max().unwrap_or(0)
    }

    /// Names from the root down to `id`; empty for unknown ids
    pub fn path_of(&self, id: ExpenseObjectId) -> Vec<&str> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };

        let mut path: Vec<&str> = self
            .ancestors_of(id)
            .into_iter()
            .filter_map(|ancestor| self.get(ancestor))
            .map(|ancestor| ancestor.name.as_str())
            .collect();
        path.reverse();
        path.push(node.name.as_str());
        path
    }

    /// Every node in depth-first pre-order, roots in input order
    pub fn pre_order(&self) -> Vec<ExpenseObjectId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            out.push(root);
            out.extend(self.descendants_of(root));
        }
        out
    }

    /// Ids of active nodes, in input order
    pub fn active_ids(&self) -> Vec<ExpenseObjectId> {
        self.nodes
            .iter()
            .filter(|node| node.is_active)
            .map(|node| node.id)
            .collect()
    }
}
