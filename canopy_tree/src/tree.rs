// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: parallel-array structure, columns, traversal.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::column::{Column, NumericColumnId, StrColumnId};
use crate::types::{NodeId, TreeError};

/// Sentinel for "no node" in the parallel index arrays.
const NIL: u32 = u32::MAX;

/// Which kind of column a registered name refers to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ColumnSlot {
    Numeric(u32),
    Str(u32),
}

/// An append-only tree stored as four parallel index arrays.
///
/// The tree is created with an implicit root ([`NodeId::ROOT`]) and grows
/// one node at a time via [`Tree::add_node`]. Children hang off a
/// first-child/next-sibling chain; a last-child cache makes appends O(1) and
/// fixes the sibling order that layout algorithms visit.
///
/// Named attribute columns (numeric or string) registered on the tree are
/// kept sized to the node count: every new node starts with undefined cells.
///
/// ## Example
///
/// ```rust
/// use canopy_tree::{NodeId, Tree};
///
/// let mut tree = Tree::new();
/// let a = tree.add_node(NodeId::ROOT).unwrap();
/// let b = tree.add_node(NodeId::ROOT).unwrap();
/// let c = tree.add_node(a).unwrap();
///
/// assert_eq!(tree.children(NodeId::ROOT).collect::<Vec<_>>(), [a, b]);
/// assert_eq!(tree.parent(c), Some(a));
/// assert!(tree.is_leaf(b));
/// ```
#[derive(Clone, Debug)]
pub struct Tree {
    parent: Vec<u32>,
    first_child: Vec<u32>,
    next_sibling: Vec<u32>,
    /// Last-child cache; makes `add_node` O(1) without walking the chain.
    last_child: Vec<u32>,
    numeric: Vec<Column<f64>>,
    strings: Vec<Column<String>>,
    names: HashMap<String, ColumnSlot>,
    epoch: u64,
}

/// Read-only structural access, the seam layout algorithms are generic over.
///
/// Implemented by [`Tree`]; alternative tree representations (or views that
/// re-order or collapse nodes) can implement it to reuse the layout crates
/// unchanged.
pub trait TreeView {
    /// Iterator over a node's children, in stored sibling order.
    type Children<'a>: Iterator<Item = NodeId>
    where
        Self: 'a;

    /// The children of `node` in stored order. Restartable: re-querying
    /// yields the same sequence.
    fn children(&self, node: NodeId) -> Self::Children<'_>;

    /// The parent of `node`, or `None` for the root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Whether `node` has no children.
    fn is_leaf(&self, node: NodeId) -> bool {
        let mut children = self.children(node);
        children.next().is_none()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only the implicit root.
    pub fn new() -> Self {
        Self {
            parent: vec![NIL],
            first_child: vec![NIL],
            next_sibling: vec![NIL],
            last_child: vec![NIL],
            numeric: Vec::new(),
            strings: Vec::new(),
            names: HashMap::new(),
            epoch: 0,
        }
    }

    /// The implicit root.
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes, root included. Never zero.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Always `false`: a tree holds at least its root. Present for API
    /// completeness alongside [`Tree::len`].
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `id` names a node in this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.parent.len()
    }

    /// Topology version counter, bumped by [`Tree::add_node`] and
    /// [`Tree::clear`].
    ///
    /// Consumers that cache derived per-node data (box lists, filter
    /// columns) record the epoch they were built at and rebuild when it
    /// moves. Attribute edits do not bump the epoch; re-aggregate and
    /// re-capture after changing weights.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Append a new leaf under `parent`.
    ///
    /// Fails with [`TreeError::InvalidNode`] if `parent` does not exist; a
    /// detached node is never created. All registered columns get an
    /// undefined cell for the new node.
    pub fn add_node(&mut self, parent: NodeId) -> Result<NodeId, TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::InvalidNode(parent));
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = self.parent.len() as u32;
        self.parent.push(parent.0);
        self.first_child.push(NIL);
        self.next_sibling.push(NIL);
        self.last_child.push(NIL);

        let p = parent.index();
        if self.first_child[p] == NIL {
            self.first_child[p] = id;
        } else {
            let last = self.last_child[p] as usize;
            self.next_sibling[last] = id;
        }
        self.last_child[p] = id;

        for col in &mut self.numeric {
            col.push_undefined();
        }
        for col in &mut self.strings {
            col.push_undefined();
        }
        self.epoch += 1;
        Ok(NodeId::new(id))
    }

    /// Discard all nodes except a fresh, childless root.
    ///
    /// Invalidates every previously returned [`NodeId`] other than
    /// [`NodeId::ROOT`] and truncates all registered columns (the root's
    /// cells become undefined). Registered column handles stay valid.
    pub fn clear(&mut self) {
        self.parent.clear();
        self.first_child.clear();
        self.next_sibling.clear();
        self.last_child.clear();
        self.parent.push(NIL);
        self.first_child.push(NIL);
        self.next_sibling.push(NIL);
        self.last_child.push(NIL);
        for col in &mut self.numeric {
            col.resize(0);
            col.push_undefined();
        }
        for col in &mut self.strings {
            col.resize(0);
            col.push_undefined();
        }
        self.epoch += 1;
    }

    /// The children of `node` in stored sibling order.
    ///
    /// A lazy walk of the sibling chain: finite, restartable (re-querying
    /// yields the same order), and not invalidated by appends to other
    /// subtrees. Unknown ids yield an empty sequence.
    pub fn children(&self, node: NodeId) -> Children<'_> {
        let cur = if self.contains(node) {
            self.first_child[node.index()]
        } else {
            NIL
        };
        Children { tree: self, cur }
    }

    /// The parent of `node`, or `None` for the root and unknown ids.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        if !self.contains(node) {
            return None;
        }
        let p = self.parent[node.index()];
        (p != NIL).then(|| NodeId::new(p))
    }

    /// Whether `node` has no children.
    pub fn is_leaf(&self, node: NodeId) -> bool {
        !self.contains(node) || self.first_child[node.index()] == NIL
    }

    /// Depth of `node`: 0 for the root, parent depth + 1 otherwise.
    /// Returns `None` for ids not in this tree.
    pub fn depth(&self, node: NodeId) -> Option<usize> {
        if !self.contains(node) {
            return None;
        }
        let mut depth = 0;
        let mut cur = node.index();
        while self.parent[cur] != NIL {
            cur = self.parent[cur] as usize;
            depth += 1;
        }
        Some(depth)
    }

    /// Depth-first preorder iterator over `node` and all its descendants.
    ///
    /// Uses an explicit heap-allocated stack, so arbitrarily deep trees do
    /// not overflow the call stack.
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        let stack = if self.contains(node) {
            vec![node.0]
        } else {
            Vec::new()
        };
        Descendants {
            tree: self,
            start: node.0,
            stack,
        }
    }

    // --- columns ---

    /// Register (or look up) a numeric column named `name`.
    ///
    /// The column is created sized to the current node count, all cells
    /// undefined. Registering an already-registered numeric name returns
    /// the existing handle.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered as a string column.
    pub fn add_numeric_column(&mut self, name: &str) -> NumericColumnId {
        match self.names.get(name) {
            Some(ColumnSlot::Numeric(slot)) => NumericColumnId(*slot),
            Some(ColumnSlot::Str(_)) => {
                panic!("column {name:?} is already registered as a string column")
            }
            None => {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "column slots use 32-bit indices by design."
                )]
                let slot = self.numeric.len() as u32;
                self.numeric.push(Column::with_len(self.len()));
                self.names.insert(String::from(name), ColumnSlot::Numeric(slot));
                NumericColumnId(slot)
            }
        }
    }

    /// Register (or look up) a string column named `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered as a numeric column.
    pub fn add_str_column(&mut self, name: &str) -> StrColumnId {
        match self.names.get(name) {
            Some(ColumnSlot::Str(slot)) => StrColumnId(*slot),
            Some(ColumnSlot::Numeric(_)) => {
                panic!("column {name:?} is already registered as a numeric column")
            }
            None => {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "column slots use 32-bit indices by design."
                )]
                let slot = self.strings.len() as u32;
                self.strings.push(Column::with_len(self.len()));
                self.names.insert(String::from(name), ColumnSlot::Str(slot));
                StrColumnId(slot)
            }
        }
    }

    /// Look up a registered numeric column by name.
    pub fn numeric_id(&self, name: &str) -> Option<NumericColumnId> {
        match self.names.get(name) {
            Some(ColumnSlot::Numeric(slot)) => Some(NumericColumnId(*slot)),
            _ => None,
        }
    }

    /// Look up a registered string column by name.
    pub fn str_id(&self, name: &str) -> Option<StrColumnId> {
        match self.names.get(name) {
            Some(ColumnSlot::Str(slot)) => Some(StrColumnId(*slot)),
            _ => None,
        }
    }

    /// A registered numeric column, or `None` for a foreign handle.
    pub fn numeric(&self, id: NumericColumnId) -> Option<&Column<f64>> {
        self.numeric.get(id.0 as usize)
    }

    /// Mutable access to a registered numeric column.
    pub fn numeric_mut(&mut self, id: NumericColumnId) -> Option<&mut Column<f64>> {
        self.numeric.get_mut(id.0 as usize)
    }

    /// A registered string column, or `None` for a foreign handle.
    pub fn strs(&self, id: StrColumnId) -> Option<&Column<String>> {
        self.strings.get(id.0 as usize)
    }

    /// Mutable access to a registered string column.
    pub fn strs_mut(&mut self, id: StrColumnId) -> Option<&mut Column<String>> {
        self.strings.get_mut(id.0 as usize)
    }
}

impl TreeView for Tree {
    type Children<'a> = Children<'a>;

    fn children(&self, node: NodeId) -> Children<'_> {
        Self::children(self, node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Self::parent(self, node)
    }

    fn is_leaf(&self, node: NodeId) -> bool {
        Self::is_leaf(self, node)
    }
}

/// Iterator over a node's children in stored sibling order.
///
/// Lazy walk of the sibling chain: finite, restartable, and not invalidated
/// by appends to *other* subtrees (an append to the node being iterated
/// extends the chain and will be yielded).
#[derive(Clone, Debug)]
pub struct Children<'a> {
    tree: &'a Tree,
    cur: u32,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.cur == NIL {
            return None;
        }
        let id = NodeId::new(self.cur);
        self.cur = self.tree.next_sibling[self.cur as usize];
        Some(id)
    }
}

/// Depth-first preorder iterator over a subtree. See [`Tree::descendants`].
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    tree: &'a Tree,
    start: u32,
    stack: Vec<u32>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.stack.pop()?;
        // Visit order: node, its subtree, then its next sibling. The sibling
        // is pushed first so the first child is processed before it. The
        // start node's siblings are outside the subtree and are not pushed.
        if cur != self.start {
            let sibling = self.tree.next_sibling[cur as usize];
            if sibling != NIL {
                self.stack.push(sibling);
            }
        }
        let child = self.tree.first_child[cur as usize];
        if child != NIL {
            self.stack.push(child);
        }
        Some(NodeId::new(cur))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> [a -> [c, d], b]
    fn sample() -> (Tree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let a = tree.add_node(NodeId::ROOT).unwrap();
        let b = tree.add_node(NodeId::ROOT).unwrap();
        let c = tree.add_node(a).unwrap();
        let d = tree.add_node(a).unwrap();
        (tree, a, b, c, d)
    }

    #[test]
    fn add_node_rejects_unknown_parent() {
        let mut tree = Tree::new();
        let bogus = NodeId::new(42);
        assert_eq!(tree.add_node(bogus), Err(TreeError::InvalidNode(bogus)));
        assert_eq!(tree.len(), 1, "no detached node was created");
    }

    #[test]
    fn sibling_order_is_insertion_order() {
        let (tree, a, b, c, d) = sample();
        let kids: Vec<_> = tree.children(NodeId::ROOT).collect();
        assert_eq!(kids, [a, b]);
        let kids: Vec<_> = tree.children(a).collect();
        assert_eq!(kids, [c, d]);
    }

    #[test]
    fn children_is_restartable_and_stable_across_foreign_appends() {
        let (mut tree, a, b, _c, _d) = sample();
        let before: Vec<_> = tree.children(NodeId::ROOT).collect();
        // Appending under `b` must not disturb root's or a's chains.
        let _ = tree.add_node(b).unwrap();
        let after: Vec<_> = tree.children(NodeId::ROOT).collect();
        assert_eq!(before, after);
        assert_eq!(tree.children(a).count(), 2);
    }

    #[test]
    fn parent_and_leaf_queries() {
        let (tree, a, b, c, _d) = sample();
        assert_eq!(tree.parent(NodeId::ROOT), None);
        assert_eq!(tree.parent(c), Some(a));
        assert!(tree.is_leaf(b));
        assert!(!tree.is_leaf(a));
        assert_eq!(tree.depth(NodeId::ROOT), Some(0));
        assert_eq!(tree.depth(c), Some(2));
        assert_eq!(tree.depth(NodeId::new(99)), None);
    }

    #[test]
    fn descendants_is_preorder() {
        let (tree, a, b, c, d) = sample();
        let order: Vec<_> = tree.descendants(NodeId::ROOT).collect();
        assert_eq!(order, [NodeId::ROOT, a, c, d, b]);
        // A subtree traversal stops at the subtree boundary.
        let order: Vec<_> = tree.descendants(a).collect();
        assert_eq!(order, [a, c, d]);
    }

    #[test]
    fn descendants_survives_deep_trees() {
        let mut tree = Tree::new();
        let mut cur = NodeId::ROOT;
        for _ in 0..100_000 {
            cur = tree.add_node(cur).unwrap();
        }
        assert_eq!(tree.descendants(NodeId::ROOT).count(), 100_001);
    }

    #[test]
    fn clear_resets_to_a_fresh_root() {
        let (mut tree, _a, _b, _c, _d) = sample();
        let size = tree.add_numeric_column("size");
        tree.numeric_mut(size).unwrap().set(NodeId::ROOT, 9.0);
        let before = tree.epoch();
        tree.clear();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_leaf(NodeId::ROOT));
        assert!(tree.epoch() > before);
        // Columns survive but are truncated to an undefined root cell.
        let col = tree.numeric(size).unwrap();
        assert_eq!(col.len(), 1);
        assert!(!col.is_defined(NodeId::ROOT));
    }

    #[test]
    fn columns_track_node_count() {
        let mut tree = Tree::new();
        let size = tree.add_numeric_column("size");
        let name = tree.add_str_column("name");
        let a = tree.add_node(NodeId::ROOT).unwrap();
        assert_eq!(tree.numeric(size).unwrap().len(), 2);
        assert_eq!(tree.strs(name).unwrap().len(), 2);
        assert!(!tree.numeric(size).unwrap().is_defined(a));
        // Re-registering the same name returns the same column.
        assert_eq!(tree.add_numeric_column("size"), size);
        assert_eq!(tree.numeric_id("size"), Some(size));
        assert_eq!(tree.str_id("size"), None);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn column_kind_collision_panics() {
        let mut tree = Tree::new();
        let _ = tree.add_numeric_column("size");
        let _ = tree.add_str_column("size");
    }

    #[test]
    fn epoch_moves_on_topology_changes() {
        let mut tree = Tree::new();
        let e0 = tree.epoch();
        let _ = tree.add_node(NodeId::ROOT).unwrap();
        assert!(tree.epoch() > e0);
    }
}
