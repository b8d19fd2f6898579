// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_query --heading-base-level=0

//! Canopy Query: dynamic-query filtering over tree attribute columns.
//!
//! A [`QuerySet`] holds independent predicates over a tree's attribute
//! columns: numeric ranges and string accept-sets, the kind a UI backs
//! with range sliders and checkbox lists. [`QuerySet::refresh`] evaluates their
//! logical AND over every leaf in one pass and materializes the result as a
//! [`FilterColumn`]: a boolean per node that layout consumes through the
//! [`FilterPredicate`] seam. Layout's inner loop then reads a flat vector;
//! no query is ever evaluated per layout call.
//!
//! Internal nodes are not matched against the queries directly: an internal
//! node is filtered exactly when *all* of its children are filtered, so a
//! subtree disappears as a whole only when nothing inside it survives.
//! This composes with the layout crate's visible-expand policy (filtered
//! children leave the weight denominator).
//!
//! ## Invalidation
//!
//! There are no observer callbacks. Every mutation of the set bumps
//! [`QuerySet::generation`]; a [`FilterColumn`] records the generation and
//! tree epoch it was built from, and [`FilterColumn::is_stale`] says when
//! to rebuild (and, typically, to re-run layout and start an animated
//! transition from the previously captured box list).
//!
//! ## Example
//!
//! ```rust
//! use canopy_query::QuerySet;
//! use canopy_tree::{FilterPredicate, NodeId, Tree};
//!
//! let mut tree = Tree::new();
//! let size = tree.add_numeric_column("size");
//! let a = tree.add_node(NodeId::ROOT).unwrap();
//! let b = tree.add_node(NodeId::ROOT).unwrap();
//! tree.numeric_mut(size).unwrap().set(a, 10.0);
//! tree.numeric_mut(size).unwrap().set(b, 500.0);
//!
//! let mut queries = QuerySet::new();
//! let big_enough = queries.add_range(size, 100.0, f64::INFINITY);
//! let filter = queries.refresh(&tree).unwrap();
//! assert!(filter.is_filtered(a));
//! assert!(!filter.is_filtered(b));
//!
//! // Widen the slider; the column is now stale and gets rebuilt.
//! queries.set_range(big_enough, 0.0, f64::INFINITY).unwrap();
//! assert!(filter.is_stale(&tree, &queries));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashSet;

use canopy_tree::{FilterPredicate, NodeId, NumericColumnId, StrColumnId, Tree};

/// Identifier for a query registered in a [`QuerySet`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct QueryId(u32);

/// Errors reported by [`QuerySet`] operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QueryError {
    /// The id does not name a query in this set.
    UnknownQuery(QueryId),
    /// The operation does not apply to the query's kind (for example
    /// `set_range` on a string accept-set).
    KindMismatch(QueryId),
    /// The query's column handle does not belong to the given tree.
    UnknownColumn(QueryId),
}

impl core::fmt::Display for QueryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownQuery(id) => write!(f, "query {id:?} does not exist in this set"),
            Self::KindMismatch(id) => write!(f, "operation does not match the kind of {id:?}"),
            Self::UnknownColumn(id) => {
                write!(f, "column of {id:?} is not registered on the given tree")
            }
        }
    }
}

impl core::error::Error for QueryError {}

#[derive(Clone, Debug)]
enum QueryKind {
    Range {
        column: NumericColumnId,
        min: f64,
        max: f64,
    },
    Set {
        column: StrColumnId,
        accepted: HashSet<String>,
    },
}

/// A set of independent dynamic queries, combined by logical AND.
///
/// A leaf passes the set when it satisfies every active query; an undefined
/// attribute cell never satisfies a query over that column. An empty set
/// passes everything.
#[derive(Clone, Debug, Default)]
pub struct QuerySet {
    queries: Vec<(QueryId, QueryKind)>,
    next_id: u32,
    generation: u64,
}

impl QuerySet {
    /// An empty set: no constraints, every node passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Version counter, bumped by every mutation of the set (not by
    /// [`QuerySet::refresh`], which is a read).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of active queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the set has no active queries.
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    fn register(&mut self, kind: QueryKind) -> QueryId {
        let id = QueryId(self.next_id);
        self.next_id += 1;
        self.queries.push((id, kind));
        self.generation += 1;
        id
    }

    /// Add an inclusive range query over a numeric column.
    pub fn add_range(&mut self, column: NumericColumnId, min: f64, max: f64) -> QueryId {
        self.register(QueryKind::Range { column, min, max })
    }

    /// Add a set-membership query over a string column.
    ///
    /// The accept-set starts empty, which passes *nothing* for that column;
    /// populate it with [`QuerySet::insert_accepted`] or drop the
    /// constraint with [`QuerySet::remove`].
    pub fn add_set(&mut self, column: StrColumnId) -> QueryId {
        self.register(QueryKind::Set {
            column,
            accepted: HashSet::new(),
        })
    }

    /// Remove a query entirely. Returns whether it existed.
    pub fn remove(&mut self, id: QueryId) -> bool {
        let before = self.queries.len();
        self.queries.retain(|(qid, _)| *qid != id);
        let removed = self.queries.len() != before;
        if removed {
            self.generation += 1;
        }
        removed
    }

    fn kind_mut(&mut self, id: QueryId) -> Result<&mut QueryKind, QueryError> {
        self.queries
            .iter_mut()
            .find(|(qid, _)| *qid == id)
            .map(|(_, kind)| kind)
            .ok_or(QueryError::UnknownQuery(id))
    }

    /// Move a range query's bounds (a slider drag).
    pub fn set_range(&mut self, id: QueryId, new_min: f64, new_max: f64) -> Result<(), QueryError> {
        match self.kind_mut(id)? {
            QueryKind::Range { min, max, .. } => {
                *min = new_min;
                *max = new_max;
                self.generation += 1;
                Ok(())
            }
            QueryKind::Set { .. } => Err(QueryError::KindMismatch(id)),
        }
    }

    /// Add `value` to a set query's accept-set.
    pub fn insert_accepted(&mut self, id: QueryId, value: &str) -> Result<(), QueryError> {
        match self.kind_mut(id)? {
            QueryKind::Set { accepted, .. } => {
                accepted.insert(String::from(value));
                self.generation += 1;
                Ok(())
            }
            QueryKind::Range { .. } => Err(QueryError::KindMismatch(id)),
        }
    }

    /// Remove `value` from a set query's accept-set.
    pub fn remove_accepted(&mut self, id: QueryId, value: &str) -> Result<(), QueryError> {
        match self.kind_mut(id)? {
            QueryKind::Set { accepted, .. } => {
                accepted.remove(value);
                self.generation += 1;
                Ok(())
            }
            QueryKind::Range { .. } => Err(QueryError::KindMismatch(id)),
        }
    }

    fn leaf_passes(&self, tree: &Tree, node: NodeId) -> bool {
        self.queries.iter().all(|(_, kind)| match kind {
            QueryKind::Range { column, min, max } => tree
                .numeric(*column)
                .and_then(|col| col.get(node))
                .is_some_and(|v| *min <= *v && *v <= *max),
            QueryKind::Set { column, accepted } => tree
                .strs(*column)
                .and_then(|col| col.get(node))
                .is_some_and(|v| accepted.contains(v.as_str())),
        })
    }

    /// Evaluate the conjunction over every node of `tree` into a fresh
    /// [`FilterColumn`].
    ///
    /// Leaves are matched against the queries; an internal node is filtered
    /// exactly when all of its children are. The pass is one explicit-stack
    /// post-order traversal, allocation-bounded by the node count.
    pub fn refresh(&self, tree: &Tree) -> Result<FilterColumn, QueryError> {
        for (id, kind) in &self.queries {
            let known = match kind {
                QueryKind::Range { column, .. } => tree.numeric(*column).is_some(),
                QueryKind::Set { column, .. } => tree.strs(*column).is_some(),
            };
            if !known {
                return Err(QueryError::UnknownColumn(*id));
            }
        }

        let mut filtered = vec![false; tree.len()];
        let mut stack = vec![(tree.root(), false)];
        while let Some((node, children_done)) = stack.pop() {
            if children_done {
                let all = tree.children(node).all(|child| filtered[child.index()]);
                filtered[node.index()] = all;
            } else if tree.is_leaf(node) {
                filtered[node.index()] = !self.leaf_passes(tree, node);
            } else {
                stack.push((node, true));
                for child in tree.children(node) {
                    stack.push((child, false));
                }
            }
        }

        Ok(FilterColumn {
            filtered,
            epoch: tree.epoch(),
            generation: self.generation,
        })
    }
}

/// The materialized result of a [`QuerySet::refresh`]: one boolean per
/// node, `true` meaning "filtered out".
///
/// Implements [`FilterPredicate`], so it plugs straight into the layout
/// algorithms. Stamped with the tree epoch and query generation it was
/// built from; check [`FilterColumn::is_stale`] before reusing it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FilterColumn {
    filtered: Vec<bool>,
    epoch: u64,
    generation: u64,
}

impl FilterColumn {
    /// The raw per-node flags, indexed by node id.
    pub fn as_slice(&self) -> &[bool] {
        &self.filtered
    }

    /// How many nodes are filtered out.
    pub fn count_filtered(&self) -> usize {
        self.filtered.iter().filter(|&&f| f).count()
    }

    /// The tree epoch this column was built at.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The query generation this column was built at.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the column no longer reflects `tree` and `queries`.
    pub fn is_stale(&self, tree: &Tree, queries: &QuerySet) -> bool {
        self.epoch != tree.epoch() || self.generation != queries.generation()
    }
}

impl FilterPredicate for FilterColumn {
    fn is_filtered(&self, node: NodeId) -> bool {
        self.filtered.get(node.index()).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> [dir -> [small(10, "rs"), big(900, "rs")], readme(50, "md")]
    struct Fixture {
        tree: Tree,
        size: NumericColumnId,
        ext: StrColumnId,
        dir: NodeId,
        small: NodeId,
        big: NodeId,
        readme: NodeId,
    }

    fn fixture() -> Fixture {
        let mut tree = Tree::new();
        let size = tree.add_numeric_column("size");
        let ext = tree.add_str_column("ext");
        let dir = tree.add_node(NodeId::ROOT).unwrap();
        let small = tree.add_node(dir).unwrap();
        let big = tree.add_node(dir).unwrap();
        let readme = tree.add_node(NodeId::ROOT).unwrap();
        {
            let col = tree.numeric_mut(size).unwrap();
            col.set(small, 10.0);
            col.set(big, 900.0);
            col.set(readme, 50.0);
        }
        {
            let col = tree.strs_mut(ext).unwrap();
            col.set(small, String::from("rs"));
            col.set(big, String::from("rs"));
            col.set(readme, String::from("md"));
        }
        Fixture {
            tree,
            size,
            ext,
            dir,
            small,
            big,
            readme,
        }
    }

    #[test]
    fn empty_set_passes_everything() {
        let f = fixture();
        let queries = QuerySet::new();
        let filter = queries.refresh(&f.tree).unwrap();
        assert_eq!(filter.count_filtered(), 0);
    }

    #[test]
    fn range_query_filters_leaves() {
        let f = fixture();
        let mut queries = QuerySet::new();
        let _ = queries.add_range(f.size, 40.0, 1000.0);
        let filter = queries.refresh(&f.tree).unwrap();
        assert!(filter.is_filtered(f.small));
        assert!(!filter.is_filtered(f.big));
        assert!(!filter.is_filtered(f.readme));
        // The dir keeps one surviving child, so it survives.
        assert!(!filter.is_filtered(f.dir));
    }

    #[test]
    fn internal_node_filtered_iff_all_children_filtered() {
        let f = fixture();
        let mut queries = QuerySet::new();
        let _ = queries.add_range(f.size, 10_000.0, f64::INFINITY);
        let filter = queries.refresh(&f.tree).unwrap();
        assert!(filter.is_filtered(f.small));
        assert!(filter.is_filtered(f.big));
        assert!(filter.is_filtered(f.dir), "both children gone, dir goes too");
        assert!(filter.is_filtered(f.readme));
        assert!(filter.is_filtered(NodeId::ROOT), "nothing survived at all");
    }

    #[test]
    fn queries_combine_by_and() {
        let f = fixture();
        let mut queries = QuerySet::new();
        let _ = queries.add_range(f.size, 0.0, 100.0);
        let rs_only = queries.add_set(f.ext);
        queries.insert_accepted(rs_only, "rs").unwrap();
        let filter = queries.refresh(&f.tree).unwrap();
        // small: in range and "rs" -> passes. readme: in range but "md".
        // big: "rs" but out of range.
        assert!(!filter.is_filtered(f.small));
        assert!(filter.is_filtered(f.big));
        assert!(filter.is_filtered(f.readme));
    }

    #[test]
    fn empty_accept_set_rejects_the_column() {
        let f = fixture();
        let mut queries = QuerySet::new();
        let _ = queries.add_set(f.ext);
        let filter = queries.refresh(&f.tree).unwrap();
        assert!(filter.is_filtered(f.small));
        assert!(filter.is_filtered(f.readme));
    }

    #[test]
    fn undefined_cells_never_match() {
        let f = fixture();
        let mut tree = f.tree;
        let no_size = tree.add_node(f.dir).unwrap();
        let mut queries = QuerySet::new();
        let _ = queries.add_range(f.size, 0.0, f64::INFINITY);
        let filter = queries.refresh(&tree).unwrap();
        assert!(filter.is_filtered(no_size));
    }

    #[test]
    fn generation_bumps_on_mutation_not_refresh() {
        let f = fixture();
        let mut queries = QuerySet::new();
        let g0 = queries.generation();
        let slider = queries.add_range(f.size, 0.0, 100.0);
        assert!(queries.generation() > g0);

        let g1 = queries.generation();
        let _ = queries.refresh(&f.tree).unwrap();
        assert_eq!(queries.generation(), g1, "refresh is a read");

        queries.set_range(slider, 0.0, 200.0).unwrap();
        assert!(queries.generation() > g1);
    }

    #[test]
    fn staleness_tracks_both_counters() {
        let f = fixture();
        let mut tree = f.tree;
        let mut queries = QuerySet::new();
        let slider = queries.add_range(f.size, 0.0, 100.0);
        let filter = queries.refresh(&tree).unwrap();
        assert!(!filter.is_stale(&tree, &queries));

        queries.set_range(slider, 0.0, 50.0).unwrap();
        assert!(filter.is_stale(&tree, &queries));

        let filter = queries.refresh(&tree).unwrap();
        let _ = tree.add_node(NodeId::ROOT).unwrap();
        assert!(filter.is_stale(&tree, &queries), "topology moved");
    }

    #[test]
    fn removing_a_query_relaxes_the_filter() {
        let f = fixture();
        let mut queries = QuerySet::new();
        let q = queries.add_range(f.size, 10_000.0, f64::INFINITY);
        assert_eq!(queries.refresh(&f.tree).unwrap().count_filtered(), 5);
        assert!(queries.remove(q));
        assert!(!queries.remove(q), "second removal is a no-op");
        assert_eq!(queries.refresh(&f.tree).unwrap().count_filtered(), 0);
    }

    #[test]
    fn kind_and_id_errors() {
        let f = fixture();
        let mut queries = QuerySet::new();
        let range = queries.add_range(f.size, 0.0, 1.0);
        let set = queries.add_set(f.ext);
        assert_eq!(
            queries.set_range(set, 0.0, 1.0),
            Err(QueryError::KindMismatch(set))
        );
        assert_eq!(
            queries.insert_accepted(range, "rs"),
            Err(QueryError::KindMismatch(range))
        );
        queries.remove(range);
        assert_eq!(
            queries.set_range(range, 0.0, 1.0),
            Err(QueryError::UnknownQuery(range))
        );
    }

    #[test]
    fn foreign_column_is_an_error() {
        let f = fixture();
        let mut queries = QuerySet::new();
        let q = queries.add_range(f.size, 0.0, 1.0);
        let other_tree = Tree::new();
        assert_eq!(
            queries.refresh(&other_tree),
            Err(QueryError::UnknownColumn(q))
        );
    }

    #[test]
    fn accept_set_membership_can_shrink() {
        let f = fixture();
        let mut queries = QuerySet::new();
        let q = queries.add_set(f.ext);
        queries.insert_accepted(q, "rs").unwrap();
        queries.insert_accepted(q, "md").unwrap();
        assert_eq!(queries.refresh(&f.tree).unwrap().count_filtered(), 0);
        queries.remove_accepted(q, "md").unwrap();
        let filter = queries.refresh(&f.tree).unwrap();
        assert!(filter.is_filtered(f.readme));
        assert!(!filter.is_filtered(f.small));
    }
}
