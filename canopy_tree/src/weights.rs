// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-order weight aggregation.

use alloc::vec;

use crate::column::Column;
use crate::tree::Tree;
use crate::types::NodeId;

/// Make every internal node's weight the sum of its children's weights.
///
/// One depth-first post-order pass: each internal node is overwritten with
/// the sum of its *direct* children after all descendants have been summed.
/// Leaves are left untouched (they hold externally supplied values), and an
/// undefined leaf contributes `0.0`. Returns the root's resulting total.
///
/// The pass is idempotent: with no topology or leaf-weight change, a second
/// run produces identical internal-node weights.
///
/// The traversal uses an explicit heap-allocated stack rather than
/// recursion, so pathologically deep trees (chains of hundreds of thousands
/// of nodes) cannot overflow the call stack.
///
/// ## Example
///
/// ```rust
/// use canopy_tree::{Column, NodeId, Tree, sum_weights};
///
/// let mut tree = Tree::new();
/// let a = tree.add_node(NodeId::ROOT).unwrap();
/// let b = tree.add_node(NodeId::ROOT).unwrap();
///
/// let mut weights = Column::with_len(tree.len());
/// weights.set(a, 1.0);
/// weights.set(b, 3.0);
///
/// assert_eq!(sum_weights(&tree, &mut weights), 4.0);
/// ```
pub fn sum_weights(tree: &Tree, weights: &mut Column<f64>) -> f64 {
    let root = tree.root();
    // Two-phase explicit stack: the first visit expands a node's children,
    // the second (after every descendant has been handled) sums them.
    let mut stack = vec![(root, false)];
    while let Some((node, summed)) = stack.pop() {
        if summed {
            let mut total = 0.0;
            for child in tree.children(node) {
                total += weights.get(child).copied().unwrap_or(0.0);
            }
            weights.set(node, total);
        } else if !tree.is_leaf(node) {
            stack.push((node, true));
            for child in tree.children(node) {
                stack.push((child, false));
            }
        }
    }
    weights.get(root).copied().unwrap_or(0.0)
}
