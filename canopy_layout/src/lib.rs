// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_layout --heading-base-level=0

//! Canopy Layout: recursive treemap subdivision over a sink callback contract.
//!
//! This crate turns a weighted tree into nested rectangles. Three algorithms
//! share one shape: consume a node, a bounding [`Rect`], and a weight
//! accessor, and report a box per visited node to a [`LayoutSink`]:
//!
//! - [`slice_and_dice`]: alternating-axis proportional splits in sibling
//!   order. The classic readable layout; aspect ratios degrade on skewed
//!   weights.
//! - [`squarified`]: heaviest-first row packing that approximately minimizes
//!   the worst aspect ratio (Bruls, Huizing, van Wijk).
//! - [`strip`]: fixed-axis rows in sibling order; a middle ground that keeps
//!   ordering while improving aspect ratios over slice-and-dice.
//!
//! The sink decouples the geometry from what happens with it: render it,
//! collect it into a box list ([`BoxListSink`]), hit-test it (see
//! `canopy_pick`), or just count it ([`CountingSink`]). Returning `false`
//! from [`LayoutSink::begin_box`] prunes a subtree; that is normal control
//! flow, not an error, and it is how picking short-circuits.
//!
//! Algorithms are generic over the tree/weight/filter seams from
//! [`canopy_tree`] and are monomorphized; there is no virtual dispatch in
//! the inner loop.
//!
//! ## Numeric policy
//!
//! Weights are sanitized where read: NaN and negative values clamp to zero,
//! so one bad weight cannot corrupt the running-coordinate accumulation of
//! its siblings. A child set whose visible total weight is zero is not
//! subdivided proportionally; every visible child is reported with a
//! zero-area box (the documented "not drawn" terminal state). NaN never
//! reaches a sink.
//!
//! ## Filter policy
//!
//! Filtered children are skipped entirely *and excluded from the weight
//! denominator*: visible siblings expand to fill the freed space. This
//! keeps "filter, then lay out" identical to laying out the filtered tree,
//! which is what animated filter transitions rely on.
//!
//! ## Example
//!
//! ```rust
//! use canopy_layout::{BoxListSink, Direction, slice_and_dice};
//! use canopy_tree::{Column, NodeId, Tree, sum_weights};
//! use kurbo::Rect;
//!
//! let mut tree = Tree::new();
//! let a = tree.add_node(NodeId::ROOT).unwrap();
//! let b = tree.add_node(NodeId::ROOT).unwrap();
//!
//! let mut weights = Column::with_len(tree.len());
//! weights.set(a, 1.0);
//! weights.set(b, 3.0);
//! sum_weights(&tree, &mut weights);
//!
//! let mut sink = BoxListSink::new(tree.len());
//! slice_and_dice(
//!     &tree,
//!     &weights,
//!     &(),
//!     &mut sink,
//!     Direction::LeftToRight,
//!     Rect::new(0.0, 0.0, 100.0, 100.0),
//!     NodeId::ROOT,
//! );
//! assert_eq!(sink.get(a), Rect::new(0.0, 0.0, 25.0, 100.0));
//! assert_eq!(sink.get(b), Rect::new(25.0, 0.0, 100.0, 100.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod border;
mod checked;
mod direction;
mod sink;
mod slice;
mod squarify;
mod strip;
mod util;

pub use border::Border;
pub use checked::{CheckedSink, SinkCall, SinkState, Violation};
pub use direction::Direction;
pub use sink::{BoxListSink, CountingSink, LayoutSink};
pub use slice::slice_and_dice;
pub use squarify::squarified;
pub use strip::strip;

use canopy_tree::{FilterPredicate, NodeId, TreeView, WeightSource};
use kurbo::Rect;

/// Recursion ceiling for the layout algorithms.
///
/// A node at this depth is laid out as a leaf even if it has children. Real
/// treemap hierarchies are a few dozen levels deep; the ceiling exists so an
/// adversarial chain cannot overflow the call stack. (The whole-tree passes
/// that do see million-node inputs, `canopy_tree::sum_weights` and
/// `Tree::descendants`, use explicit stacks and have no ceiling.)
pub const MAX_DEPTH: usize = 512;

/// Algorithm selector for callers that switch layouts at runtime, such as a
/// layout-mode toggle animating between two captured box lists.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Layout {
    /// [`slice_and_dice`] starting in the given direction.
    SliceAndDice(Direction),
    /// [`squarified`].
    Squarified,
    /// [`strip`] with strips along the given direction.
    Strip(Direction),
}

impl Layout {
    /// Run the selected algorithm over `node`'s subtree inside `rect`.
    pub fn run<T, W, F, S>(
        self,
        tree: &T,
        weights: &W,
        filter: &F,
        sink: &mut S,
        rect: Rect,
        node: NodeId,
    ) -> usize
    where
        T: TreeView,
        W: WeightSource + ?Sized,
        F: FilterPredicate + ?Sized,
        S: LayoutSink,
    {
        match self {
            Self::SliceAndDice(dir) => {
                slice_and_dice(tree, weights, filter, sink, dir, rect, node)
            }
            Self::Squarified => squarified(tree, weights, filter, sink, rect, node),
            Self::Strip(dir) => strip(tree, weights, filter, sink, dir, rect, node),
        }
    }
}
