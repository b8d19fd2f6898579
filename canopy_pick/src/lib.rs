// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_pick --heading-base-level=0

//! Canopy Pick: layout-consistent point picking for treemaps.
//!
//! [`PickSink`] is a [`LayoutSink`] that re-runs the *same* recursive box
//! computation as rendering (same algorithm, same border shrinkage), so
//! what it hits is exactly what was drawn. Instead of emitting geometry it:
//!
//! - short-circuits (prunes) every subtree whose box neither contains the
//!   query point nor intersects the optional clip rectangle,
//! - records the root-to-hit breadcrumb of boxes containing the point
//!   ([`PickSink::path`]), used for UI path displays,
//! - and, in the same traversal, collects label candidates `(center, node)`
//!   for every node at a caller-chosen depth inside the clip region
//!   ([`PickSink::labels`]): a side effect, not a second pass.
//!
//! A query point outside the whole layout is not an error: the hit simply
//! stays `None`.
//!
//! ## Example
//!
//! ```rust
//! use canopy_layout::{Direction, Layout};
//! use canopy_pick::pick;
//! use canopy_tree::{Column, NodeId, Tree, sum_weights};
//! use kurbo::{Point, Rect};
//!
//! let mut tree = Tree::new();
//! let a = tree.add_node(NodeId::ROOT).unwrap();
//! let b = tree.add_node(NodeId::ROOT).unwrap();
//! let mut weights = Column::with_len(tree.len());
//! weights.set(a, 1.0);
//! weights.set(b, 1.0);
//! sum_weights(&tree, &mut weights);
//!
//! let result = pick(
//!     &tree,
//!     &weights,
//!     &(),
//!     Layout::SliceAndDice(Direction::LeftToRight),
//!     Rect::new(0.0, 0.0, 100.0, 100.0),
//!     NodeId::ROOT,
//!     Point::new(75.0, 50.0),
//! );
//! assert_eq!(result.hit(), Some(b));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

use canopy_layout::{Layout, LayoutSink};
use canopy_tree::{FilterPredicate, NodeId, TreeView, WeightSource};

/// Inline capacity for the breadcrumb; paths deeper than this spill to the
/// heap (the layout recursion ceiling bounds them anyway).
const INLINE_PATH: usize = 32;

/// A sink that resolves a query point to the node whose box contains it.
///
/// Build one with [`PickSink::new`], optionally add a clip rectangle and a
/// label depth, run any layout algorithm with it, then read the results.
/// The sink resets itself on `start`, so it can be reused across passes.
#[derive(Clone, Debug)]
pub struct PickSink {
    point: Point,
    clip: Option<Rect>,
    label_depth: Option<usize>,
    path: SmallVec<[(NodeId, Rect); INLINE_PATH]>,
    labels: Vec<(Point, NodeId)>,
}

impl PickSink {
    /// A sink resolving `point`, with no clip and no label collection.
    pub fn new(point: Point) -> Self {
        Self {
            point,
            clip: None,
            label_depth: None,
            path: SmallVec::new(),
            labels: Vec::new(),
        }
    }

    /// Restrict traversal to boxes intersecting `clip` (in addition to the
    /// point-containment descent). Label candidates outside `clip` are
    /// dropped.
    #[must_use]
    pub fn with_clip(mut self, clip: Rect) -> Self {
        self.clip = Some(clip);
        self
    }

    /// Collect a label candidate for every node at exactly `depth` whose
    /// box intersects the clip region (everywhere, if no clip is set).
    #[must_use]
    pub fn with_label_depth(mut self, depth: usize) -> Self {
        self.label_depth = Some(depth);
        self
    }

    /// The query point.
    pub fn point(&self) -> Point {
        self.point
    }

    /// The deepest node whose box contains the point, or `None` if the
    /// point missed the layout entirely (not an error).
    pub fn hit(&self) -> Option<NodeId> {
        self.path.last().map(|(node, _)| *node)
    }

    /// The box of the hit node.
    pub fn hit_box(&self) -> Option<Rect> {
        self.path.last().map(|(_, rect)| *rect)
    }

    /// Root-to-hit breadcrumb: every node on the descent whose box contains
    /// the point, with its box. Empty on a miss.
    pub fn path(&self) -> &[(NodeId, Rect)] {
        &self.path
    }

    /// Label candidates `(center, node)` collected at the configured depth,
    /// in visitation order. Empty unless [`PickSink::with_label_depth`] was
    /// used.
    pub fn labels(&self) -> &[(Point, NodeId)] {
        &self.labels
    }

    fn in_clip(&self, rect: Rect) -> bool {
        match self.clip {
            Some(clip) => {
                let overlap = rect.intersect(clip);
                overlap.width() > 0.0 && overlap.height() > 0.0
            }
            None => true,
        }
    }
}

impl LayoutSink for PickSink {
    fn start(&mut self) {
        self.path.clear();
        self.labels.clear();
    }

    fn begin_box(&mut self, rect: Rect, node: NodeId, depth: usize) -> bool {
        let contains = rect.contains(self.point);
        if contains {
            self.path.push((node, rect));
        }
        if self.label_depth == Some(depth) && self.in_clip(rect) {
            self.labels.push((rect.center(), node));
        }
        // Descend for the hit, or keep scanning for labels / clipped
        // content below this box; everything else is pruned.
        let scanning = match self.label_depth {
            Some(label_depth) => depth < label_depth && self.in_clip(rect),
            None => self.clip.is_some() && self.in_clip(rect),
        };
        contains || scanning
    }
}

/// Run `layout` over `node`'s subtree with a fresh [`PickSink`] for
/// `point` and return the sink.
pub fn pick<T, W, F>(
    tree: &T,
    weights: &W,
    filter: &F,
    layout: Layout,
    rect: Rect,
    node: NodeId,
    point: Point,
) -> PickSink
where
    T: TreeView,
    W: WeightSource + ?Sized,
    F: FilterPredicate + ?Sized,
{
    let mut sink = PickSink::new(point);
    layout.run(tree, weights, filter, &mut sink, rect, node);
    sink
}
