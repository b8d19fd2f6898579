// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sink (drawer) contract and two stock sinks.

use alloc::vec::Vec;
use kurbo::Rect;

use canopy_tree::NodeId;

use crate::border::Border;
use crate::direction::Direction;

/// Callback contract invoked by the layout algorithms, one call per event in
/// the recursive subdivision.
///
/// Every method has a no-op default, so a sink implements only what it
/// needs. For one top-level layout call the sequence is:
///
/// ```text
/// start
///   begin_box(n)            -> false prunes n's whole subtree
///     draw_border(n)        -> content rect (internal nodes only)
///     [begin_strip .. end_strip]*   (squarified / strip rows)
///     draw_box(n)           (leaves and terminal boxes only)
///   end_box(n)
/// finish
/// ```
///
/// `draw_border` defaults to delegating to `remove_border`, and
/// `remove_border` defaults to the identity; a rendering sink overrides
/// `draw_border` (paint the frame, then shrink) while a geometry-only sink
/// (picking, capture) overrides `remove_border`. Both paths shrink through
/// the same code, which is what keeps picking consistent with drawing.
pub trait LayoutSink {
    /// Called once before the top-level node is visited.
    fn start(&mut self) {}

    /// Called once after the traversal completes.
    fn finish(&mut self) {}

    /// Called before descending into `node`. Returning `false` prunes the
    /// subtree: no further callbacks are made for `node` or any descendant.
    /// Pruning is normal control flow, not an error.
    fn begin_box(&mut self, rect: Rect, node: NodeId, depth: usize) -> bool {
        let _ = (rect, node, depth);
        true
    }

    /// Called exactly once for every unpruned node laid out as a leaf
    /// (childless, at the recursion ceiling, or with a degenerate box).
    fn draw_box(&mut self, rect: Rect, node: NodeId, depth: usize) {
        let _ = (rect, node, depth);
    }

    /// Shrink an internal node's box to its content area, rendering the
    /// border in the process. Children are laid out in the returned rect.
    fn draw_border(&mut self, rect: Rect, node: NodeId, depth: usize) -> Rect {
        self.remove_border(rect, node, depth)
    }

    /// Shrink an internal node's box to its content area without rendering.
    /// Must agree exactly with [`LayoutSink::draw_border`].
    fn remove_border(&mut self, rect: Rect, node: NodeId, depth: usize) -> Rect {
        let _ = (node, depth);
        rect
    }

    /// Called after all of `node`'s descendants have been processed.
    fn end_box(&mut self, rect: Rect, node: NodeId, depth: usize) {
        let _ = (rect, node, depth);
    }

    /// Brackets a contiguous run of `node`'s children laid out along one
    /// axis. `rect` is the strip's rectangle and `dir` the in-strip order.
    fn begin_strip(&mut self, rect: Rect, node: NodeId, depth: usize, dir: Direction) {
        let _ = (rect, node, depth, dir);
    }

    /// Closes the strip opened by the matching
    /// [`LayoutSink::begin_strip`].
    fn end_strip(&mut self, rect: Rect, node: NodeId, depth: usize, dir: Direction) {
        let _ = (rect, node, depth, dir);
    }
}

/// Captures the box of every visited node into a dense per-id list.
///
/// Unvisited nodes hold [`Rect::ZERO`], which downstream animation reads as
/// "absent in this state". The list is reset by `start`, so one sink can be
/// reused across layout passes.
#[derive(Clone, Debug)]
pub struct BoxListSink {
    boxes: Vec<Rect>,
    border: Border,
    leaves_only: bool,
}

impl BoxListSink {
    /// A sink recording every visited node, sized for `len` node ids.
    pub fn new(len: usize) -> Self {
        let mut boxes = Vec::new();
        boxes.resize(len, Rect::ZERO);
        Self {
            boxes,
            border: Border::None,
            leaves_only: false,
        }
    }

    /// A sink recording only leaf boxes.
    pub fn leaves_only(len: usize) -> Self {
        Self {
            leaves_only: true,
            ..Self::new(len)
        }
    }

    /// Apply `border` when shrinking internal nodes to their content area.
    #[must_use]
    pub fn with_border(mut self, border: Border) -> Self {
        self.border = border;
        self
    }

    /// The captured boxes, indexed by node id.
    pub fn boxes(&self) -> &[Rect] {
        &self.boxes
    }

    /// Consume the sink, keeping the captured boxes.
    pub fn into_boxes(self) -> Vec<Rect> {
        self.boxes
    }

    /// The captured box for `node`; [`Rect::ZERO`] if it was not visited.
    pub fn get(&self, node: NodeId) -> Rect {
        self.boxes.get(node.index()).copied().unwrap_or(Rect::ZERO)
    }

    fn record(&mut self, node: NodeId, rect: Rect) {
        let idx = node.index();
        if idx >= self.boxes.len() {
            self.boxes.resize(idx + 1, Rect::ZERO);
        }
        self.boxes[idx] = rect;
    }
}

impl LayoutSink for BoxListSink {
    fn start(&mut self) {
        self.boxes.fill(Rect::ZERO);
    }

    fn begin_box(&mut self, rect: Rect, node: NodeId, _depth: usize) -> bool {
        if !self.leaves_only {
            self.record(node, rect);
        }
        true
    }

    fn draw_box(&mut self, rect: Rect, node: NodeId, _depth: usize) {
        self.record(node, rect);
    }

    fn remove_border(&mut self, rect: Rect, _node: NodeId, _depth: usize) -> Rect {
        self.border.content(rect)
    }
}

/// Counts visited nodes, leaves, and strips. Useful for tests and benches
/// where the geometry itself is irrelevant.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountingSink {
    /// Nodes accepted by `begin_box`.
    pub nodes: usize,
    /// `draw_box` calls.
    pub leaves: usize,
    /// `begin_strip` calls.
    pub strips: usize,
}

impl LayoutSink for CountingSink {
    fn begin_box(&mut self, _rect: Rect, _node: NodeId, _depth: usize) -> bool {
        self.nodes += 1;
        true
    }

    fn draw_box(&mut self, _rect: Rect, _node: NodeId, _depth: usize) {
        self.leaves += 1;
    }

    fn begin_strip(&mut self, _rect: Rect, _node: NodeId, _depth: usize, _dir: Direction) {
        self.strips += 1;
    }
}
