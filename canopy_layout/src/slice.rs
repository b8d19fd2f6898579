// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slice-and-dice layout: alternating-axis proportional splits.

use kurbo::Rect;

use canopy_tree::{FilterPredicate, NodeId, TreeView, WeightSource};

use crate::MAX_DEPTH;
use crate::direction::Direction;
use crate::sink::LayoutSink;
use crate::util::{degenerate, sane_weight, visible_total, zero_rect_at};

/// Lay out `node`'s subtree inside `rect` by alternating proportional
/// splits, starting along `dir`'s axis.
///
/// A leaf gets its whole box. An internal node's content box is split into
/// contiguous sub-rectangles whose extents are proportional to each visible
/// child's weight over the visible total; recursion flips the axis at each
/// level. Children are visited in stored sibling order with no re-sorting,
/// so sibling order reads left-to-right / top-to-bottom in the picture.
///
/// Sub-rectangle boundaries accumulate a running coordinate instead of
/// being recomputed per child, so adjacent boxes share edges exactly.
/// Returns the number of nodes accepted by the sink's `begin_box`.
///
/// See the crate docs for the numeric and filter policies.
pub fn slice_and_dice<T, W, F, S>(
    tree: &T,
    weights: &W,
    filter: &F,
    sink: &mut S,
    dir: Direction,
    rect: Rect,
    node: NodeId,
) -> usize
where
    T: TreeView,
    W: WeightSource + ?Sized,
    F: FilterPredicate + ?Sized,
    S: LayoutSink,
{
    sink.start();
    let visited = visit(tree, weights, filter, sink, dir, rect, node, 0);
    sink.finish();
    visited
}

fn visit<T, W, F, S>(
    tree: &T,
    weights: &W,
    filter: &F,
    sink: &mut S,
    dir: Direction,
    rect: Rect,
    node: NodeId,
    depth: usize,
) -> usize
where
    T: TreeView,
    W: WeightSource + ?Sized,
    F: FilterPredicate + ?Sized,
    S: LayoutSink,
{
    if !sink.begin_box(rect, node, depth) {
        return 0;
    }
    if tree.is_leaf(node) || depth >= MAX_DEPTH || degenerate(rect) {
        sink.draw_box(rect, node, depth);
        sink.end_box(rect, node, depth);
        return 1;
    }

    let content = sink.draw_border(rect, node, depth);
    let tw = visible_total(tree, weights, filter, node);
    let mut visited = 1;

    if tw <= 0.0 || degenerate(content) {
        // No meaningful subdivision: every visible child terminates as a
        // zero-area box rather than dividing by the zero total.
        let zero = zero_rect_at(content);
        for child in tree.children(node) {
            if filter.is_filtered(child) {
                continue;
            }
            visited += visit(tree, weights, filter, sink, dir.flip(), zero, child, depth + 1);
        }
        sink.end_box(rect, node, depth);
        return visited;
    }

    let mut x = match dir {
        Direction::RightToLeft => content.x1,
        _ => content.x0,
    };
    let mut y = match dir {
        Direction::BottomToTop => content.y1,
        _ => content.y0,
    };
    for child in tree.children(node) {
        if filter.is_filtered(child) {
            continue;
        }
        let frac = sane_weight(weights.weight(child)) / tw;
        let child_rect = match dir {
            Direction::LeftToRight => {
                let nw = content.width() * frac;
                let r = Rect::new(x, content.y0, x + nw, content.y1);
                x += nw;
                r
            }
            Direction::RightToLeft => {
                let nw = content.width() * frac;
                let r = Rect::new(x - nw, content.y0, x, content.y1);
                x -= nw;
                r
            }
            Direction::TopToBottom => {
                let nh = content.height() * frac;
                let r = Rect::new(content.x0, y, content.x1, y + nh);
                y += nh;
                r
            }
            Direction::BottomToTop => {
                let nh = content.height() * frac;
                let r = Rect::new(content.x0, y - nh, content.x1, y);
                y -= nh;
                r
            }
        };
        visited += visit(
            tree,
            weights,
            filter,
            sink,
            dir.flip(),
            child_rect,
            child,
            depth + 1,
        );
    }

    sink.end_box(rect, node, depth);
    visited
}
