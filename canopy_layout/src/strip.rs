// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strip layout: fixed-axis rows in sibling order.

use kurbo::Rect;
use smallvec::SmallVec;

use canopy_tree::{FilterPredicate, NodeId, TreeView, WeightSource};

use crate::MAX_DEPTH;
use crate::direction::Direction;
use crate::sink::LayoutSink;
use crate::util::{degenerate, sane_weight, worst_aspect, zero_rect_at};

const INLINE_CHILDREN: usize = 16;

type Items = SmallVec<[(NodeId, f64); INLINE_CHILDREN]>;

/// Lay out `node`'s subtree inside `rect` as strips of siblings along a
/// fixed axis.
///
/// The middle ground between [`slice_and_dice`](crate::slice_and_dice) and
/// [`squarified`](crate::squarified): children stay in stored sibling order
/// (no re-sorting), but instead of one box per child spanning the whole
/// cross extent, consecutive children are packed into strips using the same
/// worst-aspect-ratio row test as the squarified heuristic.
///
/// Horizontal directions produce horizontal strips stacked top to bottom,
/// with `dir` giving the in-strip order; vertical directions produce
/// vertical strips stacked left to right. Recursion keeps the same `dir`.
/// Each strip is bracketed by `begin_strip`/`end_strip`, and the tiling is
/// exact, as in the squarified layout.
///
/// Returns the number of nodes accepted by the sink's `begin_box`.
pub fn strip<T, W, F, S>(
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
    let items: Items = tree
        .children(node)
        .filter(|child| !filter.is_filtered(*child))
        .map(|child| (child, sane_weight(weights.weight(child))))
        .collect();
    let tw: f64 = items.iter().map(|(_, w)| w).sum();
    let mut visited = 1;

    if items.is_empty() {
        sink.end_box(rect, node, depth);
        return visited;
    }
    if tw <= 0.0 || degenerate(content) {
        let zero = zero_rect_at(content);
        for (child, _) in items {
            visited += visit(tree, weights, filter, sink, dir, zero, child, depth + 1);
        }
        sink.end_box(rect, node, depth);
        return visited;
    }

    let horizontal = dir.is_horizontal();
    // The strip length is fixed by the content box; only the stacking
    // extent is consumed as strips are emitted.
    let run = if horizontal {
        content.width()
    } else {
        content.height()
    };
    let area_scale = content.area() / tw;

    let mut remaining = content;
    let mut start = 0;
    while start < items.len() {
        let first = items[start].1 * area_scale;
        let (mut min_area, mut max_area, mut row_sum) = (first, first, first);
        let mut end = start + 1;
        while end < items.len() {
            let area = items[end].1 * area_scale;
            let current = worst_aspect(min_area, max_area, row_sum, run);
            let next_min = min_area.min(area);
            let next_max = max_area.max(area);
            let next_sum = row_sum + area;
            if worst_aspect(next_min, next_max, next_sum, run) <= current {
                min_area = next_min;
                max_area = next_max;
                row_sum = next_sum;
                end += 1;
            } else {
                break;
            }
        }

        let cross = if horizontal {
            remaining.height()
        } else {
            remaining.width()
        };
        let mut thickness = if run > 0.0 { row_sum / run } else { 0.0 };
        if end == items.len() && row_sum > 0.0 {
            thickness = cross;
        }
        thickness = thickness.min(cross);

        let strip_rect = if horizontal {
            Rect::new(content.x0, remaining.y0, content.x1, remaining.y0 + thickness)
        } else {
            Rect::new(remaining.x0, content.y0, remaining.x0 + thickness, content.y1)
        };

        sink.begin_strip(strip_rect, node, depth, dir);
        let mut offset = 0.0;
        for i in start..end {
            let area = items[i].1 * area_scale;
            let mut len = if thickness > 0.0 { area / thickness } else { 0.0 };
            if i == end - 1 && row_sum > 0.0 {
                len = (run - offset).max(0.0);
            }
            let child_rect = match dir {
                Direction::LeftToRight => Rect::new(
                    content.x0 + offset,
                    strip_rect.y0,
                    content.x0 + offset + len,
                    strip_rect.y1,
                ),
                Direction::RightToLeft => Rect::new(
                    content.x1 - offset - len,
                    strip_rect.y0,
                    content.x1 - offset,
                    strip_rect.y1,
                ),
                Direction::TopToBottom => Rect::new(
                    strip_rect.x0,
                    content.y0 + offset,
                    strip_rect.x1,
                    content.y0 + offset + len,
                ),
                Direction::BottomToTop => Rect::new(
                    strip_rect.x0,
                    content.y1 - offset - len,
                    strip_rect.x1,
                    content.y1 - offset,
                ),
            };
            offset += len;
            visited += visit(tree, weights, filter, sink, dir, child_rect, items[i].0, depth + 1);
        }
        sink.end_strip(strip_rect, node, depth, dir);

        remaining = if horizontal {
            Rect::new(remaining.x0, strip_rect.y1, remaining.x1, remaining.y1)
        } else {
            Rect::new(strip_rect.x1, remaining.y0, remaining.x1, remaining.y1)
        };
        start = end;
    }

    sink.end_box(rect, node, depth);
    visited
}
