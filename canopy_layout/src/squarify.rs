// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Squarified layout: heaviest-first row packing for near-square boxes.

use kurbo::Rect;
use smallvec::SmallVec;

use canopy_tree::{FilterPredicate, NodeId, TreeView, WeightSource};

use crate::MAX_DEPTH;
use crate::direction::Direction;
use crate::sink::LayoutSink;
use crate::util::{degenerate, sane_weight, worst_aspect, zero_rect_at};

/// Inline capacity for the per-node child scratch; fan-outs beyond this
/// spill to the heap.
const INLINE_CHILDREN: usize = 16;

type Items = SmallVec<[(NodeId, f64); INLINE_CHILDREN]>;

/// Lay out `node`'s subtree inside `rect` with the squarified heuristic
/// (Bruls, Huizing, van Wijk).
///
/// At each internal node the visible children are sorted heaviest-first and
/// packed greedily into rows along the shorter side of the remaining box; a
/// row keeps absorbing the next child while its worst aspect ratio does not
/// degrade. Equal weights keep sibling order (the sort is stable). Each row
/// is bracketed by `begin_strip`/`end_strip`.
///
/// The tiling is exact: the union of a node's child boxes equals its
/// content box, with no interior overlaps; the last row and the last box
/// in each row absorb the floating-point remainder.
///
/// Returns the number of nodes accepted by the sink's `begin_box`.
pub fn squarified<T, W, F, S>(
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
    sink.start();
    let visited = visit(tree, weights, filter, sink, rect, node, 0);
    sink.finish();
    visited
}

fn visit<T, W, F, S>(
    tree: &T,
    weights: &W,
    filter: &F,
    sink: &mut S,
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
    let mut items: Items = tree
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
            visited += visit(tree, weights, filter, sink, zero, child, depth + 1);
        }
        sink.end_box(rect, node, depth);
        return visited;
    }

    // Heaviest first; stable, so equal weights keep sibling order.
    items.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(core::cmp::Ordering::Equal));
    let area_scale = content.area() / tw;

    let mut remaining = content;
    let mut start = 0;
    while start < items.len() {
        // Grow the row while the worst aspect ratio does not degrade.
        let side = remaining.width().min(remaining.height());
        let first = items[start].1 * area_scale;
        let (mut min_area, mut max_area, mut row_sum) = (first, first, first);
        let mut end = start + 1;
        while end < items.len() {
            let area = items[end].1 * area_scale;
            let current = worst_aspect(min_area, max_area, row_sum, side);
            let next_min = min_area.min(area);
            let next_max = max_area.max(area);
            let next_sum = row_sum + area;
            if worst_aspect(next_min, next_max, next_sum, side) <= current {
                min_area = next_min;
                max_area = next_max;
                row_sum = next_sum;
                end += 1;
            } else {
                break;
            }
        }

        // The row lies along the shorter side of the remaining box.
        let horizontal = remaining.width() <= remaining.height();
        let cross = if horizontal {
            remaining.height()
        } else {
            remaining.width()
        };
        let mut thickness = if side > 0.0 { row_sum / side } else { 0.0 };
        if end == items.len() && row_sum > 0.0 {
            // Final row absorbs the floating-point remainder of the cross
            // extent so the tiling closes exactly.
            thickness = cross;
        }
        thickness = thickness.min(cross);

        let (row_rect, dir) = if horizontal {
            (
                Rect::new(remaining.x0, remaining.y0, remaining.x1, remaining.y0 + thickness),
                Direction::LeftToRight,
            )
        } else {
            (
                Rect::new(remaining.x0, remaining.y0, remaining.x0 + thickness, remaining.y1),
                Direction::TopToBottom,
            )
        };

        sink.begin_strip(row_rect, node, depth, dir);
        let run = if horizontal {
            remaining.width()
        } else {
            remaining.height()
        };
        let mut offset = 0.0;
        for i in start..end {
            let area = items[i].1 * area_scale;
            let mut len = if thickness > 0.0 { area / thickness } else { 0.0 };
            if i == end - 1 && row_sum > 0.0 {
                // Last box in the row absorbs the remainder of the run.
                len = (run - offset).max(0.0);
            }
            let child_rect = if horizontal {
                Rect::new(
                    remaining.x0 + offset,
                    row_rect.y0,
                    remaining.x0 + offset + len,
                    row_rect.y1,
                )
            } else {
                Rect::new(
                    row_rect.x0,
                    remaining.y0 + offset,
                    row_rect.x1,
                    remaining.y0 + offset + len,
                )
            };
            offset += len;
            visited += visit(tree, weights, filter, sink, child_rect, items[i].0, depth + 1);
        }
        sink.end_strip(row_rect, node, depth, dir);

        remaining = if horizontal {
            Rect::new(remaining.x0, row_rect.y1, remaining.x1, remaining.y1)
        } else {
            Rect::new(row_rect.x1, remaining.y0, remaining.x1, remaining.y1)
        };
        start = end;
    }

    sink.end_box(rect, node, depth);
    visited
}
