// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_tree::{FilterPredicate, NodeId, TreeView, WeightSource};
use kurbo::Rect;

/// Clamp a raw weight to a finite, non-negative value. NaN and negatives
/// read as zero so they cannot corrupt sibling accumulation downstream.
pub(crate) fn sane_weight(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 { w } else { 0.0 }
}

/// Total sanitized weight of `node`'s unfiltered children.
pub(crate) fn visible_total<T, W, F>(tree: &T, weights: &W, filter: &F, node: NodeId) -> f64
where
    T: TreeView,
    W: WeightSource + ?Sized,
    F: FilterPredicate + ?Sized,
{
    let mut total = 0.0;
    for child in tree.children(node) {
        if !filter.is_filtered(child) {
            total += sane_weight(weights.weight(child));
        }
    }
    total
}

/// The zero-area rectangle at `rect`'s center, the "not drawn" terminal box.
pub(crate) fn zero_rect_at(rect: Rect) -> Rect {
    let c = rect.center();
    Rect::new(c.x, c.y, c.x, c.y)
}

/// Whether a box is a terminal zero-area box.
pub(crate) fn degenerate(rect: Rect) -> bool {
    rect.width() <= 0.0 || rect.height() <= 0.0
}

/// Worst aspect ratio of a row with the given area statistics laid along a
/// side of length `side` (Bruls et al., using min/max/sum instead of the
/// full row). Degenerate inputs rank worst so they never extend a row.
pub(crate) fn worst_aspect(min_area: f64, max_area: f64, sum: f64, side: f64) -> f64 {
    if sum <= 0.0 || side <= 0.0 || min_area <= 0.0 || max_area <= 0.0 {
        return f64::MAX;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    ((side_sq * max_area) / sum_sq).max(sum_sq / (side_sq * min_area))
}
