// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic-query filtering with an animated transition: capture the layout
//! before and after a filter change and sample the in-between frames.
//!
//! Run:
//! - `cargo run -p canopy_demos --example filter_and_animate`

use canopy_animate::{BoxList, Transition};
use canopy_demos::{demo_tree, name_of};
use canopy_layout::{BoxListSink, Layout};
use canopy_query::QuerySet;
use canopy_tree::{NodeId, Tree};
use kurbo::Rect;

fn main() {
    let (tree, columns, weights) = demo_tree();
    let view = Rect::new(0.0, 0.0, 640.0, 480.0);
    let layout = Layout::Squarified;

    // State 1: everything visible.
    let before = capture(&tree, &weights, &(), layout, view);

    // State 2: only Rust sources at least 5 kB.
    let mut queries = QuerySet::new();
    let rust_only = queries.add_set(columns.ext);
    queries.insert_accepted(rust_only, "rs").expect("set query");
    let _at_least_5k = queries.add_range(columns.size, 5000.0, f64::INFINITY);
    let filter = queries.refresh(&tree).expect("columns belong to this tree");
    println!(
        "filter generation {} drops {} of {} nodes",
        queries.generation(),
        filter.count_filtered(),
        tree.len()
    );
    let after = capture(&tree, &weights, &filter, layout, view);

    // Animate between the two states. Surviving boxes glide, dropped boxes
    // shrink to a point, newly visible ones grow from one.
    let transition = Transition::new(before, after).expect("same tree, same length");
    for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let frame = transition.sample(t);
        println!("t={t:.2}");
        for node in tree.descendants(NodeId::ROOT) {
            if !tree.is_leaf(node) {
                continue;
            }
            let rect = frame.get(node);
            println!(
                "   {:<12} {:7.1} x {:5.1} at ({:6.1},{:6.1})",
                name_of(&tree, columns, node),
                rect.width(),
                rect.height(),
                rect.x0,
                rect.y0
            );
        }
    }
}

fn capture<F: canopy_tree::FilterPredicate>(
    tree: &Tree,
    weights: &canopy_tree::Column<f64>,
    filter: &F,
    layout: Layout,
    view: Rect,
) -> BoxList {
    let mut sink = BoxListSink::new(tree.len());
    layout.run(tree, weights, filter, &mut sink, view, NodeId::ROOT);
    BoxList::from_sink(sink, tree.epoch())
}
