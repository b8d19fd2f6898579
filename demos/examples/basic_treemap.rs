// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lay a synthetic source tree out with all three algorithms and pick the
//! box under a "mouse" position.
//!
//! Run:
//! - `cargo run -p canopy_demos --example basic_treemap`

use canopy_demos::{DemoColumns, demo_tree, name_of};
use canopy_layout::{Border, BoxListSink, CheckedSink, Direction, Layout};
use canopy_pick::pick;
use canopy_tree::{NodeId, Tree};
use kurbo::{Point, Rect};

fn main() {
    let (tree, columns, weights) = demo_tree();
    let view = Rect::new(0.0, 0.0, 640.0, 480.0);

    for layout in [
        Layout::SliceAndDice(Direction::LeftToRight),
        Layout::Squarified,
        Layout::Strip(Direction::LeftToRight),
    ] {
        // Wrap the capture sink in the validator; a clean pass is free
        // documentation that the algorithm honors the callback contract.
        let capture = BoxListSink::new(tree.len()).with_border(Border::TopLeft {
            top: 14.0,
            left: 2.0,
        });
        let mut sink = CheckedSink::new(capture);
        let visited = layout.run(&tree, &weights, &(), &mut sink, view, NodeId::ROOT);
        sink.assert_clean();
        let capture = sink.into_inner();

        println!("== {layout:?}: visited {visited} nodes");
        print_leaves(&tree, columns, &capture);
        println!("   worst leaf aspect ratio: {:.2}", worst_aspect(&tree, &capture));
    }

    // Picking runs the same recursion as rendering, so the hit box equals
    // the drawn box.
    let mouse = Point::new(320.0, 240.0);
    let result = pick(
        &tree,
        &weights,
        &(),
        Layout::Squarified,
        view,
        NodeId::ROOT,
        mouse,
    );
    match result.hit() {
        Some(node) => {
            println!("pick at {mouse:?}: {}", name_of(&tree, columns, node));
            let crumbs: Vec<String> = result
                .path()
                .iter()
                .map(|(n, _)| name_of(&tree, columns, *n))
                .collect();
            println!("  path: {}", crumbs.join(" / "));
        }
        None => println!("pick at {mouse:?}: nothing"),
    }
}

fn print_leaves(tree: &Tree, columns: DemoColumns, capture: &BoxListSink) {
    for node in tree.descendants(NodeId::ROOT) {
        if !tree.is_leaf(node) {
            continue;
        }
        let rect = capture.get(node);
        println!(
            "   {:<12} ({:6.1},{:6.1})..({:6.1},{:6.1})",
            name_of(tree, columns, node),
            rect.x0,
            rect.y0,
            rect.x1,
            rect.y1
        );
    }
}

fn worst_aspect(tree: &Tree, capture: &BoxListSink) -> f64 {
    tree.descendants(NodeId::ROOT)
        .filter(|&n| tree.is_leaf(n))
        .map(|n| {
            let r = capture.get(n);
            if r.width() <= 0.0 || r.height() <= 0.0 {
                return 1.0;
            }
            (r.width() / r.height()).max(r.height() / r.width())
        })
        .fold(1.0, f64::max)
}
