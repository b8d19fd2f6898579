// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use canopy_layout::{BoxListSink, CountingSink, Direction, Layout, slice_and_dice, squarified, strip};
use canopy_pick::pick;
use canopy_tree::{Column, NodeId, Tree, sum_weights};
use kurbo::{Point, Rect};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range_usize(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive == 0 {
            return 0;
        }
        (self.next_u32() as usize) % upper_exclusive
    }
}

/// Build a random `n`-node tree with leaf weights in `1..=100`, aggregated.
fn build_weighted_tree(n: usize, seed: u64) -> (Tree, Column<f64>) {
    let mut tree = Tree::new();
    let mut rng = Lcg::new(seed);
    let mut ids = vec![NodeId::ROOT];
    for _ in 1..n {
        let parent = ids[rng.gen_range_usize(ids.len())];
        let id = tree.add_node(parent).expect("parent ids come from this tree");
        ids.push(id);
    }
    let mut weights = Column::with_len(tree.len());
    for &id in &ids {
        if tree.is_leaf(id) {
            weights.set(id, f64::from(rng.next_u32() % 100 + 1));
        }
    }
    let _ = sum_weights(&tree, &mut weights);
    (tree, weights)
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("canopy_layout");
    group.sample_size(30);
    let view = Rect::new(0.0, 0.0, 1920.0, 1080.0);

    for &n in &[10_000_usize, 100_000] {
        let (tree, weights) = build_weighted_tree(n, 0xCA_0000_0000_0001);

        group.bench_function(format!("slice_and_dice(n={n})"), |b| {
            b.iter(|| {
                let mut sink = CountingSink::default();
                slice_and_dice(
                    &tree,
                    &weights,
                    &(),
                    &mut sink,
                    Direction::LeftToRight,
                    view,
                    NodeId::ROOT,
                );
                black_box(sink.nodes)
            });
        });

        group.bench_function(format!("squarified(n={n})"), |b| {
            b.iter(|| {
                let mut sink = CountingSink::default();
                squarified(&tree, &weights, &(), &mut sink, view, NodeId::ROOT);
                black_box(sink.nodes)
            });
        });

        group.bench_function(format!("strip(n={n})"), |b| {
            b.iter(|| {
                let mut sink = CountingSink::default();
                strip(
                    &tree,
                    &weights,
                    &(),
                    &mut sink,
                    Direction::LeftToRight,
                    view,
                    NodeId::ROOT,
                );
                black_box(sink.nodes)
            });
        });

        group.bench_function(format!("capture_box_list(n={n})"), |b| {
            let mut sink = BoxListSink::new(tree.len());
            b.iter(|| {
                squarified(&tree, &weights, &(), &mut sink, view, NodeId::ROOT);
                black_box(sink.boxes().len())
            });
        });

        // Picking prunes aggressively, so it should be far cheaper than a
        // full capture pass over the same tree.
        group.bench_function(format!("pick(n={n})"), |b| {
            b.iter(|| {
                let result = pick(
                    &tree,
                    &weights,
                    &(),
                    Layout::Squarified,
                    view,
                    NodeId::ROOT,
                    Point::new(960.0, 540.0),
                );
                black_box(result.hit())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
