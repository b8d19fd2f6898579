// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use canopy_query::QuerySet;
use canopy_tree::{Column, NodeId, Tree, sum_weights};

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

fn build_tree(n: usize, seed: u64) -> (Tree, Vec<NodeId>) {
    let mut tree = Tree::new();
    let mut rng = Lcg::new(seed);
    let mut ids = vec![NodeId::ROOT];
    for _ in 1..n {
        let parent = ids[rng.gen_range_usize(ids.len())];
        ids.push(tree.add_node(parent).expect("parent ids come from this tree"));
    }
    (tree, ids)
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("canopy_tree");
    group.sample_size(20);

    group.bench_function("add_node(n=100k)", |b| {
        b.iter(|| {
            let (tree, _) = build_tree(100_000, 0x7E_0000_0000_0001);
            black_box(tree.len())
        });
    });

    // The aggregation pass is the one expected to face million-node trees.
    let (tree, ids) = build_tree(1_000_000, 0x7E_0000_0000_0002);
    let mut leaf_weights = Column::with_len(tree.len());
    let mut rng = Lcg::new(0x7E_0000_0000_0003);
    for &id in &ids {
        if tree.is_leaf(id) {
            leaf_weights.set(id, f64::from(rng.next_u32() % 1000 + 1));
        }
    }
    group.bench_function("sum_weights(n=1M)", |b| {
        b.iter_batched(
            || leaf_weights.clone(),
            |mut weights| black_box(sum_weights(&tree, &mut weights)),
            BatchSize::LargeInput,
        );
    });

    group.bench_function("descendants(n=1M)", |b| {
        b.iter(|| black_box(tree.descendants(NodeId::ROOT).count()));
    });

    let (mut qtree, qids) = build_tree(100_000, 0x7E_0000_0000_0004);
    let size = qtree.add_numeric_column("size");
    let mut rng = Lcg::new(0x7E_0000_0000_0005);
    for &id in &qids {
        if qtree.is_leaf(id) {
            let col = qtree.numeric_mut(size).expect("column registered above");
            col.set(id, f64::from(rng.next_u32() % 1000));
        }
    }
    let mut queries = QuerySet::new();
    let _ = queries.add_range(size, 250.0, 750.0);
    group.bench_function("query_refresh(n=100k)", |b| {
        b.iter(|| {
            let filter = queries.refresh(&qtree).expect("column belongs to this tree");
            black_box(filter.count_filtered())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_tree);
criterion_main!(benches);
