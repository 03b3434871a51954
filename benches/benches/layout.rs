// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::f64::consts::FRAC_PI_2;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Point;
use understory_pythagoras::{PythagorasLayout, Square, TreeAdapter, WeightedTree, compute_layout};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

/// A binary tree whose splits have random, uneven sample counts.
fn gen_skewed_tree(nodes: usize) -> WeightedTree {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut tree = WeightedTree::new(1_000_000);
    let mut open = vec![(0_usize, 1_000_000_usize)];
    while tree.num_nodes() + 2 <= nodes {
        let Some((parent, samples)) = open.pop() else {
            break;
        };
        if samples < 2 {
            continue;
        }
        let left = 1 + (rng.next_u64() as usize) % (samples - 1);
        let right = samples - left;
        let l = tree.push_child(parent, left);
        let r = tree.push_child(parent, right);
        // Alternate which side keeps growing so depth stays moderate.
        if rng.next_u64() & 1 == 0 {
            open.insert(0, (l, left));
            open.push((r, right));
        } else {
            open.insert(0, (r, right));
            open.push((l, left));
        }
    }
    tree
}

fn start() -> Square {
    Square::new(Point::ORIGIN, 200.0, -FRAC_PI_2)
}

fn bench_balanced(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_balanced");
    for &depth in &[6usize, 10, 14] {
        let adapter = WeightedTree::balanced(depth, 2);
        group.throughput(Throughput::Elements(adapter.num_nodes() as u64));
        group.bench_function(format!("binary_depth{}", depth), |b| {
            b.iter(|| black_box(compute_layout(&adapter, start())))
        });
    }
    let adapter = WeightedTree::balanced(5, 4);
    group.throughput(Throughput::Elements(adapter.num_nodes() as u64));
    group.bench_function("quaternary_depth5", |b| {
        b.iter(|| black_box(compute_layout(&adapter, start())))
    });
    group.finish();
}

fn bench_skewed(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_skewed");
    for &n in &[1_001usize, 16_001] {
        let adapter = gen_skewed_tree(n);
        group.throughput(Throughput::Elements(adapter.num_nodes() as u64));
        group.bench_function(format!("fresh_engine_n{}", n), |b| {
            b.iter(|| black_box(compute_layout(&adapter, start())))
        });
        // Reusing one engine keeps the angle memo's allocation.
        let mut engine = PythagorasLayout::new();
        group.bench_function(format!("reused_engine_n{}", n), |b| {
            b.iter(|| black_box(engine.compute(&adapter, adapter.root(), start())))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_balanced, bench_skewed);
criterion_main!(benches);
