// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_pythagoras::WeightedTree;
use understory_pythagoras_view::{DrawConfig, DrawManager};

fn manager(depth: usize, initial: i64) -> DrawManager<WeightedTree> {
    let mut m = DrawManager::new(DrawConfig {
        initial_depth_limit: Some(initial),
        ..DrawConfig::default()
    });
    let _ = m.set_tree(Some(WeightedTree::balanced(depth, 2)));
    m
}

fn bench_set_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_tree");
    for &depth in &[8usize, 12] {
        let adapter = WeightedTree::balanced(depth, 2);
        group.bench_function(format!("binary_depth{}", depth), |b| {
            b.iter_batched(
                || (DrawManager::<WeightedTree>::default(), adapter.clone()),
                |(mut m, a)| black_box(m.set_tree(Some(a)).len()),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("depth_limit");
    let depth = 12;
    // Every handle exists after the first full draw, so toggling only shows and hides.
    let mut m = manager(depth, depth as i64);
    group.bench_function("toggle_one_level", |b| {
        b.iter(|| {
            black_box(m.set_depth_limit(depth as i64 - 1).len());
            black_box(m.set_depth_limit(depth as i64).len());
        })
    });
    group.bench_function("collapse_and_expand_all", |b| {
        b.iter(|| {
            black_box(m.set_depth_limit(0).len());
            black_box(m.set_depth_limit(depth as i64).len());
        })
    });
    group.bench_function("first_expand", |b| {
        b.iter_batched(
            || manager(depth, 0),
            |mut m| black_box(m.set_depth_limit(depth as i64).len()),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_set_tree, bench_toggle);
criterion_main!(benches);
