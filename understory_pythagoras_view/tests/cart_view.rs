// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A decision tree laid out and drawn end to end.

use understory_decision_tree::{Attribute, CartNode, CartTree, Domain, Rule, Split};
use understory_pythagoras::TreeAdapter;
use understory_pythagoras_view::{DrawEvent, DrawManager, Rgba8};

fn iris_like() -> CartTree {
    let domain = Domain::new(vec![
        Attribute::continuous("petal length"),
        Attribute::continuous("petal width"),
    ]);
    let s = |feature, threshold, left, right| Split {
        feature,
        threshold,
        left,
        right,
    };
    let nodes = vec![
        CartNode::split(s(0, 2.45, 1, 2), 150, vec![50.0, 50.0, 50.0], 0.667),
        CartNode::leaf(50, vec![50.0, 0.0, 0.0], 0.0),
        CartNode::split(s(1, 1.75, 3, 4), 100, vec![0.0, 50.0, 50.0], 0.5),
        CartNode::leaf(54, vec![0.0, 49.0, 5.0], 0.168),
        CartNode::leaf(46, vec![0.0, 1.0, 45.0], 0.043),
    ];
    CartTree::new(nodes, domain).unwrap()
}

fn majority_color(tree: &CartTree, node: usize) -> Rgba8 {
    const PALETTE: [Rgba8; 3] = [
        Rgba8::rgb(0xE4, 0x1A, 0x1C),
        Rgba8::rgb(0x37, 0x7E, 0xB8),
        Rgba8::rgb(0x4D, 0xAF, 0x4A),
    ];
    let dist = tree.distribution(node);
    let best = (0..dist.len())
        .max_by(|&a, &b| dist[a].total_cmp(&dist[b]))
        .unwrap_or(0);
    PALETTE[best % PALETTE.len()]
}

#[test]
fn cart_tree_draws_with_weighted_squares() {
    let mut manager: DrawManager<CartTree> = DrawManager::default();
    manager.set_node_color_fn(majority_color);
    manager.set_tooltip_fn(|t: &CartTree, n| {
        let rules = t.rules(n).map(|r| r.len()).unwrap_or(0);
        format!("{} samples, {rules} rules", t.num_samples(n))
    });

    let events = manager.set_tree(Some(iris_like()));
    let creates: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            DrawEvent::Create {
                node,
                square,
                color,
                tooltip,
                ..
            } => Some((*node, square.length, *color, tooltip.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(creates.len(), 5);

    // Root, then its children in order, then the grandchildren.
    let order: Vec<usize> = creates.iter().map(|c| c.0).collect();
    assert_eq!(order, [0, 1, 2, 3, 4]);

    // The heavier child gets the larger square.
    assert!(creates[2].1 > creates[1].1);
    assert_eq!(creates[1].2, Rgba8::rgb(0xE4, 0x1A, 0x1C));
    assert_eq!(creates[4].3, "46 samples, 2 rules");

    // Child arcs on each parent tile the half-turn.
    let tree = manager.tree().unwrap();
    for (id, _) in tree.iter() {
        let kids = tree.children(id);
        if kids.is_empty() {
            continue;
        }
        let sweep: f64 = kids.iter().map(|&k| tree[k].arc().unwrap().sweep).sum();
        assert!((sweep - core::f64::consts::PI).abs() < 1e-9);
    }
}

#[test]
fn rules_of_a_drawn_leaf() {
    let mut manager: DrawManager<CartTree> = DrawManager::default();
    manager.set_tree(Some(iris_like()));
    manager.set_depth_limit(1);
    assert_eq!(manager.visible_labels(), [0, 1, 2]);
    assert!(manager.is_materialized(4) && !manager.is_visible(4));

    let adapter = manager.adapter().unwrap();
    let rules = adapter.rules(4).unwrap();
    let names: Vec<&str> = rules.rules().map(Rule::attr_name).collect();
    assert_eq!(names, ["petal length", "petal width"]);

    let rows = [[1.0, 0.2], [5.0, 2.0], [4.0, 1.0], [6.1, 2.5]];
    assert_eq!(adapter.instances_in_nodes(&rows, &[4]), vec![1, 3]);
    assert_eq!(adapter.instances_in_nodes(&rows, &[2]), vec![2, 1, 3]);
}
