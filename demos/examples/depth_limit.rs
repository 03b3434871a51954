// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive a draw manager over a decision tree and print the events a host would apply.
//!
//! Set `RUST_LOG=debug` to see the manager's own records.
//!
//! Run:
//! - `cargo run -p understory_pythagoras_demos --example depth_limit`

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use understory_decision_tree::{Attribute, CartNode, CartTree, Domain, Split};
use understory_pythagoras::TreeAdapter;
use understory_pythagoras_view::{DrawEvent, DrawManager, Rgba8};

fn print_events(title: &str, events: &[DrawEvent<usize>]) {
    tracing::info!(section = title, events = events.len(), "applied draw events");
    println!("== {title} ({} events)", events.len());
    for e in events {
        match e {
            DrawEvent::Create {
                node,
                square,
                depth,
                z_index,
                tooltip,
                ..
            } => println!(
                "  create {node:>2} depth={depth} z={z_index:>7} side={:.1} [{tooltip}]",
                square.length
            ),
            DrawEvent::Show { node } => println!("  show   {node:>2}"),
            DrawEvent::Hide { node } => println!("  hide   {node:>2}"),
            DrawEvent::Destroy { node } => println!("  destroy {node:>2}"),
            DrawEvent::Restyle { node, color, .. } => println!("  restyle {node:>2} -> {color:?}"),
            DrawEvent::Focus { node, emphasis } => println!("  focus  {node:>2} {emphasis:?}"),
        }
    }
}

fn build_tree() -> CartTree {
    let domain = Domain::new(vec![
        Attribute::continuous("age"),
        Attribute::indicator("class", ["first", "second", "third"], 2),
        Attribute::indicator("sex", ["female", "male"], 1),
    ]);
    let s = |feature, threshold, left, right| Split {
        feature,
        threshold,
        left,
        right,
    };
    CartTree::new(
        vec![
            CartNode::split(s(2, 0.5, 1, 2), 891, vec![549.0, 342.0], 0.473),
            CartNode::split(s(1, 0.5, 3, 4), 314, vec![81.0, 233.0], 0.383),
            CartNode::split(s(0, 6.5, 5, 6), 577, vec![468.0, 109.0], 0.306),
            CartNode::leaf(170, vec![9.0, 161.0], 0.1),
            CartNode::leaf(144, vec![72.0, 72.0], 0.5),
            CartNode::leaf(24, vec![10.0, 14.0], 0.486),
            CartNode::leaf(553, vec![458.0, 95.0], 0.285),
        ],
        domain,
    )
    .expect("the table above is a valid tree")
    .with_weight_adjustment(f64::ln_1p)
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut manager: DrawManager<CartTree> = DrawManager::default();
    manager.set_tooltip_fn(|t, n| match t.rules(n) {
        Ok(rules) if rules.is_empty() => format!("{} samples", t.num_samples(n)),
        Ok(rules) => format!("{} samples, {} rules", t.num_samples(n), rules.len()),
        Err(err) => format!("{err}"),
    });

    print_events("set tree", &manager.set_tree(Some(build_tree())));
    print_events("collapse to root", &manager.set_depth_limit(0));
    print_events("expand one level", &manager.set_depth_limit(1));
    print_events("expand all", &manager.set_depth_limit(2));

    manager.set_node_color_fn(|t, n| {
        let dist = t.distribution(n);
        let survived = dist.get(1).copied().unwrap_or(0.0) / dist.iter().sum::<f64>().max(1.0);
        let g = (survived * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba8::rgb(255 - g, g, 64)
    });
    print_events("recolor by survival", &manager.refresh_styles());

    // Host time in a real app would come from a monotonic clock.
    let t0 = Duration::from_secs(10);
    print_events("hover node 2", &manager.hover_enter(2));
    manager.hover_leave(2, t0);
    print_events("poll too early", &manager.poll_timer(t0 + Duration::from_millis(100)));
    print_events("poll after delay", &manager.poll_timer(t0 + Duration::from_millis(250)));

    print_events("clear", &manager.clear());
}
