// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Print the rules describing every node of a decision tree, and the rows each leaf holds.
//!
//! Set `RUST_LOG=debug` to see the adapter's own records.
//!
//! Run:
//! - `cargo run -p understory_pythagoras_demos --example decision_rules`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use understory_decision_tree::{Attribute, CartNode, CartTree, Domain, Rule, Split};
use understory_pythagoras::TreeAdapter;

fn describe(rule: &Rule) -> String {
    match rule {
        Rule::Discrete(r) => {
            format!("{} {} {}", r.attr_name, if r.equals { "is" } else { "is not" }, r.value)
        }
        Rule::Continuous(r) => {
            let op = match (r.greater_than, r.inclusive) {
                (true, true) => "≥",
                (true, false) => ">",
                (false, true) => "≤",
                (false, false) => "<",
            };
            format!("{} {op} {:.2}", r.attr_name, r.value)
        }
        Rule::Interval(r) => format!(
            "{:.2} {} {} {} {:.2}",
            r.left.value,
            if r.left.inclusive { "≤" } else { "<" },
            r.attr_name,
            if r.right.inclusive { "≤" } else { "<" },
            r.right.value
        ),
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let domain = Domain::new(vec![
        Attribute::continuous("sepal width"),
        Attribute::continuous("petal length"),
    ]);
    let s = |feature, threshold, left, right| Split {
        feature,
        threshold,
        left,
        right,
    };
    let tree = CartTree::new(
        vec![
            CartNode::split(s(1, 4.75, 1, 2), 100, vec![50.0, 50.0], 0.5),
            CartNode::split(s(1, 1.9, 3, 4), 52, vec![48.0, 4.0], 0.14),
            CartNode::leaf(48, vec![2.0, 46.0], 0.08),
            CartNode::leaf(30, vec![30.0, 0.0], 0.0),
            CartNode::split(s(0, 2.6, 5, 6), 22, vec![18.0, 4.0], 0.3),
            CartNode::leaf(5, vec![1.0, 4.0], 0.32),
            CartNode::leaf(17, vec![17.0, 0.0], 0.0),
        ],
        domain,
    )
    .expect("the table above is a valid tree");

    for node in 0..tree.num_nodes() {
        match tree.rules(node) {
            Ok(rules) if rules.is_empty() => println!("node {node}: everything"),
            Ok(rules) => {
                tracing::info!(node, rules = rules.len(), "aggregated rules");
                let parts: Vec<String> = rules.rules().map(describe).collect();
                println!("node {node}: {}", parts.join(" and "));
            }
            Err(err) => {
                tracing::warn!(node, %err, "rules unavailable");
                println!("node {node}: {err}");
            }
        }
    }

    let rows = [
        [3.0, 1.4],
        [2.4, 3.3],
        [2.9, 4.5],
        [3.1, 5.6],
        [2.5, 5.0],
        [3.4, 1.5],
    ];
    for leaf in tree.samples_in_leaves(&rows) {
        tracing::info!(leaf = leaf.leaf, rows = leaf.rows.len(), "partitioned rows");
        println!("leaf {}: rows {:?}", leaf.leaf, leaf.rows);
    }
    println!(
        "rows under node 1: {:?}",
        tree.instances_in_nodes(&rows, &[1])
    );
}
