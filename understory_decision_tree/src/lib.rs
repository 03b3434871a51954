// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_decision_tree --heading-base-level=0

//! Understory Decision Tree: a CART adapter for Pythagoras tree layouts.
//!
//! - [`CartTree`]: a validated flat node table that implements
//!   [`TreeAdapter`](understory_pythagoras::TreeAdapter), weighting each node by its
//!   share of its siblings' samples.
//! - [`RuleSet`] and the [`rule`] algebra: the minimal conditions describing a node.
//! - [`CartTree::samples_in_leaves`] / [`CartTree::instances_in_nodes`]: route data
//!   rows through the tree.
//!
//! # Example
//!
//! ```rust
//! use understory_decision_tree::{Attribute, CartNode, CartTree, Domain, Rule, Split};
//! use understory_pythagoras::TreeAdapter;
//!
//! let domain = Domain::new(vec![Attribute::continuous("petal length")]);
//! let nodes = vec![
//!     CartNode::split(Split { feature: 0, threshold: 2.45, left: 1, right: 2 }, 150, vec![], 0.67),
//!     CartNode::leaf(50, vec![], 0.0),
//!     CartNode::leaf(100, vec![], 0.5),
//! ];
//! let tree = CartTree::new(nodes, domain).unwrap();
//!
//! assert!((tree.weight(1) - 1.0 / 3.0).abs() < 1e-12);
//! let rules = tree.rules(2).unwrap();
//! let Some(Rule::Continuous(bound)) = rules.get("petal length") else { unreachable!() };
//! assert!(bound.greater_than && bound.value == 2.45);
//!
//! let rows = [[1.0], [5.0], [2.45]];
//! assert_eq!(tree.instances_in_nodes(&rows, &[1]), vec![0, 2]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cart;
pub mod rule;

pub use cart::{Attribute, CartNode, CartTree, CartTreeError, Domain, LeafSamples, Split};
pub use rule::{
    ContinuousRule, DiscreteRule, IntervalRule, MergeDiagnostic, Rule, RuleKind, RuleSet,
    UnsupportedMergeError, aggregate_rules,
};
