// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pythagoras --heading-base-level=0

//! Understory Pythagoras: a Kurbo-native Pythagoras tree layout.
//!
//! A Pythagoras tree draws every node of a weighted tree as a square. Each child
//! square stands on a segment of its parent's drawing edge, and the segment's
//! angular share is the child's weight, so square sizes encode how much of the
//! parent a child holds and nesting encodes depth.
//!
//! - [`TreeAdapter`]: read-only view over any tree (node identity, weights, structure, statistics).
//! - [`Square`]: center, side length and drawing-edge angle.
//! - [`PythagorasLayout`] / [`compute_layout`]: turn an adapter into a [`PythagorasTree`].
//! - [`WeightedTree`]: a ready-made adapter over plain sample counts.
//!
//! ## Geometry
//!
//! A child with weight `w` spans `alpha = w * π` of the half-turn above its
//! parent's drawing edge and has side `parent_length * sin(alpha / 2)`. Siblings
//! take consecutive arcs in adapter order, so sibling squares never overlap and
//! the arcs of all children of one node tile `[0, π]` when their weights sum to 1.
//!
//! The layout does no rendering and no visibility management; see
//! `understory_pythagoras_view` for incremental drawing by depth.
//!
//! ## Not a graph layout
//!
//! Only strict trees are supported: one parent per node, no cycles, and child
//! weights that partition their parent. Adapters are not validated.
//!
//! # Example
//!
//! ```rust
//! use core::f64::consts::FRAC_PI_2;
//! use kurbo::Point;
//! use understory_pythagoras::{Square, WeightedTree, compute_layout};
//!
//! let mut adapter = WeightedTree::new(10);
//! adapter.push_child(0, 5);
//! adapter.push_child(0, 5);
//!
//! let tree = compute_layout(&adapter, Square::new(Point::ORIGIN, 200.0, -FRAC_PI_2));
//! let kids = tree.children(tree.root());
//! assert_eq!(kids.len(), 2);
//!
//! // Two equal children each take a quarter turn and get side 200 * sin(π/4).
//! let side = tree[kids[0]].square().length;
//! assert!((side - 141.4213562).abs() < 1e-6);
//! assert!((tree[kids[1]].arc().unwrap().start - FRAC_PI_2).abs() < 1e-12);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod adapter;
mod layout;
mod square;
mod util;
mod weighted;

pub use adapter::{Children, TreeAdapter};
pub use layout::{EdgeArc, LayoutId, LayoutNode, PythagorasLayout, PythagorasTree, compute_layout};
pub use square::{Square, compute_center, point_on_edge};
pub use weighted::WeightedTree;
