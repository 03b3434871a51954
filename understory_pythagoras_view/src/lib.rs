// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_pythagoras_view --heading-base-level=0

//! Understory Pythagoras View: incremental drawing of Pythagoras tree layouts.
//!
//! This crate sits between [`understory_pythagoras`] and a rendering host. It owns
//! a tree's layout and decides which squares exist and which are visible; the
//! host only applies the [`DrawEvent`]s it gets back.
//!
//! - [`DrawManager`]: depth-limited visible set with handle reuse, styling
//!   callbacks and hover focus.
//! - [`DrawEvent`]: create/show/hide/destroy/restyle/focus instructions keyed by
//!   the adapter's node id.
//! - [`Stacking`]: z-order allocation that keeps each subtree in its own range.
//! - [`Debounce`]: the single-shot timer behind hover restore, driven by host time.
//!
//! ## Depth limit
//!
//! The limit selects every node whose depth is at most the limit; the root has
//! depth `0`. Lowering it hides squares, raising it shows them again, and a square
//! is created at most once while its tree is set.
//!
//! ## Time
//!
//! There is no clock in here. Hover calls and [`DrawManager::poll_timer`] take a
//! monotonic [`core::time::Duration`] supplied by the host, which makes behavior
//! reproducible in tests.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod events;
mod focus;
mod manager;
mod stacking;
mod style;

pub use events::{DrawEvent, Emphasis};
pub use focus::Debounce;
pub use manager::{DEFAULT_HOVER_DELAY, DrawConfig, DrawManager};
pub use stacking::{Stacking, Z_STEP};
pub use style::{DEFAULT_NODE_COLOR, DEFAULT_TOOLTIP, NodeColorFn, Rgba8, TooltipFn};
