// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node styling: colors, tooltips and the callbacks that produce them.

use alloc::boxed::Box;
use alloc::string::String;

/// An 8-bit-per-channel RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// Unpack `0xRRGGBB` into an opaque color.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Each channel is masked to 8 bits first."
    )]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }
}

/// Fill used for nodes when no color callback is set.
pub const DEFAULT_NODE_COLOR: Rgba8 = Rgba8::from_hex(0x29_7A_1F);

/// Tooltip used for nodes when no tooltip callback is set.
pub const DEFAULT_TOOLTIP: &str = "Tooltip";

/// Computes a node's fill from the adapter and the node id.
pub type NodeColorFn<A, K> = Box<dyn Fn(&A, K) -> Rgba8>;

/// Computes a node's tooltip from the adapter and the node id.
pub type TooltipFn<A, K> = Box<dyn Fn(&A, K) -> String>;

pub(crate) fn default_color<A, K>() -> NodeColorFn<A, K> {
    Box::new(|_, _| DEFAULT_NODE_COLOR)
}

pub(crate) fn default_tooltip<A, K>() -> TooltipFn<A, K> {
    Box::new(|_, _| String::from(DEFAULT_TOOLTIP))
}
