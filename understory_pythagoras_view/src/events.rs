// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instructions from the draw manager to the rendering host.

use alloc::string::String;

use understory_pythagoras::Square;

use crate::style::Rgba8;

/// How a drawn square should stand out while the pointer is over the tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Emphasis {
    /// Drawn at its own z value and full opacity.
    #[default]
    Normal,
    /// Part of the hovered branch: bring to the front at full opacity.
    Raised,
    /// Outside the hovered branch: keep its z value, fade it out.
    Dimmed,
}

/// One change the host should apply to its scene.
///
/// Handles are keyed by the adapter's node id. A host keeps one renderable per
/// id between `Create` and `Destroy`.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawEvent<K> {
    /// Build a new renderable for `node`. It starts visible.
    Create {
        /// Adapter node id.
        node: K,
        /// Where to draw it.
        square: Square,
        /// Fill color.
        color: Rgba8,
        /// Hover text.
        tooltip: String,
        /// Depth in the layout, root is `0`.
        depth: usize,
        /// Stacking order; larger values draw on top.
        z_index: u64,
    },
    /// Make an existing renderable visible again.
    Show {
        /// Adapter node id.
        node: K,
    },
    /// Hide a renderable but keep it for later.
    Hide {
        /// Adapter node id.
        node: K,
    },
    /// Drop a renderable.
    Destroy {
        /// Adapter node id.
        node: K,
    },
    /// Replace the fill color and tooltip of a renderable.
    Restyle {
        /// Adapter node id.
        node: K,
        /// New fill color.
        color: Rgba8,
        /// New hover text.
        tooltip: String,
    },
    /// Change the hover emphasis of a renderable.
    Focus {
        /// Adapter node id.
        node: K,
        /// New emphasis.
        emphasis: Emphasis,
    },
}

impl<K: Copy> DrawEvent<K> {
    /// The node this event applies to.
    pub fn node(&self) -> K {
        match self {
            Self::Create { node, .. }
            | Self::Show { node }
            | Self::Hide { node }
            | Self::Destroy { node }
            | Self::Restyle { node, .. }
            | Self::Focus { node, .. } => *node,
        }
    }
}
