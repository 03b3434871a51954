// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-order allocation for drawn squares.
//!
//! Every node owns a z range of width `step` starting at `z`. Its children split
//! that range evenly in sibling order, so a later sibling and its whole subtree
//! stack above an earlier one.

/// Width of the root's z range.
pub const Z_STEP: u64 = 5_000_000;

/// A node's z value and the width of the range its subtree may use.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Stacking {
    /// The node's own z value.
    pub z: u64,
    /// Width of the range reserved for the node's subtree.
    pub step: u64,
}

impl Stacking {
    /// Stacking of the layout root.
    pub const ROOT: Self = Self { z: 0, step: Z_STEP };

    /// Stacking of the child at `index` among `siblings` children.
    ///
    /// The step is divided with integer division, so at depth `d` of a binary
    /// tree the step is `Z_STEP >> d` and siblings collapse onto one z value once
    /// it reaches zero.
    pub fn child(self, index: usize, siblings: usize) -> Self {
        let n = u64::try_from(siblings.max(1)).unwrap_or(u64::MAX);
        let i = u64::try_from(index).unwrap_or(u64::MAX);
        let step = self.step / n;
        Self {
            z: self.z.saturating_add(i.saturating_mul(step)),
            step,
        }
    }
}
