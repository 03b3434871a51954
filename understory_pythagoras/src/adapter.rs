// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The read-only tree capability the layout consumes.

use core::fmt::Debug;
use core::hash::Hash;

use smallvec::SmallVec;

/// Ordered child identifiers of a node. Binary trees never spill to the heap.
pub type Children<K> = SmallVec<[K; 2]>;

/// Read-only view over a backing tree structure.
///
/// Implementors expose node identity, structure and per-node statistics without
/// revealing how the tree is stored. The layout only needs [`TreeAdapter::root`],
/// [`TreeAdapter::children`] and [`TreeAdapter::weight`]; the remaining methods are
/// what hosts typically need to style and describe nodes.
///
/// ## Contract
///
/// - Node identities are unique within one adapter.
/// - The weights of the children of any node sum to `1.0`. This is not checked;
///   violating it produces distorted but well-defined geometry.
/// - The structure is a tree: no cycles and every non-root node has exactly one
///   parent. Cyclic adapters make the layout recurse without bound.
/// - Adapters are immutable once handed to the layout.
pub trait TreeAdapter {
    /// Node identity.
    type NodeId: Copy + Eq + Hash + Debug;
    /// Per-node distribution of samples (for example class counts).
    type Distribution;
    /// Description of the attribute a node splits on.
    type Attribute;

    /// The root node.
    fn root(&self) -> Self::NodeId;

    /// Share of the parent's arc taken by `node`, in `(0, 1]`.
    fn weight(&self, node: Self::NodeId) -> f64;

    /// Number of samples that reached `node`.
    fn num_samples(&self, node: Self::NodeId) -> usize;

    /// Parent of `node`, or `None` for the root.
    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Whether `node` has any children.
    fn has_children(&self, node: Self::NodeId) -> bool;

    /// Children of `node` in drawing order.
    ///
    /// The order decides where each child sits on the parent's drawing edge.
    fn children(&self, node: Self::NodeId) -> Children<Self::NodeId>;

    /// Distribution of samples in `node`.
    fn distribution(&self, node: Self::NodeId) -> Self::Distribution;

    /// Impurity of `node`.
    fn impurity(&self, node: Self::NodeId) -> f64;

    /// Attribute `node` splits on, or `None` for leaves.
    fn attribute(&self, node: Self::NodeId) -> Option<Self::Attribute>;

    /// Depth of the deepest node (the root has depth `0`).
    fn max_depth(&self) -> usize;

    /// Number of nodes in the tree.
    fn num_nodes(&self) -> usize;

    /// True if `node` has no children.
    fn is_leaf(&self, node: Self::NodeId) -> bool {
        !self.has_children(node)
    }

    /// True if `node` is the root.
    fn is_root(&self, node: Self::NodeId) -> bool {
        node == self.root()
    }
}
