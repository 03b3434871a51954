// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout engine and the positioned tree it produces.

use alloc::vec::Vec;
use core::f64::consts::PI;
use core::hash::Hash;
use core::ops::Index;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::adapter::TreeAdapter;
use crate::square::Square;

/// Identifier of a node in a [`PythagorasTree`].
///
/// Ids are dense indices in pre-order: the layout root is always id `0`, and a
/// node's id is smaller than the ids of all of its descendants.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LayoutId(u32);

impl LayoutId {
    /// The id of the layout root.
    pub const ROOT: Self = Self(0);

    fn new(idx: usize) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "LayoutId uses 32-bit indices by design."
        )]
        Self(idx as u32)
    }

    /// Position of this node in pre-order.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The sub-arc of its parent's drawing edge that a node occupies.
///
/// Both values are in radians, measured within the half-turn above the parent's
/// drawing edge, so sibling arcs tile `[0, π]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeArc {
    /// Angle consumed by earlier siblings.
    pub start: f64,
    /// The node's own share: `weight * π`.
    pub sweep: f64,
}

impl EdgeArc {
    /// Angle at which the next sibling starts.
    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }
}

/// One positioned node.
#[derive(Clone, Debug)]
pub struct LayoutNode<K> {
    label: K,
    square: Square,
    parent: Option<LayoutId>,
    children: SmallVec<[LayoutId; 2]>,
    depth: usize,
    arc: Option<EdgeArc>,
}

impl<K: Copy> LayoutNode<K> {
    /// The adapter's identity for this node.
    pub fn label(&self) -> K {
        self.label
    }

    /// The square computed for this node.
    pub fn square(&self) -> Square {
        self.square
    }

    /// Parent back-reference; `None` for the layout root.
    pub fn parent(&self) -> Option<LayoutId> {
        self.parent
    }

    /// Children in adapter order.
    pub fn children(&self) -> &[LayoutId] {
        &self.children
    }

    /// Distance from the layout root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Arc on the parent's drawing edge; `None` for the layout root.
    pub fn arc(&self) -> Option<EdgeArc> {
        self.arc
    }
}

/// A tree of positioned squares, one per adapter node.
///
/// Built once by [`PythagorasLayout::compute`] and immutable afterwards. Nodes
/// are stored in pre-order; parents are non-owning back-references.
#[derive(Clone)]
pub struct PythagorasTree<K> {
    nodes: Vec<LayoutNode<K>>,
    by_label: HashMap<K, LayoutId>,
    max_depth: usize,
}

impl<K> core::fmt::Debug for PythagorasTree<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PythagorasTree")
            .field("nodes", &self.nodes.len())
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash> PythagorasTree<K> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            by_label: HashMap::with_capacity(capacity),
            max_depth: 0,
        }
    }

    fn push(&mut self, node: LayoutNode<K>) -> LayoutId {
        let id = LayoutId::new(self.nodes.len());
        self.max_depth = self.max_depth.max(node.depth);
        self.by_label.insert(node.label, id);
        self.nodes.push(node);
        id
    }

    /// The layout root.
    pub fn root(&self) -> LayoutId {
        LayoutId::ROOT
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree holds no nodes. Trees built by the layout always hold at least the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth of the deepest node.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Access a node.
    pub fn get(&self, id: LayoutId) -> Option<&LayoutNode<K>> {
        self.nodes.get(id.index())
    }

    /// Find the node for an adapter label.
    pub fn find(&self, label: K) -> Option<LayoutId> {
        self.by_label.get(&label).copied()
    }

    /// Children of `id` in adapter order; empty for unknown ids.
    pub fn children(&self, id: LayoutId) -> &[LayoutId] {
        self.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Parent of `id`.
    pub fn parent(&self, id: LayoutId) -> Option<LayoutId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Iterate all nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (LayoutId, &LayoutNode<K>)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (LayoutId::new(i), n))
    }

    /// Path from the layout root to `id` (inclusive).
    pub fn path_to_root(&self, mut id: LayoutId) -> Vec<LayoutId> {
        let mut out = Vec::new();
        if self.get(id).is_none() {
            return out;
        }
        loop {
            out.push(id);
            match self.parent(id) {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// All nodes in the subtree rooted at `id` (inclusive), in pre-order.
    pub fn subtree(&self, id: LayoutId) -> Vec<LayoutId> {
        let mut out = Vec::new();
        if self.get(id).is_none() {
            return out;
        }
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }
}

impl<K> Index<LayoutId> for PythagorasTree<K> {
    type Output = LayoutNode<K>;

    fn index(&self, id: LayoutId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

/// Layout engine turning a [`TreeAdapter`] into a [`PythagorasTree`].
///
/// Holds the running total of arc consumed under each parent while one
/// traversal is in flight. The total is reset at the start of every
/// [`compute`](Self::compute) call, so an engine can be reused and results never
/// depend on earlier calls.
#[derive(Clone, Debug)]
pub struct PythagorasLayout<K> {
    consumed: HashMap<K, f64>,
}

impl<K: Copy + Eq + Hash> Default for PythagorasLayout<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> PythagorasLayout<K> {
    /// Create a layout engine.
    pub fn new() -> Self {
        Self {
            consumed: HashMap::new(),
        }
    }

    /// Lay out the subtree of `node`, placing `node` itself at `square`.
    ///
    /// Every child takes `weight * π` of its parent's half-turn, in adapter
    /// order, and gets side `parent_length * sin(alpha / 2)`.
    pub fn compute<A>(&mut self, adapter: &A, node: K, square: Square) -> PythagorasTree<K>
    where
        A: TreeAdapter<NodeId = K>,
    {
        self.consumed.clear();
        let mut tree = PythagorasTree::with_capacity(adapter.num_nodes());
        self.place(adapter, &mut tree, node, square, None, 0, None);
        tracing::debug!(
            nodes = tree.len(),
            max_depth = tree.max_depth(),
            "computed pythagoras layout"
        );
        tree
    }

    fn place<A>(
        &mut self,
        adapter: &A,
        tree: &mut PythagorasTree<K>,
        label: K,
        square: Square,
        parent: Option<LayoutId>,
        depth: usize,
        arc: Option<EdgeArc>,
    ) -> LayoutId
    where
        A: TreeAdapter<NodeId = K>,
    {
        let id = tree.push(LayoutNode {
            label,
            square,
            parent,
            children: SmallVec::new(),
            depth,
            arc,
        });
        for child in adapter.children(label) {
            let alpha = adapter.weight(child) * PI;
            let prior = self.consumed.get(&label).copied().unwrap_or(0.0);
            let child_square = square.child(alpha, prior);
            *self.consumed.entry(label).or_insert(0.0) += alpha;
            let arc = EdgeArc {
                start: prior,
                sweep: alpha,
            };
            let child_id = self.place(
                adapter,
                tree,
                child,
                child_square,
                Some(id),
                depth + 1,
                Some(arc),
            );
            tree.nodes[id.index()].children.push(child_id);
        }
        id
    }
}

/// Lay out the whole tree of `adapter` starting from `square`.
///
/// Shorthand for [`PythagorasLayout::compute`] from [`TreeAdapter::root`] with a
/// fresh engine.
pub fn compute_layout<A: TreeAdapter>(adapter: &A, square: Square) -> PythagorasTree<A::NodeId> {
    PythagorasLayout::new().compute(adapter, adapter.root(), square)
}
