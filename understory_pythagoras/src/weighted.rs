// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal in-memory adapter: nodes with sample counts and nothing else.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::adapter::{Children, TreeAdapter};

#[derive(Clone, Debug)]
struct Entry {
    parent: Option<usize>,
    children: SmallVec<[usize; 2]>,
    samples: usize,
    depth: usize,
}

/// A tree built from sample counts, where a node's weight is its share of its siblings' samples.
///
/// Node `0` is the root. Useful for tests, demos, and hosts whose data is a plain
/// hierarchy rather than a trained model.
///
/// ```
/// use understory_pythagoras::{TreeAdapter, WeightedTree};
///
/// let mut t = WeightedTree::new(4);
/// let a = t.push_child(0, 3);
/// let b = t.push_child(0, 1);
/// assert_eq!(t.weight(a), 0.75);
/// assert_eq!(t.weight(b), 0.25);
/// assert_eq!(t.max_depth(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct WeightedTree {
    nodes: Vec<Entry>,
    max_depth: usize,
}

impl WeightedTree {
    /// Create a tree whose root holds `root_samples` samples.
    pub fn new(root_samples: usize) -> Self {
        Self {
            nodes: alloc::vec![Entry {
                parent: None,
                children: SmallVec::new(),
                samples: root_samples,
                depth: 0,
            }],
            max_depth: 0,
        }
    }

    /// Append a child holding `samples` samples under `parent` and return its id.
    ///
    /// Panics if `parent` is not a node of this tree.
    pub fn push_child(&mut self, parent: usize, samples: usize) -> usize {
        assert!(parent < self.nodes.len(), "unknown parent node {parent}");
        let id = self.nodes.len();
        let depth = self.nodes[parent].depth + 1;
        self.nodes[parent].children.push(id);
        self.nodes.push(Entry {
            parent: Some(parent),
            children: SmallVec::new(),
            samples,
            depth,
        });
        self.max_depth = self.max_depth.max(depth);
        id
    }

    /// Build a complete tree of the given depth where every node has `arity`
    /// children with equal sample counts.
    ///
    /// An `arity` of zero yields the bare root.
    pub fn balanced(depth: usize, arity: usize) -> Self {
        if arity == 0 {
            return Self::new(1);
        }
        let leaves = arity.pow(u32::try_from(depth).unwrap_or(u32::MAX));
        let mut tree = Self::new(leaves);
        let mut level = alloc::vec![0_usize];
        for _ in 0..depth {
            let mut next = Vec::with_capacity(level.len() * arity);
            for parent in level {
                let share = tree.nodes[parent].samples / arity;
                for _ in 0..arity {
                    next.push(tree.push_child(parent, share));
                }
            }
            level = next;
        }
        tree
    }
}

impl TreeAdapter for WeightedTree {
    type NodeId = usize;
    type Distribution = usize;
    type Attribute = ();

    fn root(&self) -> usize {
        0
    }

    fn weight(&self, node: usize) -> f64 {
        let Some(parent) = self.nodes[node].parent else {
            return 1.0;
        };
        let total: usize = self.nodes[parent]
            .children
            .iter()
            .map(|&c| self.nodes[c].samples)
            .sum();
        if total == 0 {
            // Empty siblings share the arc evenly.
            return 1.0 / self.nodes[parent].children.len() as f64;
        }
        self.nodes[node].samples as f64 / total as f64
    }

    fn num_samples(&self, node: usize) -> usize {
        self.nodes[node].samples
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }

    fn has_children(&self, node: usize) -> bool {
        !self.nodes[node].children.is_empty()
    }

    fn children(&self, node: usize) -> Children<usize> {
        self.nodes[node].children.clone()
    }

    fn distribution(&self, node: usize) -> usize {
        self.nodes[node].samples
    }

    fn impurity(&self, _node: usize) -> f64 {
        0.0
    }

    fn attribute(&self, _node: usize) -> Option<()> {
        None
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}
