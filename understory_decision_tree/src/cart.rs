// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A binary decision tree stored as a flat node table, CART style.

use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::OnceCell;

use hashbrown::{HashMap, HashSet};
use smallvec::smallvec;
use understory_pythagoras::{Children, TreeAdapter};

use crate::rule::{ContinuousRule, DiscreteRule, Rule, RuleSet, UnsupportedMergeError};

/// An attribute a node can split on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attribute {
    /// A numeric attribute split by threshold.
    Continuous {
        /// Attribute name.
        name: String,
    },
    /// A one-hot indicator derived from one value of a discrete variable.
    ///
    /// The indicator is `1` when the variable equals `values[value]`.
    Indicator {
        /// Name of the discrete variable.
        variable: String,
        /// All values of the discrete variable.
        values: Vec<String>,
        /// Index of the value this indicator tests for.
        value: usize,
    },
}

impl Attribute {
    /// A continuous attribute.
    pub fn continuous(name: impl Into<String>) -> Self {
        Self::Continuous { name: name.into() }
    }

    /// An indicator for `values[value]` of a discrete variable.
    pub fn indicator<I, S>(variable: impl Into<String>, values: I, value: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Indicator {
            variable: variable.into(),
            values: values.into_iter().map(Into::into).collect(),
            value,
        }
    }

    /// Name of the attribute (the variable name for indicators).
    pub fn name(&self) -> &str {
        match self {
            Self::Continuous { name } => name,
            Self::Indicator { variable, .. } => variable,
        }
    }
}

/// The attributes a tree's features index into.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Domain {
    /// Attributes by feature index.
    pub attributes: Vec<Attribute>,
}

impl Domain {
    /// Create a domain from attributes in feature order.
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }
}

/// A binary split: rows with `x[feature] <= threshold` go `left`, the rest go `right`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Split {
    /// Feature index into the [`Domain`].
    pub feature: usize,
    /// Decision threshold.
    pub threshold: f64,
    /// Index of the left child.
    pub left: usize,
    /// Index of the right child.
    pub right: usize,
}

/// One row of the node table.
#[derive(Clone, Debug, PartialEq)]
pub struct CartNode {
    /// The node's split; `None` for leaves.
    pub split: Option<Split>,
    /// Number of training samples that reached the node.
    pub n_samples: usize,
    /// Class distribution (classification) or predicted value (regression).
    pub value: Vec<f64>,
    /// Impurity of the node.
    pub impurity: f64,
}

impl CartNode {
    /// A leaf node.
    pub fn leaf(n_samples: usize, value: Vec<f64>, impurity: f64) -> Self {
        Self {
            split: None,
            n_samples,
            value,
            impurity,
        }
    }

    /// An inner node.
    pub fn split(split: Split, n_samples: usize, value: Vec<f64>, impurity: f64) -> Self {
        Self {
            split: Some(split),
            n_samples,
            value,
            impurity,
        }
    }
}

/// Errors reported by [`CartTree::new`] for malformed node tables.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CartTreeError {
    /// The table has no nodes.
    #[error("the node table is empty")]
    Empty,
    /// A split points past the end of the table.
    #[error("node {node} refers to child {child}, but the table has {len} nodes")]
    ChildOutOfRange {
        /// The splitting node.
        node: usize,
        /// The missing child.
        child: usize,
        /// Table length.
        len: usize,
    },
    /// A node is listed as a child more than once (or the root is listed as a child).
    #[error("node {child} has more than one parent")]
    MultipleParents {
        /// The node with several parents.
        child: usize,
    },
    /// A split uses a feature the domain does not have.
    #[error("node {node} splits on feature {feature}, but the domain has {len} attributes")]
    FeatureOutOfRange {
        /// The splitting node.
        node: usize,
        /// The feature index.
        feature: usize,
        /// Number of attributes.
        len: usize,
    },
    /// An indicator attribute names a value its variable does not have.
    #[error("indicator feature {feature} tests value {value} of a {len}-valued variable")]
    IndicatorValueOutOfRange {
        /// The feature index.
        feature: usize,
        /// The indicator's value index.
        value: usize,
        /// Number of values of the variable.
        len: usize,
    },
    /// A node cannot be reached from the root.
    #[error("node {node} is not reachable from the root")]
    Unreachable {
        /// The orphaned node.
        node: usize,
    },
}

fn identity(x: f64) -> f64 {
    x
}

/// Rows of feature values routed through the tree, grouped by the leaf they reach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafSamples {
    /// The leaf node.
    pub leaf: usize,
    /// Indices of the rows that reach it.
    pub rows: Vec<usize>,
}

/// A binary decision tree over a flat node table. Node `0` is the root.
///
/// Implements [`TreeAdapter`] so it can be laid out directly, and adds what a
/// decision tree specifically knows: the rules that describe each node and the
/// data that reaches it.
///
/// Rule sets are computed on first request and cached per node, so a tree is
/// meant to be immutable once built.
#[derive(Clone, Debug)]
pub struct CartTree {
    nodes: Vec<CartNode>,
    domain: Domain,
    parents: Vec<Option<usize>>,
    max_depth: usize,
    adjust_weight: fn(f64) -> f64,
    rules: Vec<OnceCell<Result<RuleSet, UnsupportedMergeError>>>,
    all_leaves: OnceCell<Vec<usize>>,
}

impl CartTree {
    /// Validate a node table and build the tree.
    pub fn new(nodes: Vec<CartNode>, domain: Domain) -> Result<Self, CartTreeError> {
        let len = nodes.len();
        if len == 0 {
            return Err(CartTreeError::Empty);
        }
        let mut parents: Vec<Option<usize>> = alloc::vec![None; len];
        for (node, entry) in nodes.iter().enumerate() {
            let Some(split) = entry.split else {
                continue;
            };
            if split.feature >= domain.attributes.len() {
                return Err(CartTreeError::FeatureOutOfRange {
                    node,
                    feature: split.feature,
                    len: domain.attributes.len(),
                });
            }
            if let Attribute::Indicator { values, value, .. } = &domain.attributes[split.feature]
                && *value >= values.len()
            {
                return Err(CartTreeError::IndicatorValueOutOfRange {
                    feature: split.feature,
                    value: *value,
                    len: values.len(),
                });
            }
            for child in [split.left, split.right] {
                if child >= len {
                    return Err(CartTreeError::ChildOutOfRange { node, child, len });
                }
                if child == 0 || parents[child].is_some() {
                    return Err(CartTreeError::MultipleParents { child });
                }
                parents[child] = Some(node);
            }
        }

        let mut depths: Vec<Option<usize>> = alloc::vec![None; len];
        depths[0] = Some(0);
        let mut queue = VecDeque::from([0_usize]);
        let mut max_depth = 0;
        while let Some(node) = queue.pop_front() {
            let depth = depths[node].unwrap_or_default();
            max_depth = max_depth.max(depth);
            if let Some(split) = nodes[node].split {
                for child in [split.left, split.right] {
                    depths[child] = Some(depth + 1);
                    queue.push_back(child);
                }
            }
        }
        if let Some(node) = depths.iter().position(Option::is_none) {
            return Err(CartTreeError::Unreachable { node });
        }

        tracing::debug!(nodes = len, max_depth, "built decision tree adapter");
        Ok(Self {
            nodes,
            domain,
            parents,
            max_depth,
            adjust_weight: identity,
            rules: (0..len).map(|_| OnceCell::new()).collect(),
            all_leaves: OnceCell::new(),
        })
    }

    /// Transform sample counts before they become weights.
    ///
    /// With a non-linear transform (for example a logarithm) a node's weight is
    /// its adjusted count over the sum of its siblings' adjusted counts, so
    /// sibling weights still sum to 1.
    pub fn with_weight_adjustment(mut self, adjust: fn(f64) -> f64) -> Self {
        self.adjust_weight = adjust;
        self
    }

    /// The domain the features index into.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The node table row of `node`.
    pub fn node(&self, node: usize) -> Option<&CartNode> {
        self.nodes.get(node)
    }

    /// Feature index `node` splits on, or `None` for leaves.
    pub fn splitting_attribute(&self, node: usize) -> Option<usize> {
        self.nodes[node].split.map(|s| s.feature)
    }

    /// The minimal rules every row reaching `node` satisfies. Empty for the root.
    ///
    /// Each ancestor split contributes one condition, folded root to node into a
    /// [`RuleSet`]. Conditions on one continuous attribute merge into a bound or an
    /// interval. Discrete conditions are keyed by variable and value, so different
    /// values of one variable are listed separately.
    pub fn rules(&self, node: usize) -> Result<&RuleSet, UnsupportedMergeError> {
        self.rules[node]
            .get_or_init(|| self.compute_rules(node))
            .as_ref()
            .map_err(Clone::clone)
    }

    fn compute_rules(&self, node: usize) -> Result<RuleSet, UnsupportedMergeError> {
        let Some(parent) = self.parents[node] else {
            return Ok(RuleSet::new());
        };
        let mut set = self.rules(parent)?.clone();
        if let Some((key, rule)) = self.split_condition(parent, node) {
            set.fold(key, rule)?;
        }
        Ok(set)
    }

    /// The condition `parent`'s split imposes on `child`, with its rule-set key.
    fn split_condition(&self, parent: usize, child: usize) -> Option<(String, Rule)> {
        let split = self.nodes[parent].split?;
        let is_left = split.left == child;
        match &self.domain.attributes[split.feature] {
            Attribute::Continuous { name } => Some((
                name.clone(),
                ContinuousRule::new(name.clone(), !is_left, split.threshold, is_left).into(),
            )),
            Attribute::Indicator {
                variable,
                values,
                value,
            } => {
                // Left is "indicator off". For a two-valued variable that pins the
                // other value; otherwise it only rules this value out.
                let binary = values.len() == 2;
                let equals = !is_left || binary;
                let index = if is_left && binary {
                    value.abs_diff(1)
                } else {
                    *value
                };
                let label = values.get(index)?.clone();
                Some((
                    format!("{variable}_{label}"),
                    DiscreteRule::new(variable.clone(), equals, label).into(),
                ))
            }
        }
    }

    /// Sorted ids of the leaves in the subtree of `node` (a leaf yields itself).
    pub fn leaves(&self, node: usize) -> Vec<usize> {
        if node == 0 {
            return self.all_leaves().to_vec();
        }
        self.collect_leaves(node)
    }

    fn collect_leaves(&self, node: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![node];
        while let Some(n) = stack.pop() {
            match self.nodes[n].split {
                Some(split) => stack.extend([split.right, split.left]),
                None => out.push(n),
            }
        }
        out.sort_unstable();
        out
    }

    fn all_leaves(&self) -> &[usize] {
        self.all_leaves.get_or_init(|| self.collect_leaves(0))
    }

    /// Route every row of `data` to a leaf.
    ///
    /// Returns one entry per leaf in left-to-right order. A row missing a feature
    /// the tree tests is routed right.
    pub fn samples_in_leaves<R: AsRef<[f64]>>(&self, data: &[R]) -> Vec<LeafSamples> {
        let mut out = Vec::with_capacity(self.all_leaves().len());
        self.assign(0, (0..data.len()).collect(), data, &mut out);
        out
    }

    fn assign<R: AsRef<[f64]>>(
        &self,
        node: usize,
        rows: Vec<usize>,
        data: &[R],
        out: &mut Vec<LeafSamples>,
    ) {
        let Some(split) = self.nodes[node].split else {
            out.push(LeafSamples { leaf: node, rows });
            return;
        };
        let (left, right): (Vec<usize>, Vec<usize>) = rows.into_iter().partition(|&r| {
            data[r]
                .as_ref()
                .get(split.feature)
                .is_some_and(|&x| x <= split.threshold)
        });
        self.assign(split.left, left, data, out);
        self.assign(split.right, right, data, out);
    }

    /// Indices of the rows of `data` that reach any of `nodes`.
    ///
    /// Rows are grouped by leaf in ascending leaf id. Each row appears once even
    /// when `nodes` overlap. Unknown node ids are ignored.
    pub fn instances_in_nodes<R: AsRef<[f64]>>(&self, data: &[R], nodes: &[usize]) -> Vec<usize> {
        let selected: HashSet<usize> = nodes
            .iter()
            .filter(|&&n| n < self.nodes.len())
            .flat_map(|&n| self.collect_leaves(n))
            .collect();
        if selected.is_empty() {
            return Vec::new();
        }

        let mut by_leaf: HashMap<usize, Vec<usize>> = self
            .samples_in_leaves(data)
            .into_iter()
            .filter(|s| selected.contains(&s.leaf))
            .map(|s| (s.leaf, s.rows))
            .collect();
        // The cached leaf list is already sorted, so it fixes the output order.
        self.all_leaves()
            .iter()
            .filter_map(|leaf| by_leaf.remove(leaf))
            .flatten()
            .collect()
    }
}

impl TreeAdapter for CartTree {
    type NodeId = usize;
    type Distribution = Vec<f64>;
    type Attribute = Attribute;

    fn root(&self) -> usize {
        0
    }

    fn weight(&self, node: usize) -> f64 {
        let Some(parent) = self.parents[node] else {
            return 1.0;
        };
        let adjust = self.adjust_weight;
        let siblings = self.children(parent);
        let total: f64 = siblings
            .iter()
            .map(|&c| adjust(self.nodes[c].n_samples as f64))
            .sum();
        if total <= 0.0 {
            return 1.0 / siblings.len() as f64;
        }
        adjust(self.nodes[node].n_samples as f64) / total
    }

    fn num_samples(&self, node: usize) -> usize {
        self.nodes[node].n_samples
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.parents[node]
    }

    fn has_children(&self, node: usize) -> bool {
        self.nodes[node].split.is_some()
    }

    fn children(&self, node: usize) -> Children<usize> {
        match self.nodes[node].split {
            Some(split) => smallvec![split.left, split.right],
            None => Children::new(),
        }
    }

    fn distribution(&self, node: usize) -> Vec<f64> {
        self.nodes[node].value.clone()
    }

    fn impurity(&self, node: usize) -> f64 {
        self.nodes[node].impurity
    }

    fn attribute(&self, node: usize) -> Option<Attribute> {
        self.splitting_attribute(node)
            .map(|f| self.domain.attributes[f].clone())
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}
