// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Split-condition rules and the merge algebra that folds them into minimal rule sets.
//!
//! ## Merging
//!
//! | receiver \ incoming | discrete | continuous | interval |
//! |---|---|---|---|
//! | discrete | incoming + diagnostic | incoming + diagnostic | incoming + diagnostic |
//! | continuous | error | tighter bound or interval | error |
//! | interval | error | merged into matching side | side-wise merge |
//!
//! Discrete constraints such as `color ≠ red` and `color ≠ blue` cannot be
//! expressed as one discrete rule, so discrete merges keep the incoming rule and
//! report a [`MergeDiagnostic`] instead of failing.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Which variant a [`Rule`] is; used in error reports.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RuleKind {
    /// [`DiscreteRule`].
    Discrete,
    /// [`ContinuousRule`].
    Continuous,
    /// [`IntervalRule`].
    Interval,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Discrete => "discrete",
            Self::Continuous => "continuous",
            Self::Interval => "interval",
        })
    }
}

/// Error returned when two rules have no defined merge.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedMergeError {
    /// The incoming rule's kind cannot be merged into the receiver's kind.
    #[error("cannot merge a {incoming} rule into a {existing} rule on `{attribute}`")]
    KindMismatch {
        /// Attribute of the receiving rule.
        attribute: String,
        /// Kind of the receiving rule.
        existing: RuleKind,
        /// Kind of the incoming rule.
        incoming: RuleKind,
    },
    /// The two rules constrain different attributes.
    #[error("cannot merge a rule on `{incoming}` into a rule on `{existing}`")]
    AttributeMismatch {
        /// Attribute of the receiving rule.
        existing: String,
        /// Attribute of the incoming rule.
        incoming: String,
    },
}

/// A recoverable anomaly observed while merging.
#[derive(Clone, Debug, PartialEq)]
pub enum MergeDiagnostic {
    /// A discrete rule was replaced by the incoming rule because discrete rules do not merge.
    DiscreteRulesReplaced {
        /// The rule that was dropped.
        dropped: DiscreteRule,
        /// The rule that was kept.
        kept: Rule,
    },
}

/// `attribute = value` or `attribute ≠ value` on a discrete attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscreteRule {
    /// Attribute name.
    pub attr_name: String,
    /// `true` for equality, `false` for inequality.
    pub equals: bool,
    /// The compared value.
    pub value: String,
}

/// `attribute > value` (or `≥`) when `greater_than`, otherwise `attribute < value` (or `≤`).
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuousRule {
    /// Attribute name.
    pub attr_name: String,
    /// Direction of the bound.
    pub greater_than: bool,
    /// The bound.
    pub value: f64,
    /// Whether the bound itself satisfies the rule.
    pub inclusive: bool,
}

/// A bounded range on one continuous attribute.
///
/// `left` is the lower bound (`greater_than == true`), `right` the upper bound.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalRule {
    /// Attribute name.
    pub attr_name: String,
    /// Lower bound.
    pub left: ContinuousRule,
    /// Upper bound.
    pub right: ContinuousRule,
}

/// A predicate over one attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    /// See [`DiscreteRule`].
    Discrete(DiscreteRule),
    /// See [`ContinuousRule`].
    Continuous(ContinuousRule),
    /// See [`IntervalRule`].
    Interval(IntervalRule),
}

/// The result of a successful merge.
#[derive(Clone, Debug, PartialEq)]
pub struct Merge {
    /// The merged rule.
    pub rule: Rule,
    /// Set when the merge degraded instead of combining both constraints.
    pub diagnostic: Option<MergeDiagnostic>,
}

impl Merge {
    fn exact(rule: Rule) -> Self {
        Self {
            rule,
            diagnostic: None,
        }
    }
}

impl DiscreteRule {
    /// Create a discrete rule.
    pub fn new(attr_name: impl Into<String>, equals: bool, value: impl Into<String>) -> Self {
        Self {
            attr_name: attr_name.into(),
            equals,
            value: value.into(),
        }
    }

    /// Keep `other` and report that `self` was dropped. Never fails.
    pub fn merge_with(&self, other: &Rule) -> Merge {
        tracing::warn!(
            dropped = ?self,
            kept = ?other,
            "discrete rules do not merge; keeping the newer rule"
        );
        Merge {
            rule: other.clone(),
            diagnostic: Some(MergeDiagnostic::DiscreteRulesReplaced {
                dropped: self.clone(),
                kept: other.clone(),
            }),
        }
    }
}

impl ContinuousRule {
    /// Create a continuous rule.
    pub fn new(attr_name: impl Into<String>, greater_than: bool, value: f64, inclusive: bool) -> Self {
        Self {
            attr_name: attr_name.into(),
            greater_than,
            value,
            inclusive,
        }
    }

    /// Merge with another continuous rule on the same attribute.
    ///
    /// Same direction keeps the tighter bound; opposite directions form an
    /// [`IntervalRule`].
    pub fn merge_with(&self, other: &Rule) -> Result<Merge, UnsupportedMergeError> {
        let Rule::Continuous(other) = other else {
            return Err(UnsupportedMergeError::KindMismatch {
                attribute: self.attr_name.clone(),
                existing: RuleKind::Continuous,
                incoming: other.kind(),
            });
        };
        check_attribute(&self.attr_name, &other.attr_name)?;
        if self.greater_than == other.greater_than {
            Ok(Merge::exact(Rule::Continuous(self.tighten(other))))
        } else {
            let (lower, upper) = if self.greater_than {
                (self, other)
            } else {
                (other, self)
            };
            Ok(Merge::exact(Rule::Interval(IntervalRule {
                attr_name: self.attr_name.clone(),
                left: lower.clone(),
                right: upper.clone(),
            })))
        }
    }

    /// The tighter of two same-direction bounds.
    ///
    /// On equal values an exclusive bound is tighter than an inclusive one.
    fn tighten(&self, other: &Self) -> Self {
        let self_wins = if self.greater_than {
            self.value > other.value
        } else {
            self.value < other.value
        };
        if self.value == other.value {
            Self {
                inclusive: self.inclusive && other.inclusive,
                ..self.clone()
            }
        } else if self_wins {
            self.clone()
        } else {
            Self {
                attr_name: self.attr_name.clone(),
                ..other.clone()
            }
        }
    }
}

impl IntervalRule {
    /// Create an interval from a lower and an upper bound.
    pub fn new(attr_name: impl Into<String>, left: ContinuousRule, right: ContinuousRule) -> Self {
        Self {
            attr_name: attr_name.into(),
            left,
            right,
        }
    }

    /// Merge a bound or another interval into this interval.
    pub fn merge_with(&self, other: &Rule) -> Result<Merge, UnsupportedMergeError> {
        match other {
            Rule::Continuous(bound) => {
                check_attribute(&self.attr_name, &bound.attr_name)?;
                let mut out = self.clone();
                if bound.greater_than {
                    out.left = self.left.tighten(bound);
                } else {
                    out.right = self.right.tighten(bound);
                }
                Ok(Merge::exact(Rule::Interval(out)))
            }
            Rule::Interval(interval) => {
                check_attribute(&self.attr_name, &interval.attr_name)?;
                Ok(Merge::exact(Rule::Interval(Self {
                    attr_name: self.attr_name.clone(),
                    left: self.left.tighten(&interval.left),
                    right: self.right.tighten(&interval.right),
                })))
            }
            Rule::Discrete(_) => Err(UnsupportedMergeError::KindMismatch {
                attribute: self.attr_name.clone(),
                existing: RuleKind::Interval,
                incoming: RuleKind::Discrete,
            }),
        }
    }
}

impl Rule {
    /// The attribute this rule constrains.
    pub fn attr_name(&self) -> &str {
        match self {
            Self::Discrete(r) => &r.attr_name,
            Self::Continuous(r) => &r.attr_name,
            Self::Interval(r) => &r.attr_name,
        }
    }

    /// Which variant this is.
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Discrete(_) => RuleKind::Discrete,
            Self::Continuous(_) => RuleKind::Continuous,
            Self::Interval(_) => RuleKind::Interval,
        }
    }

    /// Merge `other` into this rule. See the [module docs](self) for the merge table.
    pub fn merge_with(&self, other: &Self) -> Result<Merge, UnsupportedMergeError> {
        match self {
            Self::Discrete(r) => Ok(r.merge_with(other)),
            Self::Continuous(r) => r.merge_with(other),
            Self::Interval(r) => r.merge_with(other),
        }
    }
}

impl From<DiscreteRule> for Rule {
    fn from(rule: DiscreteRule) -> Self {
        Self::Discrete(rule)
    }
}

impl From<ContinuousRule> for Rule {
    fn from(rule: ContinuousRule) -> Self {
        Self::Continuous(rule)
    }
}

impl From<IntervalRule> for Rule {
    fn from(rule: IntervalRule) -> Self {
        Self::Interval(rule)
    }
}

fn check_attribute(existing: &str, incoming: &str) -> Result<(), UnsupportedMergeError> {
    if existing == incoming {
        Ok(())
    } else {
        Err(UnsupportedMergeError::AttributeMismatch {
            existing: existing.into(),
            incoming: incoming.into(),
        })
    }
}

/// Minimal rules describing the subspace of one node.
///
/// Entries are keyed and kept in order of last update: folding a rule into an
/// existing key merges it and moves the entry to the end, so the most recently
/// refined constraint is listed last.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleSet {
    entries: Vec<(String, Rule)>,
    diagnostics: Vec<MergeDiagnostic>,
}

impl RuleSet {
    /// Create an empty rule set (the root's).
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `rule` in under `key`.
    ///
    /// On error the set is left unchanged.
    pub fn fold(&mut self, key: impl Into<String>, rule: Rule) -> Result<(), UnsupportedMergeError> {
        let key = key.into();
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(pos) => {
                let merge = self.entries[pos].1.merge_with(&rule)?;
                self.entries.remove(pos);
                self.entries.push((key, merge.rule));
                self.diagnostics.extend(merge.diagnostic);
            }
            None => self.entries.push((key, rule)),
        }
        Ok(())
    }

    /// Rules in order of last update.
    pub fn rules(&self) -> impl ExactSizeIterator<Item = &Rule> + '_ {
        self.entries.iter().map(|(_, r)| r)
    }

    /// The rule stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Anomalies recorded while folding.
    pub fn diagnostics(&self) -> &[MergeDiagnostic] {
        &self.diagnostics
    }
}

/// Fold a root-to-node chain of `(key, rule)` split conditions into a [`RuleSet`].
pub fn aggregate_rules<I, S>(chain: I) -> Result<RuleSet, UnsupportedMergeError>
where
    I: IntoIterator<Item = (S, Rule)>,
    S: Into<String>,
{
    let mut set = RuleSet::new();
    for (key, rule) in chain {
        set.fold(key, rule)?;
    }
    Ok(set)
}
