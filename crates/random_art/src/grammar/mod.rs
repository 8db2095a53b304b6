//! Grammar model: named rules, each an ordered list of weighted template branches.
//!
//! Branch `0` of every rule has a special role: the synthesizer always picks it once the
//! depth budget is spent, so it must bottom out in terminals. [`Grammar::validate`] checks
//! this (and the other structural invariants) ahead of synthesis.
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::{Node, RuleName};

pub mod presets;
pub mod validate;

pub use validate::PROBABILITY_TOLERANCE;

/// One weighted alternative of a rule.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    /// Template expanded when this branch is selected.
    pub node: Node,
    /// Selection probability in `[0, 1]`.
    pub probability: f32,
}

impl Branch {
    pub fn new(node: Node, probability: f32) -> Self {
        Self { node, probability }
    }
}

/// Builds a branch list where every branch has probability `1 / n`.
pub fn uniform_branches(nodes: impl IntoIterator<Item = Node>) -> Vec<Branch> {
    let nodes: Vec<Node> = nodes.into_iter().collect();
    let probability = 1.0 / nodes.len().max(1) as f32;
    nodes
        .into_iter()
        .map(|node| Branch::new(node, probability))
        .collect()
}

/// Builds a branch list from explicit `(node, probability)` pairs.
pub fn weighted_branches(pairs: impl IntoIterator<Item = (Node, f32)>) -> Vec<Branch> {
    pairs
        .into_iter()
        .map(|(node, probability)| Branch::new(node, probability))
        .collect()
}

/// A mapping from rule name to its branches.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct Grammar {
    pub rules: HashMap<RuleName, Vec<Branch>>,
}

impl Grammar {
    /// Create an empty grammar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a rule.
    pub fn add(&mut self, name: &str, branches: Vec<Branch>) -> &mut Self {
        self.rules.insert(name.to_string(), branches);
        self
    }

    /// Add a rule and return the grammar, for chained construction.
    pub fn with_rule(mut self, name: &str, branches: Vec<Branch>) -> Self {
        self.add(name, branches);
        self
    }

    /// Branches of a rule, if the rule exists.
    pub fn branches(&self, name: &str) -> Option<&[Branch]> {
        self.rules.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in sorted order.
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
