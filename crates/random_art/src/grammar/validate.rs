//! Configuration-time checks for [`Grammar`]s.
//!
//! The synthesizer trusts its grammar: a dangling reference or a badly weighted rule is only
//! noticed when a draw happens to hit it, and a first branch that never bottoms out recurses
//! without bound. Running [`Grammar::validate`] once after loading surfaces all of these
//! up front:
//! - every rule has at least one branch,
//! - probabilities are finite, non-negative, and sum to 1 within [`PROBABILITY_TOLERANCE`],
//! - every [`crate::ast::Node::Rule`] names an existing rule,
//! - the first-branch graph (rule -> rules referenced by its branch 0) is acyclic, so a
//!   zero-depth expansion of any rule terminates.
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::grammar::{Branch, Grammar};

/// Maximum accepted distance between a rule's probability sum and `1.0`.
pub const PROBABILITY_TOLERANCE: f32 = 1e-4;

impl Grammar {
    /// Checks every rule of the grammar.
    pub fn validate(&self) -> Result<()> {
        for name in self.rule_names() {
            if let Some(branches) = self.branches(name) {
                validate_rule(self, name, branches)?;
            }
        }

        let stuck = non_terminating_rules(self);
        if !stuck.is_empty() {
            return Err(Error::InvalidGrammar(format!(
                "First branch never reaches a terminal for rules {:?}",
                stuck
            )));
        }
        Ok(())
    }

    /// Checks that `start` exists and then validates the whole grammar.
    pub fn validate_from(&self, start: &str) -> Result<()> {
        if !self.contains(start) {
            return Err(Error::InvalidGrammarReference {
                rule: start.to_string(),
            });
        }
        self.validate()
    }
}

fn validate_rule(grammar: &Grammar, name: &str, branches: &[Branch]) -> Result<()> {
    if branches.is_empty() {
        return Err(Error::InvalidGrammar(format!(
            "Rule '{}' has no branches",
            name
        )));
    }

    for (index, branch) in branches.iter().enumerate() {
        if !branch.probability.is_finite() || branch.probability < 0.0 {
            return Err(Error::InvalidGrammar(format!(
                "Rule '{}' branch {} has invalid probability {}",
                name, index, branch.probability
            )));
        }

        if let Some(missing) = branch
            .node
            .rule_refs()
            .into_iter()
            .find(|r| !grammar.contains(r))
        {
            return Err(Error::InvalidGrammarReference {
                rule: missing.to_string(),
            });
        }
    }

    let total: f32 = branches.iter().map(|b| b.probability).sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(Error::InvalidGrammar(format!(
            "Rule '{}' probabilities sum to {} instead of 1",
            name, total
        )));
    }

    Ok(())
}

/// Rules whose zero-depth expansion never bottoms out, sorted by name.
///
/// A rule is grounded once every rule referenced by its first branch is grounded; rules
/// still ungrounded when a pass adds nothing sit on, or depend on, a first-branch cycle.
fn non_terminating_rules(grammar: &Grammar) -> Vec<&str> {
    let first_refs: Vec<(&str, Vec<&str>)> = grammar
        .rules
        .iter()
        .map(|(name, branches)| {
            let refs = branches
                .first()
                .map(|b| b.node.rule_refs())
                .unwrap_or_default();
            (name.as_str(), refs)
        })
        .collect();

    let mut grounded: HashSet<&str> = HashSet::with_capacity(first_refs.len());
    loop {
        let before = grounded.len();
        for (name, refs) in &first_refs {
            if !grounded.contains(name) && refs.iter().all(|r| grounded.contains(r)) {
                grounded.insert(*name);
            }
        }
        if grounded.len() == before {
            break;
        }
    }

    let mut stuck: Vec<&str> = first_refs
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| !grounded.contains(name))
        .collect();
    stuck.sort_unstable();
    stuck
}
