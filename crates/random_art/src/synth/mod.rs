//! Grammar expansion: turns a [`Grammar`] and a start rule into a concrete expression tree.
//!
//! Expansion is driven by a depth budget. While the budget is positive a rule picks a branch
//! at random according to the branch probabilities; once it is spent the rule always takes
//! its first branch. Every rule reference shrinks the budget by one plus a geometric number
//! of extra steps (two in expectation), so recursive grammars terminate with probability one
//! while still producing the occasional deep excursion.
//!
//! All randomness comes from the [`RngCore`] passed in. Draws happen at three points only:
//! branch selection, the depth decay walk, and [`Node::Random`] resolution. A seeded RNG
//! therefore reproduces the same tree.
use rand::RngCore;
use tracing::{debug, trace, warn};

use crate::ast::Node;
use crate::error::{Error, Result};
use crate::grammar::{Branch, Grammar, PROBABILITY_TOLERANCE};

pub mod config;
pub mod random;

pub use config::SynthesisConfig;
pub use random::{rand01, rand_signed};

/// Probability of taking one more step in the depth decay walk.
pub const DEPTH_DECAY_PROBABILITY: f32 = 0.5;

/// Expands grammars borrowed for the lifetime of the synthesizer.
pub struct Synthesizer<'g> {
    /// Grammar expanded by this synthesizer.
    pub grammar: &'g Grammar,
}

impl<'g> Synthesizer<'g> {
    /// Creates a synthesizer after validating the grammar.
    pub fn try_new(grammar: &'g Grammar) -> Result<Self> {
        if let Err(e) = grammar.validate() {
            warn!("Rejecting grammar with {} rules: {}.", grammar.len(), e);
            return Err(e);
        }
        Ok(Self { grammar })
    }

    /// Creates a synthesizer without validating the grammar.
    ///
    /// Grammar errors are then only reported when an expansion runs into them.
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    /// Expands `start_rule` with the given depth budget.
    pub fn synthesize<R: RngCore + ?Sized>(
        &self,
        start_rule: &str,
        depth: i32,
        rng: &mut R,
    ) -> Result<Node> {
        synthesize(self.grammar, start_rule, depth, rng)
    }

    /// Validates `config` and expands its start rule.
    pub fn run<R: RngCore + ?Sized>(&self, config: &SynthesisConfig, rng: &mut R) -> Result<Node> {
        config.validate()?;
        self.synthesize(&config.start_rule, config.depth, rng)
    }
}

/// Expands `start_rule` into a tree free of [`Node::Rule`] and [`Node::Random`].
///
/// Fails with [`Error::InvalidGrammarReference`] when a referenced rule is missing and with
/// [`Error::ExhaustedBranches`] when a rule's probabilities do not cover the drawn value.
pub fn synthesize<R: RngCore + ?Sized>(
    grammar: &Grammar,
    start_rule: &str,
    depth: i32,
    rng: &mut R,
) -> Result<Node> {
    let node = expand_rule(grammar, start_rule, depth, rng)?;
    debug_assert!(node.is_concrete(), "synthesized tree still has generation-time nodes");
    debug!(
        "Synthesized '{}' at depth {}: {} nodes, height {}.",
        start_rule,
        depth,
        node.node_count(),
        node.depth()
    );
    Ok(node)
}

/// Selects a branch of `rule` and expands it.
///
/// With `depth <= 0` the first branch is taken without consulting `rng`.
pub fn expand_rule<R: RngCore + ?Sized>(
    grammar: &Grammar,
    rule: &str,
    depth: i32,
    rng: &mut R,
) -> Result<Node> {
    let branches = grammar
        .branches(rule)
        .ok_or_else(|| Error::InvalidGrammarReference {
            rule: rule.to_string(),
        })?;

    let selected = if depth <= 0 {
        branches.first().ok_or_else(|| {
            Error::InvalidGrammar(format!("Rule '{}' has no branches", rule))
        })?
    } else {
        let roll = rand01(rng);
        pick_branch(branches, roll).ok_or_else(|| Error::ExhaustedBranches {
            rule: rule.to_string(),
            roll,
            total: branches.iter().map(|b| b.probability).sum(),
        })?
    };

    trace!("Expanding rule '{}' at depth {}.", rule, depth);
    expand_node(grammar, &selected.node, depth, rng)
}

/// Resolves every [`Node::Rule`] and [`Node::Random`] below `node`.
///
/// `depth` is passed unchanged to children; only rule references consume budget.
pub fn expand_node<R: RngCore + ?Sized>(
    grammar: &Grammar,
    node: &Node,
    depth: i32,
    rng: &mut R,
) -> Result<Node> {
    let expanded = match node {
        Node::X
        | Node::Y
        | Node::T
        | Node::MouseX
        | Node::MouseY
        | Node::Number(_)
        | Node::Boolean(_) => node.clone(),
        Node::Random => Node::Number(rand_signed(rng)),
        Node::Abs(inner) => Node::abs(expand_node(grammar, inner, depth, rng)?),
        Node::Add(lhs, rhs) => {
            let lhs = expand_node(grammar, lhs, depth, rng)?;
            Node::add(lhs, expand_node(grammar, rhs, depth, rng)?)
        }
        Node::Mult(lhs, rhs) => {
            let lhs = expand_node(grammar, lhs, depth, rng)?;
            Node::mult(lhs, expand_node(grammar, rhs, depth, rng)?)
        }
        Node::Mod(lhs, rhs) => {
            let lhs = expand_node(grammar, lhs, depth, rng)?;
            Node::modulo(lhs, expand_node(grammar, rhs, depth, rng)?)
        }
        Node::Ge(lhs, rhs) => {
            let lhs = expand_node(grammar, lhs, depth, rng)?;
            Node::ge(lhs, expand_node(grammar, rhs, depth, rng)?)
        }
        Node::Triple(first, second, third) => {
            let first = expand_node(grammar, first, depth, rng)?;
            let second = expand_node(grammar, second, depth, rng)?;
            Node::triple(first, second, expand_node(grammar, third, depth, rng)?)
        }
        Node::If(cond, then, elze) => {
            let cond = expand_node(grammar, cond, depth, rng)?;
            let then = expand_node(grammar, then, depth, rng)?;
            Node::cond(cond, then, expand_node(grammar, elze, depth, rng)?)
        }
        Node::Rule(name) => {
            let depth = decay_depth(depth, rng);
            expand_rule(grammar, name, depth, rng)?
        }
    };

    Ok(expanded)
}

/// Returns the first branch whose cumulative probability reaches `roll`.
///
/// A roll that overshoots the sum by no more than [`PROBABILITY_TOLERANCE`] selects the last
/// branch with a nonzero probability; `None` means the probabilities are genuinely short.
pub fn pick_branch(branches: &[Branch], roll: f32) -> Option<&Branch> {
    let mut cumulative = 0.0;
    for branch in branches {
        cumulative += branch.probability;
        if roll <= cumulative {
            return Some(branch);
        }
    }

    // f32 sums of weights like 1/12 land a few ulps below 1.
    if roll <= cumulative + PROBABILITY_TOLERANCE {
        return branches.iter().rev().find(|b| b.probability > 0.0);
    }
    None
}

/// Depth budget left for a rule reference reached with `depth`.
fn decay_depth<R: RngCore + ?Sized>(mut depth: i32, rng: &mut R) -> i32 {
    while depth >= 0 && rand01(rng) <= DEPTH_DECAY_PROBABILITY {
        depth -= 1;
    }
    depth - 1
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::random::{PanicRng, SequenceRng};
    use super::*;
    use crate::grammar::{presets, uniform_branches, weighted_branches};

    fn leaves() -> Grammar {
        Grammar::new().with_rule("A", uniform_branches([Node::X, Node::Y]))
    }

    #[test]
    fn single_constant_rule_expands_to_that_constant() {
        let grammar = Grammar::new().with_rule("A", uniform_branches([Node::number(1.0)]));
        let mut rng = StdRng::seed_from_u64(1);
        let node = synthesize(&grammar, "A", 5, &mut rng).expect("synthesizes");
        assert_eq!(node, Node::number(1.0));
    }

    #[test]
    fn depth_zero_takes_first_branch_without_randomness() {
        let grammar = presets::classic();
        let node = expand_rule(&grammar, "A", 0, &mut PanicRng).expect("expands");
        assert_eq!(node, Node::X);

        let node = expand_rule(&grammar, "C", -3, &mut PanicRng).expect("expands");
        assert_eq!(node, Node::X);
    }

    #[test]
    fn branch_walk_selects_first_cumulative_hit() {
        let grammar = Grammar::new().with_rule(
            "A",
            weighted_branches([(Node::X, 0.25), (Node::Y, 0.25), (Node::T, 0.5)]),
        );

        let pick = |roll: f32| {
            expand_rule(&grammar, "A", 5, &mut SequenceRng::from_draws(&[roll])).expect("expands")
        };
        assert_eq!(pick(0.0), Node::X);
        assert_eq!(pick(0.25), Node::X);
        assert_eq!(pick(0.3), Node::Y);
        assert_eq!(pick(0.75), Node::T);
    }

    #[test]
    fn short_probabilities_exhaust_branches() {
        let grammar =
            Grammar::new().with_rule("A", weighted_branches([(Node::X, 0.5), (Node::Y, 0.25)]));
        let mut rng = SequenceRng::from_draws(&[0.9]);
        let err = expand_rule(&grammar, "A", 3, &mut rng).expect_err("0.9 is not covered");
        let Error::ExhaustedBranches { rule, roll, total } = err else {
            panic!("expected ExhaustedBranches");
        };
        assert_eq!(rule, "A");
        assert_eq!(roll, 0.9_f32);
        assert_eq!(total, 0.75);
    }

    #[test]
    fn largest_draw_selects_a_branch_for_any_uniform_rule() {
        let max_draw = 1.0 - f32::EPSILON / 2.0;
        for n in 1..=64 {
            let grammar = Grammar::new().with_rule(
                "A",
                uniform_branches((0..n).map(|i| Node::number(i as f32))),
            );
            grammar.validate().expect("uniform rule is valid");

            let mut rng = SequenceRng::from_draws(&[max_draw]);
            let node = expand_rule(&grammar, "A", 3, &mut rng)
                .unwrap_or_else(|e| panic!("n = {n}: {e}"));
            assert_eq!(node, Node::number((n - 1) as f32), "n = {n}");
        }
    }

    #[test]
    fn rounding_fallback_skips_zero_probability_tail() {
        let branches = weighted_branches([(Node::X, 0.9999), (Node::Y, 0.0)]);
        let picked = pick_branch(&branches, 0.99995).expect("within tolerance");
        assert_eq!(picked.node, Node::X);
        assert!(pick_branch(&branches, 0.99995 + 2.0 * PROBABILITY_TOLERANCE).is_none());
    }

    #[test]
    fn short_probabilities_are_ignored_at_depth_zero() {
        let grammar =
            Grammar::new().with_rule("A", weighted_branches([(Node::X, 0.5), (Node::Y, 0.25)]));
        let node = expand_rule(&grammar, "A", 0, &mut PanicRng).expect("first branch");
        assert_eq!(node, Node::X);
    }

    #[test]
    fn unknown_rules_are_reported() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = synthesize(&leaves(), "E", 4, &mut rng).expect_err("no rule E");
        assert!(matches!(err, Error::InvalidGrammarReference { ref rule } if rule == "E"));

        let grammar = Grammar::new().with_rule("E", uniform_branches([Node::rule("missing")]));
        let err = synthesize(&grammar, "E", 4, &mut rng).expect_err("dangling reference");
        assert!(matches!(err, Error::InvalidGrammarReference { ref rule } if rule == "missing"));
    }

    #[test]
    fn random_resolves_to_a_fixed_number() {
        let grammar = Grammar::new().with_rule("R", uniform_branches([Node::Random]));
        let mut rng = SequenceRng::from_draws(&[0.75]);
        let node = expand_rule(&grammar, "R", 0, &mut rng).expect("expands");
        assert_eq!(node, Node::number(0.5));
    }

    #[test]
    fn rule_reference_decays_depth_before_expanding() {
        let grammar = leaves();

        // 2 -> 1 on the first draw, the second draw stops the walk, then 1 -> 0.
        let mut rng = SequenceRng::from_draws(&[0.4, 0.6]);
        let node = expand_node(&grammar, &Node::rule("A"), 2, &mut rng).expect("expands");
        assert_eq!(node, Node::X);

        // Walk stops immediately, 2 -> 1 leaves budget for a random pick.
        let mut rng = SequenceRng::from_draws(&[0.9, 0.9]);
        let node = expand_node(&grammar, &Node::rule("A"), 2, &mut rng).expect("expands");
        assert_eq!(node, Node::Y);
    }

    #[test]
    fn decay_walk_stops_below_zero() {
        let mut rng = SequenceRng::from_draws(&[0.0]);
        assert_eq!(decay_depth(3, &mut rng), -2);
        assert_eq!(decay_depth(-1, &mut PanicRng), -2);
    }

    #[test]
    fn structural_nodes_keep_shape() {
        let template = Node::cond(
            Node::ge(Node::rule("A"), Node::number(0.0)),
            Node::triple(Node::rule("A"), Node::MouseY, Node::Random),
            Node::modulo(Node::T, Node::rule("A")),
        );
        let grammar = leaves();
        let mut rng = StdRng::seed_from_u64(11);
        let node = expand_node(&grammar, &template, 4, &mut rng).expect("expands");

        assert!(node.is_concrete());
        let Node::If(cond, then, elze) = node else {
            panic!("expected IF at the root");
        };
        assert!(matches!(*cond, Node::Ge(_, ref rhs) if **rhs == Node::number(0.0)));
        assert!(matches!(*then, Node::Triple(_, ref second, _) if **second == Node::MouseY));
        assert!(matches!(*elze, Node::Mod(ref lhs, _) if **lhs == Node::T));
    }

    #[test]
    fn same_seed_gives_same_tree() {
        let grammar = presets::classic();
        let a = synthesize(&grammar, "E", 30, &mut StdRng::seed_from_u64(2025)).expect("a");
        let b = synthesize(&grammar, "E", 30, &mut StdRng::seed_from_u64(2025)).expect("b");
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_sequence_gives_same_tree() {
        let grammar = presets::classic();
        let draws = [0.1, 0.7, 0.3, 0.55, 0.95, 0.2, 0.45, 0.8];
        let a = synthesize(&grammar, "E", 6, &mut SequenceRng::from_draws(&draws)).expect("a");
        let b = synthesize(&grammar, "E", 6, &mut SequenceRng::from_draws(&draws)).expect("b");
        assert_eq!(a, b);
    }

    #[test]
    fn many_runs_terminate_with_concrete_trees() {
        let grammar = presets::classic();
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for i in 0..10_000 {
            let depth = i % 31;
            let node = synthesize(&grammar, "E", depth, &mut rng).expect("synthesizes");
            assert!(node.is_concrete(), "run {i} left generation-time nodes");
            assert!(matches!(node, Node::Triple(..)));
        }
    }

    #[test]
    fn synthesizer_validates_when_asked() {
        let bad = Grammar::new().with_rule("C", uniform_branches([Node::abs(Node::rule("C"))]));
        assert!(Synthesizer::try_new(&bad).is_err());

        let grammar = presets::classic();
        let synth = Synthesizer::try_new(&grammar).expect("classic validates");
        let mut rng = StdRng::seed_from_u64(9);
        let node = synth
            .run(&SynthesisConfig::default().with_depth(8), &mut rng)
            .expect("runs");
        assert!(node.is_concrete());

        let err = synth
            .run(&SynthesisConfig::default().with_depth(-2), &mut rng)
            .expect_err("negative depth");
        matches!(err, Error::InvalidConfig(_))
            .then_some(())
            .expect("config error");
    }
}
