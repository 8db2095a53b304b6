//! Ready-made grammars and hand-written trees.
use crate::ast::Node;
use crate::grammar::{uniform_branches, Grammar};

/// Start rule of [`classic`].
pub const CLASSIC_START: &str = "E";

/// Depth budget that gives [`classic`] trees of a few hundred nodes on average.
pub const CLASSIC_DEPTH: i32 = 30;

/// The classic three-rule grammar.
///
/// - `E`: a color, `TRIPLE(C, C, C)`
/// - `A`: a leaf, one of the free variables or a random constant
/// - `C`: a channel expression built from `A` with `ABS`, `ADD`, and `MULT`
pub fn classic() -> Grammar {
    let mut grammar = Grammar::new();
    grammar
        .add(
            "E",
            uniform_branches([Node::triple(
                Node::rule("C"),
                Node::rule("C"),
                Node::rule("C"),
            )]),
        )
        .add(
            "A",
            uniform_branches([
                Node::X,
                Node::Y,
                Node::T,
                Node::MouseX,
                Node::MouseY,
                Node::Random,
            ]),
        )
        .add(
            "C",
            uniform_branches([
                Node::rule("A"),
                Node::abs(Node::rule("C")),
                Node::add(Node::rule("C"), Node::rule("C")),
                Node::mult(Node::rule("C"), Node::rule("C")),
            ]),
        );
    grammar
}

/// `(x, y) => [x, x, x]`
pub fn gradient() -> Node {
    Node::triple(Node::X, Node::X, Node::X)
}

/// `(x, y) => x * y >= 0 ? [x, y, 1] : [x % y, x % y, x % y]`
pub fn cool() -> Node {
    let rem = Node::modulo(Node::X, Node::Y);
    Node::cond(
        Node::ge(Node::mult(Node::X, Node::Y), Node::number(0.0)),
        Node::triple(Node::X, Node::Y, Node::number(1.0)),
        Node::triple(rem.clone(), rem.clone(), rem),
    )
}
