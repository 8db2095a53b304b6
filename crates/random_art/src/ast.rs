//! Expression tree vocabulary shared by grammars, the synthesizer, and the code generator.
//!
//! A [`Node`] is a closed sum type: every variant carries exactly the children its kind needs
//! and owns them. Templates stored in a [`crate::grammar::Grammar`] may contain the
//! generation-time kinds [`Node::Random`] and [`Node::Rule`]; trees produced by
//! [`crate::synth::synthesize`] never do (see [`Node::is_concrete`]).
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of a grammar rule.
pub type RuleName = String;

/// Tag of a [`Node`] without its payload.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    X,
    Y,
    T,
    MouseX,
    MouseY,
    Number,
    Boolean,
    Abs,
    Add,
    Mult,
    Mod,
    Ge,
    Triple,
    If,
    Random,
    Rule,
}

impl NodeKind {
    /// True for kinds that only exist while a grammar is being expanded.
    #[inline]
    pub fn is_generation_only(self) -> bool {
        matches!(self, NodeKind::Random | NodeKind::Rule)
    }

    /// True for free variables and literals.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            NodeKind::X
                | NodeKind::Y
                | NodeKind::T
                | NodeKind::MouseX
                | NodeKind::MouseY
                | NodeKind::Number
                | NodeKind::Boolean
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::X => "X",
            NodeKind::Y => "Y",
            NodeKind::T => "T",
            NodeKind::MouseX => "MOUSE_X",
            NodeKind::MouseY => "MOUSE_Y",
            NodeKind::Number => "NUMBER",
            NodeKind::Boolean => "BOOLEAN",
            NodeKind::Abs => "ABS",
            NodeKind::Add => "ADD",
            NodeKind::Mult => "MULT",
            NodeKind::Mod => "MOD",
            NodeKind::Ge => "GE",
            NodeKind::Triple => "TRIPLE",
            NodeKind::If => "IF",
            NodeKind::Random => "RANDOM",
            NodeKind::Rule => "RULE",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of an expression tree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Horizontal pixel coordinate in `[-1, 1]`.
    X,
    /// Vertical pixel coordinate in `[-1, 1]`.
    Y,
    /// Time, already mapped into `[-1, 1]` by the host.
    T,
    /// Pointer x coordinate in `[-1, 1]`.
    MouseX,
    /// Pointer y coordinate in `[-1, 1]`.
    MouseY,
    Number(f32),
    Boolean(bool),
    Abs(Box<Node>),
    Add(Box<Node>, Box<Node>),
    Mult(Box<Node>, Box<Node>),
    Mod(Box<Node>, Box<Node>),
    /// `lhs >= rhs`, producing a boolean.
    Ge(Box<Node>, Box<Node>),
    /// Three-component vector, used for the final color.
    Triple(Box<Node>, Box<Node>, Box<Node>),
    /// Branchless conditional: `(cond, then, else)`.
    If(Box<Node>, Box<Node>, Box<Node>),
    /// Resolves to a fresh [`Node::Number`] in `[-1, 1)` during synthesis.
    Random,
    /// Reference to a grammar rule, resolved by substitution during synthesis.
    Rule(RuleName),
}

impl Node {
    pub fn number(value: f32) -> Self {
        Node::Number(value)
    }

    pub fn boolean(value: bool) -> Self {
        Node::Boolean(value)
    }

    pub fn rule(name: impl Into<RuleName>) -> Self {
        Node::Rule(name.into())
    }

    pub fn abs(inner: Node) -> Self {
        Node::Abs(Box::new(inner))
    }

    pub fn add(lhs: Node, rhs: Node) -> Self {
        Node::Add(Box::new(lhs), Box::new(rhs))
    }

    pub fn mult(lhs: Node, rhs: Node) -> Self {
        Node::Mult(Box::new(lhs), Box::new(rhs))
    }

    pub fn modulo(lhs: Node, rhs: Node) -> Self {
        Node::Mod(Box::new(lhs), Box::new(rhs))
    }

    pub fn ge(lhs: Node, rhs: Node) -> Self {
        Node::Ge(Box::new(lhs), Box::new(rhs))
    }

    pub fn triple(first: Node, second: Node, third: Node) -> Self {
        Node::Triple(Box::new(first), Box::new(second), Box::new(third))
    }

    /// Creates an [`Node::If`]; `elze` is taken when `cond` is false.
    pub fn cond(cond: Node, then: Node, elze: Node) -> Self {
        Node::If(Box::new(cond), Box::new(then), Box::new(elze))
    }

    /// Returns the tag of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::X => NodeKind::X,
            Node::Y => NodeKind::Y,
            Node::T => NodeKind::T,
            Node::MouseX => NodeKind::MouseX,
            Node::MouseY => NodeKind::MouseY,
            Node::Number(_) => NodeKind::Number,
            Node::Boolean(_) => NodeKind::Boolean,
            Node::Abs(_) => NodeKind::Abs,
            Node::Add(..) => NodeKind::Add,
            Node::Mult(..) => NodeKind::Mult,
            Node::Mod(..) => NodeKind::Mod,
            Node::Ge(..) => NodeKind::Ge,
            Node::Triple(..) => NodeKind::Triple,
            Node::If(..) => NodeKind::If,
            Node::Random => NodeKind::Random,
            Node::Rule(_) => NodeKind::Rule,
        }
    }

    /// Returns the direct children in order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Abs(inner) => vec![&**inner],
            Node::Add(lhs, rhs)
            | Node::Mult(lhs, rhs)
            | Node::Mod(lhs, rhs)
            | Node::Ge(lhs, rhs) => vec![&**lhs, &**rhs],
            Node::Triple(a, b, c) | Node::If(a, b, c) => vec![&**a, &**b, &**c],
            Node::X
            | Node::Y
            | Node::T
            | Node::MouseX
            | Node::MouseY
            | Node::Number(_)
            | Node::Boolean(_)
            | Node::Random
            | Node::Rule(_) => Vec::new(),
        }
    }

    /// Visits every node in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// True when the tree contains no [`Node::Random`] and no [`Node::Rule`].
    pub fn is_concrete(&self) -> bool {
        let mut concrete = true;
        self.walk(&mut |n| concrete &= !n.kind().is_generation_only());
        concrete
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Height of the tree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }

    /// Names of all rules referenced anywhere in the tree, in pre-order.
    pub fn rule_refs(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
            if let Node::Rule(name) = n {
                out.push(name.as_str());
            }
        });
        out
    }
}
