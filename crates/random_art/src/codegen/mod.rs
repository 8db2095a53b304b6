//! Transcription of concrete expression trees into shading-language source text.
//!
//! [`generate`] walks the tree once and writes a single expression. Every binary operator is
//! fully parenthesized so the target's precedence rules never matter, and [`Node::If`] is
//! written as a branchless blend:
//!
//! ```text
//! (cast(cond) * (then) + cast(!(cond)) * (else))
//! ```
//!
//! Target differences are confined to the [`Dialect`]; see [`program`] for wrapping the
//! expression into a complete shader.
use tracing::debug;

use crate::ast::Node;
use crate::error::{Error, Result};

pub mod dialect;
pub mod program;

pub use dialect::{Dialect, NumberStyle, Variables};
pub use program::{compile_art, Canvas, ShaderLanguage, ShaderProgram};

/// Writes `node` as an expression in `dialect`.
///
/// Fails with [`Error::InvalidRuntimeNode`] on [`Node::Random`] or [`Node::Rule`], and with
/// [`Error::UnsupportedNodeKind`] on a kind the dialect declares unsupported.
pub fn generate(node: &Node, dialect: &Dialect) -> Result<String> {
    let mut emitter = Emitter::new(dialect);
    emitter.emit(node)?;
    debug!(
        "Generated {} bytes of {} from {} nodes.",
        emitter.out.len(),
        dialect.name,
        node.node_count()
    );
    Ok(emitter.out)
}

struct Emitter<'d> {
    dialect: &'d Dialect,
    out: String,
}

impl<'d> Emitter<'d> {
    fn new(dialect: &'d Dialect) -> Self {
        Self {
            dialect,
            out: String::new(),
        }
    }

    fn emit(&mut self, node: &Node) -> Result<()> {
        let kind = node.kind();
        if kind.is_generation_only() {
            return Err(Error::InvalidRuntimeNode { kind });
        }
        if !self.dialect.supports(kind) {
            return Err(Error::UnsupportedNodeKind {
                kind,
                dialect: self.dialect.name.clone(),
            });
        }

        match node {
            Node::X | Node::Y | Node::T | Node::MouseX | Node::MouseY => {
                let name = self
                    .dialect
                    .variable(kind)
                    .ok_or(Error::UnsupportedNodeKind {
                        kind,
                        dialect: self.dialect.name.clone(),
                    })?;
                self.out.push_str(name);
            }
            Node::Number(value) => {
                let literal = self
                    .dialect
                    .number_style
                    .format(*value)
                    .ok_or(Error::InvalidLiteral { value: *value })?;
                self.out.push_str(&literal);
            }
            Node::Boolean(value) => {
                self.out.push_str(self.dialect.boolean_literal(*value));
            }
            Node::Abs(inner) => {
                self.out.push_str("abs(");
                self.emit(inner)?;
                self.out.push(')');
            }
            Node::Add(lhs, rhs) => self.binary(lhs, "+", rhs)?,
            Node::Mult(lhs, rhs) => self.binary(lhs, "*", rhs)?,
            Node::Mod(lhs, rhs) => self.binary(lhs, "%", rhs)?,
            Node::Ge(lhs, rhs) => self.binary(lhs, ">=", rhs)?,
            Node::Triple(first, second, third) => {
                self.out.push_str(&self.dialect.vec3_constructor);
                self.out.push('(');
                self.emit(first)?;
                self.out.push_str(", ");
                self.emit(second)?;
                self.out.push_str(", ");
                self.emit(third)?;
                self.out.push(')');
            }
            Node::If(cond, then, elze) => {
                // The condition appears twice; render it once.
                let cond = {
                    let mut sub = Emitter::new(self.dialect);
                    sub.emit(cond)?;
                    sub.out
                };
                let dialect = self.dialect;
                let cast = &dialect.bool_cast;

                self.out.push('(');
                self.out.push_str(cast);
                self.out.push('(');
                self.out.push_str(&cond);
                self.out.push_str(") * (");
                self.emit(then)?;
                self.out.push_str(") + ");
                self.out.push_str(cast);
                self.out.push_str("(!(");
                self.out.push_str(&cond);
                self.out.push_str(")) * (");
                self.emit(elze)?;
                self.out.push_str("))");
            }
            Node::Random | Node::Rule(_) => return Err(Error::InvalidRuntimeNode { kind }),
        }

        Ok(())
    }

    fn binary(&mut self, lhs: &Node, op: &str, rhs: &Node) -> Result<()> {
        self.out.push('(');
        self.emit(lhs)?;
        self.out.push(' ');
        self.out.push_str(op);
        self.out.push(' ');
        self.emit(rhs)?;
        self.out.push(')');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::ast::NodeKind;
    use crate::grammar::{presets, uniform_branches, Grammar};
    use crate::synth::synthesize;

    #[test]
    fn synthesized_constant_generates_its_literal() {
        let grammar = Grammar::new().with_rule("A", uniform_branches([Node::number(1.0)]));
        let node = synthesize(&grammar, "A", 5, &mut StdRng::seed_from_u64(5)).expect("node");
        assert_eq!(generate(&node, &Dialect::wgsl()).expect("text"), "1");
        assert_eq!(generate(&node, &Dialect::glsl()).expect("text"), "1.0");
    }

    #[test]
    fn comparison_is_parenthesized() {
        let node = Node::ge(Node::number(2.0), Node::number(1.0));
        assert_eq!(generate(&node, &Dialect::wgsl()).expect("text"), "(2 >= 1)");
    }

    #[test]
    fn conditional_is_a_branchless_blend() {
        let node = Node::cond(Node::boolean(true), Node::number(1.0), Node::number(0.0));
        assert_eq!(
            generate(&node, &Dialect::wgsl()).expect("text"),
            "(f32(true) * (1) + f32(!(true)) * (0))"
        );
        assert_eq!(
            generate(&node, &Dialect::glsl()).expect("text"),
            "(float(true) * (1.0) + float(!(true)) * (0.0))"
        );
    }

    #[test]
    fn operators_and_vectors() {
        let node = Node::triple(
            Node::abs(Node::T),
            Node::add(Node::X, Node::mult(Node::Y, Node::MouseX)),
            Node::modulo(Node::MouseY, Node::number(0.5)),
        );
        assert_eq!(
            generate(&node, &Dialect::glsl()).expect("text"),
            "vec3(abs(t), (x + (y * mouse_x)), (mouse_y % 0.5))"
        );
        assert_eq!(
            generate(&node, &Dialect::wgsl()).expect("text"),
            "vec3f(abs(t), (x + (y * mouse_x)), (mouse_y % 0.5))"
        );
    }

    #[test]
    fn cool_preset_transcribes() {
        assert_eq!(
            generate(&presets::cool(), &Dialect::wgsl()).expect("text"),
            "(f32(((x * y) >= 0)) * (vec3f(x, y, 1)) + f32(!(((x * y) >= 0))) * \
             (vec3f((x % y), (x % y), (x % y))))"
        );
    }

    #[test]
    fn generation_time_nodes_are_rejected() {
        let err = generate(&Node::rule("E"), &Dialect::wgsl()).expect_err("rule");
        assert!(matches!(err, Error::InvalidRuntimeNode { kind: NodeKind::Rule }));

        let nested = Node::triple(Node::X, Node::abs(Node::Random), Node::Y);
        let err = generate(&nested, &Dialect::glsl()).expect_err("random");
        assert!(matches!(err, Error::InvalidRuntimeNode { kind: NodeKind::Random }));
    }

    #[test]
    fn unsupported_kinds_fail_fast() {
        let dialect = Dialect::glsl().with_unsupported(NodeKind::Mod);
        let err = generate(&presets::cool(), &dialect).expect_err("no MOD");
        assert!(matches!(
            err,
            Error::UnsupportedNodeKind { kind: NodeKind::Mod, ref dialect } if dialect == "glsl"
        ));
        generate(&presets::gradient(), &dialect).expect("gradient has no MOD");
    }

    #[test]
    fn non_finite_literals_are_rejected() {
        let err = generate(&Node::number(f32::NAN), &Dialect::wgsl()).expect_err("nan");
        assert!(matches!(err, Error::InvalidLiteral { .. }));
    }

    #[test]
    fn huge_literals_are_written_as_floats() {
        let node = Node::mult(Node::X, Node::number(1e20));
        assert_eq!(generate(&node, &Dialect::wgsl()).expect("text"), "(x * 1e20)");
        assert_eq!(generate(&node, &Dialect::glsl()).expect("text"), "(x * 1e20)");
    }

    #[test]
    fn custom_variable_names_are_used() {
        let dialect = Dialect::wgsl().with_variables(Variables {
            x: "p.x".into(),
            y: "p.y".into(),
            ..Variables::default()
        });
        let node = Node::add(Node::X, Node::Y);
        assert_eq!(generate(&node, &dialect).expect("text"), "(p.x + p.y)");
    }

    #[derive(Debug, PartialEq)]
    enum Token {
        Number(f32),
        Word(String),
        Punct(char),
    }

    fn tokenize(text: &str) -> Vec<Token> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            let starts_number = c.is_ascii_digit()
                || (c == '-' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()));
            if c.is_whitespace() {
                i += 1;
            } else if starts_number {
                let start = i;
                i += 1;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '-')
                {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                tokens.push(Token::Number(literal.parse().expect("numeric literal")));
            } else if c.is_ascii_alphabetic() || c == '_' {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Word(chars[start..i].iter().collect()));
            } else {
                tokens.push(Token::Punct(c));
                i += 1;
            }
        }
        tokens
    }

    fn to_wgsl_tokens(tokens: Vec<Token>) -> Vec<Token> {
        let glsl = Dialect::glsl();
        let wgsl = Dialect::wgsl();
        tokens
            .into_iter()
            .map(|t| match t {
                Token::Word(w) if w == glsl.vec3_constructor => {
                    Token::Word(wgsl.vec3_constructor.clone())
                }
                Token::Word(w) if w == glsl.bool_cast => Token::Word(wgsl.bool_cast.clone()),
                other => other,
            })
            .collect()
    }

    #[test]
    fn dialects_are_token_substitutable() {
        let grammar = presets::classic();
        let mut rng = StdRng::seed_from_u64(77);
        let mut trees = vec![presets::cool(), presets::gradient()];
        for depth in [4, 10, 20, 30] {
            trees.push(synthesize(&grammar, "E", depth, &mut rng).expect("tree"));
        }

        for tree in &trees {
            let glsl = generate(tree, &Dialect::glsl()).expect("glsl");
            let wgsl = generate(tree, &Dialect::wgsl()).expect("wgsl");
            assert_eq!(to_wgsl_tokens(tokenize(&glsl)), tokenize(&wgsl));
        }
    }
}
