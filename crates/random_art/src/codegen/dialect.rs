//! Token spellings that differ between target shading languages.
//!
//! The generator's traversal is identical for every target; a [`Dialect`] only decides how
//! vector constructors, boolean casts, literals, and free variables are spelled.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::NodeKind;

/// How number literals are written.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberStyle {
    /// Shortest round-trip spelling: `1`, `0.5`, `-0.25`; exponent form from `1e15` up.
    Shortest,
    /// Always marked as floating point: `1.0`, `0.5`, `1e-7`.
    Decimal,
}

const SHORTEST_EXPONENT_FROM: f32 = 1e15;

impl NumberStyle {
    /// Spells `value`, or `None` when the value is not finite.
    pub fn format(self, value: f32) -> Option<String> {
        if !value.is_finite() {
            return None;
        }
        Some(match self {
            // Plain `{}` never uses an exponent; huge whole numbers would read as integers.
            NumberStyle::Shortest if value.abs() >= SHORTEST_EXPONENT_FROM => {
                format!("{:e}", value)
            }
            NumberStyle::Shortest => format!("{}", value),
            NumberStyle::Decimal => format!("{:?}", value),
        })
    }
}

/// Names the generated expression uses for the free variables.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variables {
    pub x: String,
    pub y: String,
    pub t: String,
    pub mouse_x: String,
    pub mouse_y: String,
}

impl Default for Variables {
    fn default() -> Self {
        Self {
            x: "x".into(),
            y: "y".into(),
            t: "t".into(),
            mouse_x: "mouse_x".into(),
            mouse_y: "mouse_y".into(),
        }
    }
}

/// Description of a target expression language.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct Dialect {
    /// Name used in diagnostics.
    pub name: String,
    /// Three-argument vector constructor.
    pub vec3_constructor: String,
    /// Function-style cast from boolean to scalar.
    pub bool_cast: String,
    /// Spelling of number literals.
    pub number_style: NumberStyle,
    pub true_literal: String,
    pub false_literal: String,
    /// Free-variable names.
    pub variables: Variables,
    /// Kinds this dialect has no transcription for.
    pub unsupported: Vec<NodeKind>,
}

impl Dialect {
    /// GLSL ES 1.00 as accepted by WebGL 1.
    pub fn glsl() -> Self {
        Self {
            name: "glsl".into(),
            vec3_constructor: "vec3".into(),
            bool_cast: "float".into(),
            number_style: NumberStyle::Decimal,
            true_literal: "true".into(),
            false_literal: "false".into(),
            variables: Variables::default(),
            unsupported: Vec::new(),
        }
    }

    /// WGSL as accepted by WebGPU.
    pub fn wgsl() -> Self {
        Self {
            name: "wgsl".into(),
            vec3_constructor: "vec3f".into(),
            bool_cast: "f32".into(),
            number_style: NumberStyle::Shortest,
            true_literal: "true".into(),
            false_literal: "false".into(),
            variables: Variables::default(),
            unsupported: Vec::new(),
        }
    }

    /// Sets the free-variable names.
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.variables = variables;
        self
    }

    /// Marks a kind as having no transcription in this dialect.
    pub fn with_unsupported(mut self, kind: NodeKind) -> Self {
        if !self.unsupported.contains(&kind) {
            self.unsupported.push(kind);
        }
        self
    }

    #[inline]
    pub fn supports(&self, kind: NodeKind) -> bool {
        !self.unsupported.contains(&kind)
    }

    pub fn boolean_literal(&self, value: bool) -> &str {
        if value {
            &self.true_literal
        } else {
            &self.false_literal
        }
    }

    /// Bound name of a free-variable kind.
    pub fn variable(&self, kind: NodeKind) -> Option<&str> {
        let v = &self.variables;
        match kind {
            NodeKind::X => Some(&v.x),
            NodeKind::Y => Some(&v.y),
            NodeKind::T => Some(&v.t),
            NodeKind::MouseX => Some(&v.mouse_x),
            NodeKind::MouseY => Some(&v.mouse_y),
            _ => None,
        }
    }
}
