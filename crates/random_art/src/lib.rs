#![forbid(unsafe_code)]
//! random_art: grammar-driven synthesis of expression trees compiled to shader source.
//!
//! Modules:
//! - ast: the expression tree and its node kinds
//! - grammar: weighted production rules, validation, and presets
//! - synth: random expansion of a grammar into a concrete tree
//! - codegen: transcription to GLSL or WGSL, plus complete shader programs
//! - eval: CPU evaluation of concrete trees for previews and tests
//!
//! For examples, see the README and the `random_art_examples` crate.
pub mod ast;
pub mod codegen;
pub mod error;
pub mod eval;
pub mod grammar;
pub mod synth;

/// Convenient re-exports for common types. Import with `use random_art::prelude::*;`.
pub mod prelude {
    pub use crate::ast::{Node, NodeKind, RuleName};
    pub use crate::codegen::{
        compile_art, generate, Canvas, Dialect, NumberStyle, ShaderLanguage, ShaderProgram,
        Variables,
    };
    pub use crate::error::{Error, Result};
    pub use crate::eval::{evaluate, shade, Inputs, Value};
    pub use crate::grammar::{presets, uniform_branches, weighted_branches, Branch, Grammar};
    pub use crate::synth::{
        expand_node, expand_rule, synthesize, SynthesisConfig, Synthesizer,
    };
}
