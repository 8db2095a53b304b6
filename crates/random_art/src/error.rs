//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, malformed grammars, synthesis failures, code generation contract
//! violations, evaluation failures, IO, and generic errors.
use thiserror::Error;

use crate::ast::NodeKind;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    #[error("unknown rule '{rule}'")]
    InvalidGrammarReference { rule: String },

    #[error("rule '{rule}' selected no branch for roll {roll} (probabilities sum to {total})")]
    ExhaustedBranches { rule: String, roll: f32, total: f32 },

    #[error("not a runtime kind: {kind}")]
    InvalidRuntimeNode { kind: NodeKind },

    #[error("dialect '{dialect}' cannot transcribe {kind}")]
    UnsupportedNodeKind { kind: NodeKind, dialect: String },

    #[error("number literal {value} has no shader spelling")]
    InvalidLiteral { value: f32 },

    #[error("evaluation error: {0}")]
    Runtime(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
