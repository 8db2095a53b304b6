//! Configuration for a synthesis run.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::RuleName;
use crate::error::{Error, Result};
use crate::grammar::presets::{CLASSIC_DEPTH, CLASSIC_START};

/// Start rule and depth budget for [`crate::synth::Synthesizer::run`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisConfig {
    /// Rule the expansion starts from.
    pub start_rule: RuleName,
    /// Depth budget; larger values give deeper trees on average.
    pub depth: i32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            start_rule: CLASSIC_START.to_string(),
            depth: CLASSIC_DEPTH,
        }
    }
}

impl SynthesisConfig {
    /// Creates a new [`SynthesisConfig`] starting at `start_rule`.
    pub fn new(start_rule: impl Into<RuleName>) -> Self {
        Self {
            start_rule: start_rule.into(),
            ..Default::default()
        }
    }

    /// Sets the depth budget.
    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the start rule.
    pub fn with_start_rule(mut self, start_rule: impl Into<RuleName>) -> Self {
        self.start_rule = start_rule.into();
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.start_rule.is_empty() {
            return Err(Error::InvalidConfig("start_rule must not be empty".into()));
        }
        if self.depth < 0 {
            return Err(Error::InvalidConfig("depth must be >= 0".into()));
        }

        Ok(())
    }
}
