use std::path::Path;

use anyhow::Context;
use random_art::prelude::Grammar;

/// Parses a RON grammar and validates it.
pub fn parse_grammar(text: &str) -> anyhow::Result<Grammar> {
    let grammar: Grammar = ron::from_str(text).map_err(|e| anyhow::anyhow!(e))?;
    grammar.validate()?;
    Ok(grammar)
}

/// Reads, parses, and validates a RON grammar file.
pub fn load_grammar(path: impl AsRef<Path>) -> anyhow::Result<Grammar> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading grammar {}", path.display()))?;
    let grammar =
        parse_grammar(&text).with_context(|| format!("loading grammar {}", path.display()))?;
    tracing::info!(
        "Loaded grammar {} with {} rules.",
        path.display(),
        grammar.len()
    );
    Ok(grammar)
}
