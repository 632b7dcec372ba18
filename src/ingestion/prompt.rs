use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const PLACEHOLDER: &str = "$prompt";

const DEFAULT_TEMPLATE: &str = "\
You are a knowledge graph builder. Given the text or topic below, list the facts it \
contains as relationship triples.

Rules:
- Write exactly one triple per line, in the form (subject, predicate, object).
- Use short entity names and camelCase predicates, e.g. (Paris, capitalOf, France).
- Do not use commas inside a subject, predicate or object.
- Output only the triples, with no numbering or commentary.

Text: $prompt";

/// Prompt sent to the model; `$prompt` marks where the user's text goes.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read prompt template {:?}", path))?;
        Ok(Self::new(text))
    }

    /// Substitutes the first `$prompt` occurrence.
    pub fn render(&self, user_prompt: &str) -> String {
        self.text.replacen(PLACEHOLDER, user_prompt, 1)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}
