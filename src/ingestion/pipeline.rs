use super::extractor::extract_tuples;
use super::json_cleaner::clean_json_tuples;
use super::llm_client::CompletionClient;
use super::prompt::PromptTemplate;
use crate::domain::Tuple;
use crate::memory::{build_graph, restructure, GraphDelta};
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Tuples → first-pass graph → restructured delta.
pub fn delta_from_tuples(tuples: &[Tuple]) -> GraphDelta {
    restructure(build_graph(tuples))
}

pub fn delta_from_text(text: &str) -> GraphDelta {
    delta_from_tuples(&extract_tuples(text))
}

pub fn delta_from_json(value: Option<&Value>) -> GraphDelta {
    delta_from_tuples(&clean_json_tuples(value))
}

/// Result of one extraction pass, ready to be dispatched.
#[derive(Debug, Clone)]
pub struct IngestionOutcome {
    pub tuples: Vec<Tuple>,
    pub delta: GraphDelta,
}

impl IngestionOutcome {
    /// Trims every tuple and drops those with a blank field before building the delta.
    pub fn from_tuples(tuples: Vec<Tuple>) -> Self {
        let tuples: Vec<Tuple> = tuples
            .iter()
            .filter_map(|t| Tuple::from_fields(&t.subject, &t.predicate, &t.object))
            .collect();
        let delta = delta_from_tuples(&tuples);
        Self { tuples, delta }
    }
}

/// Prompt → completion → delta. Holds no graph state; the caller decides what to dispatch.
pub struct IngestionPipeline<C: CompletionClient + ?Sized> {
    client: Arc<C>,
    template: PromptTemplate,
}

impl<C: CompletionClient + ?Sized> IngestionPipeline<C> {
    pub fn new(client: Arc<C>, template: PromptTemplate) -> Self {
        Self { client, template }
    }

    pub fn generate(&self, user_prompt: &str) -> Result<IngestionOutcome> {
        let prompt = self.template.render(user_prompt);
        let completion = self
            .client
            .complete(&prompt)
            .context("completion request failed")?;
        let outcome = IngestionOutcome::from_tuples(extract_tuples(&completion));
        info!(
            tuples = outcome.tuples.len(),
            nodes = outcome.delta.nodes.len(),
            edges = outcome.delta.edges.len(),
            "completion extracted"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::MockCompletionClient;
    use serde_json::json;

    #[test]
    fn text_pipeline_collapses_case_variants() {
        let delta = delta_from_text(
            "(Paris, capitalOf, France)\n(paris, locatedIn, Europe)\ngarbage line",
        );
        assert_eq!(delta.nodes.len(), 3);
        assert_eq!(delta.edges.len(), 2);
    }

    #[test]
    fn json_pipeline_tolerates_missing_document() {
        assert!(delta_from_json(None).is_empty());
        assert!(delta_from_json(Some(&json!({"nodes": []}))).is_empty());
    }

    #[test]
    fn outcome_drops_blank_tuples() {
        let outcome = IngestionOutcome::from_tuples(vec![
            Tuple::new("  ", "r", "b"),
            Tuple::new("a", "", "b"),
            Tuple::new(" a ", "r", "b"),
        ]);
        assert_eq!(outcome.tuples, vec![Tuple::new("a", "r", "b")]);
        assert_eq!(outcome.delta.nodes.len(), 2);
        assert_eq!(outcome.delta.edges.len(), 1);
    }

    #[test]
    fn generate_renders_prompt_and_extracts() {
        let mock = MockCompletionClient::default();
        mock.push_response("(Rust, createdBy, Graydon Hoare)\n(Rust, paradigm, Systems)");
        let pipeline = IngestionPipeline::new(
            Arc::new(mock.clone()),
            PromptTemplate::new("Extract: $prompt"),
        );

        let outcome = pipeline.generate("Rust history").unwrap();
        assert_eq!(outcome.tuples.len(), 2);
        assert_eq!(outcome.delta.nodes.len(), 3);
        assert_eq!(mock.prompts(), vec!["Extract: Rust history".to_string()]);
    }

    #[test]
    fn generate_propagates_fetch_failure() {
        let pipeline = IngestionPipeline::new(
            Arc::new(MockCompletionClient::default()),
            PromptTemplate::default(),
        );
        assert!(pipeline.generate("anything").is_err());
    }
}
