mod config;
mod extractor;
mod json_cleaner;
mod llm_client;
mod pipeline;
mod prompt;

pub use config::{CompletionConfig, Provider};
pub use extractor::extract_tuples;
pub use json_cleaner::{clean_json_tuples, parse_import_document};
pub use llm_client::{
    completion_text, ChatCompletionClient, CompletionClient, MockCompletionClient,
};
pub use pipeline::{
    delta_from_json, delta_from_text, delta_from_tuples, IngestionOutcome, IngestionPipeline,
};
pub use prompt::PromptTemplate;
