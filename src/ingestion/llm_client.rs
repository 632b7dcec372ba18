use super::config::CompletionConfig;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use reqwest::blocking::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// Source of raw completion text. Implementations own the network exchange; callers only
/// see the completion string or an error.
pub trait CompletionClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Client for OpenAI-compatible `chat/completions` endpoints (OpenRouter, OpenAI, local proxies).
pub struct ChatCompletionClient {
    config: CompletionConfig,
    http: HttpClient,
}

impl ChatCompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to initialise the HTTP client")?;
        Ok(Self { config, http })
    }
}

impl CompletionClient for ChatCompletionClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let payload = ChatCompletionRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            messages: vec![ChatMessage {
                role: "system",
                content: prompt,
            }],
        };

        let mut request = self.http.post(&self.config.endpoint).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        if let Some(title) = self.config.provider.title_header() {
            request = request.header("X-Title", title);
        }

        let response = request
            .send()
            .with_context(|| format!("request to {} failed", self.config.endpoint))?
            .error_for_status()
            .context("completion endpoint returned an error status")?;

        let body: Value = response
            .json()
            .context("completion response is not valid JSON")?;
        Ok(completion_text(&body))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Pulls `choices[0].message.content` out of a chat-completions body; empty when absent.
pub fn completion_text(body: &Value) -> String {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Replays queued completions in order. An empty queue behaves like a failed fetch.
#[derive(Clone, Default)]
pub struct MockCompletionClient {
    responses: Arc<Mutex<VecDeque<String>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockCompletionClient {
    pub fn push_response(&self, completion: impl Into<String>) {
        self.responses.lock().push_back(completion.into());
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no mock completion queued"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completion_text_reads_first_choice() {
        let body = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "(a, b, c)"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ]
        });
        assert_eq!(completion_text(&body), "(a, b, c)");
    }

    #[test]
    fn completion_text_defaults_to_empty() {
        assert_eq!(completion_text(&json!({})), "");
        assert_eq!(completion_text(&json!({"choices": []})), "");
        assert_eq!(completion_text(&json!({"choices": [{"message": {"content": null}}]})), "");
    }

    #[test]
    fn mock_replays_then_fails() {
        let mock = MockCompletionClient::default();
        mock.push_response("(a, b, c)");
        assert_eq!(mock.complete("first").unwrap(), "(a, b, c)");
        assert!(mock.complete("second").is_err());
        assert_eq!(mock.prompts(), vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn request_serializes_as_chat_completion() {
        let payload = ChatCompletionRequest {
            model: "m",
            temperature: 0.5,
            max_tokens: 10,
            messages: vec![ChatMessage {
                role: "system",
                content: "hello",
            }],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert_eq!(value["max_tokens"], 10);
    }
}
