use anyhow::Error;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const OPENROUTER_TITLE: &str = "KnowledgeGraph GPT";

/// Chat-completions provider the completion text is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    OpenRouter,
    OpenAi,
}

impl Provider {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Provider::OpenRouter => OPENROUTER_ENDPOINT,
            Provider::OpenAi => OPENAI_ENDPOINT,
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Provider::OpenRouter => "openai/gpt-4o-mini",
            Provider::OpenAi => "gpt-4o-mini",
        }
    }

    /// Value of the `X-Title` header, only sent to OpenRouter.
    pub fn title_header(self) -> Option<&'static str> {
        match self {
            Provider::OpenRouter => Some(OPENROUTER_TITLE),
            Provider::OpenAi => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenRouter => f.write_str("openrouter"),
            Provider::OpenAi => f.write_str("openai"),
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "openrouter" => Ok(Provider::OpenRouter),
            "openai" => Ok(Provider::OpenAi),
            _ => anyhow::bail!("unknown provider: {}", s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub provider: Provider,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    /// Forwarded as a bearer token when present.
    pub api_key: Option<String>,
}

impl CompletionConfig {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            endpoint: provider.default_endpoint().to_string(),
            model: provider.default_model().to_string(),
            temperature: 0.3,
            max_tokens: 800,
            timeout: Duration::from_secs(120),
            api_key: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self::new(Provider::default())
    }
}
