use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::config::AppConfig;
use super::history::IdeaResponse;

// ── Idea Generation (messages API) ───────────────────────────────────────────

pub const ALL_CATEGORIES: &str = "All Categories";

/// Categories offered by the UI. Any other label is passed through as-is.
pub const CATEGORIES: &[&str] = &[
    ALL_CATEGORIES,
    "Fintech",
    "Healthcare",
    "E-commerce",
    "Education",
    "SaaS",
    "Entertainment",
    "Social Media",
    "Productivity",
    "Gaming",
    "Travel",
    "Food & Beverage",
    "Real Estate",
    "Transportation",
    "Environment",
    "AI & Machine Learning",
];

const ANTHROPIC_VERSION: &str = "2023-06-01";
const GENERATE_MAX_TOKENS: u32 = 2048;
const VALIDATE_MAX_TOKENS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Please set your API key in settings first")]
    MissingApiKey,
    #[error("Invalid API key. Please check it in settings")]
    InvalidApiKey,
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("No content in response")]
    EmptyResponse,
    #[error("Failed to parse idea JSON: {source}. Response: {text}")]
    Parse {
        text: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GenerateError {
    /// True when the fix is to enter a different key in settings.
    pub fn is_api_key_error(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::InvalidApiKey)
    }
}

/// Produces ideas and checks keys against the remote model.
#[async_trait]
pub trait IdeaGenerator: Send + Sync {
    async fn generate(&self, category: &str, api_key: &str) -> Result<IdeaResponse, GenerateError>;

    /// `Ok(false)` for a key the API rejects; `Err` only when the API
    /// could not be reached.
    async fn validate_key(&self, api_key: &str) -> Result<bool, GenerateError>;
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Client for the Anthropic messages API.
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(config: &AppConfig) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("ai-idea-generator/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    async fn send(
        &self,
        api_key: &str,
        prompt: String,
        max_tokens: u32,
    ) -> Result<reqwest::Response, GenerateError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };
        Ok(self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?)
    }
}

#[async_trait]
impl IdeaGenerator for AnthropicClient {
    async fn generate(&self, category: &str, api_key: &str) -> Result<IdeaResponse, GenerateError> {
        if api_key.trim().is_empty() {
            return Err(GenerateError::MissingApiKey);
        }

        tracing::info!(category, model = %self.model, "requesting idea");
        let resp = self
            .send(api_key, build_prompt(category), GENERATE_MAX_TOKENS)
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), body));
        }

        let body: MessagesResponse = resp.json().await?;
        let text = body
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or(GenerateError::EmptyResponse)?;
        parse_idea(&text)
    }

    async fn validate_key(&self, api_key: &str) -> Result<bool, GenerateError> {
        if api_key.trim().is_empty() {
            return Ok(false);
        }
        let resp = self
            .send(api_key, "Hi".to_string(), VALIDATE_MAX_TOKENS)
            .await?;
        tracing::debug!(status = resp.status().as_u16(), "api key check");
        Ok(resp.status().is_success())
    }
}

fn build_prompt(category: &str) -> String {
    let category_filter = if category == ALL_CATEGORIES {
        "any domain or industry".to_string()
    } else {
        format!("the {} industry", category)
    };

    format!(
        r#"Generate a detailed startup or application idea for {}.

Please provide the response in the following JSON format:
{{
  "concept": "A clear, concise description of the idea (2-3 sentences)",
  "platform": "Recommended platform (Web, Mobile, Desktop, or Multi-platform)",
  "target_audience": "Detailed target audience description",
  "key_features": ["feature 1", "feature 2", "feature 3", "feature 4", "feature 5"],
  "monetization": "Monetization strategy description",
  "value_proposition": "Clear value proposition (1-2 sentences)"
}}

Make the idea innovative, practical, and market-ready. Include 5-8 key features."#,
        category_filter
    )
}

fn classify_status(status: u16, body: String) -> GenerateError {
    match status {
        401 | 403 => GenerateError::InvalidApiKey,
        _ => GenerateError::Api { status, body },
    }
}

/// The JSON payload of a model reply: the body of a ```` ```json ```` fence,
/// else of the first plain fence, else the whole trimmed text.
fn extract_json(text: &str) -> &str {
    let fenced = if let Some((_, rest)) = text.split_once("```json") {
        Some(rest)
    } else {
        text.split_once("```").map(|(_, rest)| rest)
    };
    match fenced {
        Some(rest) => rest.split("```").next().unwrap_or(rest).trim(),
        None => text.trim(),
    }
}

fn parse_idea(text: &str) -> Result<IdeaResponse, GenerateError> {
    let json = extract_json(text);
    serde_json::from_str(json).map_err(|source| GenerateError::Parse {
        text: json.to_string(),
        source,
    })
}

/// Canned generator for state and command tests.
#[cfg(test)]
pub struct StaticGenerator {
    pub response: IdeaResponse,
    pub valid_key: String,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
#[async_trait]
impl IdeaGenerator for StaticGenerator {
    async fn generate(&self, _category: &str, api_key: &str) -> Result<IdeaResponse, GenerateError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if api_key != self.valid_key {
            return Err(GenerateError::InvalidApiKey);
        }
        Ok(self.response.clone())
    }

    async fn validate_key(&self, api_key: &str) -> Result<bool, GenerateError> {
        Ok(api_key == self.valid_key)
    }
}
