//! Outbound language-model calls.
//!
//! [`LanguageModel`] is the seam the classifier depends on; production uses
//! [`OpenAiChatModel`], which speaks the OpenAI-compatible
//! `/chat/completions` API via [`reqwest`].

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One JSON-mode chat completion.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub system: String,
    pub prompt: String,
}

/// Errors from the model call.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// No API key was configured. A deployment error, never transient.
    #[error("language model API key is not configured (set OPENAI_API_KEY)")]
    MissingApiKey,

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("language model API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The API answered but carried no message content.
    #[error("language model returned no content")]
    EmptyResponse,
}

impl ModelError {
    /// Whether this failure comes from configuration rather than the call.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ModelError::MissingApiKey)
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send the request and return the raw text of the model's reply.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ModelError>;
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiChatModel {
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`.
    /// * `api_key` - checked lazily, on the first call that needs it.
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn body(request: &ChatRequest) -> Value {
        json!({
            "model": request.model,
            "temperature": request.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.prompt },
            ],
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ModelError> {
        let api_key = self.api_key.as_deref().ok_or(ModelError::MissingApiKey)?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&Self::body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(ModelError::EmptyResponse)
    }
}
