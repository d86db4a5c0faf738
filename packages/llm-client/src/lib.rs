//! Minimal client for OpenAI-compatible REST APIs.
//!
//! Groq, hosted gateways and OpenAI itself all speak the same
//! `/chat/completions` and `/embeddings` dialect; this crate covers exactly
//! those two calls with no domain logic.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm_client::{ChatRequest, LlmClient, Message};
//!
//! let client = LlmClient::from_env()?;
//!
//! let response = client
//!     .chat_completion(
//!         ChatRequest::new("llama-3.3-70b-versatile")
//!             .message(Message::system("You are terse."))
//!             .message(Message::user("Hello!"))
//!             .temperature(0.1),
//!     )
//!     .await?;
//!
//! let embedding = client
//!     .create_embedding("text to embed", "nomic-embed-text-v1.5")
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{LlmError, Result};
pub use types::*;

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// Default endpoint for the classifier and digest models.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Client for an OpenAI-compatible API.
#[derive(Clone)]
pub struct LlmClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `LLM_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| LlmError::Config("LLM_API_KEY not configured".into()))?;
        Ok(Self::new(api_key))
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Returns the content of the first choice. A response without any
    /// content is reported as [`LlmError::EmptyResponse`].
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let raw: ChatResponseRaw = self.post_json("chat/completions", &request).await?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyResponse("No content in completion response".into()))?;

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat completion finished"
        );

        Ok(ChatResponse {
            content,
            model: raw.model,
            usage: raw.usage,
        })
    }

    /// Create an embedding for `text` with the given model.
    pub async fn create_embedding(&self, text: &str, model: &str) -> Result<Vec<f32>> {
        let response: EmbeddingResponse = self
            .post_json("embeddings", &EmbeddingRequest { model, input: text })
            .await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| LlmError::EmptyResponse("No embedding in response".into()))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = %url, "LLM request failed");
                LlmError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, url = %url, "LLM API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))
    }
}
