// AI implementations over an OpenAI-compatible vendor
//
// These are the infrastructure implementations of BaseAI and
// BaseEmbeddingService. Business logic (what to prompt for) lives in domains.

use anyhow::{Context, Result};
use async_trait::async_trait;
use llm_client::{ChatRequest, LlmClient, Message};

use super::{BaseAI, BaseEmbeddingService};

/// Chat completions against one model.
#[derive(Clone)]
pub struct LlmCompletionService {
    client: LlmClient,
    model: String,
}

impl LlmCompletionService {
    pub fn new(client: LlmClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl BaseAI for LlmCompletionService {
    async fn complete(&self, messages: Vec<Message>, temperature: Option<f32>) -> Result<String> {
        let mut request = ChatRequest::new(&self.model).messages(messages);
        if let Some(t) = temperature {
            request = request.temperature(t);
        }

        tracing::info!(
            model = %self.model,
            messages = request.messages.len(),
            "Calling completion API"
        );

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, model = %self.model, "Completion API call failed");
                e
            })
            .context("Completion API call failed")?;

        tracing::info!(
            response_length = response.content.len(),
            model = %self.model,
            "Completion API response received"
        );

        Ok(response.content)
    }
}

/// Embeddings from one model.
#[derive(Clone)]
pub struct LlmEmbeddingService {
    client: LlmClient,
    model: String,
}

impl LlmEmbeddingService {
    pub fn new(client: LlmClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl BaseEmbeddingService for LlmEmbeddingService {
    async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        self.client
            .create_embedding(text, &self.model)
            .await
            .with_context(|| format!("Failed to create embedding with {}", self.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires API key
    async fn test_classifier_model_round_trip() {
        let api_key = std::env::var("LLM_API_KEY").expect("LLM_API_KEY not set");
        let service = LlmCompletionService::new(LlmClient::new(api_key), "llama-3.3-70b-versatile");

        let reply = service
            .prompt("Reply with the single word OK.", "ping", Some(0.0))
            .await
            .expect("completion failed");

        assert!(!reply.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires API key
    async fn test_generate_embedding() {
        let api_key = std::env::var("LLM_API_KEY").expect("LLM_API_KEY not set");
        let service = LlmEmbeddingService::new(LlmClient::new(api_key), "nomic-embed-text-v1.5");

        let embedding = service
            .generate("Exports time out on projects with more than 10k rows")
            .await
            .expect("Failed to generate embedding");

        assert!(!embedding.is_empty());
    }
}
