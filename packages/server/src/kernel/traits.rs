// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to prompt for lives in the domain activities that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseEmbeddingService)

use anyhow::Result;
use async_trait::async_trait;
use llm_client::Message;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Run a chat completion over `messages` (oldest first) and return the
    /// reply text.
    async fn complete(&self, messages: Vec<Message>, temperature: Option<f32>) -> Result<String>;

    /// Single-shot system + user prompt.
    async fn prompt(&self, system: &str, user: &str, temperature: Option<f32>) -> Result<String> {
        self.complete(vec![Message::system(system), Message::user(user)], temperature)
            .await
    }
}

// =============================================================================
// Embedding Service Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseEmbeddingService: Send + Sync {
    /// Generate an embedding for text. Dimension depends on the model.
    async fn generate(&self, text: &str) -> Result<Vec<f32>>;
}
