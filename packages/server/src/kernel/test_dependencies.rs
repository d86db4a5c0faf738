// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use llm_client::Message;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};

use super::{BaseAI, BaseEmbeddingService, ServerDeps};
use crate::domains::clustering::DEFAULT_SIMILARITY_THRESHOLD;

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

enum MockReply {
    Text(String),
    Failure(String),
}

pub struct MockAI {
    responses: Arc<Mutex<Vec<MockReply>>>,
    default_response: String,
    calls: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: "Mock AI response".to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockReply::Text(response.into()));
        self
    }

    /// Add a JSON response to the queue (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.with_response(json)
    }

    /// Queue a vendor failure
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(MockReply::Failure(message.into()));
        self
    }

    /// Response returned once the queue is drained
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Get every message list that was sent to the AI
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the last message list sent to the AI
    pub fn last_call(&self) -> Option<Vec<Message>> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Check if any message containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .any(|m| m.content.contains(text))
    }

    /// Get the number of times the AI was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, messages: Vec<Message>, _temperature: Option<f32>) -> Result<String> {
        self.calls.lock().unwrap().push(messages);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(self.default_response.clone());
        }
        match responses.remove(0) {
            MockReply::Text(text) => Ok(text),
            MockReply::Failure(message) => Err(anyhow!(message)),
        }
    }
}

// =============================================================================
// Mock Embedding Service
// =============================================================================

pub struct MockEmbeddingService {
    // Returned for every input without a matching pattern
    fixed_embedding: Vec<f32>,
    pattern_embeddings: Arc<Mutex<Vec<(String, Vec<f32>)>>>,
    failing: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockEmbeddingService {
    pub fn new() -> Self {
        Self {
            fixed_embedding: vec![0.1; 8],
            pattern_embeddings: Arc::new(Mutex::new(Vec::new())),
            failing: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call fails, as when the embedding endpoint is down
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::new()
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.fixed_embedding = embedding;
        self
    }

    /// When text contains the pattern (case-insensitive), return this embedding
    pub fn with_pattern_embedding(self, pattern: &str, embedding: Vec<f32>) -> Self {
        self.pattern_embeddings
            .lock()
            .unwrap()
            .push((pattern.to_string(), embedding));
        self
    }

    /// Get all texts that embeddings were generated for
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockEmbeddingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEmbeddingService for MockEmbeddingService {
    async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.lock().unwrap().push(text.to_string());

        if self.failing {
            return Err(anyhow!("embedding endpoint unavailable"));
        }

        let patterns = self.pattern_embeddings.lock().unwrap();
        let lowered = text.to_lowercase();
        for (pattern, embedding) in patterns.iter() {
            if lowered.contains(&pattern.to_lowercase()) {
                return Ok(embedding.clone());
            }
        }

        Ok(self.fixed_embedding.clone())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub classifier: Arc<MockAI>,
    pub digest_writer: Arc<MockAI>,
    pub assistant: Arc<MockAI>,
    pub embedding_service: Arc<MockEmbeddingService>,
    pub similarity_threshold: f32,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            classifier: Arc::new(MockAI::new().with_default_response(
                r#"{"sentiment": "neutral", "urgency": "low", "impact": "nice_to_have"}"#,
            )),
            digest_writer: Arc::new(MockAI::new()),
            assistant: Arc::new(MockAI::new()),
            embedding_service: Arc::new(MockEmbeddingService::new()),
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Set the classification mock
    pub fn mock_classifier(mut self, ai: MockAI) -> Self {
        self.classifier = Arc::new(ai);
        self
    }

    /// Set the digest writer mock
    pub fn mock_digest_writer(mut self, ai: MockAI) -> Self {
        self.digest_writer = Arc::new(ai);
        self
    }

    /// Set the chat assistant mock
    pub fn mock_assistant(mut self, ai: MockAI) -> Self {
        self.assistant = Arc::new(ai);
        self
    }

    /// Set a mock embedding service
    pub fn mock_embeddings(mut self, service: MockEmbeddingService) -> Self {
        self.embedding_service = Arc::new(service);
        self
    }

    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self, db_pool: PgPool) -> Arc<ServerDeps> {
        Arc::new(ServerDeps::new(
            db_pool,
            self.classifier,
            self.digest_writer,
            self.assistant,
            self.embedding_service,
            self.similarity_threshold,
        ))
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
