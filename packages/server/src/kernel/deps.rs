//! Server dependencies for activities (using traits for testability)
//!
//! `ServerDeps` is the one container every domain action receives. External
//! services sit behind the `Base*` traits so tests can swap in mocks.

use llm_client::LlmClient;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::Config;
use crate::kernel::{BaseAI, BaseEmbeddingService, LlmCompletionService, LlmEmbeddingService};

/// Server dependencies accessible to activities
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Sentiment / urgency / impact classification
    pub classifier: Arc<dyn BaseAI>,
    /// Weekly digest writer
    pub digest_writer: Arc<dyn BaseAI>,
    /// Chat assistant (may live behind a different gateway)
    pub assistant: Arc<dyn BaseAI>,
    pub embedding_service: Arc<dyn BaseEmbeddingService>,
    /// Minimum cosine similarity for joining a cluster
    pub similarity_threshold: f32,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        classifier: Arc<dyn BaseAI>,
        digest_writer: Arc<dyn BaseAI>,
        assistant: Arc<dyn BaseAI>,
        embedding_service: Arc<dyn BaseEmbeddingService>,
        similarity_threshold: f32,
    ) -> Self {
        Self {
            db_pool,
            classifier,
            digest_writer,
            assistant,
            embedding_service,
            similarity_threshold,
        }
    }

    /// Wire the vendor-backed implementations from configuration.
    pub fn from_config(db_pool: PgPool, config: &Config) -> Self {
        let llm = &config.llm;
        let client = LlmClient::new(llm.api_key.clone()).with_base_url(llm.base_url.clone());
        let chat_client =
            LlmClient::new(llm.chat_api_key.clone()).with_base_url(llm.chat_base_url.clone());

        Self::new(
            db_pool,
            Arc::new(LlmCompletionService::new(
                client.clone(),
                llm.classifier_model.clone(),
            )),
            Arc::new(LlmCompletionService::new(
                client.clone(),
                llm.digest_model.clone(),
            )),
            Arc::new(LlmCompletionService::new(chat_client, llm.chat_model.clone())),
            Arc::new(LlmEmbeddingService::new(client, llm.embedding_model.clone())),
            config.cluster_similarity_threshold,
        )
    }
}
