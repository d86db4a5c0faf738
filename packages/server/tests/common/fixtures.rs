//! Test fixtures for creating test data.
//!
//! Rows are created through the model methods wherever one exists.

use anyhow::Result;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use triage_core::common::{AnalysisId, FeedbackId, UserId};
use triage_core::domains::analysis::{Classification, FeedbackAnalysis, Impact, Sentiment, Urgency};
use triage_core::domains::feedback::{Feedback, FeedbackSource};
use triage_core::server::auth::Claims;

use super::harness::{TEST_JWT_AUDIENCE, TEST_JWT_SECRET};

/// Create a manually submitted feedback entry with no analysis
pub async fn create_test_feedback(pool: &PgPool, content: &str) -> Result<Feedback> {
    Feedback::create(content, FeedbackSource::Manual, None, None, pool).await
}

/// Create a feedback entry together with one analysis row
pub async fn create_analyzed_feedback(
    pool: &PgPool,
    content: &str,
    labels: (Sentiment, Urgency, Impact),
    embedding: Option<Vec<f32>>,
) -> Result<(FeedbackId, AnalysisId)> {
    let feedback = create_test_feedback(pool, content).await?;
    let (sentiment, urgency, impact) = labels;
    let classification = Classification {
        sentiment,
        urgency,
        impact,
    };
    let analysis = FeedbackAnalysis::create(feedback.id, &classification, embedding, pool).await?;

    Ok((feedback.id, analysis.id))
}

/// Mint an access token the way the hosted auth provider would
pub fn bearer_token(user_id: UserId) -> String {
    let claims = Claims {
        sub: user_id.into_uuid(),
        email: Some("pm@example.com".to_string()),
        aud: TEST_JWT_AUDIENCE.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
        role: Some("authenticated".to_string()),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to encode test token");

    format!("Bearer {}", token)
}
