//! Feedback classification.
//!
//! One completion call labels the entry, one embedding call places it in
//! vector space for clustering. Only the classification is required; an
//! entry without an embedding is simply left out of clustering.

use anyhow::Result;
use tracing::{info, warn};

use crate::common::{FeedbackId, TriageError};
use crate::domains::analysis::models::{Classification, FeedbackAnalysis};
use crate::domains::feedback::models::Feedback;
use crate::kernel::ServerDeps;

pub const CLASSIFICATION_SYSTEM_PROMPT: &str = r#"You are a feedback analysis AI. Analyze customer feedback and classify it into three categories:
1. Sentiment: positive, neutral, or negative
2. Urgency: high, medium, or low
3. Impact: critical, feature_request, or nice_to_have

Respond with ONLY a JSON object in this exact format:
{"sentiment": "positive|neutral|negative", "urgency": "high|medium|low", "impact": "critical|feature_request|nice_to_have"}"#;

const CLASSIFICATION_TEMPERATURE: f32 = 0.1;

pub fn classification_user_prompt(content: &str) -> String {
    format!("Analyze this feedback: \"{}\"", content)
}

/// Classify and embed one feedback entry, then store the analysis row.
pub async fn analyze_feedback(
    feedback_id: FeedbackId,
    content: &str,
    deps: &ServerDeps,
) -> Result<FeedbackAnalysis> {
    if content.trim().is_empty() {
        return Err(TriageError::invalid("Missing feedbackId or content").into());
    }

    let pool = &deps.db_pool;
    if Feedback::find_by_id(feedback_id, pool).await?.is_none() {
        return Err(TriageError::NotFound("Feedback").into());
    }

    info!(feedback_id = %feedback_id, "Analyzing feedback");

    let reply = deps
        .classifier
        .prompt(
            CLASSIFICATION_SYSTEM_PROMPT,
            &classification_user_prompt(content),
            Some(CLASSIFICATION_TEMPERATURE),
        )
        .await?;
    let classification = Classification::parse(&reply)?;

    let embedding = match deps.embedding_service.generate(content).await {
        Ok(embedding) if !embedding.is_empty() => Some(embedding),
        Ok(_) => {
            warn!(feedback_id = %feedback_id, "Embedding service returned an empty vector");
            None
        }
        Err(e) => {
            warn!(feedback_id = %feedback_id, error = %e, "Failed to generate feedback embedding");
            None
        }
    };

    let analysis = FeedbackAnalysis::create(feedback_id, &classification, embedding, pool).await?;

    info!(
        feedback_id = %feedback_id,
        sentiment = %classification.sentiment,
        urgency = %classification.urgency,
        impact = %classification.impact,
        has_embedding = analysis.embedding_vector.is_some(),
        "Feedback analyzed"
    );

    Ok(analysis)
}

/// Outcome of analysing several entries one after another.
#[derive(Debug, Default)]
pub struct BatchAnalysis {
    pub analyses: Vec<FeedbackAnalysis>,
    pub failed: usize,
}

/// Analyse entries sequentially. A failure is logged and counted; it does not
/// stop the rest of the batch.
pub async fn analyze_each(entries: &[Feedback], deps: &ServerDeps) -> BatchAnalysis {
    let mut result = BatchAnalysis::default();

    for entry in entries {
        match analyze_feedback(entry.id, &entry.content, deps).await {
            Ok(analysis) => result.analyses.push(analysis),
            Err(e) => {
                warn!(feedback_id = %entry.id, error = %e, "Feedback analysis failed");
                result.failed += 1;
            }
        }
    }

    result
}

/// Analyse every entry that has no analysis row yet.
pub async fn analyze_pending(deps: &ServerDeps) -> Result<BatchAnalysis> {
    let pending = Feedback::find_unanalyzed(&deps.db_pool).await?;
    info!(count = pending.len(), "Analyzing pending feedback");

    Ok(analyze_each(&pending, deps).await)
}
