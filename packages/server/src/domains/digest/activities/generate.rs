//! Weekly digest generation.

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{error, info};

use crate::domains::clustering::FeedbackCluster;
use crate::domains::digest::models::{CriticalFeedback, Digest};
use crate::kernel::ServerDeps;

const LOOKBACK_DAYS: i64 = 7;
const CRITICAL_FEEDBACK_LIMIT: i64 = 20;
const TOP_CLUSTER_LIMIT: i64 = 5;
const DIGEST_TEMPERATURE: f32 = 0.7;

pub const DIGEST_SYSTEM_PROMPT: &str = "You are a product insights analyst. Create a concise weekly digest of customer feedback for a product team. Focus on actionable insights, patterns, and priorities.";

#[derive(Debug, Clone)]
pub struct GeneratedDigest {
    pub content: String,
    /// Critical/high-urgency entries the digest was built from
    pub total_feedback: usize,
    pub top_clusters: usize,
}

pub fn feedback_context(feedback: &[CriticalFeedback]) -> String {
    if feedback.is_empty() {
        return "No critical feedback this week".to_string();
    }

    feedback
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{}. [{}/{}] {}", i + 1, f.urgency, f.impact, f.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn cluster_context(clusters: &[FeedbackCluster]) -> String {
    if clusters.is_empty() {
        return "No clusters available".to_string();
    }

    clusters
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {} ({} items)", i + 1, c.name, c.feedback_count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn digest_user_prompt(feedback_context: &str, cluster_context: &str) -> String {
    format!(
        r#"Create a weekly feedback digest based on:

CRITICAL & HIGH PRIORITY FEEDBACK:
{feedback_context}

TOP FEEDBACK CLUSTERS:
{cluster_context}

Format the digest as:
1. Executive Summary (2-3 sentences)
2. Key Insights (3-5 bullet points)
3. Top Priorities (ranked list)
4. Recommended Actions (specific next steps)"#
    )
}

/// Summarise the past week's pressing feedback and the largest clusters.
///
/// The digest is stored in `digest_history`; failing to store it is logged
/// and the generated text is still returned.
pub async fn generate_digest(deps: &ServerDeps) -> Result<GeneratedDigest> {
    let pool = &deps.db_pool;
    info!("Generating weekly digest");

    let since = Utc::now() - Duration::days(LOOKBACK_DAYS);
    let critical = CriticalFeedback::find_since(since, CRITICAL_FEEDBACK_LIMIT, pool).await?;
    let clusters = FeedbackCluster::find_largest(TOP_CLUSTER_LIMIT, pool).await?;

    let prompt = digest_user_prompt(&feedback_context(&critical), &cluster_context(&clusters));
    let content = deps
        .digest_writer
        .prompt(DIGEST_SYSTEM_PROMPT, &prompt, Some(DIGEST_TEMPERATURE))
        .await?;

    if content.trim().is_empty() {
        return Err(anyhow!("No content in digest response"));
    }

    let summary = json!({
        "total_feedback": critical.len(),
        "top_clusters": clusters.len(),
    });
    if let Err(e) = Digest::create(&content, &summary, &["email".to_string()], pool).await {
        error!(error = %e, "Error saving digest");
    }

    info!(
        critical_feedback = critical.len(),
        top_clusters = clusters.len(),
        "Digest generated successfully"
    );

    Ok(GeneratedDigest {
        content,
        total_feedback: critical.len(),
        top_clusters: clusters.len(),
    })
}
