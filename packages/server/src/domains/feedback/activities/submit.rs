use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::common::{TriageError, UserId};
use crate::domains::analysis::activities::analyze_feedback;
use crate::domains::analysis::FeedbackAnalysis;
use crate::domains::feedback::models::{Feedback, FeedbackSource};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Serialize)]
pub struct SubmittedFeedback {
    pub feedback: Feedback,
    pub analysis: FeedbackAnalysis,
}

/// Store one manually entered piece of feedback and analyse it right away.
///
/// The row is committed before analysis starts, so a failed analysis leaves
/// an unanalysed entry behind (picked up later by `analyze_pending`).
pub async fn submit_feedback(
    content: &str,
    user_email: Option<&str>,
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<SubmittedFeedback> {
    let content = content.trim();
    if content.is_empty() {
        return Err(TriageError::invalid("Please enter some feedback to submit.").into());
    }
    let user_email = user_email.map(str::trim).filter(|e| !e.is_empty());

    let feedback = Feedback::create(
        content,
        FeedbackSource::Manual,
        user_email,
        Some(user_id),
        &deps.db_pool,
    )
    .await?;

    info!(feedback_id = %feedback.id, user_id = %user_id, "Feedback submitted");

    let analysis = analyze_feedback(feedback.id, &feedback.content, deps).await?;

    Ok(SubmittedFeedback { feedback, analysis })
}
