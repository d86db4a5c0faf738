use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::common::{FeedbackId, TriageError};
use crate::domains::analysis::activities::analyze_feedback;
use crate::server::app::AppState;
use crate::server::error::ApiResult;

const MISSING_INPUT: &str = "Missing feedbackId or content";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFeedbackRequest {
    pub feedback_id: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisLabels {
    pub sentiment: String,
    pub urgency: String,
    pub impact: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeFeedbackResponse {
    pub success: bool,
    pub analysis: AnalysisLabels,
}

/// POST /analyze-feedback
pub async fn analyze_feedback_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<AnalyzeFeedbackRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeFeedbackResponse>> {
    let Json(request) = payload?;

    let feedback_id = request
        .feedback_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| TriageError::invalid(MISSING_INPUT))?;
    let content = request
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| TriageError::invalid(MISSING_INPUT))?;
    let feedback_id = FeedbackId::parse(feedback_id.trim())
        .map_err(|_| TriageError::invalid("Invalid feedbackId"))?;

    let analysis = analyze_feedback(feedback_id, &content, &state.deps).await?;

    Ok(Json(AnalyzeFeedbackResponse {
        success: true,
        analysis: AnalysisLabels {
            sentiment: analysis.sentiment,
            urgency: analysis.urgency,
            impact: analysis.impact,
        },
    }))
}
