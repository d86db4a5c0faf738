use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        Extension, Query,
    },
    Json,
};
use serde::Deserialize;

use crate::common::TriageError;
use crate::domains::feedback::activities::{
    feedback_analytics, list_feedback, submit_feedback, upload_feedback_csv, CsvUploadResult,
    FeedbackAnalytics, FeedbackSort, SubmittedFeedback,
};
use crate::domains::feedback::FeedbackEntry;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub content: String,
    pub user_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListFeedbackQuery {
    pub sort: Option<String>,
}

/// POST /feedback
pub async fn submit_feedback_handler(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    payload: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> ApiResult<Json<SubmittedFeedback>> {
    let Json(request) = payload?;

    let submitted = submit_feedback(
        &request.content,
        request.user_email.as_deref(),
        user.user_id,
        &state.deps,
    )
    .await?;

    Ok(Json(submitted))
}

/// POST /feedback/upload (multipart, field `file`)
pub async fn upload_feedback_handler(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<CsvUploadResult>> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let text = field.text().await?;

        let result = upload_feedback_csv(&file_name, &text, user.user_id, &state.deps).await?;
        return Ok(Json(result));
    }

    Err(TriageError::invalid("Please upload a CSV file").into())
}

/// GET /feedback?sort=date|sentiment|urgency|impact
pub async fn list_feedback_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListFeedbackQuery>,
) -> ApiResult<Json<Vec<FeedbackEntry>>> {
    let sort = FeedbackSort::from_param(query.sort.as_deref());
    Ok(Json(list_feedback(sort, &state.db_pool).await?))
}

/// GET /analytics
pub async fn analytics_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<FeedbackAnalytics>> {
    Ok(Json(feedback_analytics(&state.db_pool).await?))
}
