use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::domains::clustering::activities::{cluster_feedback, ClusteringOutcome};
use crate::domains::clustering::FeedbackCluster;
use crate::server::app::AppState;
use crate::server::error::ApiResult;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ClusterFeedbackResponse {
    #[serde(rename_all = "camelCase")]
    Clustered {
        success: bool,
        clusters_created: usize,
        total_feedback: usize,
    },
    Empty {
        message: String,
    },
}

impl From<ClusteringOutcome> for ClusterFeedbackResponse {
    fn from(outcome: ClusteringOutcome) -> Self {
        match outcome {
            ClusteringOutcome::NoEmbeddings => ClusterFeedbackResponse::Empty {
                message: "No feedback with embeddings found".to_string(),
            },
            ClusteringOutcome::Clustered {
                clusters_created,
                total_feedback,
            } => ClusterFeedbackResponse::Clustered {
                success: true,
                clusters_created,
                total_feedback,
            },
        }
    }
}

/// POST /cluster-feedback
pub async fn cluster_feedback_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<ClusterFeedbackResponse>> {
    let outcome = cluster_feedback(&state.deps).await?;
    Ok(Json(outcome.into()))
}

/// GET /clusters
pub async fn list_clusters_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Vec<FeedbackCluster>>> {
    Ok(Json(FeedbackCluster::find_all(&state.db_pool).await?))
}
