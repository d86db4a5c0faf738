use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::domains::digest::activities::generate_digest;
use crate::domains::digest::Digest;
use crate::server::app::AppState;
use crate::server::error::ApiResult;

const RECENT_DIGEST_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
pub struct GenerateDigestResponse {
    pub success: bool,
    pub digest: String,
}

/// POST /generate-digest
pub async fn generate_digest_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<GenerateDigestResponse>> {
    let digest = generate_digest(&state.deps).await?;

    Ok(Json(GenerateDigestResponse {
        success: true,
        digest: digest.content,
    }))
}

/// GET /digests
pub async fn list_digests_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Vec<Digest>>> {
    Ok(Json(
        Digest::find_recent(RECENT_DIGEST_LIMIT, &state.db_pool).await?,
    ))
}
