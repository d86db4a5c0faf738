use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path,
    },
    Json,
};
use serde::Deserialize;

use crate::common::{ConversationId, TriageError};
use crate::domains::chat::activities::{
    chat_with_feedback, conversation_messages, list_conversations, ChatReply,
};
use crate::domains::chat::{ChatConversation, ChatMessage};
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub conversation_id: Option<String>,
}

/// POST /chat-with-feedback
pub async fn chat_handler(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatReply>> {
    let Json(request) = payload?;

    let conversation_id = request
        .conversation_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            ConversationId::parse(id).map_err(|_| TriageError::invalid("Invalid conversationId"))
        })
        .transpose()?;

    let reply =
        chat_with_feedback(user.user_id, &request.message, conversation_id, &state.deps).await?;

    Ok(Json(reply))
}

/// GET /conversations
pub async fn list_conversations_handler(
    user: AuthUser,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<Vec<ChatConversation>>> {
    Ok(Json(list_conversations(user.user_id, &state.deps).await?))
}

/// GET /conversations/:id/messages
pub async fn conversation_messages_handler(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    path: Result<Path<ConversationId>, PathRejection>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    let Path(conversation_id) = path?;

    Ok(Json(
        conversation_messages(user.user_id, conversation_id, &state.deps).await?,
    ))
}
