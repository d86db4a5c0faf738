//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::auth::JwtVerifier;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    analytics_handler, analyze_feedback_handler, chat_handler, cluster_feedback_handler,
    conversation_messages_handler, generate_digest_handler, health_handler, list_clusters_handler,
    list_conversations_handler, list_digests_handler, list_feedback_handler,
    submit_feedback_handler, upload_feedback_handler,
};

/// CSV uploads can exceed axum's 2 MB default.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    pub jwt_verifier: Arc<JwtVerifier>,
}

impl AppState {
    pub fn new(deps: Arc<ServerDeps>, jwt_verifier: Arc<JwtVerifier>) -> Self {
        Self {
            db_pool: deps.db_pool.clone(),
            deps,
            jwt_verifier,
        }
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ])
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let verifier = state.jwt_verifier.clone();

    Router::new()
        // AI operations
        .route("/analyze-feedback", post(analyze_feedback_handler))
        .route("/cluster-feedback", post(cluster_feedback_handler))
        .route("/generate-digest", post(generate_digest_handler))
        .route("/chat-with-feedback", post(chat_handler))
        // Intake and dashboard reads
        .route(
            "/feedback",
            get(list_feedback_handler).post(submit_feedback_handler),
        )
        .route("/feedback/upload", post(upload_feedback_handler))
        .route("/analytics", get(analytics_handler))
        .route("/clusters", get(list_clusters_handler))
        .route("/digests", get(list_digests_handler))
        .route("/conversations", get(list_conversations_handler))
        .route(
            "/conversations/:id/messages",
            get(conversation_messages_handler),
        )
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(verifier.clone(), req, next)
        }))
        .layer(Extension(state))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
