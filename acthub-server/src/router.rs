//! Route table

use crate::app_state::AppState;
use crate::handlers;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/campaign-list", post(handlers::list::integrations))
        .route("/campaign-form", post(handlers::campaign::form))
        .route("/campaign-execute", post(handlers::campaign::execute))
        .route("/campaign-oauth", get(handlers::campaign::oauth_callback))
        .route("/poll-form", post(handlers::poll::form))
        .route("/poll-execute", post(handlers::poll::execute))
        .route("/post-form", post(handlers::post::form))
        .route("/post-execute", post(handlers::post::execute))
        .route("/question-form", post(handlers::question::form))
        .route("/question-execute", post(handlers::question::execute))
        .route("/task-form", post(handlers::task::form))
        .route("/task-execute", post(handlers::task::execute))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
