use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::ChatReply, routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Handler for the explainer chat endpoint
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatReply>> {
    let reply = state.orchestrator.chat(&request.message).await?;

    tracing::info!(
        request_id = %request_id,
        source_engine = ?reply.source_engine,
        trailer_found = reply.trailer.is_some(),
        "Chat reply ready"
    );

    Ok(Json(reply))
}
