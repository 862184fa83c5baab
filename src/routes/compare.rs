use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::request_id::RequestId, models::ComparisonOutcome,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub second: String,
}

/// Handler for the comparison endpoint
pub async fn compare(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<CompareRequest>,
) -> AppResult<Json<ComparisonOutcome>> {
    tracing::info!(
        request_id = %request_id,
        first = %request.first,
        second = %request.second,
        "Processing comparison request"
    );

    let outcome = state
        .orchestrator
        .compare(&request.first, &request.second)
        .await?;

    Ok(Json(outcome))
}
