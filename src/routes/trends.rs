use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::AppResult, models::TrendResult, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct ExplainTrendRequest {
    #[serde(default)]
    pub topic: String,
}

/// Canned trend topics, in display order
pub async fn topics(State(state): State<Arc<AppState>>) -> Json<Vec<&'static str>> {
    Json(state.orchestrator.trend_topics().to_vec())
}

/// Handler for trend explanation endpoint
pub async fn explain(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExplainTrendRequest>,
) -> AppResult<Json<TrendResult>> {
    let trend = state.orchestrator.explain_trend(&request.topic).await?;
    Ok(Json(trend))
}
