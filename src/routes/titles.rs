use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{AnalysisResult, ResolvedTrailer, SourceEngine, TitleDetail, TitleSummary},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
pub struct TitleAnalysisResponse {
    pub title: TitleDetail,
    pub analysis: AnalysisResult,
    pub trailer: Option<ResolvedTrailer>,
    pub source_engine: SourceEngine,
}

/// Handler for title search endpoint. No results is an empty list, never an error.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<TitleSummary>> {
    Json(state.orchestrator.search(&params.q).await)
}

/// Handler for title detail endpoint
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<TitleDetail>> {
    let detail = state.orchestrator.title_detail(&id).await?;
    Ok(Json(detail))
}

/// Handler for the single-title analysis endpoint
pub async fn analysis(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> AppResult<Json<TitleAnalysisResponse>> {
    tracing::info!(request_id = %request_id, title_id = %id, "Processing analysis request");

    let (detail, report) = state.orchestrator.analyze_title(&id).await?;
    let source_engine = report.source_engine();

    tracing::info!(
        request_id = %request_id,
        title_id = %id,
        source_engine = %source_engine,
        "Analysis completed"
    );

    Ok(Json(TitleAnalysisResponse {
        title: detail,
        analysis: report.analysis,
        trailer: report.trailer,
        source_engine,
    }))
}
