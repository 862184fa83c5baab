use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{
        engines::{GeminiEngine, PoeEngine},
        metadata::MdblistProvider,
        AnalysisOrchestrator,
    },
};

pub mod chat;
pub mod compare;
pub mod titles;
pub mod trends;

/// Shared application state
pub struct AppState {
    pub orchestrator: AnalysisOrchestrator,
}

impl AppState {
    pub fn new(orchestrator: AnalysisOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Wires MDBList, Gemini and Poe clients over one shared HTTP client
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;

        let metadata = Arc::new(MdblistProvider::new(
            http_client.clone(),
            config.mdblist_api_key.clone(),
            config.mdblist_api_url.clone(),
        ));

        let gemini = Arc::new(GeminiEngine::new(
            http_client.clone(),
            config.gemini_api_key.clone(),
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
        ));

        let poe = Arc::new(PoeEngine::new(
            http_client,
            config.poe_api_key.clone(),
            config.poe_api_url.clone(),
            config.poe_model.clone(),
        ));

        tracing::info!(
            primary_model = %config.gemini_model,
            fallback_model = %config.poe_model,
            "Analysis engines configured"
        );

        Ok(Self::new(AnalysisOrchestrator::new(
            metadata,
            gemini.clone(),
            gemini,
            poe,
        )))
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/titles/search", get(titles::search))
        .route("/titles/:id", get(titles::detail))
        .route("/titles/:id/analysis", get(titles::analysis))
        .route("/compare", post(compare::compare))
        .route("/trends", get(trends::topics))
        .route("/trends/explain", post(trends::explain))
        .route("/chat", post(chat::chat))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
