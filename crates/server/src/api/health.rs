use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Resolved chat provider, `null` when no API key is configured.
    pub llm_provider: Option<&'static str>,
    /// Active compression strategy: `remote`, `passthrough` or `llm`.
    pub compression: &'static str,
    #[schema(value_type = Object)]
    pub config: serde_json::Value,
}

/// Server readiness and resolved configuration (secrets redacted).
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        llm_provider: state.llm_provider,
        compression: state.summarizer.compressor().mode_name(),
        config: state.config.redacted_summary(),
    })
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ApiRootResponse {
    pub message: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// API root listing the available endpoints.
#[utoipa::path(
    get,
    path = "/api/",
    tag = "Health",
    responses((status = 200, description = "Endpoint listing", body = ApiRootResponse))
)]
pub async fn api_root() -> Json<ApiRootResponse> {
    Json(ApiRootResponse {
        message: "Research paper summarizer API",
        endpoints: vec![
            "POST /api/summarize/",
            "POST /compress/",
            "POST /api/compress/",
            "POST /summarize/",
            "GET /health",
            "GET /docs",
        ],
    })
}
