//! HTTP router construction.
//!
//! Assembles the HTML pages, JSON API, and OpenAPI docs into a single `Router`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::state::AppState;
use crate::{api, web};

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.server.max_upload_mb.saturating_mul(1024 * 1024);

    Router::new()
        .route("/", get(web::home))
        .route(
            "/summarize/",
            get(web::summarize_form).post(web::summarize_submit),
        )
        .route("/api/", get(api::api_root))
        .route("/api/summarize/", post(api::summarize_api))
        .route("/compress/", post(api::compress))
        .route("/api/compress/", post(api::compress))
        .route("/health", get(api::health))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}
