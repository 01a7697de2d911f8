use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use scholar_rag::summarize::DEFAULT_QUERY;

use super::{api_error, from_rag, from_upload, ApiError};
use crate::state::AppState;
use crate::upload::{read_pdf_upload, PdfUpload};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Run the pipeline on a staged upload, bounded by `SUMMARIZE_TIMEOUT_SECS`.
/// The temp file is dropped, and so deleted, when this returns.
pub async fn run_summary(state: &AppState, upload: PdfUpload) -> Result<String, ApiError> {
    let query = upload.query.as_deref().unwrap_or(DEFAULT_QUERY);
    info!(
        "Summarizing '{}' ({} bytes), query: {}",
        upload.filename, upload.size, query
    );

    let timeout = state.summarize_timeout();
    let result = tokio::time::timeout(
        timeout,
        state.summarizer.summarize_pdf(upload.file.path(), query),
    )
    .await;

    match result {
        Ok(Ok(summary)) => Ok(summary),
        Ok(Err(err)) => Err(from_rag(err)),
        Err(_) => {
            tracing::error!("Summarization of '{}' timed out", upload.filename);
            Err(api_error(
                StatusCode::GATEWAY_TIMEOUT,
                format!("Summarization timed out after {} seconds", timeout.as_secs()),
            ))
        }
    }
}

/// Summarize an uploaded PDF
///
/// Multipart form with a required `file` (PDF) and an optional `query`.
#[utoipa::path(
    post,
    path = "/api/summarize/",
    tag = "Summarize",
    request_body(content_type = "multipart/form-data", description = "`file`: PDF, `query`: optional request"),
    responses(
        (status = 200, description = "Summary generated", body = SummaryResponse),
        (status = 400, description = "Missing or non-PDF file, or unreadable PDF", body = super::ErrorBody),
        (status = 429, description = "LLM provider rate limit persisted", body = super::ErrorBody),
        (status = 502, description = "Upstream LLM or embedding failure", body = super::ErrorBody),
        (status = 503, description = "No LLM provider configured", body = super::ErrorBody),
        (status = 504, description = "Pipeline timed out", body = super::ErrorBody)
    )
)]
pub async fn summarize_api(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<SummaryResponse>, ApiError> {
    let upload = read_pdf_upload(multipart).await.map_err(from_upload)?;
    let summary = run_summary(&state, upload).await?;
    Ok(Json(SummaryResponse { summary }))
}
