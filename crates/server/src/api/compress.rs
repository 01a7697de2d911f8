use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use scholar_rag::RagError;

use super::{api_error, from_rag, from_upload, ApiError};
use crate::state::AppState;
use crate::upload::read_pdf_upload;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CompressResponse {
    pub compressed: String,
    pub original_chars: usize,
    pub compressed_chars: usize,
}

/// Compress the text of an uploaded PDF
///
/// Sends the extracted text through the configured compression endpoint.
/// Optional `context` describes the content (defaults to `COMPRESSION_CONTEXT`).
#[utoipa::path(
    post,
    path = "/compress/",
    tag = "Compress",
    request_body(content_type = "multipart/form-data", description = "`file`: PDF, `context`: optional description"),
    responses(
        (status = 200, description = "Compressed text", body = CompressResponse),
        (status = 400, description = "Missing or non-PDF file, or no text", body = super::ErrorBody),
        (status = 502, description = "Compression endpoint failed", body = super::ErrorBody),
        (status = 503, description = "Compression endpoint not configured", body = super::ErrorBody)
    )
)]
pub async fn compress(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<CompressResponse>, ApiError> {
    let upload = read_pdf_upload(multipart).await.map_err(from_upload)?;
    let client = state.compression.as_ref().ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Compression endpoint not configured. Set SCALEDOWN_COMPRESS_URL.",
        )
    })?;

    let text = state
        .summarizer
        .extract(upload.file.path())
        .await
        .map_err(from_rag)?;
    if text.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "No text could be extracted from the PDF.",
        ));
    }

    let context = upload
        .context
        .as_deref()
        .unwrap_or(&state.config.compression.context);
    let compressed = client
        .compress(&text, context)
        .await
        .map_err(|e| from_rag(RagError::from(e)))?;
    info!(
        "Compressed '{}': {} -> {} chars",
        upload.filename,
        text.chars().count(),
        compressed.chars().count()
    );

    Ok(Json(CompressResponse {
        original_chars: text.chars().count(),
        compressed_chars: compressed.chars().count(),
        compressed,
    }))
}
