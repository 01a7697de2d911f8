//! JSON API handlers.

pub mod compress;
pub mod doc;
pub mod health;
pub mod summarize;

pub use compress::compress;
pub use health::{api_root, health};
pub use summarize::summarize_api;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use scholar_ingest::document::ExtractionError;
use scholar_ingest::embedding::EmbeddingError;
use scholar_llm::LlmError;
use scholar_rag::RagError;

use crate::upload::UploadError;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// HTTP status for a pipeline failure.
pub fn rag_status(err: &RagError) -> StatusCode {
    match err {
        RagError::Llm(LlmError::NotConfigured(_))
        | RagError::Embedding(EmbeddingError::NotConfigured(_)) => StatusCode::SERVICE_UNAVAILABLE,
        RagError::Llm(LlmError::RateLimited { .. }) => StatusCode::TOO_MANY_REQUESTS,
        RagError::Llm(_) | RagError::Embedding(_) => StatusCode::BAD_GATEWAY,
        RagError::Extraction(ExtractionError::Io(_)) | RagError::Task(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        RagError::Extraction(_) => StatusCode::BAD_REQUEST,
    }
}

pub fn upload_status(err: &UploadError) -> StatusCode {
    match err {
        UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        UploadError::MissingFile | UploadError::NotPdf | UploadError::Multipart(_) => {
            StatusCode::BAD_REQUEST
        }
    }
}

impl From<RagError> for ErrorBody {
    fn from(err: RagError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

pub fn from_rag(err: RagError) -> ApiError {
    let status = rag_status(&err);
    if status.is_server_error() {
        tracing::error!("Summarization failed ({status}): {err}");
    } else {
        tracing::warn!("Summarization rejected ({status}): {err}");
    }
    (status, Json(ErrorBody::from(err)))
}

pub fn from_upload(err: UploadError) -> ApiError {
    let status = upload_status(&err);
    api_error(status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (RagError::Llm(LlmError::NotConfigured("x".into())), 503),
            (
                RagError::Llm(LlmError::Unauthorized {
                    provider: "Groq".into(),
                    env_key: "GROQ_API_KEY".into(),
                }),
                502,
            ),
            (RagError::Llm(LlmError::RateLimited { provider: "Groq".into() }), 429),
            (RagError::Llm(LlmError::ApiError { status: 500, body: String::new() }), 502),
            (RagError::Embedding(EmbeddingError::Api("down".into())), 502),
            (RagError::Embedding(EmbeddingError::NotConfigured("x".into())), 503),
            (RagError::Extraction(ExtractionError::PdfError("bad xref".into())), 400),
            (
                RagError::Extraction(ExtractionError::Io(std::io::Error::other("disk"))),
                500,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(rag_status(&err).as_u16(), expected, "{err}");
        }
    }

    #[test]
    fn upload_errors_are_client_errors() {
        assert_eq!(upload_status(&UploadError::MissingFile), StatusCode::BAD_REQUEST);
        assert_eq!(upload_status(&UploadError::NotPdf), StatusCode::BAD_REQUEST);
        assert_eq!(
            upload_status(&UploadError::Io(std::io::Error::other("full"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
