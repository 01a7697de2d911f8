//! Multipart upload parsing and temp-file staging.
//!
//! The staged PDF lives in a [`NamedTempFile`] owned by the handler, so it is
//! removed on drop whichever way the request ends.

use std::io::Write;

use axum::extract::Multipart;
use tempfile::NamedTempFile;
use tracing::debug;

use scholar_ingest::document::file_extension;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file provided")]
    MissingFile,
    #[error("File must be a PDF")]
    NotPdf,
    #[error("Invalid multipart body: {0}")]
    Multipart(String),
    #[error("Failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated upload staged on disk.
pub struct PdfUpload {
    pub filename: String,
    pub file: NamedTempFile,
    pub query: Option<String>,
    pub context: Option<String>,
    pub size: usize,
}

/// Read the `file`, `query` and `context` fields. Unknown fields are ignored.
/// Validation happens before anything is written to disk.
pub async fn read_pdf_upload(mut multipart: Multipart) -> Result<PdfUpload, UploadError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut query = None;
    let mut context = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?;
                file = Some((filename, bytes.to_vec()));
            }
            "query" | "context" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| UploadError::Multipart(e.to_string()))?;
                let value = Some(text.trim().to_string()).filter(|t| !t.is_empty());
                if name == "query" {
                    query = value;
                } else {
                    context = value;
                }
            }
            other => debug!("Ignoring multipart field '{other}'"),
        }
    }

    let (filename, bytes) = file
        .filter(|(filename, _)| !filename.is_empty())
        .ok_or(UploadError::MissingFile)?;
    if file_extension(&filename) != "pdf" {
        return Err(UploadError::NotPdf);
    }

    let mut staged = tempfile::Builder::new()
        .prefix("scholar-")
        .suffix(".pdf")
        .tempfile()?;
    staged.write_all(&bytes)?;
    staged.flush()?;
    debug!("Staged '{}' ({} bytes) at {}", filename, bytes.len(), staged.path().display());

    Ok(PdfUpload {
        filename,
        file: staged,
        query,
        context,
        size: bytes.len(),
    })
}
