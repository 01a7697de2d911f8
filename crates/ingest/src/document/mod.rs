pub mod chunker;
mod pdf;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub page_number: usize,
    /// The extracted text content.
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// File type, currently always "pdf".
    pub file_type: String,
    /// Extracted pages with text.
    pub pages: Vec<PageContent>,
}

impl ExtractedDocument {
    /// Get all text concatenated.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.len()).sum()
    }
}

/// Lower-cased extension of `filename` ("" when there is none).
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

/// Extract text from file bytes based on file type. Only PDFs are accepted.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = file_extension(filename);
    let pages = match ext.as_str() {
        "pdf" => pdf::extract_pdf(bytes)?,
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        file_type: ext,
        pages,
    })
}

/// Turns a file on disk into plain text. Blank output is not an error: scanned
/// PDFs legitimately have no text layer, and callers decide what to do.
pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Loads PDFs with `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfLoader;

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path)?;
        let pages = pdf::extract_pdf(&bytes)?;
        tracing::debug!("Loaded {} ({} pages)", path.display(), pages.len());
        Ok(ExtractedDocument {
            filename: path.display().to_string(),
            file_type: "pdf".to_string(),
            pages,
        }
        .full_text())
    }
}
