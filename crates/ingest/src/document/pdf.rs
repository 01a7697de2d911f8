use super::{ExtractionError, PageContent};

pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    let pages = split_pages(&text);
    if pages.is_empty() {
        // Image-only PDF: no text layer. Callers treat blank text as "nothing extracted".
        tracing::warn!("PDF contains no extractable text");
    }
    Ok(pages)
}

/// pdf-extract returns all text as one string; form feeds (\x0C) separate pages.
/// Blank pages are dropped but keep their position in the numbering.
fn split_pages(text: &str) -> Vec<PageContent> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if !text.contains('\x0C') {
        return vec![PageContent {
            page_number: 1,
            text: text.trim().to_string(),
        }];
    }
    text.split('\x0C')
        .enumerate()
        .filter(|(_, page_text)| !page_text.trim().is_empty())
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            text: page_text.trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_form_feed() {
        let pages = split_pages("Intro text\x0CMethods text\x0C\x0CResults text");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[1].text, "Methods text");
        assert_eq!(pages[2].page_number, 4);
    }

    #[test]
    fn no_form_feed_is_single_page() {
        let pages = split_pages("  Only page \n");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].text, "Only page");
    }

    #[test]
    fn blank_text_has_no_pages() {
        assert!(split_pages(" \n\x0C \t").is_empty());
    }
}
