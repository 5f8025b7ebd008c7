use crate::error::{Result, SofError};

pub struct PdfExtractor;

impl PdfExtractor {
    /// Text of every page, concatenated in page order.
    ///
    /// A page without a text layer contributes nothing; it is not an error.
    pub fn extract(bytes: &[u8]) -> Result<String> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| SofError::Processing(format!("PDF extraction failed: {e}")))?;

        let empty_pages = pages.iter().filter(|page| page.trim().is_empty()).count();
        if empty_pages > 0 {
            tracing::debug!(
                page_count = pages.len(),
                empty_pages,
                "PDF contains pages without extractable text"
            );
        }

        Ok(pages.concat())
    }
}
