use crate::processing::extractors::{DocxExtractor, PdfExtractor};

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// A file received from the upload form. Lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Lowercased text after the last `.` in the filename.
    pub fn declared_extension(&self) -> Option<String> {
        declared_extension(&self.filename)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Option<Self> {
        match declared_extension(filename)?.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }
}

fn declared_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_lowercase())
}

/// Whether the filename carries one of [`ALLOWED_EXTENSIONS`].
pub fn is_allowed_file(filename: &str) -> bool {
    declared_extension(filename)
        .map(|extension| ALLOWED_EXTENSIONS.contains(&extension.as_str()))
        .unwrap_or(false)
}

/// Plain text of an uploaded PDF or DOCX.
///
/// Returns an empty string for unsupported extensions (without decoding) and
/// for files that fail to decode. Decode failures are logged, never returned.
pub fn extract_text(file: &UploadedFile) -> String {
    let Some(kind) = DocumentKind::from_filename(&file.filename) else {
        return String::new();
    };

    let result = match kind {
        DocumentKind::Pdf => PdfExtractor::extract(&file.bytes),
        DocumentKind::Docx => DocxExtractor::extract(&file.bytes),
    };

    match result {
        Ok(text) => {
            tracing::debug!(
                filename = %file.filename,
                text_len = text.len(),
                "Extracted document text"
            );
            text
        }
        Err(e) => {
            tracing::warn!(filename = %file.filename, error = %e, "Error reading document");
            String::new()
        }
    }
}

/// [`extract_text`] on the blocking pool.
///
/// Decoders are CPU-bound and may panic on malformed input; a panic is
/// logged and treated like any other decode failure.
pub async fn extract_text_blocking(file: UploadedFile) -> String {
    let filename = file.filename.clone();
    match tokio::task::spawn_blocking(move || extract_text(&file)).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(filename = %filename, error = %e, "Document decoder aborted");
            String::new()
        }
    }
}
