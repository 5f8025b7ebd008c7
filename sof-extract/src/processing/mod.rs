mod extractor;

pub mod extractors;

pub use extractor::{
    extract_text, extract_text_blocking, is_allowed_file, DocumentKind, UploadedFile,
    ALLOWED_EXTENSIONS,
};
