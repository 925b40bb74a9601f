pub mod catalog;
pub mod documents;
pub mod download;
pub mod lessons;

use bytes::Bytes;
use lectern_core::AppError;

/// A file part taken from an upload request, already read into memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub content: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl UploadedFile {
    pub fn pdf(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
            content_type: "application/pdf".to_string(),
            file_name: None,
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

pub(crate) fn video_not_found() -> AppError {
    AppError::NotFound("Video not found".to_string())
}

pub(crate) fn pdf_not_found() -> AppError {
    AppError::NotFound("PDF not found".to_string())
}

pub(crate) fn type_already_exists(document_type: &str) -> AppError {
    AppError::Conflict(format!(
        "A PDF with type '{}' already exists for this video. Please use the update endpoint to modify it.",
        document_type
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_constructor() {
        let file = UploadedFile::pdf(&b"%PDF-1.4"[..]);
        assert_eq!(file.content_type, "application/pdf");
        assert_eq!(file.size_bytes(), 8);
        assert!(file.file_name.is_none());
    }
}
