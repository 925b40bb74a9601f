//! Shared key generation for document blobs.
//!
//! Key format: `videos/{lesson_id}/pdfs/{uuid}{ext}`. The random segment keeps concurrent
//! uploads for the same lesson from ever writing to the same key.

use uuid::Uuid;

/// File extension (with leading dot) for a content type, or empty when unknown.
fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "application/pdf" => ".pdf",
        _ => "",
    }
}

/// Generate a fresh storage key for a document belonging to `lesson_id`.
pub fn document_key(lesson_id: i64, content_type: &str) -> String {
    format!(
        "videos/{}/pdfs/{}{}",
        lesson_id,
        Uuid::new_v4(),
        extension_for(content_type)
    )
}

/// Reject keys that could escape a filesystem root.
pub fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("Storage key must not be empty".to_string());
    }
    if key.starts_with('/') || key.starts_with('\\') {
        return Err(format!("Storage key must be relative: {}", key));
    }
    if key.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(format!("Storage key must not contain '..': {}", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_key_layout() {
        let key = document_key(7, "application/pdf");
        assert!(key.starts_with("videos/7/pdfs/"));
        assert!(key.ends_with(".pdf"));
        let token = key
            .trim_start_matches("videos/7/pdfs/")
            .trim_end_matches(".pdf");
        assert!(Uuid::parse_str(token).is_ok());
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        assert!(document_key(1, "Application/PDF; charset=binary").ends_with(".pdf"));
        assert!(!document_key(1, "application/octet-stream").contains('.'));
    }

    #[test]
    fn test_keys_are_unique_per_call() {
        assert_ne!(
            document_key(7, "application/pdf"),
            document_key(7, "application/pdf")
        );
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("videos/7/pdfs/a.pdf").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("videos/../../etc/passwd").is_err());
        assert!(validate_key("videos/..hidden/file").is_ok());
    }
}
