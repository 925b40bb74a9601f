//! Multipart form reading shared by the admin upload handlers

use crate::error::HttpAppError;
use axum::extract::multipart::{Field, Multipart};
use axum::http::StatusCode;
use lectern_core::AppError;
use lectern_services::UploadedFile;
use lectern_storage::CONTENT_READ_FAILURE;
use std::collections::HashMap;

const DEFAULT_FILE_CONTENT_TYPE: &str = "application/pdf";

/// Text fields and file parts of one multipart request.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Read every part. Names listed in `file_fields` are taken as files, anything else as text.
    ///
    /// An empty file part is treated as if it had not been sent. A later part with the same
    /// name replaces an earlier one.
    pub async fn read(
        mut multipart: Multipart,
        file_fields: &[&str],
        max_file_size: usize,
    ) -> Result<Self, HttpAppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if file_fields.contains(&name.as_str()) {
                if let Some(file) = read_file(field, max_file_size).await? {
                    form.files.insert(name, file);
                }
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Text field that must be present.
    pub fn required_text(&self, name: &str) -> Result<String, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::InvalidInput(format!("Missing required field: {}", name)))
    }

    /// Integer field; blank counts as absent.
    pub fn integer(&self, name: &str) -> Result<Option<i32>, AppError> {
        match self.fields.get(name).map(|v| v.trim()) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse::<i32>().map(Some).map_err(|_| {
                AppError::InvalidInput(format!("Field '{}' must be an integer", name))
            }),
        }
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

async fn read_file(
    field: Field<'_>,
    max_file_size: usize,
) -> Result<Option<UploadedFile>, HttpAppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field
        .content_type()
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_FILE_CONTENT_TYPE.to_string());
    let field_name = field.name().unwrap_or_default().to_string();

    let content = field.bytes().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpAppError::from(e);
        }
        tracing::warn!(field = %field_name, error = %e, "Failed to read uploaded file");
        HttpAppError(AppError::ContentReadFailure(CONTENT_READ_FAILURE.to_string()))
    })?;

    if content.is_empty() {
        return Ok(None);
    }

    validate_file_size(content.len(), max_file_size)?;

    Ok(Some(UploadedFile {
        content,
        content_type,
        file_name,
    }))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}
