//! Validated views of the admin multipart forms.

use crate::utils::multipart::MultipartForm;
use lectern_core::AppError;
use lectern_services::{AddDocument, CreateLesson, UpdateDocument};
use validator::Validate;

pub const VIDEO_URL_FIELD: &str = "video_url";
pub const NOTES_FIELD: &str = "notes_pdf";
pub const SOLVED_FIELD: &str = "solved_practice_set_pdf";
pub const ANNOTATED_FIELD: &str = "annotated_practice_set_pdf";
pub const LESSON_FILE_FIELDS: [&str; 3] = [NOTES_FIELD, SOLVED_FIELD, ANNOTATED_FIELD];

pub const DOCUMENT_FILE_FIELD: &str = "file";

#[derive(Debug, Validate)]
pub struct LessonForm {
    pub video_url: String,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 80, message = "section must be 1-80 characters"))]
    pub section: String,
    #[validate(length(max = 20, message = "duration must be at most 20 characters"))]
    pub duration: Option<String>,
    pub display_order: i32,
}

impl LessonForm {
    pub fn parse(mut form: MultipartForm) -> Result<CreateLesson, AppError> {
        let fields = LessonForm {
            video_url: form.text(VIDEO_URL_FIELD).unwrap_or_default(),
            title: form.required_text("title")?.trim().to_string(),
            section: form.required_text("section")?.trim().to_string(),
            duration: form
                .text("duration")
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            display_order: form.integer("display_order")?.unwrap_or(0),
        };
        fields.validate()?;

        Ok(CreateLesson {
            video_reference: fields.video_url,
            title: fields.title,
            section: fields.section,
            duration: fields.duration,
            display_order: fields.display_order,
            notes: form.take_file(NOTES_FIELD),
            solved_practice_set: form.take_file(SOLVED_FIELD),
            annotated_practice_set: form.take_file(ANNOTATED_FIELD),
        })
    }
}

#[derive(Debug, Validate)]
pub struct DocumentForm {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "document_type must be 1-100 characters"))]
    pub document_type: String,
    pub display_order: i32,
}

impl DocumentForm {
    pub fn parse(mut form: MultipartForm) -> Result<AddDocument, AppError> {
        let fields = DocumentForm {
            title: form.required_text("title")?.trim().to_string(),
            document_type: form.required_text("document_type")?.trim().to_string(),
            display_order: form.integer("display_order")?.ok_or_else(|| {
                AppError::InvalidInput("Missing required field: display_order".to_string())
            })?,
        };
        fields.validate()?;

        let file = form
            .take_file(DOCUMENT_FILE_FIELD)
            .ok_or_else(|| AppError::InvalidInput("PDF file is required".to_string()))?;

        Ok(AddDocument {
            title: fields.title,
            document_type: fields.document_type,
            display_order: fields.display_order,
            file,
        })
    }
}

/// Every field is optional; blank text fields are dropped before validation.
#[derive(Debug, Default, Validate)]
pub struct DocumentChangesForm {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 100, message = "document_type must be 1-100 characters"))]
    pub document_type: Option<String>,
    pub display_order: Option<i32>,
}

impl DocumentChangesForm {
    pub fn parse(mut form: MultipartForm) -> Result<UpdateDocument, AppError> {
        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let fields = DocumentChangesForm {
            title: non_blank(form.text("title")),
            document_type: non_blank(form.text("document_type")),
            display_order: form.integer("display_order")?,
        };
        fields.validate()?;

        Ok(UpdateDocument {
            title: fields.title,
            document_type: fields.document_type,
            display_order: fields.display_order,
            file: form.take_file(DOCUMENT_FILE_FIELD),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_form_length_limits() {
        let too_long = LessonForm {
            video_url: "dQw4w9WgXcQ".to_string(),
            title: "t".repeat(201),
            section: "Algebra".to_string(),
            duration: None,
            display_order: 0,
        };
        assert!(too_long.validate().is_err());

        let ok = LessonForm {
            title: "t".repeat(200),
            duration: Some("1:02:03".to_string()),
            ..too_long
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_lesson_form_rejects_long_duration_and_empty_section() {
        let form = LessonForm {
            video_url: "dQw4w9WgXcQ".to_string(),
            title: "Limits".to_string(),
            section: String::new(),
            duration: Some("x".repeat(21)),
            display_order: 1,
        };
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("section"));
        assert!(fields.contains_key("duration"));
    }

    #[test]
    fn test_document_type_limit() {
        let form = DocumentForm {
            title: "Worksheet".to_string(),
            document_type: "x".repeat(101),
            display_order: 1,
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_changes_form_allows_all_absent() {
        assert!(DocumentChangesForm::default().validate().is_ok());
    }
}
