use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::document::{Document, DocumentResponse};

/// A catalog entry for one video-based teaching unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Lesson {
    pub id: i64,
    pub video_id: String,
    pub title: String,
    pub section: String,
    pub thumbnail_url: String,
    pub duration: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLesson {
    pub video_id: String,
    pub title: String,
    pub section: String,
    pub thumbnail_url: String,
    pub duration: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SectionResponse {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LessonResponse {
    pub id: i64,
    pub video_id: String,
    pub title: String,
    pub section: String,
    pub thumbnail_url: String,
    pub duration: Option<String>,
    pub display_order: i32,
    pub documents: Vec<DocumentResponse>,
}

impl LessonResponse {
    /// Build the view of a lesson with its documents, which must already be ordered.
    pub fn new(lesson: Lesson, documents: Vec<Document>) -> Self {
        LessonResponse {
            id: lesson.id,
            video_id: lesson.video_id,
            title: lesson.title,
            section: lesson.section,
            thumbnail_url: lesson.thumbnail_url,
            duration: lesson.duration,
            display_order: lesson.display_order,
            documents: documents.into_iter().map(DocumentResponse::from).collect(),
        }
    }
}
