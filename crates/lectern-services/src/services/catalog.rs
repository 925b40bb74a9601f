//! Read side: sections and lessons with their documents.

use lectern_core::models::{Document, LessonResponse, SectionResponse};
use lectern_core::AppError;
use lectern_db::CatalogStore;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogQueryService {
    catalog: Arc<dyn CatalogStore>,
}

impl CatalogQueryService {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub async fn list_sections(&self) -> Result<Vec<SectionResponse>, AppError> {
        let sections = self.catalog.list_sections().await?;
        Ok(sections
            .into_iter()
            .map(|name| SectionResponse { name })
            .collect())
    }

    /// Lessons of `section` ordered by display order, each with its ordered documents.
    /// Documents for the whole page are fetched in one catalog call.
    #[tracing::instrument(skip(self))]
    pub async fn lessons_in_section(&self, section: &str) -> Result<Vec<LessonResponse>, AppError> {
        let lessons = self.catalog.lessons_in_section(section).await?;
        let ids: Vec<i64> = lessons.iter().map(|l| l.id).collect();

        let mut by_lesson: HashMap<i64, Vec<Document>> = HashMap::new();
        for document in self.catalog.documents_for_lessons(&ids).await? {
            by_lesson.entry(document.lesson_id).or_default().push(document);
        }

        Ok(lessons
            .into_iter()
            .map(|lesson| {
                let documents = by_lesson.remove(&lesson.id).unwrap_or_default();
                LessonResponse::new(lesson, documents)
            })
            .collect())
    }
}
