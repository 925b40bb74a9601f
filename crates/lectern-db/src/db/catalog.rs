use lectern_core::models::{Document, DocumentChanges, Lesson, NewDocument, NewLesson};
use lectern_core::AppError;

/// Metadata store for lessons and their documents.
///
/// Implementations never talk to the blob store; callers sequence blob and row writes.
/// A second document with the same `(lesson_id, document_type)` must fail with
/// [`AppError::Conflict`].
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Cheap round trip used by the readiness probe.
    async fn health_check(&self) -> Result<(), AppError>;

    async fn insert_lesson(&self, lesson: NewLesson) -> Result<Lesson, AppError>;

    async fn get_lesson(&self, lesson_id: i64) -> Result<Option<Lesson>, AppError>;

    /// Distinct section names, alphabetical.
    async fn list_sections(&self) -> Result<Vec<String>, AppError>;

    /// Lessons of a section ordered by `display_order`, then id.
    async fn lessons_in_section(&self, section: &str) -> Result<Vec<Lesson>, AppError>;

    async fn get_document(
        &self,
        lesson_id: i64,
        document_id: i64,
    ) -> Result<Option<Document>, AppError>;

    /// Documents of a lesson ordered by `display_order`, then id.
    async fn documents_for_lesson(&self, lesson_id: i64) -> Result<Vec<Document>, AppError>;

    /// Documents of several lessons in one call, ordered by lesson, `display_order`, id.
    async fn documents_for_lessons(&self, lesson_ids: &[i64]) -> Result<Vec<Document>, AppError>;

    /// Whether a document of `document_type` exists on the lesson, ignoring `excluding`.
    async fn document_type_exists(
        &self,
        lesson_id: i64,
        document_type: &str,
        excluding: Option<i64>,
    ) -> Result<bool, AppError>;

    async fn insert_document(&self, document: NewDocument) -> Result<Document, AppError>;

    /// Insert all rows or none.
    async fn insert_documents(&self, documents: Vec<NewDocument>)
        -> Result<Vec<Document>, AppError>;

    /// Overwrite the fields present in `changes`. Fails `NotFound` for an unknown id.
    async fn update_document(
        &self,
        document_id: i64,
        changes: &DocumentChanges,
    ) -> Result<Document, AppError>;

    /// Returns whether a row was removed.
    async fn delete_document(&self, document_id: i64) -> Result<bool, AppError>;

    /// Remove every document row of the lesson and then the lesson row, atomically.
    /// Returns whether the lesson existed.
    async fn delete_lesson_cascade(&self, lesson_id: i64) -> Result<bool, AppError>;
}
