use crate::db::catalog::CatalogStore;
use lectern_core::models::{Document, DocumentChanges, Lesson, NewDocument, NewLesson};
use lectern_core::AppError;
use sqlx::{PgPool, Postgres};

const LESSON_COLUMNS: &str =
    "id, video_id, title, section, thumbnail_url, duration, display_order";
const DOCUMENT_COLUMNS: &str =
    "id, lesson_id, title, document_type, storage_address, display_order, created_at";

/// PostgreSQL catalog over the `lessons` and `lesson_documents` tables
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, lesson), fields(db.table = "lessons", db.operation = "insert"))]
    async fn insert_lesson(&self, lesson: NewLesson) -> Result<Lesson, AppError> {
        let row = sqlx::query_as::<Postgres, Lesson>(&format!(
            r#"
            INSERT INTO lessons (video_id, title, section, thumbnail_url, duration, display_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {LESSON_COLUMNS}
            "#
        ))
        .bind(&lesson.video_id)
        .bind(&lesson.title)
        .bind(&lesson.section)
        .bind(&lesson.thumbnail_url)
        .bind(&lesson.duration)
        .bind(lesson.display_order)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(lesson_id = row.id, section = %row.section, "Lesson row inserted");
        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "lessons", db.operation = "select", db.record_id = lesson_id))]
    async fn get_lesson(&self, lesson_id: i64) -> Result<Option<Lesson>, AppError> {
        let row = sqlx::query_as::<Postgres, Lesson>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1"
        ))
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "lessons", db.operation = "select"))]
    async fn list_sections(&self) -> Result<Vec<String>, AppError> {
        let sections = sqlx::query_scalar::<Postgres, String>(
            "SELECT DISTINCT section FROM lessons ORDER BY section ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sections)
    }

    #[tracing::instrument(skip(self), fields(db.table = "lessons", db.operation = "select"))]
    async fn lessons_in_section(&self, section: &str) -> Result<Vec<Lesson>, AppError> {
        let rows = sqlx::query_as::<Postgres, Lesson>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE section = $1 ORDER BY display_order ASC, id ASC"
        ))
        .bind(section)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "lesson_documents", db.operation = "select", db.record_id = document_id))]
    async fn get_document(
        &self,
        lesson_id: i64,
        document_id: i64,
    ) -> Result<Option<Document>, AppError> {
        let row = sqlx::query_as::<Postgres, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM lesson_documents WHERE id = $1 AND lesson_id = $2"
        ))
        .bind(document_id)
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "lesson_documents", db.operation = "select"))]
    async fn documents_for_lesson(&self, lesson_id: i64) -> Result<Vec<Document>, AppError> {
        let rows = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS} FROM lesson_documents
            WHERE lesson_id = $1
            ORDER BY display_order ASC, id ASC
            "#
        ))
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self, lesson_ids), fields(db.table = "lesson_documents", db.operation = "select", lesson_count = lesson_ids.len()))]
    async fn documents_for_lessons(&self, lesson_ids: &[i64]) -> Result<Vec<Document>, AppError> {
        if lesson_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS} FROM lesson_documents
            WHERE lesson_id = ANY($1)
            ORDER BY lesson_id ASC, display_order ASC, id ASC
            "#
        ))
        .bind(lesson_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "lesson_documents", db.operation = "select"))]
    async fn document_type_exists(
        &self,
        lesson_id: i64,
        document_type: &str,
        excluding: Option<i64>,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM lesson_documents
                WHERE lesson_id = $1 AND document_type = $2 AND id IS DISTINCT FROM $3
            )
            "#,
        )
        .bind(lesson_id)
        .bind(document_type)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self, document), fields(db.table = "lesson_documents", db.operation = "insert", lesson_id = document.lesson_id))]
    async fn insert_document(&self, document: NewDocument) -> Result<Document, AppError> {
        let row = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            INSERT INTO lesson_documents (lesson_id, title, document_type, storage_address, display_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(document.lesson_id)
        .bind(&document.title)
        .bind(&document.document_type)
        .bind(&document.storage_address)
        .bind(document.display_order)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self, documents), fields(db.table = "lesson_documents", db.operation = "insert", batch_size = documents.len()))]
    async fn insert_documents(
        &self,
        documents: Vec<NewDocument>,
    ) -> Result<Vec<Document>, AppError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut inserted = Vec::with_capacity(documents.len());

        for document in &documents {
            let row = sqlx::query_as::<Postgres, Document>(&format!(
                r#"
                INSERT INTO lesson_documents (lesson_id, title, document_type, storage_address, display_order)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {DOCUMENT_COLUMNS}
                "#
            ))
            .bind(document.lesson_id)
            .bind(&document.title)
            .bind(&document.document_type)
            .bind(&document.storage_address)
            .bind(document.display_order)
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    #[tracing::instrument(skip(self, changes), fields(db.table = "lesson_documents", db.operation = "update", db.record_id = document_id))]
    async fn update_document(
        &self,
        document_id: i64,
        changes: &DocumentChanges,
    ) -> Result<Document, AppError> {
        let row = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            UPDATE lesson_documents
            SET title = COALESCE($2, title),
                document_type = COALESCE($3, document_type),
                display_order = COALESCE($4, display_order),
                storage_address = COALESCE($5, storage_address)
            WHERE id = $1
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(document_id)
        .bind(&changes.title)
        .bind(&changes.document_type)
        .bind(changes.display_order)
        .bind(&changes.storage_address)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| AppError::NotFound("PDF not found".to_string()))
    }

    #[tracing::instrument(skip(self), fields(db.table = "lesson_documents", db.operation = "delete", db.record_id = document_id))]
    async fn delete_document(&self, document_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM lesson_documents WHERE id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "lessons", db.operation = "delete", db.record_id = lesson_id))]
    async fn delete_lesson_cascade(&self, lesson_id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let documents = sqlx::query("DELETE FROM lesson_documents WHERE lesson_id = $1")
            .bind(lesson_id)
            .execute(&mut *tx)
            .await?;
        let lessons = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            lesson_id,
            documents_deleted = documents.rows_affected(),
            "Lesson rows deleted"
        );
        Ok(lessons.rows_affected() > 0)
    }
}
