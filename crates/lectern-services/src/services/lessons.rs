//! Lesson creation and cascade delete.

use super::{video_not_found, UploadedFile};
use lectern_core::models::{
    DocumentKind, LessonResponse, NewDocument, NewLesson, MAX_DOCUMENT_TITLE_CHARS,
};
use lectern_core::video_ref::{extract_video_id, thumbnail_url};
use lectern_core::AppError;
use lectern_db::CatalogStore;
use lectern_storage::BlobGateway;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CreateLesson {
    /// YouTube link in any supported form, or a bare video id.
    pub video_reference: String,
    pub title: String,
    pub section: String,
    pub duration: Option<String>,
    pub display_order: i32,
    pub notes: Option<UploadedFile>,
    pub solved_practice_set: Option<UploadedFile>,
    pub annotated_practice_set: Option<UploadedFile>,
}

impl CreateLesson {
    /// Supplied files paired with their kind, in upload order.
    fn into_files(self) -> (LessonFields, Vec<(DocumentKind, UploadedFile)>) {
        let files = DocumentKind::SEQUENCE
            .into_iter()
            .zip([
                self.notes,
                self.solved_practice_set,
                self.annotated_practice_set,
            ])
            .filter_map(|(kind, file)| file.map(|f| (kind, f)))
            .collect();
        (
            LessonFields {
                video_reference: self.video_reference,
                title: self.title,
                section: self.section,
                duration: self.duration,
                display_order: self.display_order,
            },
            files,
        )
    }
}

struct LessonFields {
    video_reference: String,
    title: String,
    section: String,
    duration: Option<String>,
    display_order: i32,
}

/// Derived document titles must fit their column before anything is written.
fn check_document_titles(
    lesson_title: &str,
    files: &[(DocumentKind, UploadedFile)],
) -> Result<(), AppError> {
    match files.iter().map(|(kind, _)| *kind).find(|kind| {
        kind.document_title(lesson_title).chars().count() > MAX_DOCUMENT_TITLE_CHARS
    }) {
        Some(kind) => Err(AppError::InvalidInput(format!(
            "title is too long for the '{}' document (at most {} characters)",
            kind.label(),
            MAX_DOCUMENT_TITLE_CHARS - kind.document_title("").chars().count()
        ))),
        None => Ok(()),
    }
}

#[derive(Clone)]
pub struct LessonCreationService {
    catalog: Arc<dyn CatalogStore>,
    gateway: BlobGateway,
}

impl LessonCreationService {
    pub fn new(catalog: Arc<dyn CatalogStore>, gateway: BlobGateway) -> Self {
        Self { catalog, gateway }
    }

    /// Persist the lesson, upload every supplied file, then write all document rows at once.
    ///
    /// An upload failure leaves the lesson row and any earlier blobs in place.
    #[tracing::instrument(skip(self, request), fields(section = %request.section))]
    pub async fn create_lesson(&self, request: CreateLesson) -> Result<LessonResponse, AppError> {
        let (fields, files) = request.into_files();

        let video_id = extract_video_id(&fields.video_reference)?;
        check_document_titles(&fields.title, &files)?;
        let lesson = self
            .catalog
            .insert_lesson(NewLesson {
                thumbnail_url: thumbnail_url(&video_id),
                video_id,
                title: fields.title,
                section: fields.section,
                duration: fields.duration,
                display_order: fields.display_order,
            })
            .await?;

        let mut pending = Vec::with_capacity(files.len());
        for (order, (kind, file)) in (1..).zip(files) {
            tracing::debug!(
                lesson_id = lesson.id,
                document_type = %kind,
                file_name = file.file_name.as_deref().unwrap_or("-"),
                size_bytes = file.size_bytes(),
                "Uploading lesson document"
            );
            let storage_address = self
                .gateway
                .put(lesson.id, file.content, &file.content_type)
                .await
                .inspect_err(|e| {
                    tracing::error!(
                        lesson_id = lesson.id,
                        document_type = %kind,
                        uploaded = pending.len(),
                        error = %e,
                        "Upload failed during lesson creation"
                    );
                })?;

            pending.push(NewDocument {
                lesson_id: lesson.id,
                title: kind.document_title(&lesson.title),
                document_type: kind.label().to_string(),
                storage_address,
                display_order: order,
            });
        }

        let documents = self.catalog.insert_documents(pending).await?;

        tracing::info!(
            lesson_id = lesson.id,
            video_id = %lesson.video_id,
            documents = documents.len(),
            "Lesson created"
        );
        Ok(LessonResponse::new(lesson, documents))
    }

    /// Delete every document blob, then the document rows and the lesson row.
    ///
    /// The first blob delete failure aborts before any row is touched.
    #[tracing::instrument(skip(self))]
    pub async fn delete_lesson(&self, lesson_id: i64) -> Result<(), AppError> {
        self.catalog
            .get_lesson(lesson_id)
            .await?
            .ok_or_else(video_not_found)?;

        let documents = self.catalog.documents_for_lesson(lesson_id).await?;
        for document in &documents {
            self.gateway.delete(&document.storage_address).await?;
        }

        self.catalog.delete_lesson_cascade(lesson_id).await?;

        tracing::info!(lesson_id, documents = documents.len(), "Lesson deleted");
        Ok(())
    }
}
