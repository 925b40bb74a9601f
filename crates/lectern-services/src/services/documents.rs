//! Document lifecycle: add, update and delete a document attached to a lesson.
//!
//! Blob and row writes are separate calls with no shared transaction. Blob steps always run
//! before the matching row step, so a failure leaves an orphaned blob rather than a row
//! pointing at nothing.

use super::{pdf_not_found, type_already_exists, video_not_found, UploadedFile};
use lectern_core::models::{DocumentChanges, DocumentResponse, NewDocument};
use lectern_core::AppError;
use lectern_db::CatalogStore;
use lectern_storage::BlobGateway;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AddDocument {
    pub title: String,
    pub document_type: String,
    pub display_order: i32,
    pub file: UploadedFile,
}

/// Partial update. Blank strings are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct UpdateDocument {
    pub title: Option<String>,
    pub document_type: Option<String>,
    pub display_order: Option<i32>,
    pub file: Option<UploadedFile>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct DocumentLifecycleService {
    catalog: Arc<dyn CatalogStore>,
    gateway: BlobGateway,
}

impl DocumentLifecycleService {
    pub fn new(catalog: Arc<dyn CatalogStore>, gateway: BlobGateway) -> Self {
        Self { catalog, gateway }
    }

    #[tracing::instrument(skip(self, request), fields(document_type = %request.document_type))]
    pub async fn add(
        &self,
        lesson_id: i64,
        request: AddDocument,
    ) -> Result<DocumentResponse, AppError> {
        self.catalog
            .get_lesson(lesson_id)
            .await?
            .ok_or_else(video_not_found)?;

        if self
            .catalog
            .document_type_exists(lesson_id, &request.document_type, None)
            .await?
        {
            return Err(type_already_exists(&request.document_type));
        }

        tracing::debug!(
            lesson_id,
            file_name = request.file.file_name.as_deref().unwrap_or("-"),
            size_bytes = request.file.size_bytes(),
            "Uploading document"
        );
        let address = self
            .gateway
            .put(
                lesson_id,
                request.file.content,
                &request.file.content_type,
            )
            .await?;

        let inserted = self
            .catalog
            .insert_document(NewDocument {
                lesson_id,
                title: request.title,
                document_type: request.document_type.clone(),
                storage_address: address.clone(),
                display_order: request.display_order,
            })
            .await;

        let document = match inserted {
            Ok(document) => document,
            Err(AppError::Conflict(_)) => {
                tracing::warn!(
                    lesson_id,
                    storage_address = %address,
                    "Concurrent add won the type; uploaded blob is orphaned"
                );
                return Err(type_already_exists(&request.document_type));
            }
            Err(e) => {
                tracing::warn!(
                    lesson_id,
                    storage_address = %address,
                    error = %e,
                    "Document row insert failed; uploaded blob is orphaned"
                );
                return Err(e);
            }
        };

        tracing::info!(
            lesson_id,
            document_id = document.id,
            storage_address = %document.storage_address,
            "Document added"
        );
        Ok(document.into())
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn update(
        &self,
        lesson_id: i64,
        document_id: i64,
        request: UpdateDocument,
    ) -> Result<DocumentResponse, AppError> {
        let current = self
            .catalog
            .get_document(lesson_id, document_id)
            .await?
            .ok_or_else(pdf_not_found)?;

        let mut changes = DocumentChanges {
            title: non_blank(request.title),
            document_type: non_blank(request.document_type),
            display_order: request.display_order,
            storage_address: None,
        };

        if let Some(document_type) = &changes.document_type {
            if *document_type != current.document_type
                && self
                    .catalog
                    .document_type_exists(lesson_id, document_type, Some(document_id))
                    .await?
            {
                return Err(type_already_exists(document_type));
            }
        }

        if let Some(file) = request.file {
            tracing::debug!(
                lesson_id,
                document_id,
                file_name = file.file_name.as_deref().unwrap_or("-"),
                size_bytes = file.size_bytes(),
                "Replacing document file"
            );
            self.gateway.delete(&current.storage_address).await?;
            // From here until the row update the row references a deleted blob.
            let address = self
                .gateway
                .put(lesson_id, file.content, &file.content_type)
                .await
                .inspect_err(|e| {
                    tracing::error!(
                        lesson_id,
                        document_id,
                        storage_address = %current.storage_address,
                        error = %e,
                        "Replacement upload failed after old blob was deleted"
                    );
                })?;
            changes.storage_address = Some(address);
        }

        if changes.is_empty() {
            return Ok(current.into());
        }

        let updated = self
            .catalog
            .update_document(document_id, &changes)
            .await
            .map_err(|e| match (e, &changes.document_type) {
                (AppError::Conflict(_), Some(document_type)) => type_already_exists(document_type),
                (e, _) => e,
            })?;

        tracing::info!(lesson_id, document_id, "Document updated");
        Ok(updated.into())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, lesson_id: i64, document_id: i64) -> Result<(), AppError> {
        let document = self
            .catalog
            .get_document(lesson_id, document_id)
            .await?
            .ok_or_else(pdf_not_found)?;

        self.gateway.delete(&document.storage_address).await?;
        self.catalog.delete_document(document_id).await?;

        tracing::info!(
            lesson_id,
            document_id,
            storage_address = %document.storage_address,
            "Document deleted"
        );
        Ok(())
    }
}
