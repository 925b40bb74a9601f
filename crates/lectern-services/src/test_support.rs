//! In-memory blob store double with an operation log and switchable failures, plus a
//! catalog wrapper whose type check always misses.

use async_trait::async_trait;
use bytes::Bytes;
use lectern_core::models::{Document, DocumentChanges, Lesson, NewDocument, NewLesson};
use lectern_core::{AppError, StorageBackend};
use lectern_db::{CatalogStore, MemoryCatalog};
use lectern_storage::{
    BlobGateway, BlobStore, LinkIssuer, StorageError, StorageLocation, StorageResult,
    StorageSettings,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CONTAINER: &str = "lessons";

#[derive(Default)]
pub struct RecordingBlobStore {
    objects: Mutex<HashMap<String, Bytes>>,
    log: Mutex<Vec<String>>,
    pub fail_put: AtomicBool,
    pub fail_delete: AtomicBool,
}

impl RecordingBlobStore {
    pub fn contains(&self, address: &str) -> bool {
        self.objects.lock().unwrap().contains_key(address)
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Operations in call order, e.g. `put s3://lessons/videos/1/pdfs/x.pdf`.
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn fail_puts(&self) {
        self.fail_put.store(true, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    fn record(&self, op: &str, location: &StorageLocation) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{} {}", op, location.to_address()));
    }
}

#[async_trait]
impl BlobStore for RecordingBlobStore {
    async fn put(
        &self,
        location: &StorageLocation,
        content: Bytes,
        _content_type: &str,
    ) -> StorageResult<()> {
        self.record("put", location);
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("injected".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(location.to_address(), content);
        Ok(())
    }

    async fn delete(&self, location: &StorageLocation) -> StorageResult<()> {
        self.record("delete", location);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed("injected".to_string()));
        }
        self.objects.lock().unwrap().remove(&location.to_address());
        Ok(())
    }

    async fn presign(&self, location: &StorageLocation, ttl: Duration) -> StorageResult<String> {
        self.record("presign", location);
        Ok(format!(
            "https://signed.example/{}/{}?ttl={}",
            location.container,
            location.key,
            ttl.as_secs()
        ))
    }

    async fn exists(&self, location: &StorageLocation) -> StorageResult<bool> {
        Ok(self.contains(&location.to_address()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

pub struct Fixture {
    pub catalog: Arc<MemoryCatalog>,
    pub store: Arc<RecordingBlobStore>,
    pub gateway: BlobGateway,
    pub links: LinkIssuer,
}

pub fn fixture() -> Fixture {
    let catalog = Arc::new(MemoryCatalog::new());
    let store = Arc::new(RecordingBlobStore::default());
    let settings = StorageSettings {
        default_container: Some(CONTAINER.to_string()),
        call_timeout: Duration::from_secs(5),
        link_ttl: Duration::from_secs(600),
    };
    Fixture {
        catalog,
        gateway: BlobGateway::new(store.clone(), settings.clone()),
        links: LinkIssuer::new(store.clone(), settings),
        store,
    }
}

/// Delegates to a [`MemoryCatalog`] but reports every document type as free, so a write
/// behaves as if a concurrent request claimed the type after the check.
pub struct StaleTypeCheck(pub Arc<MemoryCatalog>);

#[async_trait]
impl CatalogStore for StaleTypeCheck {
    async fn health_check(&self) -> Result<(), AppError> {
        self.0.health_check().await
    }

    async fn insert_lesson(&self, lesson: NewLesson) -> Result<Lesson, AppError> {
        self.0.insert_lesson(lesson).await
    }

    async fn get_lesson(&self, lesson_id: i64) -> Result<Option<Lesson>, AppError> {
        self.0.get_lesson(lesson_id).await
    }

    async fn list_sections(&self) -> Result<Vec<String>, AppError> {
        self.0.list_sections().await
    }

    async fn lessons_in_section(&self, section: &str) -> Result<Vec<Lesson>, AppError> {
        self.0.lessons_in_section(section).await
    }

    async fn get_document(
        &self,
        lesson_id: i64,
        document_id: i64,
    ) -> Result<Option<Document>, AppError> {
        self.0.get_document(lesson_id, document_id).await
    }

    async fn documents_for_lesson(&self, lesson_id: i64) -> Result<Vec<Document>, AppError> {
        self.0.documents_for_lesson(lesson_id).await
    }

    async fn documents_for_lessons(&self, lesson_ids: &[i64]) -> Result<Vec<Document>, AppError> {
        self.0.documents_for_lessons(lesson_ids).await
    }

    async fn document_type_exists(
        &self,
        _lesson_id: i64,
        _document_type: &str,
        _excluding: Option<i64>,
    ) -> Result<bool, AppError> {
        Ok(false)
    }

    async fn insert_document(&self, document: NewDocument) -> Result<Document, AppError> {
        self.0.insert_document(document).await
    }

    async fn insert_documents(
        &self,
        documents: Vec<NewDocument>,
    ) -> Result<Vec<Document>, AppError> {
        self.0.insert_documents(documents).await
    }

    async fn update_document(
        &self,
        document_id: i64,
        changes: &DocumentChanges,
    ) -> Result<Document, AppError> {
        self.0.update_document(document_id, changes).await
    }

    async fn delete_document(&self, document_id: i64) -> Result<bool, AppError> {
        self.0.delete_document(document_id).await
    }

    async fn delete_lesson_cascade(&self, lesson_id: i64) -> Result<bool, AppError> {
        self.0.delete_lesson_cascade(lesson_id).await
    }
}
