//! In-process catalog
//!
//! Lessons live in an ordered map and documents in an arena keyed by lesson id, so a
//! cascade delete is a single map removal. Used by `CATALOG_BACKEND=memory` and by tests.

use crate::db::catalog::CatalogStore;
use chrono::Utc;
use lectern_core::models::{Document, DocumentChanges, Lesson, NewDocument, NewLesson};
use lectern_core::AppError;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

#[derive(Default)]
struct Arena {
    next_lesson_id: i64,
    next_document_id: i64,
    lessons: BTreeMap<i64, Lesson>,
    documents: BTreeMap<i64, Vec<Document>>,
}

impl Arena {
    fn type_taken(&self, lesson_id: i64, document_type: &str, excluding: Option<i64>) -> bool {
        self.documents.get(&lesson_id).is_some_and(|docs| {
            docs.iter()
                .any(|d| d.document_type == document_type && Some(d.id) != excluding)
        })
    }

    fn find_document_mut(&mut self, document_id: i64) -> Option<&mut Document> {
        self.documents
            .values_mut()
            .flat_map(|docs| docs.iter_mut())
            .find(|d| d.id == document_id)
    }

    fn push_document(&mut self, document: NewDocument) -> Document {
        self.next_document_id += 1;
        let row = Document {
            id: self.next_document_id,
            lesson_id: document.lesson_id,
            title: document.title,
            document_type: document.document_type,
            storage_address: document.storage_address,
            display_order: document.display_order,
            created_at: Utc::now(),
        };
        self.documents
            .entry(row.lesson_id)
            .or_default()
            .push(row.clone());
        row
    }
}

fn unique_violation(lesson_id: i64, document_type: &str) -> AppError {
    AppError::Conflict(format!(
        "duplicate document type '{}' for lesson {}",
        document_type, lesson_id
    ))
}

fn sort_documents(documents: &mut [Document]) {
    documents.sort_by_key(|d| (d.lesson_id, d.display_order, d.id));
}

#[derive(Default)]
pub struct MemoryCatalog {
    arena: RwLock<Arena>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryCatalog {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_lesson(&self, lesson: NewLesson) -> Result<Lesson, AppError> {
        let mut arena = self.arena.write().await;
        arena.next_lesson_id += 1;
        let row = Lesson {
            id: arena.next_lesson_id,
            video_id: lesson.video_id,
            title: lesson.title,
            section: lesson.section,
            thumbnail_url: lesson.thumbnail_url,
            duration: lesson.duration,
            display_order: lesson.display_order,
        };
        arena.lessons.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_lesson(&self, lesson_id: i64) -> Result<Option<Lesson>, AppError> {
        Ok(self.arena.read().await.lessons.get(&lesson_id).cloned())
    }

    async fn list_sections(&self) -> Result<Vec<String>, AppError> {
        let arena = self.arena.read().await;
        let sections: BTreeSet<&String> = arena.lessons.values().map(|l| &l.section).collect();
        Ok(sections.into_iter().cloned().collect())
    }

    async fn lessons_in_section(&self, section: &str) -> Result<Vec<Lesson>, AppError> {
        let arena = self.arena.read().await;
        let mut lessons: Vec<Lesson> = arena
            .lessons
            .values()
            .filter(|l| l.section == section)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| (l.display_order, l.id));
        Ok(lessons)
    }

    async fn get_document(
        &self,
        lesson_id: i64,
        document_id: i64,
    ) -> Result<Option<Document>, AppError> {
        let arena = self.arena.read().await;
        Ok(arena
            .documents
            .get(&lesson_id)
            .and_then(|docs| docs.iter().find(|d| d.id == document_id))
            .cloned())
    }

    async fn documents_for_lesson(&self, lesson_id: i64) -> Result<Vec<Document>, AppError> {
        self.documents_for_lessons(&[lesson_id]).await
    }

    async fn documents_for_lessons(&self, lesson_ids: &[i64]) -> Result<Vec<Document>, AppError> {
        let arena = self.arena.read().await;
        let mut documents: Vec<Document> = lesson_ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter_map(|id| arena.documents.get(id))
            .flat_map(|docs| docs.iter().cloned())
            .collect();
        sort_documents(&mut documents);
        Ok(documents)
    }

    async fn document_type_exists(
        &self,
        lesson_id: i64,
        document_type: &str,
        excluding: Option<i64>,
    ) -> Result<bool, AppError> {
        Ok(self
            .arena
            .read()
            .await
            .type_taken(lesson_id, document_type, excluding))
    }

    async fn insert_document(&self, document: NewDocument) -> Result<Document, AppError> {
        let mut arena = self.arena.write().await;
        if !arena.lessons.contains_key(&document.lesson_id) {
            return Err(AppError::NotFound("Video not found".to_string()));
        }
        if arena.type_taken(document.lesson_id, &document.document_type, None) {
            return Err(unique_violation(document.lesson_id, &document.document_type));
        }
        Ok(arena.push_document(document))
    }

    async fn insert_documents(
        &self,
        documents: Vec<NewDocument>,
    ) -> Result<Vec<Document>, AppError> {
        let mut arena = self.arena.write().await;

        // Validate the whole batch before touching the arena.
        let mut seen = BTreeSet::new();
        for document in &documents {
            if !arena.lessons.contains_key(&document.lesson_id) {
                return Err(AppError::NotFound("Video not found".to_string()));
            }
            if arena.type_taken(document.lesson_id, &document.document_type, None)
                || !seen.insert((document.lesson_id, document.document_type.as_str()))
            {
                return Err(unique_violation(document.lesson_id, &document.document_type));
            }
        }

        Ok(documents
            .into_iter()
            .map(|document| arena.push_document(document))
            .collect())
    }

    async fn update_document(
        &self,
        document_id: i64,
        changes: &DocumentChanges,
    ) -> Result<Document, AppError> {
        let mut arena = self.arena.write().await;
        let lesson_id = arena
            .find_document_mut(document_id)
            .map(|d| d.lesson_id)
            .ok_or_else(|| AppError::NotFound("PDF not found".to_string()))?;

        if let Some(document_type) = &changes.document_type {
            if arena.type_taken(lesson_id, document_type, Some(document_id)) {
                return Err(unique_violation(lesson_id, document_type));
            }
        }

        let document = arena
            .find_document_mut(document_id)
            .ok_or_else(|| AppError::NotFound("PDF not found".to_string()))?;
        changes.apply_to(document);
        Ok(document.clone())
    }

    async fn delete_document(&self, document_id: i64) -> Result<bool, AppError> {
        let mut arena = self.arena.write().await;
        for docs in arena.documents.values_mut() {
            if let Some(index) = docs.iter().position(|d| d.id == document_id) {
                docs.remove(index);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete_lesson_cascade(&self, lesson_id: i64) -> Result<bool, AppError> {
        let mut arena = self.arena.write().await;
        arena.documents.remove(&lesson_id);
        Ok(arena.lessons.remove(&lesson_id).is_some())
    }
}
