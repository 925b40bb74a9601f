use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// A supplementary file attached to a lesson.
///
/// `storage_address` is opaque outside the storage crate's location resolver; it is never
/// split into container and key here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Document {
    pub id: i64,
    pub lesson_id: i64,
    pub title: String,
    pub document_type: String,
    pub storage_address: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Row to insert once the blob is already stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub lesson_id: i64,
    pub title: String,
    pub document_type: String,
    pub storage_address: String,
    pub display_order: i32,
}

/// Field overwrites applied by an update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentChanges {
    pub title: Option<String>,
    pub document_type: Option<String>,
    pub display_order: Option<i32>,
    pub storage_address: Option<String>,
}

impl DocumentChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.document_type.is_none()
            && self.display_order.is_none()
            && self.storage_address.is_none()
    }

    /// Apply these changes to `document` in place. `created_at` is never touched.
    pub fn apply_to(&self, document: &mut Document) {
        if let Some(title) = &self.title {
            document.title = title.clone();
        }
        if let Some(document_type) = &self.document_type {
            document.document_type = document_type.clone();
        }
        if let Some(order) = self.display_order {
            document.display_order = order;
        }
        if let Some(address) = &self.storage_address {
            document.storage_address = address.clone();
        }
    }
}

/// Column width of `lesson_documents.title`, counted in characters.
pub const MAX_DOCUMENT_TITLE_CHARS: usize = 200;

/// The three document kinds attached at lesson creation, in their fixed upload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Notes,
    SolvedPracticeSet,
    AnnotatedPracticeSet,
}

impl DocumentKind {
    pub const SEQUENCE: [DocumentKind; 3] = [
        DocumentKind::Notes,
        DocumentKind::SolvedPracticeSet,
        DocumentKind::AnnotatedPracticeSet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Notes => "Notes",
            DocumentKind::SolvedPracticeSet => "Solved Practice Set",
            DocumentKind::AnnotatedPracticeSet => "Annotated Practice Set",
        }
    }

    /// Title given to a document of this kind created alongside `lesson_title`.
    pub fn document_title(self, lesson_title: &str) -> String {
        format!("{} - {}", lesson_title, self.label())
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentResponse {
    pub id: i64,
    pub title: String,
    pub document_type: String,
    pub file_url: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        DocumentResponse {
            id: doc.id,
            title: doc.title,
            document_type: doc.document_type,
            file_url: doc.storage_address,
            display_order: doc.display_order,
            created_at: doc.created_at,
        }
    }
}

/// Time-bounded signed link for a stored document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DownloadLinkResponse {
    pub url: String,
    pub expires_in_seconds: u64,
}
