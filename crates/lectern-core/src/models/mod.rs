//! Data models for the catalog
//!
//! Lessons own documents; response types are the JSON views served by the API.

mod document;
mod lesson;

pub use document::{
    Document, DocumentChanges, DocumentKind, DocumentResponse, DownloadLinkResponse, NewDocument,
    MAX_DOCUMENT_TITLE_CHARS,
};
pub use lesson::{Lesson, LessonResponse, NewLesson, SectionResponse};
