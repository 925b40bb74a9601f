//! External video references.
//!
//! Lessons point at a YouTube video. Callers may supply a bare 11-character id or one
//! of the watch, short, and embed link forms; everything else is rejected.

use regex::Regex;
use std::sync::LazyLock;

use crate::AppError;

pub const EMPTY_REFERENCE_MESSAGE: &str = "YouTube URL cannot be null or empty";
pub const INVALID_REFERENCE_MESSAGE: &str = "Invalid YouTube URL format. Supported formats: \
     https://www.youtube.com/watch?v=VIDEO_ID, \
     https://youtu.be/VIDEO_ID, \
     https://www.youtube.com/embed/VIDEO_ID";

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("bare video id pattern"));

static LINK_FORMS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"(?:youtube\.com/watch\?(?:[^#\s]*&)?v=|youtu\.be/|youtube\.com/embed/)([a-zA-Z0-9_-]{11})",
        r"youtu\.be/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/embed/([a-zA-Z0-9_-]{11})",
    ]
    .map(|pattern| Regex::new(pattern).expect("video link pattern"))
});

/// Extract the canonical video id from a bare id or a recognized link.
pub fn extract_video_id(reference: &str) -> Result<String, AppError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(AppError::InvalidInput(EMPTY_REFERENCE_MESSAGE.to_string()));
    }

    if BARE_ID.is_match(reference) {
        return Ok(reference.to_string());
    }

    LINK_FORMS
        .iter()
        .find_map(|pattern| pattern.captures(reference))
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| AppError::InvalidInput(INVALID_REFERENCE_MESSAGE.to_string()))
}

/// Deterministic thumbnail address for a video id. No network access.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", video_id)
}
