//! Cache entry, outcome and error types.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::content_type::ImageType;
use super::path::body_path;
use crate::candidate::Candidate;
use crate::http::{HttpError, LimiterClosed};

/// Persisted metadata sidecar.
///
/// `content_type`, `content_length` and `image_type` drive the cache; the
/// remaining fields are recorded for humans browsing the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub title: String,
    pub url: String,
    /// Declared width from the listing.
    pub width: u32,
    /// Declared height from the listing.
    pub height: u32,
    pub subreddit: String,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
    pub image_type: ImageType,
}

impl CacheEntry {
    /// Build an entry for a freshly downloaded candidate.
    pub fn new(
        candidate: &Candidate,
        content_type: impl Into<String>,
        content_length: Option<u64>,
        image_type: ImageType,
    ) -> Self {
        Self {
            title: candidate.title().to_string(),
            url: candidate.url().to_string(),
            width: candidate.declared().width,
            height: candidate.declared().height,
            subreddit: candidate.feed().to_string(),
            content_type: content_type.into(),
            content_length,
            image_type,
        }
    }
}

/// A candidate with a valid entry on disk.
#[derive(Debug, Clone)]
pub struct CachedImage {
    candidate: Candidate,
    entry: CacheEntry,
    path: PathBuf,
}

impl CachedImage {
    pub fn new(candidate: Candidate, entry: CacheEntry, cache_dir: &Path) -> Self {
        let path = body_path(cache_dir, candidate.content_hash(), entry.image_type);
        Self {
            candidate,
            entry,
            path,
        }
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn entry(&self) -> &CacheEntry {
        &self.entry
    }

    /// Path of the stored body.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Why a download was refused without writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Content type missing or not on the allow-list.
    ContentType(Option<String>),
    /// Non-success HTTP status.
    Status(u16),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::ContentType(Some(ct)) => write!(f, "content type '{}' not accepted", ct),
            Rejection::ContentType(None) => write!(f, "missing content type"),
            Rejection::Status(status) => write!(f, "bad status {}", status),
        }
    }
}

/// Result of materializing one candidate.
#[derive(Debug)]
pub enum CacheOutcome {
    /// Sidecar already present, no request made.
    Hit(CachedImage),
    /// Downloaded and persisted in this call.
    Downloaded(CachedImage),
    /// Refused, nothing written.
    Rejected(Rejection),
}

impl CacheOutcome {
    /// The stored image, unless rejected.
    pub fn into_cached(self) -> Option<CachedImage> {
        match self {
            CacheOutcome::Hit(image) | CacheOutcome::Downloaded(image) => Some(image),
            CacheOutcome::Rejected(_) => None,
        }
    }
}

/// Per-candidate cache failure.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unreadable sidecar {path}: {source}")]
    Sidecar {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Limiter(#[from] LimiterClosed),
}

impl CacheError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        CacheError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Dimensions;

    #[test]
    fn test_sidecar_json_shape() {
        let candidate = Candidate::new(
            "Aurora",
            "https://i.redd.it/aurora.png",
            Dimensions::new(2560, 1440),
            "skyporn",
        );
        let entry = CacheEntry::new(&candidate, "image/png", Some(1234), ImageType::Png);

        let json: serde_json::Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["image_type"], "png");
        assert_eq!(json["subreddit"], "skyporn");
        assert_eq!(json["width"], 2560);
        assert_eq!(json["content_length"], 1234);
    }

    #[test]
    fn test_sidecar_without_length_parses() {
        let raw = r#"{
            "title": "t", "url": "u", "width": 1, "height": 2,
            "subreddit": "s", "content_type": "image/jpeg", "image_type": "jpg"
        }"#;
        let entry: CacheEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.content_length, None);
        assert_eq!(entry.image_type, ImageType::Jpg);
    }

    #[test]
    fn test_cached_image_path_uses_entry_type() {
        let candidate = Candidate::new("t", "https://x/y", Dimensions::new(1, 1), "f");
        let entry = CacheEntry::new(&candidate, "image/png", None, ImageType::Png);
        let image = CachedImage::new(candidate.clone(), entry, Path::new("/c"));

        assert_eq!(
            image.path(),
            Path::new(&format!("/c/{}.png", candidate.content_hash()))
        );
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(
            Rejection::ContentType(Some("text/html".into())).to_string(),
            "content type 'text/html' not accepted"
        );
        assert_eq!(Rejection::Status(404).to_string(), "bad status 404");
    }
}
