//! Content-type allow-list and stored image type.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowercase the media type and strip any parameters.
///
/// `"Image/JPEG; charset=binary"` becomes `"image/jpeg"`.
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Set of media types a body must match to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedContentTypes {
    types: BTreeSet<String>,
}

impl AcceptedContentTypes {
    /// Build an allow-list. Entries are normalized and empties dropped.
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types = types
            .into_iter()
            .map(|t| normalize_content_type(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        Self { types }
    }

    /// True if the raw header value is on the list.
    pub fn accepts(&self, raw: Option<&str>) -> bool {
        raw.map(normalize_content_type)
            .is_some_and(|t| self.types.contains(&t))
    }

    /// Normalized members in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for AcceptedContentTypes {
    fn default() -> Self {
        Self::new(["image/jpeg", "image/png"])
    }
}

impl fmt::Display for AcceptedContentTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}

/// File extension used for a stored body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Jpg,
    Png,
}

impl ImageType {
    /// Map a content type to an extension. Anything that is not PNG is `jpg`.
    pub fn from_content_type(raw: &str) -> Self {
        match normalize_content_type(raw).rsplit('/').next() {
            Some("png") => ImageType::Png,
            _ => ImageType::Jpg,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageType::Jpg => "jpg",
            ImageType::Png => "png",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
