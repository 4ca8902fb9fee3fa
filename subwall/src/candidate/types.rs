//! Candidate and dimension types.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

use super::hash::ContentHash;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height, or `None` for a zero height.
    pub fn ratio(&self) -> Option<f64> {
        if self.height == 0 {
            return None;
        }
        Some(f64::from(self.width) / f64::from(self.height))
    }

    /// True if both sides are at least as large as `other`.
    pub fn covers(&self, other: &Dimensions) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error parsing a `WIDTHxHEIGHT` string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{input}' - expected format like '1920x1080'")]
pub struct DimensionsParseError {
    input: String,
}

impl FromStr for Dimensions {
    type Err = DimensionsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DimensionsParseError {
            input: s.to_string(),
        };

        let (width, height) = s.trim().split_once(['x', 'X']).ok_or_else(err)?;
        let width = width.trim().parse().map_err(|_| err())?;
        let height = height.trim().parse().map_err(|_| err())?;

        Ok(Self { width, height })
    }
}

/// A discovered, not-yet-validated image reference.
///
/// Equality and hashing only consider the URL.
#[derive(Debug, Clone)]
pub struct Candidate {
    title: String,
    url: String,
    declared: Dimensions,
    feed: String,
}

impl Candidate {
    /// Create a candidate from listing metadata.
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        declared: Dimensions,
        feed: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            declared,
            feed: feed.into(),
        }
    }

    /// Display title from the listing.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Canonical resource URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Dimensions reported by the feed's preview metadata.
    pub fn declared(&self) -> Dimensions {
        self.declared
    }

    /// Name of the feed this candidate was discovered under.
    pub fn feed(&self) -> &str {
        &self.feed
    }

    /// Storage key for this candidate.
    pub fn content_hash(&self) -> ContentHash {
        ContentHash::of(&self.url)
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Candidate {}

impl Hash for Candidate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - [{}]", self.title, self.url, self.declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_url_different_metadata_is_equal() {
        let a = Candidate::new("Nebula", "https://i.redd.it/x.jpg", Dimensions::new(10, 10), "spaceporn");
        let b = Candidate::new("Clouds", "https://i.redd.it/x.jpg", Dimensions::new(20, 20), "skyporn");

        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_different_urls_not_equal() {
        let a = Candidate::new("A", "https://i.redd.it/a.jpg", Dimensions::new(1, 1), "f");
        let b = Candidate::new("A", "https://i.redd.it/b.jpg", Dimensions::new(1, 1), "f");
        assert_ne!(a, b);
    }

    #[test]
    fn test_content_hash_follows_url() {
        let a = Candidate::new("A", "https://i.redd.it/a.jpg", Dimensions::new(1, 1), "one");
        let b = Candidate::new("B", "https://i.redd.it/a.jpg", Dimensions::new(2, 2), "two");
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_dimensions_parse() {
        assert_eq!("1920x1080".parse(), Ok(Dimensions::new(1920, 1080)));
        assert_eq!(" 2560 X 1440 ".parse(), Ok(Dimensions::new(2560, 1440)));
        assert!("1920".parse::<Dimensions>().is_err());
        assert!("axb".parse::<Dimensions>().is_err());
        assert!("-1x10".parse::<Dimensions>().is_err());
    }

    #[test]
    fn test_dimensions_ratio() {
        assert_eq!(Dimensions::new(0, 0).ratio(), None);
        let ratio = Dimensions::new(1920, 1080).ratio().unwrap();
        assert!((ratio - 16.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_dimensions_covers() {
        let target = Dimensions::new(1920, 1080);
        assert!(Dimensions::new(1920, 1080).covers(&target));
        assert!(Dimensions::new(3840, 2160).covers(&target));
        assert!(!Dimensions::new(1920, 1079).covers(&target));
        assert!(!Dimensions::new(1280, 2000).covers(&target));
    }
}
