//! On-disk wallpaper cache.
//!
//! Entries are keyed by the [`ContentHash`](crate::candidate::ContentHash)
//! of the candidate URL and never expire or get deleted here.

mod content_type;
mod path;
mod stats;
mod store;
mod types;

pub use content_type::{normalize_content_type, AcceptedContentTypes, ImageType};
pub use path::{body_path, is_temp_file, sidecar_path, temp_sibling, SIDECAR_EXTENSION};
pub use stats::CacheStats;
pub use store::{CacheStore, MaterializeReport, StoreConfig};
pub use types::{CacheEntry, CacheError, CacheOutcome, CachedImage, Rejection};
