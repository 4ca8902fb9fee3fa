//! Discovered wallpaper references.
//!
//! A [`Candidate`] is an immutable description of one image found in a feed
//! listing. Its identity is its URL: two candidates with the same URL are
//! equal regardless of title or source feed, so the same image linked from
//! several subreddits collapses into a single entry when collected into a
//! set.

mod hash;
mod types;

pub use hash::ContentHash;
pub use types::{Candidate, Dimensions, DimensionsParseError};
