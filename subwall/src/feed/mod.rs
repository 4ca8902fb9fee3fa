//! Listing discovery.
//!
//! - [`ListingSource`] fetches one page of one feed
//! - [`RedditListingSource`] implements it over the Reddit JSON API
//! - [`ListingFetcher`] paginates every configured feed concurrently and
//!   returns the deduplicated candidate set

mod fetcher;
mod reddit;
mod types;

pub use fetcher::{FetchConfig, ListingFetcher, DEFAULT_RESULT_LIMIT};
pub use reddit::{parse_listing, RedditListingSource, PAGE_SIZE, REDDIT_BASE_URL};
pub use types::{
    ListingError, ListingPage, ListingQuery, ListingSource, QueryError, SortMode, TimeWindow,
};
