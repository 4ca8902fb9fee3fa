//! Reddit listing source.
//!
//! Requests `https://www.reddit.com/r/<feed>/<sort>.json` and converts the
//! `Listing` of `t3` children into candidates. Posts without a preview image
//! carry no dimensions and are skipped.

use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use super::types::{ListingError, ListingPage, ListingQuery, ListingSource};
use crate::candidate::{Candidate, Dimensions};
use crate::http::AsyncHttpClient;

/// Default API origin.
pub const REDDIT_BASE_URL: &str = "https://www.reddit.com";

/// Page size requested from the API. Reddit caps listings at 100.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct Thing<T> {
    kind: String,
    data: T,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing<serde_json::Value>>,
    #[serde(default)]
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    subreddit: Option<String>,
    #[serde(default)]
    preview: Option<Preview>,
}

#[derive(Debug, Deserialize)]
struct Preview {
    #[serde(default)]
    images: Vec<PreviewImage>,
}

#[derive(Debug, Deserialize)]
struct PreviewImage {
    source: ImageSource,
}

#[derive(Debug, Deserialize)]
struct ImageSource {
    url: String,
    width: u32,
    height: u32,
}

/// Parse a raw listing body.
///
/// `feed` is recorded on candidates whose post does not name its subreddit.
pub fn parse_listing(body: &[u8], feed: &str) -> Result<ListingPage, ListingError> {
    let listing: Thing<ListingData> =
        serde_json::from_slice(body).map_err(|e| ListingError::Malformed(e.to_string()))?;

    if listing.kind != "Listing" {
        return Err(ListingError::Malformed(format!(
            "expected kind 'Listing', got '{}'",
            listing.kind
        )));
    }

    let candidates = listing
        .data
        .children
        .into_iter()
        .filter(|child| child.kind == "t3")
        .filter_map(|child| parse_post(child.data, feed))
        .collect();

    Ok(ListingPage {
        candidates,
        after: listing.data.after.filter(|token| !token.is_empty()),
    })
}

fn parse_post(data: serde_json::Value, feed: &str) -> Option<Candidate> {
    let post: Post = match serde_json::from_value(data) {
        Ok(post) => post,
        Err(e) => {
            debug!(feed = feed, error = %e, "Skipping unparsable post");
            return None;
        }
    };

    let Some(image) = post.preview.and_then(|p| p.images.into_iter().next()) else {
        trace!(feed = feed, title = %post.title, "Skipping post without preview");
        return None;
    };

    let subreddit = post.subreddit.unwrap_or_else(|| feed.to_string());
    Some(Candidate::new(
        post.title,
        image.source.url,
        Dimensions::new(image.source.width, image.source.height),
        subreddit,
    ))
}

/// [`ListingSource`] backed by the Reddit JSON API.
pub struct RedditListingSource<C> {
    client: C,
    base_url: String,
}

impl<C: AsyncHttpClient> RedditListingSource<C> {
    /// Source talking to [`REDDIT_BASE_URL`].
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, REDDIT_BASE_URL)
    }

    /// Source talking to a custom origin.
    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL of one listing page.
    pub fn page_url(
        &self,
        feed: &str,
        query: &ListingQuery,
        after: Option<&str>,
    ) -> Result<Url, ListingError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|()| ListingError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("r")
            .push(feed)
            .push(&format!("{}.json", query.sort().as_str()));

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("limit", &PAGE_SIZE.to_string());
            pairs.append_pair("raw_json", "1");
            if let Some(window) = query.window() {
                pairs.append_pair("t", window.as_str());
            }
            if let Some(after) = after {
                pairs.append_pair("after", after);
            }
        }

        Ok(url)
    }
}

impl<C: AsyncHttpClient> ListingSource for RedditListingSource<C> {
    async fn fetch_page(
        &self,
        feed: &str,
        query: &ListingQuery,
        after: Option<&str>,
    ) -> Result<ListingPage, ListingError> {
        let url = self.page_url(feed, query, after)?;
        let response = self.client.get(url.as_str()).await?;

        if !response.is_success() {
            return Err(ListingError::Status(response.status()));
        }

        let body = response.bytes().await?;
        parse_listing(&body, feed)
    }
}
