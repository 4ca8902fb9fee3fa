//! Concurrent multi-feed pagination.
//!
//! One task per feed walks pages until the per-feed target is reached or the
//! listing runs out. Every page request holds a permit from the shared
//! [`HttpConcurrencyLimiter`]. Results are unioned into a single set behind
//! an async mutex, so the same URL seen in two feeds yields one candidate.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::types::{ListingQuery, ListingSource};
use crate::candidate::Candidate;
use crate::http::HttpConcurrencyLimiter;
use crate::selection::SelectionCriteria;

/// Default per-feed result target.
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// What to fetch.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Feed names, fetched concurrently.
    pub feeds: Vec<String>,
    pub query: ListingQuery,
    /// Per-feed target. Pagination stops once this many entries were parsed.
    pub result_limit: usize,
    /// Declared-dimension hint applied before anything is downloaded.
    pub prefilter: Option<SelectionCriteria>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            feeds: Vec::new(),
            query: ListingQuery::default(),
            result_limit: DEFAULT_RESULT_LIMIT,
            prefilter: None,
        }
    }
}

/// Per-feed result, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FeedSummary {
    feed: String,
    pages: usize,
    /// Entries parsed across all pages.
    parsed: usize,
    /// Entries that passed the prefilter.
    kept: usize,
    /// True when a page failed and pagination stopped early.
    aborted: bool,
}

/// Fetches candidates from every configured feed.
pub struct ListingFetcher<S> {
    source: Arc<S>,
    limiter: Arc<HttpConcurrencyLimiter>,
    config: FetchConfig,
}

impl<S: ListingSource + 'static> ListingFetcher<S> {
    pub fn new(source: Arc<S>, limiter: Arc<HttpConcurrencyLimiter>, config: FetchConfig) -> Self {
        Self {
            source,
            limiter,
            config,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Walk every feed and return the deduplicated union.
    ///
    /// Feed failures are logged and never returned.
    pub async fn fetch(&self) -> HashSet<Candidate> {
        let results = Arc::new(Mutex::new(HashSet::new()));
        let mut tasks = JoinSet::new();

        info!(
            feeds = self.config.feeds.len(),
            query = %self.config.query,
            limit = self.config.result_limit,
            "Fetching listings"
        );

        for feed in &self.config.feeds {
            tasks.spawn(fetch_feed(
                Arc::clone(&self.source),
                Arc::clone(&self.limiter),
                feed.clone(),
                self.config.query,
                self.config.result_limit,
                self.config.prefilter,
                Arc::clone(&results),
            ));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(summary) => debug!(
                    feed = %summary.feed,
                    pages = summary.pages,
                    parsed = summary.parsed,
                    kept = summary.kept,
                    aborted = summary.aborted,
                    "Feed finished"
                ),
                Err(e) => warn!(error = %e, "Feed task panicked"),
            }
        }

        let candidates = match Arc::try_unwrap(results) {
            Ok(set) => set.into_inner(),
            Err(shared) => shared.lock().await.clone(),
        };

        info!(candidates = candidates.len(), "Listings fetched");
        candidates
    }
}

async fn fetch_feed<S: ListingSource>(
    source: Arc<S>,
    limiter: Arc<HttpConcurrencyLimiter>,
    feed: String,
    query: ListingQuery,
    limit: usize,
    prefilter: Option<SelectionCriteria>,
    results: Arc<Mutex<HashSet<Candidate>>>,
) -> FeedSummary {
    let mut summary = FeedSummary {
        feed: feed.clone(),
        pages: 0,
        parsed: 0,
        kept: 0,
        aborted: false,
    };
    let mut after: Option<String> = None;

    info!(feed = %feed, query = %query, "Fetching feed");

    loop {
        let page = {
            let _permit = match limiter.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    warn!(feed = %feed, error = %e, "Cannot acquire request permit");
                    summary.aborted = true;
                    break;
                }
            };
            source.fetch_page(&feed, &query, after.as_deref()).await
        };

        let page = match page {
            Ok(page) => page,
            Err(e) => {
                warn!(feed = %feed, page = summary.pages + 1, error = %e, "Listing page failed, stopping feed");
                summary.aborted = true;
                break;
            }
        };

        summary.pages += 1;
        summary.parsed += page.candidates.len();

        let kept: Vec<Candidate> = page
            .candidates
            .into_iter()
            .filter(|c| prefilter.map_or(true, |criteria| criteria.fits(c.declared())))
            .collect();
        summary.kept += kept.len();

        results.lock().await.extend(kept);

        match page.after {
            Some(token) if summary.parsed < limit => after = Some(token),
            _ => break,
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Dimensions;
    use crate::feed::types::{ListingError, ListingPage};
    use crate::http::HttpError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Pages keyed by (feed, after-token).
    #[derive(Default)]
    struct MockSource {
        pages: std::sync::Mutex<HashMap<(String, Option<String>), Result<ListingPage, u16>>>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        delay: Option<Duration>,
    }

    impl MockSource {
        fn page(&self, feed: &str, after: Option<&str>, urls: &[&str], next: Option<&str>) {
            let candidates = urls
                .iter()
                .map(|url| Candidate::new(*url, *url, Dimensions::new(1920, 1080), feed))
                .collect();
            self.pages.lock().unwrap().insert(
                (feed.to_string(), after.map(str::to_string)),
                Ok(ListingPage {
                    candidates,
                    after: next.map(str::to_string),
                }),
            );
        }

        fn sized_page(
            &self,
            feed: &str,
            after: Option<&str>,
            entries: &[(&str, Dimensions)],
            next: Option<&str>,
        ) {
            let candidates = entries
                .iter()
                .map(|(url, dims)| Candidate::new(*url, *url, *dims, feed))
                .collect();
            self.pages.lock().unwrap().insert(
                (feed.to_string(), after.map(str::to_string)),
                Ok(ListingPage {
                    candidates,
                    after: next.map(str::to_string),
                }),
            );
        }

        fn fail(&self, feed: &str, after: Option<&str>, status: u16) {
            self.pages
                .lock()
                .unwrap()
                .insert((feed.to_string(), after.map(str::to_string)), Err(status));
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ListingSource for MockSource {
        async fn fetch_page(
            &self,
            feed: &str,
            _query: &ListingQuery,
            after: Option<&str>,
        ) -> Result<ListingPage, ListingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let key = (feed.to_string(), after.map(str::to_string));
            let entry = self.pages.lock().unwrap().get(&key).cloned();
            match entry {
                Some(Ok(page)) => Ok(page),
                Some(Err(status)) => Err(ListingError::Status(status)),
                None => Err(ListingError::Http(HttpError::Transport("no route".into()))),
            }
        }
    }

    fn fetcher(source: Arc<MockSource>, feeds: &[&str], limit: usize) -> ListingFetcher<MockSource> {
        ListingFetcher::new(
            source,
            Arc::new(HttpConcurrencyLimiter::new(5)),
            FetchConfig {
                feeds: feeds.iter().map(|f| f.to_string()).collect(),
                result_limit: limit,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_same_url_in_two_feeds_collapses() {
        let source = Arc::new(MockSource::default());
        source.page("spaceporn", None, &["https://a", "https://shared"], None);
        source.page("skyporn", None, &["https://b", "https://shared"], None);

        let found = fetcher(Arc::clone(&source), &["spaceporn", "skyporn"], 10)
            .fetch()
            .await;

        assert_eq!(found.len(), 3);
        assert!(found.iter().any(|c| c.url() == "https://shared"));
    }

    #[tokio::test]
    async fn test_pagination_stops_at_limit() {
        let source = Arc::new(MockSource::default());
        source.page("f", None, &["u1", "u2"], Some("p2"));
        source.page("f", Some("p2"), &["u3", "u4"], Some("p3"));
        source.page("f", Some("p3"), &["u5", "u6"], Some("p4"));

        let found = fetcher(Arc::clone(&source), &["f"], 3).fetch().await;

        assert_eq!(found.len(), 4);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_pagination_stops_without_token() {
        let source = Arc::new(MockSource::default());
        source.page("f", None, &["u1"], Some("p2"));
        source.page("f", Some("p2"), &["u2"], None);

        let found = fetcher(Arc::clone(&source), &["f"], 100).fetch().await;

        assert_eq!(found.len(), 2);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_page_keeps_earlier_pages() {
        let source = Arc::new(MockSource::default());
        source.page("f", None, &["u1", "u2"], Some("p2"));
        source.fail("f", Some("p2"), 503);
        source.page("ok", None, &["u3"], None);

        let found = fetcher(Arc::clone(&source), &["f", "ok"], 100).fetch().await;

        let urls: HashSet<&str> = found.iter().map(Candidate::url).collect();
        assert_eq!(urls, HashSet::from(["u1", "u2", "u3"]));
    }

    #[tokio::test]
    async fn test_failed_first_page_yields_nothing_for_feed() {
        let source = Arc::new(MockSource::default());
        source.fail("private", None, 403);

        let found = fetcher(Arc::clone(&source), &["private"], 10).fetch().await;
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_prefilter_drops_undersized_entries() {
        let source = Arc::new(MockSource::default());
        source.sized_page(
            "f",
            None,
            &[
                ("big", Dimensions::new(3840, 2160)),
                ("small", Dimensions::new(800, 600)),
            ],
            None,
        );

        let fetcher = ListingFetcher::new(
            Arc::clone(&source),
            Arc::new(HttpConcurrencyLimiter::new(5)),
            FetchConfig {
                feeds: vec!["f".to_string()],
                result_limit: 10,
                prefilter: Some(SelectionCriteria::any().with_size(Dimensions::new(1920, 1080))),
                ..Default::default()
            },
        );
        let found = fetcher.fetch().await;

        assert_eq!(found.len(), 1);
        assert!(found.iter().all(|c| c.url() == "big"));
    }

    #[tokio::test]
    async fn test_prefiltered_entries_count_toward_limit() {
        let source = Arc::new(MockSource::default());
        source.sized_page(
            "f",
            None,
            &[
                ("a", Dimensions::new(800, 600)),
                ("b", Dimensions::new(1024, 768)),
                ("c", Dimensions::new(640, 480)),
            ],
            Some("p2"),
        );
        source.sized_page("f", Some("p2"), &[("big", Dimensions::new(3840, 2160))], None);

        let fetcher = ListingFetcher::new(
            Arc::clone(&source),
            Arc::new(HttpConcurrencyLimiter::new(5)),
            FetchConfig {
                feeds: vec!["f".to_string()],
                result_limit: 3,
                prefilter: Some(SelectionCriteria::any().with_size(Dimensions::new(1920, 1080))),
                ..Default::default()
            },
        );
        let found = fetcher.fetch().await;

        // Three parsed entries reach the limit even though none were kept
        assert_eq!(source.calls(), 1);
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_concurrency_cap_across_feeds() {
        let source = Arc::new(MockSource {
            delay: Some(Duration::from_millis(10)),
            ..Default::default()
        });
        let feeds: Vec<String> = (0..12).map(|i| format!("feed{i}")).collect();
        for feed in &feeds {
            source.page(feed, None, &[feed.as_str()], None);
        }

        let limiter = Arc::new(HttpConcurrencyLimiter::new(2));
        let fetcher = ListingFetcher::new(
            Arc::clone(&source),
            Arc::clone(&limiter),
            FetchConfig {
                feeds,
                ..Default::default()
            },
        );
        let found = fetcher.fetch().await;

        assert_eq!(found.len(), 12);
        assert!(source.peak.load(Ordering::SeqCst) <= 2);
        assert!(limiter.peak_in_flight() <= 2);
    }
}
