//! Explicit configuration handed to each pipeline component.

use std::path::Path;
use std::time::Duration;

use crate::cache::{AcceptedContentTypes, StoreConfig};
use crate::config::ConfigFile;
use crate::feed::{FetchConfig, ListingQuery};
use crate::http::DEFAULT_MAX_CONCURRENT;
use crate::selection::SelectionCriteria;

use super::PipelineError;

/// Everything the fetch → cache → select → choose run needs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub fetch: FetchConfig,
    pub store: StoreConfig,
    pub criteria: SelectionCriteria,
    /// Cap on in-flight requests across both network phases.
    pub max_concurrent: usize,
}

impl PipelineConfig {
    /// Defaults with the given feeds and cache directory.
    pub fn new(feeds: Vec<String>, directory: &Path) -> Self {
        Self {
            fetch: FetchConfig {
                feeds,
                ..Default::default()
            },
            store: StoreConfig::new(directory),
            criteria: SelectionCriteria::any(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    /// Validate a loaded configuration file.
    ///
    /// Fails on an invalid sort/window pair or an empty feed list, before
    /// any I/O happens.
    pub fn from_config_file(config: &ConfigFile) -> Result<Self, PipelineError> {
        let query = ListingQuery::new(config.reddit.sorting, config.reddit.time)?;
        if config.reddit.subreddits.is_empty() {
            return Err(PipelineError::NoFeeds);
        }

        let criteria = SelectionCriteria {
            size: config.wallpaper.size,
            ratio: config.wallpaper.aspect_ratio,
        };
        let prefilter =
            (config.wallpaper.prefilter && !criteria.is_unconstrained()).then_some(criteria);

        Ok(Self {
            fetch: FetchConfig {
                feeds: config.reddit.subreddits.clone(),
                query,
                result_limit: config.reddit.result_limit,
                prefilter,
            },
            store: StoreConfig {
                directory: config.wallpaper.output_folder.clone(),
                accepted: config.download.accepted_content_types.clone(),
                request_timeout: Duration::from_secs(config.download.timeout),
            },
            criteria,
            max_concurrent: config.download.max_concurrent,
        })
    }

    pub fn with_criteria(mut self, criteria: SelectionCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_accepted(mut self, accepted: AcceptedContentTypes) -> Self {
        self.store.accepted = accepted;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{QueryError, SortMode, TimeWindow};

    #[test]
    fn test_from_default_config_file() {
        let config = PipelineConfig::from_config_file(&ConfigFile::default()).unwrap();

        assert_eq!(config.fetch.feeds.len(), 5);
        assert_eq!(config.fetch.query.sort(), SortMode::Hot);
        assert_eq!(config.fetch.query.window(), None);
        assert_eq!(config.fetch.prefilter, Some(config.criteria));
        assert_eq!(config.store.request_timeout, Duration::from_secs(10));
        assert_eq!(config.max_concurrent, 5);
    }

    #[test]
    fn test_prefilter_disabled() {
        let mut file = ConfigFile::default();
        file.wallpaper.prefilter = false;
        let config = PipelineConfig::from_config_file(&file).unwrap();
        assert_eq!(config.fetch.prefilter, None);
        assert!(config.criteria.size.is_some());
    }

    #[test]
    fn test_unconstrained_has_no_prefilter() {
        let mut file = ConfigFile::default();
        file.wallpaper.size = None;
        file.wallpaper.aspect_ratio = None;
        let config = PipelineConfig::from_config_file(&file).unwrap();
        assert_eq!(config.fetch.prefilter, None);
    }

    #[test]
    fn test_top_keeps_window() {
        let mut file = ConfigFile::default();
        file.reddit.sorting = SortMode::Top;
        file.reddit.time = Some(TimeWindow::Month);
        let config = PipelineConfig::from_config_file(&file).unwrap();
        assert_eq!(config.fetch.query.window(), Some(TimeWindow::Month));
    }

    #[test]
    fn test_invalid_query_rejected() {
        let mut file = ConfigFile::default();
        file.reddit.sorting = SortMode::Top;
        file.reddit.time = None;
        assert!(matches!(
            PipelineConfig::from_config_file(&file),
            Err(PipelineError::Query(QueryError::MissingWindow(SortMode::Top)))
        ));
    }

    #[test]
    fn test_no_feeds_rejected() {
        let mut file = ConfigFile::default();
        file.reddit.subreddits.clear();
        assert!(matches!(
            PipelineConfig::from_config_file(&file),
            Err(PipelineError::NoFeeds)
        ));
    }
}
