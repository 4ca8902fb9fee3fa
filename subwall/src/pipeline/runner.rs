//! The fetch → cache → select → choose run.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use super::{PipelineConfig, PipelineError};
use crate::cache::{CacheStore, CachedImage};
use crate::feed::{ListingFetcher, ListingSource, RedditListingSource};
use crate::http::{AsyncHttpClient, HttpConcurrencyLimiter, ReqwestClient};
use crate::selection::{Chooser, SelectionFilter};

/// Counts from the last [`WallpaperPipeline::collect`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub candidates: usize,
    pub hits: usize,
    pub downloaded: usize,
    pub rejected: usize,
    pub failed: usize,
    pub eligible: usize,
}

/// Wires the listing fetcher, cache store, selection filter and chooser
/// around one shared request limiter.
pub struct WallpaperPipeline<S, C> {
    fetcher: ListingFetcher<S>,
    store: CacheStore<C>,
    filter: SelectionFilter,
    chooser: Chooser,
    limiter: Arc<HttpConcurrencyLimiter>,
}

impl WallpaperPipeline<RedditListingSource<ReqwestClient>, ReqwestClient> {
    /// Production pipeline talking to Reddit over reqwest.
    pub fn reddit(config: PipelineConfig) -> Result<Self, PipelineError> {
        let client = ReqwestClient::with_timeout(config.store.request_timeout)?;
        let source = RedditListingSource::new(client.clone());
        Ok(Self::new(Arc::new(source), Arc::new(client), config))
    }
}

impl<S, C> WallpaperPipeline<S, C>
where
    S: ListingSource + 'static,
    C: AsyncHttpClient + 'static,
{
    pub fn new(source: Arc<S>, client: Arc<C>, config: PipelineConfig) -> Self {
        let limiter = Arc::new(HttpConcurrencyLimiter::new(config.max_concurrent));
        let filter = SelectionFilter::new(config.criteria, config.store.accepted.clone());

        Self {
            fetcher: ListingFetcher::new(source, Arc::clone(&limiter), config.fetch),
            store: CacheStore::new(client, Arc::clone(&limiter), config.store),
            filter,
            chooser: Chooser::new(),
            limiter,
        }
    }

    /// Replace the chooser, e.g. with a seeded one.
    pub fn with_chooser(mut self, chooser: Chooser) -> Self {
        self.chooser = chooser;
        self
    }

    pub fn limiter(&self) -> &HttpConcurrencyLimiter {
        &self.limiter
    }

    /// Fetch listings, materialize every candidate and keep the qualifying ones.
    pub async fn collect(&self) -> (Vec<CachedImage>, RunSummary) {
        let candidates = self.fetcher.fetch().await;
        let total = candidates.len();

        let report = self.store.materialize_all(candidates).await;
        let eligible = self.filter.select(report.cached).await;

        let summary = RunSummary {
            candidates: total,
            hits: report.hits,
            downloaded: report.downloaded,
            rejected: report.rejected,
            failed: report.failed,
            eligible: eligible.len(),
        };
        (eligible, summary)
    }

    /// Run the whole pipeline and pick one wallpaper.
    ///
    /// `None` means nothing qualified; that is not an error.
    pub async fn choose(&mut self) -> Option<CachedImage> {
        let (eligible, summary) = self.collect().await;
        info!(
            candidates = summary.candidates,
            eligible = summary.eligible,
            peak_requests = self.limiter.peak_in_flight(),
            "Pipeline finished"
        );

        let chosen = self.chooser.choose(&eligible).cloned();
        match &chosen {
            Some(image) => info!(
                title = image.candidate().title(),
                path = %image.path().display(),
                "Wallpaper chosen"
            ),
            None => warn!("No wallpaper available"),
        }
        chosen
    }
}

/// Create the cache directory if missing.
///
/// Fails if the path exists and is not a directory.
pub fn prepare_output_dir(path: &Path) -> Result<(), PipelineError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(PipelineError::NotADirectory(path.to_path_buf()));
    }

    std::fs::create_dir_all(path).map_err(|source| PipelineError::OutputDir {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Created output directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_creates_missing_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");
        prepare_output_dir(&dir).unwrap();
        assert!(dir.is_dir());
        // Existing directory is fine
        prepare_output_dir(&dir).unwrap();
    }

    #[test]
    fn test_prepare_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("walls");
        std::fs::write(&file, b"").unwrap();
        assert!(matches!(
            prepare_output_dir(&file),
            Err(PipelineError::NotADirectory(_))
        ));
    }
}
