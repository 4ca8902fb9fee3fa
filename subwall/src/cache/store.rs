//! Content-addressed wallpaper store.
//!
//! Each candidate maps to two files in the cache directory:
//!
//! ```text
//! {cache_dir}/{hash}.json          metadata sidecar
//! {cache_dir}/{hash}.{jpg|png}     raw body
//! ```
//!
//! The sidecar is the only cache-hit signal. The body is always published
//! before the sidecar, both via a temporary sibling that is flushed, synced
//! and renamed into place, so a reader never sees a partial file and an
//! interrupted download simply looks like a miss on the next run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::content_type::{normalize_content_type, AcceptedContentTypes, ImageType};
use super::path::{body_path, sidecar_path, temp_sibling};
use super::types::{CacheEntry, CacheError, CacheOutcome, CachedImage, Rejection};
use crate::candidate::Candidate;
use crate::http::{
    AsyncHttpClient, BodyStream, HttpConcurrencyLimiter, HttpError, DEFAULT_REQUEST_TIMEOUT,
};

/// Where and what to store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Cache directory. Must already exist.
    pub directory: PathBuf,
    pub accepted: AcceptedContentTypes,
    /// Upper bound on one download, request and body included.
    pub request_timeout: Duration,
}

impl StoreConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            accepted: AcceptedContentTypes::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Totals from [`CacheStore::materialize_all`].
#[derive(Debug, Default)]
pub struct MaterializeReport {
    /// Candidates with a valid entry on disk, hits and downloads alike.
    pub cached: Vec<CachedImage>,
    pub hits: usize,
    pub downloaded: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Disk-backed store that downloads on miss.
///
/// Cloning is cheap; clones share the client, limiter and configuration.
pub struct CacheStore<C> {
    client: Arc<C>,
    limiter: Arc<HttpConcurrencyLimiter>,
    config: Arc<StoreConfig>,
}

impl<C> Clone for CacheStore<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            limiter: Arc::clone(&self.limiter),
            config: Arc::clone(&self.config),
        }
    }
}

impl<C: AsyncHttpClient + 'static> CacheStore<C> {
    pub fn new(client: Arc<C>, limiter: Arc<HttpConcurrencyLimiter>, config: StoreConfig) -> Self {
        Self {
            client,
            limiter,
            config: Arc::new(config),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Ensure a valid entry exists for `candidate`.
    ///
    /// On a hit no request is made. On a miss the body is fetched under a
    /// limiter permit and persisted body-first. Rejections and errors leave
    /// no files behind.
    pub async fn materialize(&self, candidate: Candidate) -> Result<CacheOutcome, CacheError> {
        let hash = candidate.content_hash();
        let sidecar = sidecar_path(&self.config.directory, hash);

        if let Some(entry) = read_sidecar(&sidecar).await? {
            debug!(url = candidate.url(), hash = %hash, "Cache hit");
            return Ok(CacheOutcome::Hit(CachedImage::new(
                candidate,
                entry,
                &self.config.directory,
            )));
        }

        let _permit = self.limiter.acquire().await?;
        match tokio::time::timeout(self.config.request_timeout, self.download(candidate, &sidecar))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(CacheError::Http(HttpError::Timeout)),
        }
    }

    async fn download(
        &self,
        candidate: Candidate,
        sidecar: &Path,
    ) -> Result<CacheOutcome, CacheError> {
        debug!(url = candidate.url(), "Cache miss, downloading");
        let response = self.client.get(candidate.url()).await?;

        if !self.config.accepted.accepts(response.content_type()) {
            let rejection = Rejection::ContentType(response.content_type().map(str::to_string));
            debug!(url = candidate.url(), reason = %rejection, "Rejected");
            return Ok(CacheOutcome::Rejected(rejection));
        }

        if !response.is_success() {
            warn!(url = candidate.url(), status = response.status(), "Bad status code");
            return Ok(CacheOutcome::Rejected(Rejection::Status(response.status())));
        }

        let content_type = normalize_content_type(response.content_type().unwrap_or_default());
        let image_type = ImageType::from_content_type(&content_type);
        let entry = CacheEntry::new(
            &candidate,
            content_type,
            response.content_length(),
            image_type,
        );

        let body = body_path(&self.config.directory, candidate.content_hash(), image_type);
        let written = write_body(&body, response.into_body()).await?;
        write_sidecar(sidecar, &entry).await?;

        debug!(url = candidate.url(), path = %body.display(), bytes = written, "Stored");
        Ok(CacheOutcome::Downloaded(CachedImage::new(
            candidate,
            entry,
            &self.config.directory,
        )))
    }

    /// Materialize every candidate concurrently.
    ///
    /// Per-candidate failures are logged and counted, never returned.
    pub async fn materialize_all<I>(&self, candidates: I) -> MaterializeReport
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut tasks = JoinSet::new();
        for candidate in candidates {
            let store = self.clone();
            tasks.spawn(async move {
                let url = candidate.url().to_string();
                (url, store.materialize(candidate).await)
            });
        }

        let mut report = MaterializeReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(CacheOutcome::Hit(image)))) => {
                    report.hits += 1;
                    report.cached.push(image);
                }
                Ok((_, Ok(CacheOutcome::Downloaded(image)))) => {
                    report.downloaded += 1;
                    report.cached.push(image);
                }
                Ok((_, Ok(CacheOutcome::Rejected(_)))) => report.rejected += 1,
                Ok((url, Err(e))) => {
                    warn!(url = %url, error = %e, "Failed to cache wallpaper");
                    report.failed += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Cache task panicked");
                    report.failed += 1;
                }
            }
        }

        info!(
            hits = report.hits,
            downloaded = report.downloaded,
            rejected = report.rejected,
            failed = report.failed,
            "Wallpapers stored"
        );
        report
    }
}

async fn read_sidecar(path: &Path) -> Result<Option<CacheEntry>, CacheError> {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::io(path, e)),
    };

    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|source| CacheError::Sidecar {
            path: path.to_path_buf(),
            source,
        })
}

/// Temp sibling of a cache file, renamed into place on success.
///
/// Error paths call [`PendingFile::discard`]. `Drop` only handles a write
/// cancelled mid-flight, such as by the download timeout, and unlinks
/// synchronously since it cannot await.
struct PendingFile {
    path: PathBuf,
    settled: bool,
}

impl PendingFile {
    fn new(target: &Path) -> Self {
        Self {
            path: temp_sibling(target),
            settled: false,
        }
    }

    async fn persist(mut self, target: &Path) -> Result<(), CacheError> {
        let renamed = tokio::fs::rename(&self.path, target).await;
        if let Err(e) = renamed {
            self.discard().await;
            return Err(CacheError::io(target, e));
        }
        self.settled = true;
        Ok(())
    }

    async fn discard(mut self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => debug!(path = %self.path.display(), error = %e, "Failed to remove temp file"),
        }
        self.settled = true;
    }

    /// Write `body` to the temp file, flushed and synced.
    async fn fill(&self, mut body: BodyStream) -> Result<u64, CacheError> {
        let mut file = tokio::fs::File::create(&self.path)
            .await
            .map_err(|e| CacheError::io(&self.path, e))?;

        let mut written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| CacheError::io(&self.path, e))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| CacheError::io(&self.path, e))?;
        file.sync_all()
            .await
            .map_err(|e| CacheError::io(&self.path, e))?;
        Ok(written)
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.settled {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Publish `body` at `target` via a temp sibling.
async fn publish(target: &Path, body: BodyStream) -> Result<u64, CacheError> {
    let pending = PendingFile::new(target);
    let filled = pending.fill(body).await;
    match filled {
        Ok(written) => {
            pending.persist(target).await?;
            Ok(written)
        }
        Err(e) => {
            pending.discard().await;
            Err(e)
        }
    }
}

async fn write_body(target: &Path, body: BodyStream) -> Result<u64, CacheError> {
    publish(target, body).await
}

async fn write_sidecar(target: &Path, entry: &CacheEntry) -> Result<(), CacheError> {
    let json = serde_json::to_vec_pretty(entry).map_err(|source| CacheError::Sidecar {
        path: target.to_path_buf(),
        source,
    })?;

    let body = futures::stream::once(async move { Ok(Bytes::from(json)) }).boxed();
    publish(target, body).await.map(|_| ())
}
