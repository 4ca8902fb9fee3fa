//! Global HTTP concurrency limiter.
//!
//! A single limiter is shared by the listing fetcher and the cache store so
//! that the total number of in-flight requests stays under one cap across
//! both pipeline phases.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use subwall::http::HttpConcurrencyLimiter;
//!
//! let limiter = Arc::new(HttpConcurrencyLimiter::new(5));
//!
//! async fn download(limiter: Arc<HttpConcurrencyLimiter>) {
//!     let _permit = limiter.acquire().await?;
//!     // HTTP request happens here...
//!     // permit is released when _permit goes out of scope
//! }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Default maximum number of concurrent requests.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// The limiter was closed while waiting for a permit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP concurrency limiter closed")]
pub struct LimiterClosed;

/// Global limiter for HTTP request concurrency.
///
/// Wraps a Tokio semaphore and tracks in-flight and peak counts.
#[derive(Debug)]
pub struct HttpConcurrencyLimiter {
    /// Semaphore controlling concurrent requests
    semaphore: Semaphore,

    /// Maximum permits (for stats/debugging)
    max_permits: usize,

    /// Current number of in-flight requests
    in_flight: AtomicUsize,

    /// Peak concurrent requests observed
    peak_in_flight: AtomicUsize,
}

impl HttpConcurrencyLimiter {
    /// Creates a new limiter. A cap of 0 is raised to 1.
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);

        Self {
            semaphore: Semaphore::new(max_concurrent),
            max_permits: max_concurrent,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Acquires a permit for an HTTP request, waiting if the cap is reached.
    ///
    /// The permit is released when dropped.
    pub async fn acquire(&self) -> Result<HttpPermit<'_>, LimiterClosed> {
        let permit = self.semaphore.acquire().await.map_err(|_| LimiterClosed)?;

        let current = self.in_flight.fetch_add(1, Ordering::Relaxed) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::Relaxed);

        Ok(HttpPermit {
            _permit: permit,
            in_flight: &self.in_flight,
        })
    }

    /// Returns the maximum number of concurrent requests allowed.
    pub fn max_concurrent(&self) -> usize {
        self.max_permits
    }

    /// Returns the current number of in-flight HTTP requests.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns the peak number of concurrent requests observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::Relaxed)
    }

    /// Returns the number of available permits.
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for HttpConcurrencyLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}

/// A permit for making an HTTP request.
///
/// While held, it counts against the global concurrency limit.
pub struct HttpPermit<'a> {
    _permit: SemaphorePermit<'a>,
    in_flight: &'a AtomicUsize,
}

impl Drop for HttpPermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_zero_is_raised_to_one() {
        let limiter = HttpConcurrencyLimiter::new(0);
        assert_eq!(limiter.max_concurrent(), 1);
        assert_eq!(limiter.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_permit_tracks_in_flight() {
        let limiter = HttpConcurrencyLimiter::new(2);

        let first = limiter.acquire().await.unwrap();
        assert_eq!(limiter.in_flight(), 1);
        assert_eq!(limiter.available_permits(), 1);

        let second = limiter.acquire().await.unwrap();
        assert_eq!(limiter.in_flight(), 2);
        assert_eq!(limiter.peak_in_flight(), 2);

        drop(first);
        drop(second);
        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.available_permits(), 2);
        assert_eq!(limiter.peak_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_cap_is_never_exceeded() {
        let limiter = Arc::new(HttpConcurrencyLimiter::new(3));
        let mut tasks = tokio::task::JoinSet::new();

        for _ in 0..20 {
            let limiter = Arc::clone(&limiter);
            tasks.spawn(async move {
                let _permit = limiter.acquire().await.unwrap();
                tokio::time::sleep(Duration::from_millis(5)).await;
            });
        }
        while tasks.join_next().await.is_some() {}

        assert!(limiter.peak_in_flight() <= 3);
        assert_eq!(limiter.in_flight(), 0);
    }
}
