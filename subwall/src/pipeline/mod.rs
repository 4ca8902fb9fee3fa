//! End-to-end wallpaper run.
//!
//! Phases are sequential: every listing is resolved before caching starts,
//! and every candidate is cached before selection. Each phase is fully
//! concurrent. Only configuration and setup errors surface as
//! [`PipelineError`]; per-feed and per-candidate failures are logged and
//! skipped.

mod config;
mod runner;

use std::path::PathBuf;

use thiserror::Error;

use crate::feed::QueryError;
use crate::http::HttpError;

pub use config::PipelineConfig;
pub use runner::{prepare_output_dir, RunSummary, WallpaperPipeline};

/// Setup errors that stop the pipeline before any network I/O.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid listing query: {0}")]
    Query(#[from] QueryError),

    #[error("no subreddits configured")]
    NoFeeds,

    #[error("output path {0} exists and is not a directory")]
    NotADirectory(PathBuf),

    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Http(#[from] HttpError),
}
