//! User configuration.
//!
//! [`ConfigFile`] is loaded from an INI file and overlays the defaults; the
//! pipeline never reads it directly but receives an explicit
//! [`PipelineConfig`](crate::pipeline::PipelineConfig) built from it.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    default_output_folder, DEFAULT_ASPECT_RATIO, DEFAULT_DOWNLOAD_TIMEOUT_SECS, DEFAULT_SIZE,
    DEFAULT_SORTING, DEFAULT_SUBREDDITS, DEFAULT_TIME, MAX_MAX_CONCURRENT, MIN_MAX_CONCURRENT,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, DownloadSettings, LoggingSettings, RedditSettings, WallpaperSettings};
