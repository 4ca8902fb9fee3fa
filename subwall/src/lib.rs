//! subwall - wallpapers from subreddits
//!
//! Discovers candidate images across several subreddits, keeps a
//! content-addressed local cache of the ones that pass the content-type
//! check, and picks one that matches the configured size and aspect ratio.
//!
//! # High-Level API
//!
//! ```ignore
//! use subwall::config::ConfigFile;
//! use subwall::pipeline::{prepare_output_dir, PipelineConfig, WallpaperPipeline};
//!
//! let config = PipelineConfig::from_config_file(&ConfigFile::load()?)?;
//! prepare_output_dir(&config.store.directory)?;
//!
//! let mut pipeline = WallpaperPipeline::reddit(config)?;
//! if let Some(wallpaper) = pipeline.choose().await {
//!     println!("{}", wallpaper.path().display());
//! }
//! ```

pub mod cache;
pub mod candidate;
pub mod config;
pub mod feed;
pub mod http;
pub mod logging;
pub mod pipeline;
pub mod selection;

/// Version of the subwall library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
