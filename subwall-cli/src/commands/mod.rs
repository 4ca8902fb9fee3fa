//! CLI command implementations.
//!
//! - [`choose`] - Main command (fetch, cache, filter, print one path)
//! - [`config`] - Configuration management (init, path, show)
//! - [`cache`] - Cache inspection (stats)

pub mod cache;
pub mod choose;
pub mod config;
