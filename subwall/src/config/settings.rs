//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::cache::AcceptedContentTypes;
use crate::candidate::Dimensions;
use crate::feed::{SortMode, TimeWindow};
use crate::selection::AspectRatio;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Feed selection
    pub reddit: RedditSettings,
    /// Wallpaper constraints and storage
    pub wallpaper: WallpaperSettings,
    /// Download behavior
    pub download: DownloadSettings,
    /// Log output
    pub logging: LoggingSettings,
}

/// `[reddit]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RedditSettings {
    /// Subreddit names, without the `r/` prefix
    pub subreddits: Vec<String>,
    /// Per-subreddit result target
    pub result_limit: usize,
    pub sorting: SortMode,
    /// Only sent for `top` and `controversial`
    pub time: Option<TimeWindow>,
}

/// `[wallpaper]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct WallpaperSettings {
    /// Minimum size; `None` disables the constraint
    pub size: Option<Dimensions>,
    /// Exact ratio; `None` disables the constraint
    pub aspect_ratio: Option<AspectRatio>,
    /// Cache directory for bodies and sidecars
    pub output_folder: PathBuf,
    /// Drop candidates whose declared dimensions already fail the constraints
    pub prefilter: bool,
}

/// `[download]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    pub accepted_content_types: AcceptedContentTypes,
    /// In-flight request cap shared by listing and image downloads
    pub max_concurrent: usize,
    /// Per-request timeout in seconds
    pub timeout: u64,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggingSettings {
    /// Optional log file, in addition to stderr
    pub file: Option<PathBuf>,
}
