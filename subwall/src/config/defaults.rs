//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::cache::AcceptedContentTypes;
use crate::candidate::Dimensions;
use crate::feed::{SortMode, TimeWindow, DEFAULT_RESULT_LIMIT};
use crate::http::DEFAULT_MAX_CONCURRENT;
use crate::selection::AspectRatio;

/// Subreddits fetched when none are configured.
pub const DEFAULT_SUBREDDITS: &[&str] = &["spaceporn", "skyporn", "earthporn", "wallpapers", "wallpaper"];

pub const DEFAULT_SORTING: SortMode = SortMode::Hot;
pub const DEFAULT_TIME: TimeWindow = TimeWindow::Day;

pub const DEFAULT_SIZE: Dimensions = Dimensions::new(1920, 1080);
pub const DEFAULT_ASPECT_RATIO: (u32, u32) = (16, 9);

/// Per-request download timeout in seconds.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 10;

pub const MIN_MAX_CONCURRENT: usize = 1;
pub const MAX_MAX_CONCURRENT: usize = 32;

/// Default cache directory: `<platform cache dir>/subwall`.
pub fn default_output_folder() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("subwall")
}

/// Clamps the request cap to a sane range and logs a warning if clamped.
pub(super) fn clamp_max_concurrent(value: usize) -> usize {
    let clamped = value.clamp(MIN_MAX_CONCURRENT, MAX_MAX_CONCURRENT);
    if clamped != value {
        tracing::warn!(
            requested = value,
            min = MIN_MAX_CONCURRENT,
            max = MAX_MAX_CONCURRENT,
            "max_concurrent out of range, clamping to {}",
            clamped
        );
    }
    clamped
}

impl Default for ConfigFile {
    fn default() -> Self {
        let (ratio_w, ratio_h) = DEFAULT_ASPECT_RATIO;

        Self {
            reddit: RedditSettings {
                subreddits: DEFAULT_SUBREDDITS.iter().map(|s| s.to_string()).collect(),
                result_limit: DEFAULT_RESULT_LIMIT,
                sorting: DEFAULT_SORTING,
                time: Some(DEFAULT_TIME),
            },
            wallpaper: WallpaperSettings {
                size: Some(DEFAULT_SIZE),
                aspect_ratio: AspectRatio::new(ratio_w, ratio_h),
                output_folder: default_output_folder(),
                prefilter: true,
            },
            download: DownloadSettings {
                accepted_content_types: AcceptedContentTypes::default(),
                max_concurrent: DEFAULT_MAX_CONCURRENT,
                timeout: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            },
            logging: LoggingSettings::default(),
        }
    }
}
