//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented representation written by `subwall config init`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let subreddits = config.reddit.subreddits.join(", ");
    let time = config
        .reddit
        .time
        .map(|t| t.to_string())
        .unwrap_or_default();
    let size = config
        .wallpaper
        .size
        .map(|s| s.to_string())
        .unwrap_or_default();
    let aspect_ratio = config
        .wallpaper
        .aspect_ratio
        .map(|r| r.to_string())
        .unwrap_or_default();
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[reddit]
; Comma-separated subreddits to fetch from, without the r/ prefix
subreddits = {}
; Stop paginating a subreddit once this many posts were seen
result_limit = {}
; Listing order: hot, new, rising, top, controversial
sorting = {}
; Time window for top and controversial: hour, day, week, month, year, all
time = {}

[wallpaper]
; Minimum wallpaper size, e.g. 1920x1080. Leave empty to accept any size
size = {}
; Exact aspect ratio, e.g. 16:9 or 1.77778. Leave empty to accept any ratio
aspect_ratio = {}
; Where downloaded wallpapers and their metadata are stored
output_folder = {}
; Skip posts whose advertised size already fails the constraints above
prefilter = {}

[download]
; Comma-separated content types that may be stored
accepted_content_types = {}
; Maximum simultaneous HTTP requests (1-32)
max_concurrent = {}
; Per-request timeout in seconds
timeout = {}

[logging]
; Optional log file, in addition to stderr
file = {}
"#,
        subreddits,
        config.reddit.result_limit,
        config.reddit.sorting,
        time,
        size,
        aspect_ratio,
        path_to_string(&config.wallpaper.output_folder),
        config.wallpaper.prefilter,
        config.download.accepted_content_types,
        config.download.max_concurrent,
        config.download.timeout,
        log_file,
    )
}

fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
