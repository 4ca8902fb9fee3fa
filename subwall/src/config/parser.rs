//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::defaults::clamp_max_concurrent;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::cache::AcceptedContentTypes;
use crate::feed::{ListingQuery, QueryError, SortMode, TimeWindow};

fn invalid(section: &str, key: &str, value: &str, reason: impl Into<String>) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [reddit] section
    if let Some(section) = ini.section(Some("reddit")) {
        if let Some(v) = section.get("subreddits") {
            let subreddits = split_list(v);
            if subreddits.is_empty() {
                return Err(invalid(
                    "reddit",
                    "subreddits",
                    v,
                    "must name at least one subreddit",
                ));
            }
            config.reddit.subreddits = subreddits;
        }
        if let Some(v) = section.get("result_limit") {
            config.reddit.result_limit = v
                .trim()
                .parse()
                .map_err(|_| invalid("reddit", "result_limit", v, "must be a non-negative integer"))?;
        }
        if let Some(v) = section.get("sorting") {
            config.reddit.sorting = v
                .parse::<SortMode>()
                .map_err(|e| invalid("reddit", "sorting", v, e.to_string()))?;
        }
        if let Some(v) = section.get("time") {
            let v = v.trim();
            config.reddit.time = if v.is_empty() {
                None
            } else {
                Some(
                    v.parse::<TimeWindow>()
                        .map_err(|e| invalid("reddit", "time", v, e.to_string()))?,
                )
            };
        }

        if let Err(e @ QueryError::MissingWindow(_)) =
            ListingQuery::new(config.reddit.sorting, config.reddit.time)
        {
            return Err(invalid("reddit", "time", "", e.to_string()));
        }
    }

    // [wallpaper] section
    if let Some(section) = ini.section(Some("wallpaper")) {
        if let Some(v) = section.get("size") {
            let v = v.trim();
            config.wallpaper.size = if v.is_empty() {
                None
            } else {
                Some(
                    v.parse()
                        .map_err(|_| invalid("wallpaper", "size", v, "expected format like '1920x1080'"))?,
                )
            };
        }
        if let Some(v) = section.get("aspect_ratio") {
            let v = v.trim();
            config.wallpaper.aspect_ratio = if v.is_empty() {
                None
            } else {
                Some(v.parse().map_err(|_| {
                    invalid("wallpaper", "aspect_ratio", v, "expected format like '16:9' or '1.77778'")
                })?)
            };
        }
        if let Some(v) = section.get("output_folder") {
            let v = v.trim();
            if !v.is_empty() {
                config.wallpaper.output_folder = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("prefilter") {
            config.wallpaper.prefilter = parse_bool(v);
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("accepted_content_types") {
            let accepted = AcceptedContentTypes::new(split_list(v));
            if accepted.is_empty() {
                return Err(invalid(
                    "download",
                    "accepted_content_types",
                    v,
                    "must list at least one content type",
                ));
            }
            config.download.accepted_content_types = accepted;
        }
        if let Some(v) = section.get("max_concurrent") {
            let parsed: usize = v
                .trim()
                .parse()
                .map_err(|_| invalid("download", "max_concurrent", v, "must be a positive integer"))?;
            config.download.max_concurrent = clamp_max_concurrent(parsed);
        }
        if let Some(v) = section.get("timeout") {
            config.download.timeout = match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(invalid(
                        "download",
                        "timeout",
                        v,
                        "must be a positive integer (seconds)",
                    ))
                }
            };
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            config.logging.file = if v.is_empty() {
                None
            } else {
                Some(expand_tilde(v))
            };
        }
    }

    Ok(config)
}

/// Split a comma-separated list, trimming entries and dropping empties.
pub(super) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a boolean value from a string.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
