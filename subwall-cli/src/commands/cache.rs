//! Cache inspection CLI commands.

use std::path::Path;

use clap::Subcommand;
use subwall::cache::CacheStats;
use subwall::config::ConfigFile;

use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Show cache directory statistics
    Stats,
}

/// Run a cache subcommand.
pub fn run(action: CacheAction, config_path: Option<&Path>) -> Result<(), CliError> {
    let config = match config_path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    let cache_dir = &config.wallpaper.output_folder;

    match action {
        CacheAction::Stats => {
            println!("Wallpaper cache: {}", cache_dir.display());

            if !cache_dir.exists() {
                println!("  (not created yet)");
                return Ok(());
            }

            let stats = CacheStats::scan(cache_dir).map_err(|error| CliError::CacheStats {
                path: cache_dir.clone(),
                error,
            })?;
            println!("  Entries:         {}", stats.entries);
            println!("  Image files:     {}", stats.bodies);
            println!("  Orphaned images: {}", stats.orphaned_bodies);
            if stats.temp_files > 0 {
                println!("  Temporary files: {}", stats.temp_files);
            }
            println!("  Size:            {}", format_bytes(stats.total_bytes));
            Ok(())
        }
    }
}

/// Format a byte count with a binary unit suffix.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
