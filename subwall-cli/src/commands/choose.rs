//! Main command: fetch, cache, filter and print one wallpaper path.

use std::path::{Path, PathBuf};

use subwall::pipeline::{prepare_output_dir, PipelineConfig, WallpaperPipeline};
use tracing::debug;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the pipeline and print the absolute path of the chosen wallpaper.
///
/// Only the path goes to stdout so the output can be piped into a
/// wallpaper setter.
pub fn run(runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("choose");

    // Validate everything before touching the network.
    let config = PipelineConfig::from_config_file(runner.config())?;
    prepare_output_dir(&config.store.directory)?;
    debug!(
        feeds = ?config.fetch.feeds,
        query = %config.fetch.query,
        directory = %config.store.directory.display(),
        "Pipeline configured"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let chosen = runtime.block_on(async move {
        let mut pipeline = WallpaperPipeline::reddit(config)?;
        Ok::<_, CliError>(pipeline.choose().await)
    })?;

    match chosen {
        Some(wallpaper) => {
            println!("{}", absolute(wallpaper.path()).display());
            Ok(())
        }
        None => Err(CliError::NoWallpaper),
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_keeps_absolute_paths() {
        let path = Path::new("/walls/1.jpg");
        assert_eq!(absolute(path), PathBuf::from("/walls/1.jpg"));
    }

    #[test]
    fn test_absolute_resolves_relative_paths() {
        let resolved = absolute(Path::new("walls/1.jpg"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("walls/1.jpg"));
    }
}
