//! CLI runner for common setup.
//!
//! Loads the configuration file and initializes logging once, so command
//! handlers only deal with their own work.

use std::path::{Path, PathBuf};

use subwall::config::{config_file_path, ConfigFile};
use subwall::logging::{init_logging, LoggingGuard};
use tracing::{debug, info};

use crate::error::CliError;

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps file logging active while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Load config (defaults if the file is missing) and initialize logging.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Explicit config file, or `None` for ~/.subwall/config.ini
    /// * `log_level` - Filter used when `RUST_LOG` is not set
    pub fn new(config_path: Option<&Path>, log_level: &str) -> Result<Self, CliError> {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(config_file_path);
        let config = ConfigFile::load_from(&config_path)?;

        let logging_guard = init_logging(log_level, config.logging.file.as_deref())?;
        debug!(path = %config_path.display(), "Configuration loaded");

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            config_path,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("subwall v{}", subwall::VERSION);
        info!(
            config = %self.config_path.display(),
            "subwall CLI: {} command", command
        );
    }
}
