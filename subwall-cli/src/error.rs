//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use subwall::config::ConfigFileError;
use subwall::logging::LoggingError;
use subwall::pipeline::PipelineError;

/// Exit code for failures.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code when the run succeeded but no wallpaper qualified.
pub const EXIT_NO_WALLPAPER: i32 = 2;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(LoggingError),
    /// Configuration file could not be loaded or saved
    Config(ConfigFileError),
    /// Configuration loaded but unusable, or setup failed
    Pipeline(PipelineError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Failed to read the cache directory
    CacheStats { path: PathBuf, error: std::io::Error },
    /// Nothing qualified
    NoWallpaper,
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value in your config file, or regenerate defaults with:");
                eprintln!("  subwall config init");
            }
            CliError::NoWallpaper => {
                eprintln!();
                eprintln!("Nothing matched the configured size and aspect ratio.");
                eprintln!("Try more subreddits, a higher result_limit, or relax [wallpaper] constraints.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NoWallpaper => EXIT_NO_WALLPAPER,
            _ => EXIT_FAILURE,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Pipeline(e) => write!(f, "{}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::CacheStats { path, error } => {
                write!(f, "Failed to read cache '{}': {}", path.display(), error)
            }
            CliError::NoWallpaper => write!(f, "No wallpaper available"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            CliError::CacheStats { error, .. } => Some(error),
            CliError::NoWallpaper => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::LoggingInit(e)
    }
}
