//! Configuration management CLI commands.
//!
//! Provides `config init`, `config path` and `config show`.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use subwall::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a commented default configuration file
    Init {
        /// Destination (default: the --config path, or ~/.subwall/config.ini)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the configuration file path
    Path,

    /// Print the effective configuration (file values over defaults)
    Show,
}

/// Run a config subcommand.
///
/// `config_path` is the global `--config` override, if given.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    let default_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    match command {
        ConfigCommands::Init { path, force } => {
            run_init(path.as_deref().unwrap_or(&default_path), force)
        }
        ConfigCommands::Path => {
            println!("{}", default_path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let config = ConfigFile::load_from(&default_path)?;
            print!("{}", config.to_ini_string());
            Ok(())
        }
    }
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        println!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    ConfigFile::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sub").join("config.ini");

        run_init(&path, false).unwrap();

        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_init_does_not_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[reddit]\nsubreddits = mine\n").unwrap();

        run_init(&path, false).unwrap();
        let kept = ConfigFile::load_from(&path).unwrap();
        assert_eq!(kept.reddit.subreddits, vec!["mine"]);

        run_init(&path, true).unwrap();
        let replaced = ConfigFile::load_from(&path).unwrap();
        assert_eq!(replaced, ConfigFile::default());
    }
}
