//! subwall CLI - Command-line interface
//!
//! Prints the path of a wallpaper chosen from subreddit listings.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "subwall")]
#[command(version = subwall::VERSION)]
#[command(about = "Fetch, cache and choose wallpapers from subreddits", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.subwall/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive; RUST_LOG takes precedence
    #[arg(long, global = true, default_value = subwall::logging::DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose a wallpaper and print its path (default)
    Choose,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Cache inspection
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command.unwrap_or(Commands::Choose) {
        Commands::Choose => CliRunner::new(config_path, &cli.log_level)
            .and_then(|runner| commands::choose::run(&runner)),
        Commands::Config { command } => commands::config::run(command, config_path),
        Commands::Cache { action } => commands::cache::run(action, config_path),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_choose() {
        let cli = Cli::parse_from(["subwall"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["subwall", "cache", "stats", "--config", "/tmp/c.ini"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.ini")));
        assert!(matches!(
            cli.command,
            Some(Commands::Cache {
                action: CacheAction::Stats
            })
        ));
    }

    #[test]
    fn test_config_init_with_path() {
        let cli = Cli::parse_from(["subwall", "config", "init", "/tmp/x.ini", "--force"]);
        match cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Init { path, force },
            }) => {
                assert_eq!(path, Some(PathBuf::from("/tmp/x.ini")));
                assert!(force);
            }
            _ => panic!("expected config init"),
        }
    }
}
