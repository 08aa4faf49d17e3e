//! CLI module - command-line interface for recipebox
//!
//! Argument parsing uses clap derive; handlers live in `commands`.

mod commands;

use clap::{Parser, Subcommand};

/// recipebox - recipe catalog service
/// Stores your own recipes and searches TheMealDB alongside them
#[derive(Parser)]
#[command(name = "recipebox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server (default)
    #[command(alias = "daemon")]
    Serve,

    /// List stored recipes
    #[command(alias = "ls", alias = "l")]
    List,

    /// Search stored and TheMealDB recipes
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Inspect or reset the search cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Show cache statistics
    Stats,
    /// Remove every cached search
    Clear,
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["recipebox"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn search_joins_words() {
        let cli = Cli::try_parse_from(["recipebox", "search", "chicken", "curry"]).unwrap();
        let Some(Commands::Search { query }) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(query.join(" "), "chicken curry");
    }

    #[test]
    fn cache_requires_subcommand() {
        assert!(Cli::try_parse_from(["recipebox", "cache"]).is_err());
        assert!(matches!(
            Cli::try_parse_from(["recipebox", "cache", "clear"])
                .unwrap()
                .command,
            Some(Commands::Cache {
                command: CacheCommands::Clear
            })
        ));
    }
}
