//! Command-line interface for protein-explorer.
//!
//! This module handles CLI argument parsing. Without a subcommand the
//! interactive shell starts; `search` runs a single search and prints it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// protein-explorer - Explore proteins, their structures and drug associations
#[derive(Parser, Debug)]
#[command(name = "protein-explorer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides config), e.g. http://localhost:5000/api
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Set debug log level (overrides config and DEBUG_LEVEL)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,

    /// Use this config file instead of ~/.config/protein-explorer/config.yaml
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run one search and print the results
    Search {
        /// Protein name or free-text description
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Base URL override
    pub api_url: Option<String>,
    /// Log level override from CLI
    pub log_level: Option<log::LevelFilter>,
    /// Explicit config file
    pub config_path: Option<PathBuf>,
    /// One-shot search instead of the interactive shell
    pub search: Option<String>,
}

impl From<Cli> for RuntimeOptions {
    fn from(cli: Cli) -> Self {
        let search = cli.command.map(|command| match command {
            Commands::Search { query } => query.join(" "),
        });
        Self {
            api_url: cli.api_url,
            log_level: cli.log_level.map(|l| l.to_level_filter()),
            config_path: cli.config,
            search,
        }
    }
}

/// Parse the process arguments
pub fn process_cli() -> RuntimeOptions {
    Cli::parse().into()
}
