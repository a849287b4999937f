// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "logbook - paginated application logs in a local database",
    long_about = "logbook records INFO/WARN/ERROR log entries in a local SQLite database and lets you page through them, newest first, optionally filtered by level."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to the log database (overrides the config file)")]
    pub db: Option<PathBuf>,

    #[arg(short, long, global = true, conflicts_with = "quiet", help = "Show debug diagnostics")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only show error diagnostics")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Creates the log database if it does not exist yet.
    Init,

    /// Adds a new log entry.
    /// If no message is provided via -m, it opens the default editor.
    Log {
        #[arg(short, long, help = "A short, one-line message for the log entry")]
        message: Option<String>,

        #[arg(short, long, default_value = "INFO", help = "Log level: INFO, WARN or ERROR")]
        level: String,
    },

    /// Shows one page of log entries, newest first.
    Get {
        #[arg(short, long, default_value_t = 1, help = "Page number, starting at 1")]
        page: u32,

        #[arg(short = 'n', long, help = "Entries per page (default from config, 10)")]
        page_size: Option<u32>,

        #[arg(short, long, help = "Only show entries with exactly this level")]
        level: Option<String>,
    },

    /// Deletes every log entry.
    Clear {
        #[arg(short, long, help = "Do not ask for confirmation")]
        yes: bool,
    },
}
