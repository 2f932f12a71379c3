//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Plangen - personalized weekly training plan generator
#[derive(Parser)]
#[command(name = "pg", about = "Generates personalized weekly training plans", version)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a week of training sessions for a user
    Generate {
        /// User id to generate for
        user: String,

        /// First candidate training date (defaults to today)
        #[arg(short, long)]
        start_date: Option<chrono::NaiveDate>,

        /// Directory of prompt template overrides (<name>.hbs)
        #[arg(long)]
        prompts_dir: Option<PathBuf>,
    },

    /// Show a user's most recent generated week
    Show {
        /// User id to show
        user: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Import records into the store
    Import {
        #[command(subcommand)]
        command: ImportCommand,
    },
}

/// Import subcommands
#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Import (or replace) a user profile from a YAML file
    Profile {
        /// Path to the profile YAML file
        file: PathBuf,
    },

    /// Import variations from a YAML file (a list of variations)
    Variations {
        /// Path to the variations YAML file
        file: PathBuf,
    },
}

/// Output format for show
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
