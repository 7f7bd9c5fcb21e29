//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::catalog::StatusFilter;

/// Project record commands.
#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List project records
    List(ListCommand),

    /// Validate project records
    Check(CheckCommand),

    /// Show a single project record
    Show {
        /// The record file
        file: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create a new project record
    New(NewCommand),
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Projects directory (defaults to the configured one)
    pub dir: Option<PathBuf>,

    /// Only show projects with this status
    #[arg(short, long, value_enum, default_value = "all")]
    pub status: StatusArg,

    /// Only show projects carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Projects directory (defaults to the configured one)
    pub dir: Option<PathBuf>,

    /// Fail on warnings as well as errors
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// New record arguments.
#[derive(Debug, Args)]
pub struct NewCommand {
    /// Project name
    pub name: String,

    /// One-line summary
    #[arg(short, long)]
    pub description: String,

    /// Repository URL
    #[arg(short, long)]
    pub link: String,

    /// First day of the project (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start_date: String,

    /// Last day of the project (YYYY-MM-DD), omit while ongoing
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,

    /// Tag (repeatable)
    #[arg(short, long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Relative path to the project image
    #[arg(short, long)]
    pub image: Option<String>,

    /// Directory to write to (defaults to the configured one)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

/// Blog post commands.
#[derive(Debug, Subcommand)]
pub enum PostsCommand {
    /// Migrate legacy posts to the blog layout
    Migrate(MigrateCommand),
}

/// Migrate command arguments.
#[derive(Debug, Args)]
pub struct MigrateCommand {
    /// Directory holding legacy posts
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Directory that receives migrated posts
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Show what would change without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Project status argument for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusArg {
    /// Every project
    #[default]
    All,
    /// Projects without an end date
    Ongoing,
    /// Projects with an end date
    Completed,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => Self::All,
            StatusArg::Ongoing => Self::Ongoing,
            StatusArg::Completed => Self::Completed,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
