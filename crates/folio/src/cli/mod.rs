//! Command-line interface for folio.
//!
//! This module provides the CLI structure and command handlers for the
//! `folio` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CheckCommand, ConfigCommand, ListCommand, MigrateCommand, NewCommand, OutputFormat,
    PostsCommand, ProjectsCommand, StatusArg,
};

use crate::logging::Verbosity;

/// folio - Portfolio content toolkit
///
/// Reads, checks and queries the project records behind a portfolio site,
/// and migrates legacy blog posts into the site's layout.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Work with project records
    #[command(subcommand)]
    Projects(ProjectsCommand),

    /// Work with blog posts
    #[command(subcommand)]
    Posts(PostsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Config(ConfigCommand::Path),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "folio");
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_projects_list() {
        let args = vec![
            "folio", "projects", "list", "content", "--status", "ongoing", "--tag", "Rust",
            "--format", "json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Projects(ProjectsCommand::List(cmd)) = cli.command else {
            panic!("expected projects list");
        };
        assert_eq!(cmd.dir, Some(PathBuf::from("content")));
        assert_eq!(cmd.status, StatusArg::Ongoing);
        assert_eq!(cmd.tag.as_deref(), Some("Rust"));
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_projects_list_defaults() {
        let cli = Cli::try_parse_from(["folio", "projects", "list"]).unwrap();
        let Command::Projects(ProjectsCommand::List(cmd)) = cli.command else {
            panic!("expected projects list");
        };
        assert!(cmd.dir.is_none());
        assert_eq!(cmd.status, StatusArg::All);
        assert_eq!(cmd.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_projects_check() {
        let cli = Cli::try_parse_from(["folio", "projects", "check", "--strict"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Projects(ProjectsCommand::Check(CheckCommand { strict: true, .. }))
        ));
    }

    #[test]
    fn test_parse_projects_new() {
        let args = vec![
            "folio",
            "projects",
            "new",
            "My Project",
            "--description",
            "Does things",
            "--link",
            "https://github.com/example/my-project",
            "--start-date",
            "2024-01-01",
            "--tag",
            "Rust",
            "--tag",
            "CLI",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Projects(ProjectsCommand::New(cmd)) = cli.command else {
            panic!("expected projects new");
        };
        assert_eq!(cmd.name, "My Project");
        assert_eq!(cmd.tags, vec!["Rust", "CLI"]);
        assert!(cmd.end_date.is_none());
        assert!(!cmd.force);
    }

    #[test]
    fn test_parse_projects_new_requires_link() {
        let args = vec![
            "folio",
            "projects",
            "new",
            "x",
            "--description",
            "d",
            "--start-date",
            "2024-01-01",
        ];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_parse_posts_migrate() {
        let args = vec!["folio", "posts", "migrate", "--dry-run", "--target", "out"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Posts(PostsCommand::Migrate(cmd)) = cli.command else {
            panic!("expected posts migrate");
        };
        assert!(cmd.dry_run);
        assert_eq!(cmd.target, Some(PathBuf::from("out")));
        assert!(cmd.source.is_none());
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["folio", "-c", "/custom/config.toml", "config", "show"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_validate_uses_global_config() {
        let cli = Cli::try_parse_from(["folio", "-c", "alt.toml", "config", "validate"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: None })
        ));

        let cli =
            Cli::try_parse_from(["folio", "config", "validate", "--file", "other.toml"]).unwrap();
        match cli.command {
            Command::Config(ConfigCommand::Validate { file }) => {
                assert_eq!(file, Some(PathBuf::from("other.toml")));
            }
            _ => panic!("expected config validate"),
        }
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["folio", "-vv", "config", "path"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["folio", "posts", "migrate", "-q"]).unwrap();
        assert!(cli.quiet);
    }
}
