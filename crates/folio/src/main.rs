//! `folio` - CLI for portfolio content
//!
//! This binary lists and checks project records, creates new ones, and
//! migrates legacy blog posts into the site's layout.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use folio::catalog::{self, Catalog, CatalogEntry};
use folio::cli::{
    CheckCommand, Cli, Command, ConfigCommand, ListCommand, MigrateCommand, NewCommand,
    OutputFormat, PostsCommand, ProjectsCommand,
};
use folio::migrate::{MigrationReport, Migrator, Outcome};
use folio::record::{ProjectRecord, RawProject};
use folio::validate::{ValidationReport, Validator};
use folio::{init_logging, Config};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let config_file = cli.config.as_deref();
    match cli.command {
        Command::Projects(ProjectsCommand::List(cmd)) => {
            handle_list(&load_config(config_file)?, &cmd)
        }
        Command::Projects(ProjectsCommand::Check(cmd)) => {
            handle_check(&load_config(config_file)?, &cmd)
        }
        Command::Projects(ProjectsCommand::Show { file, json }) => handle_show(&file, json),
        Command::Projects(ProjectsCommand::New(cmd)) => {
            handle_new(&load_config(config_file)?, cmd)
        }
        Command::Posts(PostsCommand::Migrate(cmd)) => {
            handle_migrate(&load_config(config_file)?, &cmd)
        }
        Command::Config(cmd) => handle_config(config_file, &cmd),
    }
}

fn load_config(file: Option<&Path>) -> Result<Config> {
    Config::load_from(file.map(Path::to_path_buf)).context("failed to load configuration")
}

fn projects_dir(config: &Config, dir: Option<&PathBuf>) -> PathBuf {
    dir.cloned()
        .unwrap_or_else(|| config.content.projects_dir.clone())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> Result<ExitCode> {
    let dir = projects_dir(config, cmd.dir.as_ref());
    let catalog = Catalog::load_dir(&dir)
        .with_context(|| format!("failed to load projects from {}", dir.display()))?;
    let entries = catalog.query(cmd.status.into(), cmd.tag.as_deref());

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Plain => {
            for entry in &entries {
                println!(
                    "{}  [{}]  {}",
                    entry.record.name,
                    entry.status,
                    period(&entry.record)
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_table(entries: &[&CatalogEntry]) {
    let name_width = entries
        .iter()
        .map(|e| e.record.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    println!(
        "{:<name_width$}  {:<9}  {:<10}  {:<10}  TAGS",
        "NAME", "STATUS", "START", "END"
    );
    for entry in entries {
        let end = entry
            .record
            .end_date
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        println!(
            "{:<name_width$}  {:<9}  {:<10}  {:<10}  {}",
            entry.record.name,
            entry.status.to_string(),
            entry.record.start_date.to_string(),
            end,
            entry.record.tags.join(", ")
        );
    }
}

fn period(record: &ProjectRecord) -> String {
    match record.end_date {
        Some(end) => format!("{} .. {end}", record.start_date),
        None => format!("{} .. now", record.start_date),
    }
}

fn handle_check(config: &Config, cmd: &CheckCommand) -> Result<ExitCode> {
    let dir = projects_dir(config, cmd.dir.as_ref());
    let validator = Validator::new(config.validation.clone());
    let strict = cmd.strict || validator.is_strict();
    let reports = validator
        .check_dir(&dir)
        .with_context(|| format!("failed to check projects in {}", dir.display()))?;

    let failed = reports.iter().filter(|r| !r.passes(strict)).count();

    if cmd.format == OutputFormat::Json {
        let summary = serde_json::json!({
            "strict": strict,
            "checked": reports.len(),
            "failed": failed,
            "reports": reports,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_reports(&reports, strict);
        println!();
        println!(
            "{} record(s) checked, {} failed{}",
            reports.len(),
            failed,
            if strict { " (strict)" } else { "" }
        );
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_reports(reports: &[ValidationReport], strict: bool) {
    for report in reports {
        let path = report
            .path
            .as_deref()
            .map_or_else(|| "<input>".into(), Path::to_string_lossy);
        let label = if !report.passes(strict) {
            "FAIL"
        } else if report.is_clean() {
            "ok"
        } else {
            "warn"
        };
        println!("{label:<4}  {path}");
        for violation in &report.violations {
            println!("      {violation}");
        }
    }
}

fn handle_show(file: &Path, json: bool) -> Result<ExitCode> {
    let entry = CatalogEntry::load(file)
        .with_context(|| format!("failed to read project {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(ExitCode::SUCCESS);
    }

    let record = &entry.record;
    println!("{}", record.name);
    println!("{}", "=".repeat(record.name.chars().count()));
    println!();
    println!("{}", record.description);
    println!();
    println!("  Status:   {}", entry.status);
    println!("  Period:   {}", period(record));
    if let Some(days) = record.duration_days() {
        println!("  Duration: {days} days");
    }
    println!("  Link:     {}", record.link);
    if !record.tags.is_empty() {
        println!("  Tags:     {}", record.tags.join(", "));
    }
    if let Some(image) = &record.image {
        println!("  Image:    {}", image.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_new(config: &Config, cmd: NewCommand) -> Result<ExitCode> {
    let dir = projects_dir(config, cmd.dir.as_ref());
    let raw = RawProject {
        name: Some(cmd.name),
        description: Some(cmd.description),
        tags: (!cmd.tags.is_empty()).then_some(cmd.tags),
        image: cmd.image,
        link: Some(cmd.link),
        start_date: Some(cmd.start_date),
        end_date: cmd.end_date,
        extra: std::collections::BTreeMap::new(),
    };
    let record = ProjectRecord::try_from(raw).context("invalid project record")?;
    let path = catalog::write_record(&dir, &record, cmd.force)?;
    println!("Created {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn handle_migrate(config: &Config, cmd: &MigrateCommand) -> Result<ExitCode> {
    let mut settings = config.migration.clone();
    if let Some(source) = &cmd.source {
        settings.source_dir.clone_from(source);
    }
    if let Some(target) = &cmd.target {
        settings.target_dir.clone_from(target);
    }

    let mut migrator = Migrator::new(settings).dry_run(cmd.dry_run);
    let report = migrator.run().with_context(|| {
        format!(
            "failed to migrate posts from {}",
            migrator.source_dir().display()
        )
    })?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_migration(&migrator, &report);
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_migration(migrator: &Migrator, report: &MigrationReport) {
    println!(
        "Post migration: {} -> {}{}",
        migrator.source_dir().display(),
        migrator.target_dir().display(),
        if report.dry_run { " (dry run)" } else { "" }
    );
    println!();
    for post in &report.posts {
        let name = post
            .source
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        println!("  ✓ {name} -> {}/index.md ({})", post.slug, post.outcome);
    }
    for failed in &report.failed {
        println!("  ✗ {}: {}", failed.source.display(), failed.reason);
    }
    println!();
    println!("  Migrated:      {}", report.count(Outcome::Migrated));
    if report.dry_run {
        println!("  Would migrate: {}", report.count(Outcome::WouldMigrate));
    }
    println!("  Unchanged:     {}", report.count(Outcome::Unchanged));
    println!("  Skipped:       {}", report.skipped.len());
    println!("  Failed:        {}", report.failed.len());
}

fn handle_config(config_file: Option<&Path>, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_file)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Content]");
                println!(
                    "  Projects dir:        {}",
                    config.content.projects_dir.display()
                );
                println!();
                println!("[Validation]");
                println!(
                    "  Link schemes:        {}",
                    config.validation.allowed_link_schemes.join(", ")
                );
                println!(
                    "  Warn unknown keys:   {}",
                    config.validation.warn_unknown_keys
                );
                println!("  Require image:       {}", config.validation.require_image);
                println!("  Check assets:        {}", config.validation.check_assets);
                println!("  Strict:              {}", config.validation.strict);
                println!();
                println!("[Migration]");
                println!(
                    "  Source dir:          {}",
                    config.migration.source_dir.display()
                );
                println!(
                    "  Target dir:          {}",
                    config.migration.target_dir.display()
                );
                println!("  Default title:       {}", config.migration.default_title);
                println!("  Default date:        {}", config.migration.default_date);
                println!(
                    "  Description:         {}",
                    config.migration.description_placeholder
                );
                println!("  Draft:               {}", config.migration.draft);
                println!(
                    "  Skip files:          {}",
                    config.migration.skip_files.join(", ")
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            // Validating a file must not depend on the active configuration loading
            let path = file
                .as_deref()
                .or(config_file)
                .map_or_else(Config::default_config_path, Path::to_path_buf);
            return Ok(handle_config_validate(&path));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(path: &Path) -> ExitCode {
    println!("Validating configuration: {}", path.display());
    match Config::load_from(Some(path.to_path_buf())) {
        Ok(_) => {
            println!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Configuration error: {e}");
            ExitCode::FAILURE
        }
    }
}
