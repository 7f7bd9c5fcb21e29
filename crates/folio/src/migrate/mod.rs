//! Blog post migration.
//!
//! Moves legacy posts from a flat `content/posts` tree into the
//! `<target>/<slug>/index.md` layout the site expects, rewriting their
//! frontmatter on the way:
//!
//! | Legacy key   | Migrated post                        |
//! |--------------|--------------------------------------|
//! | `title`      | kept (default `Untitled`)            |
//! | `date`       | kept (default `2021-01-01`)          |
//! | `tags`       | kept when non-empty                  |
//! | -            | `description` placeholder added      |
//! | -            | `draft: false` added                 |
//! | anything else| dropped                              |
//!
//! Re-running a migration is safe: targets whose bytes would not change are
//! reported as unchanged and left alone.

pub mod legacy;
mod post;
mod slug;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

pub use legacy::{LegacyPost, LegacyValue};
pub use post::BlogPost;
pub use slug::{slug_from_filename, slugify};

use crate::catalog::walk_markdown;
use crate::config::MigrationConfig;
use crate::error::{Error, Result};

/// File name of a migrated post inside its slug directory.
pub const TARGET_FILE_NAME: &str = "index.md";

/// What happened to one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The target was written.
    Migrated,
    /// The target already held exactly this content.
    Unchanged,
    /// Dry run: the target would have been written.
    WouldMigrate,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Migrated => write!(f, "migrated"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::WouldMigrate => write!(f, "would migrate"),
        }
    }
}

/// A post that was processed successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigratedPost {
    /// The legacy file.
    pub source: PathBuf,
    /// The `index.md` it maps to.
    pub target: PathBuf,
    /// Directory name under the target root.
    pub slug: String,
    /// What was done.
    pub outcome: Outcome,
}

/// A post that could not be migrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPost {
    /// The legacy file.
    pub source: PathBuf,
    /// Why it failed.
    pub reason: String,
}

/// Summary of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Whether files were left untouched.
    pub dry_run: bool,
    /// Posts processed without error, in source order.
    pub posts: Vec<MigratedPost>,
    /// Files on the skip list.
    pub skipped: Vec<PathBuf>,
    /// Posts that failed.
    pub failed: Vec<FailedPost>,
}

impl MigrationReport {
    /// Number of posts with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        self.posts.iter().filter(|p| p.outcome == outcome).count()
    }

    /// Check if every post was handled.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs migrations under a [`MigrationConfig`].
#[derive(Debug)]
pub struct Migrator {
    config: MigrationConfig,
    dry_run: bool,
    claimed: HashMap<String, PathBuf>,
}

impl Migrator {
    /// Create a migrator that writes files.
    #[must_use]
    pub fn new(config: MigrationConfig) -> Self {
        Self {
            config,
            dry_run: false,
            claimed: HashMap::new(),
        }
    }

    /// Report what would happen without writing anything.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Directory legacy posts are read from.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.config.source_dir
    }

    /// Directory migrated posts are written to.
    #[must_use]
    pub fn target_dir(&self) -> &Path {
        &self.config.target_dir
    }

    /// Migrate one legacy post.
    ///
    /// # Errors
    ///
    /// Returns an error if the post cannot be read, has no frontmatter, yields
    /// no slug, maps to a slug already taken by another post in this run, or
    /// the target cannot be written.
    pub fn migrate_post(&mut self, source: impl AsRef<Path>) -> Result<MigratedPost> {
        let source = source.as_ref();
        let content = std::fs::read_to_string(source).map_err(|err| Error::FileRead {
            path: source.to_path_buf(),
            source: err,
        })?;

        let legacy = legacy::extract(&content).ok_or_else(|| Error::MissingFrontmatter {
            path: source.to_path_buf(),
        })?;
        let post = BlogPost::transform(&legacy, &self.config);

        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut slug = slug_from_filename(&file_name);
        if slug.is_empty() {
            slug = slugify(&post.title);
        }
        if slug.is_empty() {
            return Err(Error::EmptySlug {
                path: source.to_path_buf(),
            });
        }

        if let Some(first) = self.claimed.get(&slug) {
            if first != source {
                return Err(Error::SlugCollision {
                    slug,
                    first: first.clone(),
                    second: source.to_path_buf(),
                });
            }
        }
        self.claimed.insert(slug.clone(), source.to_path_buf());

        let target = self.config.target_dir.join(&slug).join(TARGET_FILE_NAME);
        let rendered = post.to_document(legacy.body());

        let outcome = if is_unchanged(&target, rendered.as_bytes())? {
            Outcome::Unchanged
        } else if self.dry_run {
            Outcome::WouldMigrate
        } else {
            write_target(&target, &rendered)?;
            Outcome::Migrated
        };

        debug!(
            source = %source.display(),
            target = %target.display(),
            %outcome,
            "Processed post"
        );
        Ok(MigratedPost {
            source: source.to_path_buf(),
            target,
            slug,
            outcome,
        })
    }

    /// Migrate every post under the source directory.
    ///
    /// Hidden directories are walked too. A failing post, or an entry the
    /// walk cannot follow, is recorded in the report and the run continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the source directory is missing or the target
    /// directory cannot be created.
    pub fn run(&mut self) -> Result<MigrationReport> {
        self.claimed.clear();
        let scan = walk_markdown(&self.config.source_dir)?;
        info!(
            source = %self.config.source_dir.display(),
            target = %self.config.target_dir.display(),
            files = scan.files.len(),
            dry_run = self.dry_run,
            "Starting post migration"
        );

        if !self.dry_run {
            create_dir(&self.config.target_dir)?;
        }

        let mut report = MigrationReport {
            dry_run: self.dry_run,
            ..MigrationReport::default()
        };

        for failure in scan.errors {
            warn!(path = %failure.path.display(), error = %failure.error, "Cannot read post");
            report.failed.push(FailedPost {
                source: failure.path,
                reason: failure.error.to_string(),
            });
        }

        for path in scan.files {
            let skip = path
                .file_name()
                .is_some_and(|n| self.config.is_skipped(&n.to_string_lossy()));
            if skip {
                debug!(path = %path.display(), "Skipping file");
                report.skipped.push(path);
                continue;
            }

            match self.migrate_post(&path) {
                Ok(post) => report.posts.push(post),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Failed to migrate post");
                    report.failed.push(FailedPost {
                        source: path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            migrated = report.count(Outcome::Migrated),
            unchanged = report.count(Outcome::Unchanged),
            would_migrate = report.count(Outcome::WouldMigrate),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Post migration finished"
        );
        Ok(report)
    }
}

/// Check if `target` already holds exactly `rendered`.
fn is_unchanged(target: &Path, rendered: &[u8]) -> Result<bool> {
    if !target.is_file() {
        return Ok(false);
    }
    let existing = std::fs::read(target).map_err(|source| Error::FileRead {
        path: target.to_path_buf(),
        source,
    })?;
    Ok(blake3::hash(&existing) == blake3::hash(rendered))
}

fn write_target(target: &Path, rendered: &str) -> Result<()> {
    if let Some(parent) = target.parent() {
        create_dir(parent)?;
    }
    std::fs::write(target, rendered).map_err(|source| Error::FileWrite {
        path: target.to_path_buf(),
        source,
    })
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })
}
