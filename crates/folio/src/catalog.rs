//! Project catalog.
//!
//! Loads every project record under a content directory and answers the
//! queries the site needs: which projects are still running, which are
//! finished, and which carry a given tag.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};
use crate::migrate::slugify;
use crate::record::{ProjectRecord, ProjectStatus};

/// Which records a status query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Every record.
    #[default]
    All,
    /// Records without an `endDate`.
    Ongoing,
    /// Records with an `endDate`.
    Completed,
}

impl StatusFilter {
    /// Check if a record with `status` is selected.
    #[must_use]
    pub fn matches(self, status: ProjectStatus) -> bool {
        match self {
            Self::All => true,
            Self::Ongoing => status == ProjectStatus::Ongoing,
            Self::Completed => status == ProjectStatus::Completed,
        }
    }
}

/// A loaded record and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Identifier derived from the file name.
    pub slug: String,
    /// The record file.
    pub path: PathBuf,
    /// Cached from the record.
    pub status: ProjectStatus,
    /// The parsed record.
    #[serde(flatten)]
    pub record: ProjectRecord,
}

impl CatalogEntry {
    /// Read and parse one record file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid record.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let record = ProjectRecord::from_document(&content).map_err(|e| e.with_path(path))?;

        Ok(Self {
            slug: slug_for(path),
            path: path.to_path_buf(),
            status: record.status(),
            record,
        })
    }
}

/// A file that could not be loaded into the catalog.
#[derive(Debug)]
pub struct LoadFailure {
    /// The offending file.
    pub path: PathBuf,
    /// What went wrong.
    pub error: Error,
}

/// Every project record under one directory.
#[derive(Debug, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    failures: Vec<LoadFailure>,
}

impl Catalog {
    /// Load every record under `dir`.
    ///
    /// Files that fail to parse, and entries the walk cannot read, are
    /// collected in [`Catalog::failures`] instead of aborting the load.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` does not exist or cannot be scanned.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let scan = markdown_files(dir)?;
        let mut entries = Vec::new();
        let mut failures = Vec::new();

        for failure in scan.errors {
            warn!(
                path = %failure.path.display(),
                error = %failure.error,
                "Skipping unreadable entry"
            );
            failures.push(failure);
        }

        for path in scan.files {
            match CatalogEntry::load(&path) {
                Ok(entry) => {
                    debug!(slug = %entry.slug, status = %entry.status, "Loaded project");
                    entries.push(entry);
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "Skipping project record");
                    failures.push(LoadFailure { path, error });
                }
            }
        }

        info!(
            dir = %dir.display(),
            loaded = entries.len(),
            failed = failures.len(),
            "Loaded project catalog"
        );
        Ok(Self::from_entries(entries, failures))
    }

    /// Build a catalog from already-loaded entries.
    #[must_use]
    pub fn from_entries(mut entries: Vec<CatalogEntry>, failures: Vec<LoadFailure>) -> Self {
        entries.sort_by(|a, b| {
            b.record
                .start_date
                .cmp(&a.record.start_date)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Self { entries, failures }
    }

    /// All entries, newest `startDate` first.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Files that could not be loaded.
    #[must_use]
    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    /// Number of loaded records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no record was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Projects without an `endDate`.
    #[must_use]
    pub fn ongoing(&self) -> Vec<&CatalogEntry> {
        self.by_status(StatusFilter::Ongoing)
    }

    /// Projects with an `endDate`.
    #[must_use]
    pub fn completed(&self) -> Vec<&CatalogEntry> {
        self.by_status(StatusFilter::Completed)
    }

    /// Entries selected by `filter`.
    #[must_use]
    pub fn by_status(&self, filter: StatusFilter) -> Vec<&CatalogEntry> {
        self.query(filter, None)
    }

    /// Entries carrying `tag`, ignoring case.
    #[must_use]
    pub fn with_tag(&self, tag: &str) -> Vec<&CatalogEntry> {
        self.query(StatusFilter::All, Some(tag))
    }

    /// Entries matching both a status filter and an optional tag.
    #[must_use]
    pub fn query(&self, filter: StatusFilter, tag: Option<&str>) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| filter.matches(e.status))
            .filter(|e| tag.map_or(true, |t| e.record.has_tag(t)))
            .collect()
    }

    /// How many records use each tag, keyed by the first spelling seen.
    #[must_use]
    pub fn tag_counts(&self) -> BTreeMap<String, usize> {
        let mut spelling: BTreeMap<String, String> = BTreeMap::new();
        let mut counts = BTreeMap::new();
        for tag in self.entries.iter().flat_map(|e| &e.record.tags) {
            let display = spelling
                .entry(tag.to_lowercase())
                .or_insert_with(|| tag.clone());
            *counts.entry(display.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Look up an entry by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.slug == slug)
    }
}

/// Write a new record to `<dir>/<slug>.md`, slugging the record's name.
///
/// # Errors
///
/// Returns an error if the name yields no slug, the file exists and
/// `overwrite` is false, or the file cannot be written.
pub fn write_record(
    dir: impl AsRef<Path>,
    record: &ProjectRecord,
    overwrite: bool,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let slug = slugify(&record.name);
    if slug.is_empty() {
        return Err(Error::EmptySlug {
            path: dir.join(&record.name),
        });
    }

    std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(format!("{slug}.md"));
    if path.exists() && !overwrite {
        return Err(Error::TargetExists { path });
    }

    std::fs::write(&path, record.to_document()).map_err(|source| Error::FileWrite {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "Wrote project record");
    Ok(path)
}

/// Markdown files found under a directory.
#[derive(Debug, Default)]
pub struct MarkdownScan {
    /// Matching files, sorted.
    pub files: Vec<PathBuf>,
    /// Entries the walk could not read, such as dangling symlinks.
    pub errors: Vec<LoadFailure>,
}

/// Every `*.md` file under `root`, sorted, hidden entries included.
///
/// # Errors
///
/// Returns an error if `root` is not a directory.
pub fn walk_markdown(root: &Path) -> Result<MarkdownScan> {
    scan(root, false)
}

/// Record files under `root`: `*.md` without `README.md`, hidden entries
/// excluded.
///
/// # Errors
///
/// Returns an error if `root` is not a directory.
pub fn markdown_files(root: &Path) -> Result<MarkdownScan> {
    let mut scan = scan(root, true)?;
    scan.files.retain(|p| {
        !p.file_name()
            .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case("readme.md"))
    });
    Ok(scan)
}

fn scan(root: &Path, skip_hidden: bool) -> Result<MarkdownScan> {
    if !root.is_dir() {
        return Err(Error::DirectoryMissing {
            path: root.to_path_buf(),
        });
    }

    let mut scan = MarkdownScan::default();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !skip_hidden || e.depth() == 0 || !is_hidden(e))
    {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_markdown(entry.path()) {
                    scan.files.push(entry.into_path());
                }
            }
            Err(err) => {
                let path = err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                scan.errors.push(LoadFailure {
                    path,
                    error: Error::Walk(err),
                });
            }
        }
    }
    scan.files.sort();
    Ok(scan)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// File stem, or the directory name for `<slug>/index.md` layouts.
fn slug_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem.eq_ignore_ascii_case("index") {
        if let Some(parent) = path.parent().and_then(Path::file_name) {
            return parent.to_string_lossy().into_owned();
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, BLOGSTACK, LLMCOMPILER};

    #[test]
    fn test_ongoing_and_completed_split() {
        let dir = testing::projects_dir();
        let catalog = Catalog::load_dir(dir.path()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.failures().is_empty());

        let ongoing: Vec<&str> = catalog.ongoing().iter().map(|e| e.record.name.as_str()).collect();
        assert_eq!(ongoing, vec!["blogstack-k8s"]);

        let completed = catalog.completed();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].record.name, "LLMCompiler-Pro");
        assert_eq!(completed[0].record.start_date.to_string(), "2023-12-01");
        assert_eq!(
            completed[0].record.end_date.map(|d| d.to_string()).as_deref(),
            Some("2024-02-01")
        );
    }

    #[test]
    fn test_entries_newest_first() {
        let dir = testing::projects_dir();
        let catalog = Catalog::load_dir(dir.path()).unwrap();
        let slugs: Vec<&str> = catalog.entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["blogstack-k8s", "llmcompiler-pro"]);
    }

    #[test]
    fn test_failures_do_not_abort_load() {
        crate::logging::init_test_logging();
        let dir = testing::projects_dir();
        testing::write(dir.path(), "broken.md", "---\nname: broken\n---\n");
        testing::write(dir.path(), "notes.txt", "not a record");

        let catalog = Catalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.failures().len(), 1);
        assert!(catalog.failures()[0].path.ends_with("broken.md"));
        assert!(catalog.failures()[0].error.is_content_error());
    }

    #[test]
    fn test_missing_dir() {
        let err = Catalog::load_dir("/nonexistent/projects").unwrap_err();
        assert!(matches!(err, Error::DirectoryMissing { .. }));
    }

    #[test]
    fn test_index_layout_uses_directory_slug() {
        let dir = tempfile::tempdir().unwrap();
        testing::write(dir.path(), "blogstack-k8s/index.md", BLOGSTACK);
        let catalog = Catalog::load_dir(dir.path()).unwrap();
        assert!(catalog.get("blogstack-k8s").is_some());
        assert!(catalog.get("index").is_none());
    }

    #[test]
    fn test_hidden_entries_skipped() {
        let dir = testing::projects_dir();
        testing::write(dir.path(), ".drafts/secret.md", LLMCOMPILER);
        assert_eq!(markdown_files(dir.path()).unwrap().files.len(), 2);

        // README and hidden entries are only dropped for records
        let all = walk_markdown(dir.path()).unwrap().files;
        assert_eq!(all.len(), 4);
        assert!(all.iter().any(|p| p.ends_with(".drafts/secret.md")));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_collected() {
        crate::logging::init_test_logging();
        let dir = testing::projects_dir();
        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("old.md")).unwrap();

        let catalog = Catalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.failures().len(), 1);
        assert!(catalog.failures()[0].path.ends_with("old.md"));
        assert!(matches!(catalog.failures()[0].error, Error::Walk(_)));
        assert!(!catalog.failures()[0].error.is_content_error());
    }

    #[test]
    fn test_with_tag_folds_unicode_case() {
        let dir = tempfile::tempdir().unwrap();
        testing::write(
            dir.path(),
            "a.md",
            &LLMCOMPILER.replace("'Python'", "'Über'"),
        );
        let catalog = Catalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.with_tag("über").len(), 1);
        assert_eq!(catalog.with_tag("ÜBER").len(), 1);
        assert_eq!(catalog.tag_counts().get("Über"), Some(&1));
    }

    #[test]
    fn test_tag_queries() {
        let dir = testing::projects_dir();
        let catalog = Catalog::load_dir(dir.path()).unwrap();

        let tagged = catalog.with_tag("kubernetes");
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].slug, "blogstack-k8s");

        assert!(catalog.query(StatusFilter::Completed, Some("kubernetes")).is_empty());
        assert_eq!(catalog.query(StatusFilter::Completed, Some("python")).len(), 1);
        assert_eq!(catalog.by_status(StatusFilter::All).len(), 2);

        let counts = catalog.tag_counts();
        assert_eq!(counts.get("Python"), Some(&1));
        assert_eq!(counts.get("ArgoCD"), Some(&1));
    }

    #[test]
    fn test_tag_counts_merge_case() {
        let dir = tempfile::tempdir().unwrap();
        testing::write(dir.path(), "a.md", LLMCOMPILER);
        testing::write(
            dir.path(),
            "b.md",
            &LLMCOMPILER.replace("'Python'", "'python'"),
        );
        let catalog = Catalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.tag_counts().get("Python"), Some(&2));
        assert!(!catalog.tag_counts().contains_key("python"));
    }

    #[test]
    fn test_write_record() {
        let record = ProjectRecord::from_document(LLMCOMPILER).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("projects");

        let path = write_record(&target, &record, false).unwrap();
        assert!(path.ends_with("llmcompiler-pro.md"));
        let loaded = CatalogEntry::load(&path).unwrap();
        assert_eq!(loaded.record, record);

        let err = write_record(&target, &record, false).unwrap_err();
        assert!(matches!(err, Error::TargetExists { .. }));
        assert!(write_record(&target, &record, true).is_ok());
    }

    #[test]
    fn test_entry_serializes_flat() {
        let dir = testing::projects_dir();
        let catalog = Catalog::load_dir(dir.path()).unwrap();
        let json = serde_json::to_value(catalog.get("llmcompiler-pro").unwrap()).unwrap();
        assert_eq!(json["slug"], "llmcompiler-pro");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["name"], "LLMCompiler-Pro");
    }

    #[test]
    fn test_status_filter() {
        assert!(StatusFilter::All.matches(ProjectStatus::Ongoing));
        assert!(StatusFilter::Ongoing.matches(ProjectStatus::Ongoing));
        assert!(!StatusFilter::Completed.matches(ProjectStatus::Ongoing));
    }
}
