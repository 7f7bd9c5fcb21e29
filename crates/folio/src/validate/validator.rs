//! Record validator.
//!
//! Unlike `ProjectRecord::try_from`, which stops at the first problem, the
//! validator runs every rule and collects all violations into a report.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::rules::{Rule, Severity, Violation};
use crate::catalog::markdown_files;
use crate::config::ValidationConfig;
use crate::error::{Error, Result};
use crate::record::{self, RawProject, KNOWN_KEYS};

/// Outcome of validating one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// File the record came from, when it came from a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Every violation found, in rule order.
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Violations with error severity.
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_error())
    }

    /// Violations with warning severity.
    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
    }

    /// Number of errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    /// Number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Check if nothing at all was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Check if the record is acceptable. Strict mode also rejects warnings.
    #[must_use]
    pub fn passes(&self, strict: bool) -> bool {
        if strict {
            self.is_clean()
        } else {
            self.error_count() == 0
        }
    }

    /// Check if any violation comes from `rule`.
    #[must_use]
    pub fn has(&self, rule: Rule) -> bool {
        self.violations.iter().any(|v| v.rule == rule)
    }
}

/// Applies the record rules under a [`ValidationConfig`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a validator.
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Whether warnings fail validation under this configuration.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.config.strict
    }

    /// Validate already-parsed frontmatter.
    ///
    /// `source` is the record's file; it is needed only for `image-exists`.
    #[must_use]
    pub fn check(&self, raw: &RawProject, source: Option<&Path>) -> ValidationReport {
        let mut violations = Vec::new();

        require_text(raw.name.as_deref(), Rule::NameRequired, "name", &mut violations);
        require_text(
            raw.description.as_deref(),
            Rule::DescriptionRequired,
            "description",
            &mut violations,
        );
        check_dates(raw, &mut violations);
        self.check_link(raw.link.as_deref(), &mut violations);
        check_tags(raw.tags.as_deref(), &mut violations);
        self.check_image(raw.image.as_deref(), source, &mut violations);

        if self.config.warn_unknown_keys {
            for key in raw.unknown_keys() {
                violations.push(Violation::new(
                    Rule::UnknownKey,
                    format!(
                        "unknown key '{key}' (expected one of: {})",
                        KNOWN_KEYS.join(", ")
                    ),
                ));
            }
        }

        let report = ValidationReport {
            path: source.map(Path::to_path_buf),
            violations,
        };
        debug!(
            path = ?report.path,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Validated project record"
        );
        report
    }

    /// Validate a whole document. Unparseable frontmatter yields a report
    /// with a single `frontmatter` error.
    #[must_use]
    pub fn check_document(&self, content: &str, source: Option<&Path>) -> ValidationReport {
        match RawProject::from_document(content) {
            Ok(raw) => self.check(&raw, source),
            Err(err) => {
                let err = match source {
                    Some(path) => err.with_path(path),
                    None => err,
                };
                ValidationReport {
                    path: source.map(Path::to_path_buf),
                    violations: vec![Violation::new(Rule::Frontmatter, err.to_string())],
                }
            }
        }
    }

    /// Read and validate one file.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be read; content problems
    /// are reported as violations.
    pub fn check_file(&self, path: impl AsRef<Path>) -> Result<ValidationReport> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.check_document(&content, Some(path)))
    }

    /// Validate every project file under `dir`, one report per file, sorted
    /// by path.
    ///
    /// A file that cannot be read, or an entry the walk cannot follow, gets a
    /// report with a single `file-read` error.
    ///
    /// # Errors
    ///
    /// Returns an error only if `dir` does not exist.
    pub fn check_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<ValidationReport>> {
        let scan = markdown_files(dir.as_ref())?;
        let mut reports: Vec<ValidationReport> = scan
            .files
            .iter()
            .map(|path| {
                self.check_file(path)
                    .unwrap_or_else(|err| unreadable(path, &err))
            })
            .collect();
        reports.extend(scan.errors.iter().map(|f| unreadable(&f.path, &f.error)));
        reports.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(reports)
    }

    fn check_link(&self, link: Option<&str>, violations: &mut Vec<Violation>) {
        let Some(link) = link.filter(|l| !l.trim().is_empty()) else {
            violations.push(Violation::new(Rule::LinkRequired, "link is missing"));
            return;
        };

        match record::parse_link(link) {
            Ok(url) => {
                let allowed = self
                    .config
                    .allowed_link_schemes
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(url.scheme()));
                if !allowed {
                    violations.push(Violation::new(
                        Rule::LinkUrl,
                        format!(
                            "link '{link}' uses scheme '{}' (allowed: {})",
                            url.scheme(),
                            self.config.allowed_link_schemes.join(", ")
                        ),
                    ));
                }
            }
            Err(err) => violations.push(Violation::new(Rule::LinkUrl, err.to_string())),
        }
    }

    fn check_image(
        &self,
        image: Option<&str>,
        source: Option<&Path>,
        violations: &mut Vec<Violation>,
    ) {
        let Some(image) = image.filter(|i| !i.trim().is_empty()) else {
            if self.config.require_image {
                violations.push(Violation::new(Rule::ImageRequired, "image is missing"));
            }
            return;
        };

        if is_absolute_reference(image) {
            violations.push(Violation::new(
                Rule::ImageRelative,
                format!("image '{image}' should be a path relative to the record"),
            ));
            return;
        }

        if self.config.check_assets {
            if let Some(base) = source.and_then(Path::parent) {
                let resolved = base.join(image);
                trace!(image = %resolved.display(), "Checking image asset");
                if !resolved.is_file() {
                    violations.push(Violation::new(
                        Rule::ImageExists,
                        format!("image '{image}' not found at {}", resolved.display()),
                    ));
                }
            }
        }
    }
}

fn unreadable(path: &Path, err: &Error) -> ValidationReport {
    warn!(path = %path.display(), error = %err, "Cannot read project record");
    ValidationReport {
        path: Some(path.to_path_buf()),
        violations: vec![Violation::new(Rule::FileRead, err.to_string())],
    }
}

fn check_dates(raw: &RawProject, violations: &mut Vec<Violation>) {
    let start = match raw.start_date.as_deref().map(str::trim) {
        None | Some("") => {
            violations.push(Violation::new(
                Rule::StartDateRequired,
                "startDate is missing",
            ));
            None
        }
        Some(value) => match record::parse_date("startDate", value) {
            Ok(date) => Some(date),
            Err(err) => {
                violations.push(Violation::new(Rule::StartDateFormat, err.to_string()));
                None
            }
        },
    };

    let end = raw
        .end_date
        .as_deref()
        .and_then(|value| match record::parse_date("endDate", value) {
            Ok(date) => Some(date),
            Err(err) => {
                violations.push(Violation::new(Rule::EndDateFormat, err.to_string()));
                None
            }
        });

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            violations.push(Violation::new(
                Rule::EndDateOrder,
                Error::DateOrder { start, end }.to_string(),
            ));
        }
    }
}

fn require_text(
    value: Option<&str>,
    rule: Rule,
    field: &'static str,
    violations: &mut Vec<Violation>,
) {
    match value.map(str::trim) {
        None => violations.push(Violation::new(rule, format!("{field} is missing"))),
        Some("") => violations.push(Violation::new(rule, format!("{field} is empty"))),
        Some(_) => {}
    }
}

fn check_tags(tags: Option<&[String]>, violations: &mut Vec<Violation>) {
    let Some(tags) = tags else { return };

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for (index, tag) in tags.iter().enumerate() {
        let normalized = tag.trim().to_lowercase();
        if normalized.is_empty() {
            violations.push(Violation::new(
                Rule::TagsNonEmpty,
                Error::EmptyTag { index }.to_string(),
            ));
            continue;
        }
        if !seen.insert(normalized.clone()) && reported.insert(normalized) {
            violations.push(Violation::new(
                Rule::TagsUnique,
                format!("tag '{}' appears more than once", tag.trim()),
            ));
        }
    }
}

fn is_absolute_reference(image: &str) -> bool {
    Path::new(image).is_absolute()
        || image.starts_with('/')
        || image.starts_with('\\')
        || image.contains("://")
}
