//! Error types for folio.
//!
//! This module defines all error types used throughout the folio crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for folio operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Content Errors ===
    /// A document has no frontmatter block.
    #[error("no frontmatter found in {}", path.display())]
    MissingFrontmatter {
        /// Path of the document (or `<input>` for in-memory content).
        path: PathBuf,
    },

    /// A frontmatter block was opened but never closed.
    #[error("frontmatter opened with '---' but never closed")]
    UnterminatedFrontmatter,

    /// The frontmatter block is not valid YAML for the expected shape.
    #[error("invalid frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A required field is absent or empty.
    #[error("missing required field '{field}'")]
    MissingField {
        /// Name of the field as written on disk.
        field: &'static str,
    },

    /// A date field does not hold a `YYYY-MM-DD` calendar date.
    #[error("invalid date in '{field}': '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        /// Name of the field as written on disk.
        field: &'static str,
        /// The offending value.
        value: String,
    },

    /// A link is not a usable absolute URL.
    #[error("invalid link '{value}': {reason}")]
    InvalidUrl {
        /// The offending value.
        value: String,
        /// Why the URL was rejected.
        reason: String,
    },

    /// The end date precedes the start date.
    #[error("endDate {end} is before startDate {start}")]
    DateOrder {
        /// The start date.
        start: chrono::NaiveDate,
        /// The end date.
        end: chrono::NaiveDate,
    },

    /// A tag is empty.
    #[error("tag #{index} is empty")]
    EmptyTag {
        /// Zero-based position of the tag.
        index: usize,
    },

    /// A content directory does not exist.
    #[error("directory not found: {}", path.display())]
    DirectoryMissing {
        /// The missing directory.
        path: PathBuf,
    },

    // === Migration Errors ===
    /// Neither the file name nor the title produced a slug.
    #[error("cannot derive a slug for {}", path.display())]
    EmptySlug {
        /// The source post.
        path: PathBuf,
    },

    /// Two source posts map to the same target slug.
    #[error("slug '{slug}' produced by both {} and {}", first.display(), second.display())]
    SlugCollision {
        /// The shared slug.
        slug: String,
        /// The post that claimed the slug first.
        first: PathBuf,
        /// The post that collided with it.
        second: PathBuf,
    },

    /// A file that would be created already exists.
    #[error("refusing to overwrite existing file {}", path.display())]
    TargetExists {
        /// The existing file.
        path: PathBuf,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Failed to read a content file.
    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        /// The file that couldn't be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a content file.
    #[error("failed to write {}: {source}", path.display())]
    FileWrite {
        /// The file that couldn't be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to walk a content directory.
    #[error("failed to scan directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A specialized Result type for folio operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an invalid date error.
    #[must_use]
    pub fn invalid_date(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            field,
            value: value.into(),
        }
    }

    /// Create an invalid URL error.
    #[must_use]
    pub fn invalid_url(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Attach a path to a missing-frontmatter error raised on in-memory content.
    #[must_use]
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::MissingFrontmatter { .. } => Self::MissingFrontmatter { path: path.into() },
            other => other,
        }
    }

    /// Check if this error describes malformed content rather than an
    /// environment failure.
    #[must_use]
    pub fn is_content_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFrontmatter { .. }
                | Self::UnterminatedFrontmatter
                | Self::Yaml(_)
                | Self::MissingField { .. }
                | Self::InvalidDate { .. }
                | Self::InvalidUrl { .. }
                | Self::DateOrder { .. }
                | Self::EmptyTag { .. }
        )
    }
}
