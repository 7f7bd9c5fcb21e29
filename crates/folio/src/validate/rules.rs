//! Content-shape rules for project records.
//!
//! Each rule has a stable kebab-case id (used in reports and JSON output),
//! a fixed severity and a one-line description.

use serde::Serialize;

/// How bad a violation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth fixing; only fails in strict mode.
    Warning,
    /// The record is unusable as written.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single check applied to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// The file could not be read.
    FileRead,
    /// The document could not be split or parsed at all.
    Frontmatter,
    /// `name` present and non-empty.
    NameRequired,
    /// `description` present and non-empty.
    DescriptionRequired,
    /// `startDate` present.
    StartDateRequired,
    /// `startDate` is a `YYYY-MM-DD` calendar date.
    StartDateFormat,
    /// `endDate`, if present, is a `YYYY-MM-DD` calendar date.
    EndDateFormat,
    /// `endDate` is not before `startDate`.
    EndDateOrder,
    /// `link` present.
    LinkRequired,
    /// `link` is an absolute URL with an allowed scheme.
    LinkUrl,
    /// Every tag is a non-empty string.
    TagsNonEmpty,
    /// No tag appears twice (ignoring case).
    TagsUnique,
    /// `image` is a relative path.
    ImageRelative,
    /// `image` resolves to an existing file.
    ImageExists,
    /// `image` present.
    ImageRequired,
    /// Key outside the record's key set.
    UnknownKey,
}

impl Rule {
    /// Every rule, in evaluation order.
    pub const ALL: &'static [Rule] = &[
        Rule::FileRead,
        Rule::Frontmatter,
        Rule::NameRequired,
        Rule::DescriptionRequired,
        Rule::StartDateRequired,
        Rule::StartDateFormat,
        Rule::EndDateFormat,
        Rule::EndDateOrder,
        Rule::LinkRequired,
        Rule::LinkUrl,
        Rule::TagsNonEmpty,
        Rule::TagsUnique,
        Rule::ImageRelative,
        Rule::ImageExists,
        Rule::ImageRequired,
        Rule::UnknownKey,
    ];

    /// Stable identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::FileRead => "file-read",
            Self::Frontmatter => "frontmatter",
            Self::NameRequired => "name-required",
            Self::DescriptionRequired => "description-required",
            Self::StartDateRequired => "start-date-required",
            Self::StartDateFormat => "start-date-format",
            Self::EndDateFormat => "end-date-format",
            Self::EndDateOrder => "end-date-order",
            Self::LinkRequired => "link-required",
            Self::LinkUrl => "link-url",
            Self::TagsNonEmpty => "tags-non-empty",
            Self::TagsUnique => "tags-unique",
            Self::ImageRelative => "image-relative",
            Self::ImageExists => "image-exists",
            Self::ImageRequired => "image-required",
            Self::UnknownKey => "unknown-key",
        }
    }

    /// Severity of a violation of this rule.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::TagsUnique
            | Self::ImageRelative
            | Self::ImageExists
            | Self::ImageRequired
            | Self::UnknownKey => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// What the rule checks.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::FileRead => "file is readable UTF-8 text",
            Self::Frontmatter => "document has a parseable frontmatter block",
            Self::NameRequired => "name is present and non-empty",
            Self::DescriptionRequired => "description is present and non-empty",
            Self::StartDateRequired => "startDate is present",
            Self::StartDateFormat => "startDate is a YYYY-MM-DD date",
            Self::EndDateFormat => "endDate, if present, is a YYYY-MM-DD date",
            Self::EndDateOrder => "endDate is on or after startDate",
            Self::LinkRequired => "link is present",
            Self::LinkUrl => "link is an absolute URL with an allowed scheme",
            Self::TagsNonEmpty => "tags contain only non-empty strings",
            Self::TagsUnique => "tags are not repeated",
            Self::ImageRelative => "image is a relative path",
            Self::ImageExists => "image points at an existing file",
            Self::ImageRequired => "image is present",
            Self::UnknownKey => "frontmatter uses only record keys",
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A rule that a record broke, with a message naming the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The rule that failed.
    pub rule: Rule,
    /// Copied from the rule so JSON consumers don't need the table.
    pub severity: Severity,
    /// Human-readable detail.
    pub message: String,
}

impl Violation {
    /// Create a violation of `rule`.
    #[must_use]
    pub fn new(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: rule.severity(),
            message: message.into(),
        }
    }

    /// Check if this violation is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.rule, self.message)
    }
}
