//! Project records.
//!
//! A project record is one portfolio item, stored as a markdown file whose
//! frontmatter carries the fields below and whose body is usually empty:
//!
//! ```markdown
//! ---
//! name: 'LLMCompiler-Pro'
//! description: 'Parallel function calling planner for LLM agents'
//! tags: ['Python', 'LLM', 'LangGraph']
//! image: '../../assets/projects/llmcompiler-pro.png'
//! link: 'https://github.com/example/LLMCompiler-Pro'
//! startDate: '2023-12-01'
//! endDate: '2024-02-01'
//! ---
//! ```
//!
//! [`RawProject`] is the lenient view of that block (every field optional,
//! unknown keys kept) and [`ProjectRecord`] is the checked, typed record.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::frontmatter::{self, FrontmatterWriter, QuoteStyle};

/// Frontmatter keys a project record may carry.
pub const KNOWN_KEYS: &[&str] = &[
    "name",
    "description",
    "tags",
    "image",
    "link",
    "startDate",
    "endDate",
];

/// On-disk date layout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Whether a project is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// No `endDate`.
    Ongoing,
    /// Has an `endDate`.
    Completed,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Frontmatter of a project file exactly as written.
///
/// Scalars that YAML reads as numbers or booleans are kept as their text,
/// so `name: 2048` is the name `"2048"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    /// Project title.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Free-text summary.
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    /// Technology/category labels.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub tags: Option<Vec<String>>,
    /// Relative path to a static asset.
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,
    /// External repository URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub link: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, absent while the project is ongoing.
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    /// Keys outside [`KNOWN_KEYS`].
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RawProject {
    /// Parse the frontmatter of a project document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no (or malformed) frontmatter.
    pub fn from_document(content: &str) -> Result<Self> {
        let (raw, _body) = frontmatter::parse::<Self>(content)?;
        Ok(raw)
    }

    /// Names of keys that are not record fields.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.extra.keys().map(String::as_str)
    }
}

/// A checked project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Project title (non-empty).
    pub name: String,
    /// Free-text summary (non-empty).
    pub description: String,
    /// Labels in authoring order.
    pub tags: Vec<String>,
    /// Relative path to a static asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    /// External repository URL.
    pub link: Url,
    /// First day of the project.
    pub start_date: NaiveDate,
    /// Last day of the project, if it is finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ProjectRecord {
    /// Parse and check a project document.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: missing frontmatter, bad YAML, a
    /// missing required field, a malformed date or link, or dates out of
    /// order.
    pub fn from_document(content: &str) -> Result<Self> {
        Self::try_from(RawProject::from_document(content)?)
    }

    /// Ongoing or completed, decided by the presence of `endDate`.
    #[must_use]
    pub fn status(&self) -> ProjectStatus {
        if self.end_date.is_some() {
            ProjectStatus::Completed
        } else {
            ProjectStatus::Ongoing
        }
    }

    /// Check if the project has no end date.
    #[must_use]
    pub fn is_ongoing(&self) -> bool {
        self.status() == ProjectStatus::Ongoing
    }

    /// Check if the project has an end date.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status() == ProjectStatus::Completed
    }

    /// Length in days of a completed project.
    #[must_use]
    pub fn duration_days(&self) -> Option<i64> {
        self.end_date
            .map(|end| end.signed_duration_since(self.start_date).num_days())
    }

    /// Check if the record carries `tag`, ignoring case.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// Render the record as a project document (frontmatter only).
    #[must_use]
    pub fn to_document(&self) -> String {
        let image = self.image.as_ref().map(|p| p.to_string_lossy());
        let end_date = self.end_date.map(|d| d.format(DATE_FORMAT).to_string());

        let mut doc = FrontmatterWriter::new(QuoteStyle::Single)
            .text("name", &self.name)
            .text("description", &self.description)
            .list("tags", &self.tags)
            .maybe_text("image", image.as_deref())
            .text("link", self.link.as_str())
            .text("startDate", &self.start_date.format(DATE_FORMAT).to_string())
            .maybe_text("endDate", end_date.as_deref())
            .finish();
        doc.push('\n');
        doc
    }
}

impl TryFrom<RawProject> for ProjectRecord {
    type Error = Error;

    fn try_from(raw: RawProject) -> Result<Self> {
        let name = required(raw.name, "name")?;
        let description = required(raw.description, "description")?;
        let link = parse_link(&required(raw.link, "link")?)?;
        let start_date = parse_date("startDate", &required(raw.start_date, "startDate")?)?;
        let end_date = raw
            .end_date
            .map(|value| parse_date("endDate", &value))
            .transpose()?;

        if let Some(end) = end_date {
            if end < start_date {
                return Err(Error::DateOrder {
                    start: start_date,
                    end,
                });
            }
        }

        let tags = raw.tags.unwrap_or_default();
        if let Some(index) = tags.iter().position(|t| t.trim().is_empty()) {
            return Err(Error::EmptyTag { index });
        }

        Ok(Self {
            name,
            description,
            tags,
            image: raw.image.filter(|i| !i.trim().is_empty()).map(PathBuf::from),
            link,
            start_date,
            end_date,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::missing_field(field))
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] for any other layout or an impossible
/// date such as `2023-02-30`.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if !DATE_PATTERN.is_match(trimmed) {
        return Err(Error::invalid_date(field, value));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| Error::invalid_date(field, value))
}

/// Parse an absolute link URL.
///
/// Scheme policy is left to the validator; this only rejects text that is
/// not a URL or cannot serve as a link target (e.g. `mailto:`).
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] describing the problem.
pub fn parse_link(value: &str) -> Result<Url> {
    let url = Url::parse(value.trim()).map_err(|e| Error::invalid_url(value, e.to_string()))?;
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(Error::invalid_url(value, "URL has no host"));
    }
    Ok(url)
}

fn scalar_text<E: serde::de::Error>(value: Value) -> std::result::Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Sequence(_) => Err(E::custom("expected a string, found a list")),
        Value::Mapping(_) => Err(E::custom("expected a string, found a mapping")),
        Value::Tagged(tagged) => scalar_text(tagged.value),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(Value::deserialize(deserializer)?)
}

fn lenient_string_list<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| scalar_text(item).map(Option::unwrap_or_default))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Some),
        other => Err(D::Error::custom(format!(
            "expected a list of strings, found {}",
            describe(&other)
        ))),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
