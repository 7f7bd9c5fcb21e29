//! Blog post frontmatter in the site's current format.

use serde::Serialize;

use super::legacy::{LegacyPost, LegacyValue};
use crate::config::MigrationConfig;
use crate::frontmatter::{FrontmatterWriter, QuoteStyle};

/// Frontmatter of a migrated post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPost {
    /// Post title.
    pub title: String,
    /// Summary shown in listings.
    pub description: String,
    /// Publication date, as written in the legacy post.
    pub date: String,
    /// Labels; empty means the key is left out.
    pub tags: Vec<String>,
    /// Whether the post is hidden from the site.
    pub draft: bool,
}

impl BlogPost {
    /// Map legacy frontmatter onto the current format.
    ///
    /// `title`, `date` and `tags` carry over; `description` and `draft` come
    /// from configuration; every other key (`categories`, `excerpt`, ...)
    /// is dropped.
    #[must_use]
    pub fn transform(legacy: &LegacyPost, config: &MigrationConfig) -> Self {
        let tags = match legacy.get("tags") {
            Some(LegacyValue::List(items)) => items.clone(),
            Some(LegacyValue::Scalar(tag)) if !tag.trim().is_empty() => {
                vec![tag.trim().to_string()]
            }
            _ => Vec::new(),
        };

        Self {
            title: text_or(legacy, "title", &config.default_title),
            description: config.description_placeholder.clone(),
            date: text_or(legacy, "date", &config.default_date),
            tags,
            draft: config.draft,
        }
    }

    /// Render the frontmatter block.
    #[must_use]
    pub fn frontmatter(&self) -> String {
        FrontmatterWriter::new(QuoteStyle::Double)
            .text("title", &self.title)
            .text("description", &self.description)
            .text("date", &self.date)
            .list("tags", &self.tags)
            .flag("draft", self.draft)
            .finish()
    }

    /// Render the full post: frontmatter, a blank line, then `body`.
    #[must_use]
    pub fn to_document(&self, body: &str) -> String {
        format!("{}\n\n{body}", self.frontmatter())
    }
}

/// Trimmed scalar value of `key`, or `default` when absent or blank.
fn text_or(legacy: &LegacyPost, key: &str, default: &str) -> String {
    legacy
        .get_str(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}
