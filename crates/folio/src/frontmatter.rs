//! Frontmatter splitting, parsing and rendering.
//!
//! A content document starts with a YAML block fenced by `---` lines:
//!
//! ```markdown
//! ---
//! name: 'blogstack-k8s'
//! tags: ['Kubernetes', 'ArgoCD']
//! startDate: '2025-01-06'
//! ---
//! ```
//!
//! [`split`] separates the block from the body, [`parse`] deserializes the
//! block, and [`FrontmatterWriter`] produces the same layout back.
//!
//! ```
//! use folio::frontmatter::{self, FrontmatterWriter, QuoteStyle};
//!
//! let doc = frontmatter::split("---\nname: demo\n---\nBody\n").unwrap();
//! assert_eq!(doc.frontmatter(), Some("name: demo\n"));
//! assert_eq!(doc.body(), "Body\n");
//!
//! let rendered = FrontmatterWriter::new(QuoteStyle::Single)
//!     .text("name", "demo")
//!     .list("tags", ["a", "b"])
//!     .finish();
//! assert_eq!(rendered, "---\nname: 'demo'\ntags: ['a', 'b']\n---");
//! ```

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};

/// The fence line around a frontmatter block.
pub const DELIMITER: &str = "---";

/// A document split into its frontmatter block and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
    frontmatter: Option<&'a str>,
    body: &'a str,
}

impl<'a> Document<'a> {
    /// Raw YAML between the fences, if the document has a block.
    #[must_use]
    pub fn frontmatter(&self) -> Option<&'a str> {
        self.frontmatter
    }

    /// Everything after the closing fence.
    #[must_use]
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Check if the document has a frontmatter block.
    #[must_use]
    pub fn has_frontmatter(&self) -> bool {
        self.frontmatter.is_some()
    }
}

/// Split a document into frontmatter and body.
///
/// The first line must be exactly `---` (trailing whitespace allowed); the
/// block ends at the next such line. A leading byte-order mark is ignored.
///
/// # Errors
///
/// Returns [`Error::UnterminatedFrontmatter`] if the opening fence has no
/// matching closing fence.
pub fn split(content: &str) -> Result<Document<'_>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return Ok(Document {
            frontmatter: None,
            body: content,
        });
    };
    if first.trim_end() != DELIMITER {
        return Ok(Document {
            frontmatter: None,
            body: content,
        });
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Ok(Document {
                frontmatter: Some(&content[block_start..offset]),
                body: &content[offset + line.len()..],
            });
        }
        offset += line.len();
    }

    Err(Error::UnterminatedFrontmatter)
}

/// Split a document and deserialize its frontmatter.
///
/// An empty block deserializes like an empty mapping, so types whose fields
/// are all optional still parse.
///
/// # Errors
///
/// Returns [`Error::MissingFrontmatter`] when there is no block,
/// [`Error::UnterminatedFrontmatter`] when it is not closed, and
/// [`Error::Yaml`] when the block does not fit `T`.
pub fn parse<T: DeserializeOwned>(content: &str) -> Result<(T, &str)> {
    let doc = split(content)?;
    let Some(block) = doc.frontmatter() else {
        return Err(Error::MissingFrontmatter {
            path: PathBuf::from("<input>"),
        });
    };

    let value = if block.trim().is_empty() {
        serde_yaml::from_value(Value::Mapping(Mapping::new()))?
    } else {
        serde_yaml::from_str(block)?
    };
    Ok((value, doc.body()))
}

/// How string values are quoted when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// `'value'`, the style of hand-written project records.
    #[default]
    Single,
    /// `"value"`, the style of migrated blog posts.
    Double,
}

impl QuoteStyle {
    /// Quote a scalar for use as a YAML value.
    ///
    /// Single-quoted YAML cannot carry line breaks, so multi-line values
    /// always fall back to double quotes.
    #[must_use]
    pub fn quote(self, value: &str) -> String {
        match self {
            Self::Single if !value.contains(['\n', '\r']) => {
                format!("'{}'", value.replace('\'', "''"))
            }
            _ => {
                let mut out = String::with_capacity(value.len() + 2);
                out.push('"');
                for c in value.chars() {
                    match c {
                        '\\' => out.push_str("\\\\"),
                        '"' => out.push_str("\\\""),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        _ => out.push(c),
                    }
                }
                out.push('"');
                out
            }
        }
    }
}

/// Ordered builder for a frontmatter block.
///
/// Keys are emitted in insertion order. Empty lists are left out entirely.
#[derive(Debug, Clone, Default)]
pub struct FrontmatterWriter {
    style: QuoteStyle,
    lines: Vec<String>,
}

impl FrontmatterWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new(style: QuoteStyle) -> Self {
        Self {
            style,
            lines: Vec::new(),
        }
    }

    /// Add a quoted string field.
    #[must_use]
    pub fn text(mut self, key: &str, value: &str) -> Self {
        self.lines.push(format!("{key}: {}", self.style.quote(value)));
        self
    }

    /// Add a string field only when a value is present.
    #[must_use]
    pub fn maybe_text(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.text(key, value),
            None => self,
        }
    }

    /// Add an inline list field, e.g. `tags: ['a', 'b']`.
    #[must_use]
    pub fn list<I, S>(mut self, key: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let quoted: Vec<String> = items
            .into_iter()
            .map(|item| self.style.quote(item.as_ref()))
            .collect();
        if !quoted.is_empty() {
            self.lines.push(format!("{key}: [{}]", quoted.join(", ")));
        }
        self
    }

    /// Add a boolean field (`true` / `false`).
    #[must_use]
    pub fn flag(mut self, key: &str, value: bool) -> Self {
        self.lines.push(format!("{key}: {value}"));
        self
    }

    /// Render the block, fences included, without a trailing newline.
    #[must_use]
    pub fn finish(self) -> String {
        let mut out = String::from(DELIMITER);
        for line in self.lines {
            out.push('\n');
            out.push_str(&line);
        }
        out.push('\n');
        out.push_str(DELIMITER);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Meta {
        name: String,
        #[serde(default)]
        tags: Vec<String>,
    }

    #[test]
    fn test_split_with_frontmatter() {
        let doc = split("---\nname: a\n---\n# Heading\n").unwrap();
        assert!(doc.has_frontmatter());
        assert_eq!(doc.frontmatter(), Some("name: a\n"));
        assert_eq!(doc.body(), "# Heading\n");
    }

    #[test]
    fn test_split_without_frontmatter() {
        let doc = split("# Just markdown\n").unwrap();
        assert!(!doc.has_frontmatter());
        assert_eq!(doc.body(), "# Just markdown\n");
    }

    #[test]
    fn test_split_empty_content() {
        let doc = split("").unwrap();
        assert!(!doc.has_frontmatter());
        assert_eq!(doc.body(), "");
    }

    #[test]
    fn test_split_empty_block() {
        let doc = split("---\n---\nbody").unwrap();
        assert_eq!(doc.frontmatter(), Some(""));
        assert_eq!(doc.body(), "body");
    }

    #[test]
    fn test_split_closing_fence_without_newline() {
        let doc = split("---\nname: a\n---").unwrap();
        assert_eq!(doc.frontmatter(), Some("name: a\n"));
        assert_eq!(doc.body(), "");
    }

    #[test]
    fn test_split_crlf_and_bom() {
        let doc = split("\u{feff}---\r\nname: a\r\n---\r\nbody").unwrap();
        assert_eq!(doc.frontmatter(), Some("name: a\r\n"));
        assert_eq!(doc.body(), "body");
    }

    #[test]
    fn test_split_ignores_dashes_inside_lines() {
        let doc = split("---\ntitle: a --- b\n---\nbody").unwrap();
        assert_eq!(doc.frontmatter(), Some("title: a --- b\n"));
    }

    #[test]
    fn test_split_dashes_not_on_first_line() {
        let doc = split("intro\n---\nname: a\n---\n").unwrap();
        assert!(!doc.has_frontmatter());
    }

    #[test]
    fn test_split_unterminated() {
        let err = split("---\nname: a\n").unwrap_err();
        assert!(matches!(err, Error::UnterminatedFrontmatter));
    }

    #[test]
    fn test_parse_single_quoted_values() {
        let (meta, body): (Meta, _) =
            parse("---\nname: 'LLMCompiler-Pro'\ntags: ['Python', 'LLM']\n---\n").unwrap();
        assert_eq!(meta.name, "LLMCompiler-Pro");
        assert_eq!(meta.tags, vec!["Python", "LLM"]);
        assert_eq!(body, "");
    }

    #[test]
    fn test_parse_missing_frontmatter() {
        let err = parse::<Meta>("no fences here").unwrap_err();
        assert!(matches!(err, Error::MissingFrontmatter { .. }));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = parse::<Meta>("---\nname: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_parse_empty_block_into_optional_fields() {
        #[derive(Debug, Deserialize, Default)]
        struct Loose {
            name: Option<String>,
        }
        let (loose, _): (Loose, _) = parse("---\n---\n").unwrap();
        assert!(loose.name.is_none());
    }

    #[test]
    fn test_quote_single() {
        assert_eq!(QuoteStyle::Single.quote("plain"), "'plain'");
        assert_eq!(QuoteStyle::Single.quote("it's"), "'it''s'");
        assert_eq!(QuoteStyle::Single.quote("two\nlines"), "\"two\\nlines\"");
    }

    #[test]
    fn test_quote_double() {
        assert_eq!(QuoteStyle::Double.quote("plain"), "\"plain\"");
        assert_eq!(
            QuoteStyle::Double.quote(r#"say "hi": now"#),
            r#""say \"hi\": now""#
        );
        assert_eq!(QuoteStyle::Double.quote(r"C:\path"), r#""C:\\path""#);
    }

    #[test]
    fn test_writer_layout() {
        let block = FrontmatterWriter::new(QuoteStyle::Double)
            .text("title", "Hello")
            .list("tags", ["rust", "cli"])
            .flag("draft", false)
            .finish();
        assert_eq!(
            block,
            "---\ntitle: \"Hello\"\ntags: [\"rust\", \"cli\"]\ndraft: false\n---"
        );
    }

    #[test]
    fn test_writer_skips_empty_list_and_missing_text() {
        let block = FrontmatterWriter::new(QuoteStyle::Single)
            .text("name", "x")
            .list("tags", Vec::<String>::new())
            .maybe_text("endDate", None)
            .finish();
        assert_eq!(block, "---\nname: 'x'\n---");
    }

    #[test]
    fn test_writer_output_parses_back() {
        let block = FrontmatterWriter::new(QuoteStyle::Single)
            .text("name", "O'Brien: notes")
            .list("tags", ["a, b", "c"])
            .finish();
        let (meta, _): (Meta, _) = parse(&format!("{block}\n")).unwrap();
        assert_eq!(meta.name, "O'Brien: notes");
        assert_eq!(meta.tags, vec!["a, b", "c"]);
    }
}
