//! Lenient reader for legacy post frontmatter.
//!
//! Legacy posts were written by hand and are not always valid YAML (a
//! title such as `Gradient Descent: The Basics` left unquoted is enough to
//! break a strict parser), so this reader understands only the few shapes
//! the posts actually use:
//!
//! ```text
//! title: "Quoted or bare scalar"
//! tags: ["inline", 'list']
//! categories:
//!   - block
//!   - list
//! ```
//!
//! Anything else in the block is ignored.

use crate::frontmatter::DELIMITER;

/// A frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyValue {
    /// `key: value`
    Scalar(String),
    /// `key: [a, b]` or a `key:` line followed by `- item` lines.
    List(Vec<String>),
}

impl LegacyValue {
    /// Check if the value carries no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
        }
    }
}

/// A legacy post split into frontmatter entries and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyPost {
    entries: Vec<(String, LegacyValue)>,
    body: String,
}

impl LegacyPost {
    /// Value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LegacyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Scalar value of `key`; `None` for lists.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            LegacyValue::Scalar(s) => Some(s),
            LegacyValue::List(_) => None,
        }
    }

    /// List value of `key`; `None` for scalars.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        match self.get(key)? {
            LegacyValue::List(items) => Some(items),
            LegacyValue::Scalar(_) => None,
        }
    }

    /// Keys in the order they first appear.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Post body with surrounding whitespace removed.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    fn set(&mut self, key: String, value: LegacyValue) -> usize {
        if let Some(index) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries[index].1 = value;
            index
        } else {
            self.entries.push((key, value));
            self.entries.len() - 1
        }
    }

    fn push_item(&mut self, index: usize, item: String) {
        if let LegacyValue::List(items) = &mut self.entries[index].1 {
            items.push(item);
        }
    }
}

/// Split a legacy post into frontmatter and body.
///
/// The block must start at the very beginning of the file and ends at the
/// next `---`. Returns `None` when there is no block or it yields no keys.
#[must_use]
pub fn extract(content: &str) -> Option<LegacyPost> {
    let rest = content.strip_prefix(DELIMITER)?;
    let end = rest.find(DELIMITER)?;
    let block = rest[..end].trim();
    let body = rest[end + DELIMITER.len()..].trim();

    let mut post = LegacyPost {
        entries: Vec::new(),
        body: body.to_string(),
    };
    let mut open_list: Option<usize> = None;

    for line in block.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with("  - ") || line.starts_with("    - ") {
            if let Some(index) = open_list {
                let item = line.trim().trim_start_matches(['-', ' ']);
                post.push_item(index, unquote_all(item).to_string());
            }
            continue;
        }

        if line.starts_with(' ') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        open_list = None;
        let key = key.trim().to_string();
        let value = value.trim();

        if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            let items = inner
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| unquote_all(item).to_string())
                .collect();
            post.set(key, LegacyValue::List(items));
        } else if value.is_empty() {
            open_list = Some(post.set(key, LegacyValue::List(Vec::new())));
        } else {
            post.set(key, LegacyValue::Scalar(unquote_pair(value).to_string()));
        }
    }

    if post.entries.is_empty() {
        None
    } else {
        Some(post)
    }
}

/// Strip one matching pair of surrounding quotes.
fn unquote_pair(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Strip every leading and trailing quote character.
fn unquote_all(value: &str) -> &str {
    value.trim_matches(['"', '\''])
}
