//! URL slugs for posts and records.

use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("slug pattern is valid"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("slug pattern is valid"));
static DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("slug pattern is valid"));
static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}-").expect("slug pattern is valid"));

/// Turn a title into a lowercase, dash-separated slug.
///
/// May return an empty string when the title has no word characters.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = DISALLOWED.replace_all(&lower, "");
    let dashed = SEPARATORS.replace_all(&kept, "-");
    let collapsed = DASHES.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

/// Slug for a post file such as `2021-08-03-Gradient descent-basic.md`.
///
/// The extension and a leading `YYYY-MM-DD-` prefix are dropped first.
#[must_use]
pub fn slug_from_filename(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _ext)| stem);
    slugify(&DATE_PREFIX.replace(stem, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("LLMCompiler-Pro"), "llmcompiler-pro");
        assert_eq!(slugify("C++ & Rust_2024"), "c-rust-2024");
        assert_eq!(slugify("  --Spaced   out--  "), "spaced-out");
        assert_eq!(slugify("Über Café"), "über-café");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!! ???"), "");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_shape() {
        for title in ["a__b", "a - - b", "The  Title:  Part 2", "__x__"] {
            let slug = slugify(title);
            assert!(!slug.starts_with('-') && !slug.ends_with('-'), "{slug}");
            assert!(!slug.contains("--"), "{slug}");
            assert!(!slug.chars().any(char::is_uppercase), "{slug}");
        }
    }

    #[test]
    fn test_slug_from_filename() {
        assert_eq!(
            slug_from_filename("2021-08-03-Gradient descent-basic.md"),
            "gradient-descent-basic"
        );
        assert_eq!(slug_from_filename("about-me.md"), "about-me");
        assert_eq!(slug_from_filename("no-extension"), "no-extension");
        assert_eq!(slug_from_filename("2021-08-03-.md"), "");
    }

    #[test]
    fn test_date_prefix_only_at_start() {
        assert_eq!(
            slug_from_filename("notes-2021-08-03-x.md"),
            "notes-2021-08-03-x"
        );
    }
}
