//! Configuration management for folio.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::NaiveDate;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory under the user's config dir that holds folio's files.
const CONFIG_DIR_NAME: &str = "folio";

/// Prefix for environment overrides, e.g. `FOLIO_MIGRATION__TARGET_DIR`.
const ENV_PREFIX: &str = "FOLIO_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FOLIO_`, sections split on `__`)
/// 2. TOML config file at `~/.config/folio/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where content lives.
    pub content: ContentConfig,
    /// Project record validation.
    pub validation: ValidationConfig,
    /// Blog post migration.
    pub migration: MigrationConfig,
}

/// Content locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory scanned for project records.
    pub projects_dir: PathBuf,
}

/// Validation behaviour for project records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// URL schemes accepted for `link`.
    pub allowed_link_schemes: Vec<String>,
    /// Report frontmatter keys outside the known record keys.
    pub warn_unknown_keys: bool,
    /// Warn when a record has no `image`.
    pub require_image: bool,
    /// Warn when `image` does not resolve to an existing file.
    pub check_assets: bool,
    /// Treat warnings as failures.
    pub strict: bool,
}

/// Blog post migration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Directory holding legacy posts.
    pub source_dir: PathBuf,
    /// Directory that receives `<slug>/index.md` posts.
    pub target_dir: PathBuf,
    /// Title used when a post has none.
    pub default_title: String,
    /// Date used when a post has none.
    pub default_date: String,
    /// Description written into every migrated post.
    pub description_placeholder: String,
    /// Value of `draft` on migrated posts.
    pub draft: bool,
    /// File names (case-insensitive) that are never migrated.
    pub skip_files: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from("src/content/projects"),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allowed_link_schemes: vec!["https".to_string(), "http".to_string()],
            warn_unknown_keys: true,
            require_image: false,
            check_assets: false,
            strict: false,
        }
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("content/posts"),
            target_dir: PathBuf::from("src/content/blog"),
            default_title: "Untitled".to_string(),
            default_date: "2021-01-01".to_string(),
            description_placeholder: ".".to_string(),
            draft: false,
            skip_files: vec!["readme.md".to_string()],
        }
    }
}

impl MigrationConfig {
    /// Check whether a file name is on the skip list.
    #[must_use]
    pub fn is_skipped(&self, file_name: &str) -> bool {
        self.skip_files
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(file_name))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        tracing::debug!(path = %config_file.display(), "Loading configuration");

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.validation.allowed_link_schemes.is_empty() {
            return Err(Error::config(
                "allowed_link_schemes must name at least one scheme",
            ));
        }

        if let Some(scheme) = self
            .validation
            .allowed_link_schemes
            .iter()
            .find(|s| !is_valid_scheme(s))
        {
            return Err(Error::config(format!("invalid link scheme: '{scheme}'")));
        }

        if NaiveDate::parse_from_str(&self.migration.default_date, "%Y-%m-%d").is_err() {
            return Err(Error::config(format!(
                "default_date ({}) is not a YYYY-MM-DD date",
                self.migration.default_date
            )));
        }

        if self.migration.default_title.trim().is_empty() {
            return Err(Error::config("default_title must not be empty"));
        }

        if self.migration.description_placeholder.is_empty() {
            return Err(Error::config("description_placeholder must not be empty"));
        }

        if self.migration.source_dir == self.migration.target_dir {
            return Err(Error::config(format!(
                "migration source_dir and target_dir are both {}",
                self.migration.source_dir.display()
            )));
        }

        Ok(())
    }
}

/// RFC 3986 scheme: a letter followed by letters, digits, `+`, `-` or `.`.
fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(
            config.content.projects_dir,
            PathBuf::from("src/content/projects")
        );
        assert!(config.validation.warn_unknown_keys);
        assert!(!config.validation.strict);
        assert!(!config.migration.draft);
    }

    #[test]
    fn test_default_validation_config() {
        let validation = ValidationConfig::default();

        assert_eq!(validation.allowed_link_schemes, vec!["https", "http"]);
        assert!(!validation.require_image);
        assert!(!validation.check_assets);
    }

    #[test]
    fn test_default_migration_config() {
        let migration = MigrationConfig::default();

        assert_eq!(migration.source_dir, PathBuf::from("content/posts"));
        assert_eq!(migration.target_dir, PathBuf::from("src/content/blog"));
        assert_eq!(migration.default_title, "Untitled");
        assert_eq!(migration.default_date, "2021-01-01");
        assert_eq!(migration.description_placeholder, ".");
        assert_eq!(migration.skip_files, vec!["readme.md"]);
    }

    #[test]
    fn test_is_skipped_ignores_case() {
        let migration = MigrationConfig::default();
        assert!(migration.is_skipped("README.md"));
        assert!(migration.is_skipped("readme.md"));
        assert!(!migration.is_skipped("readme.markdown"));
        assert!(!migration.is_skipped("2021-01-01-hello.md"));
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_schemes() {
        let mut config = Config::default();
        config.validation.allowed_link_schemes.clear();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("allowed_link_schemes"));
    }

    #[test]
    fn test_validate_bad_scheme() {
        let mut config = Config::default();
        config.validation.allowed_link_schemes = vec!["ht tp".to_string()];

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("ht tp"));
    }

    #[test]
    fn test_validate_bad_default_date() {
        let mut config = Config::default();
        config.migration.default_date = "01/01/2021".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_date"));
    }

    #[test]
    fn test_validate_empty_placeholder() {
        let mut config = Config::default();
        config.migration.description_placeholder = String::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("description_placeholder"));
    }

    #[test]
    fn test_validate_same_source_and_target() {
        let mut config = Config::default();
        config.migration.target_dir = config.migration.source_dir.clone();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("source_dir"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("folio"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/folio/config.toml")));
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[content]
projects_dir = "site/projects"

[validation]
strict = true

[migration]
default_title = "Draft"
skip_files = ["readme.md", "index.md"]
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.content.projects_dir, PathBuf::from("site/projects"));
        assert!(config.validation.strict);
        assert_eq!(config.migration.default_title, "Draft");
        assert!(config.migration.is_skipped("INDEX.md"));
        // Untouched keys keep their defaults
        assert_eq!(config.migration.default_date, "2021-01-01");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[migration]\ndefault_date = \"someday\"\n").unwrap();

        let err = Config::load_from(Some(path)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("projects_dir"));
        assert!(json.contains("description_placeholder"));
    }

    #[test]
    fn test_migration_config_deserialize() {
        let json = r#"{"default_title": "Sans titre", "draft": true}"#;
        let migration: MigrationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(migration.default_title, "Sans titre");
        assert!(migration.draft);
        assert_eq!(migration.default_date, "2021-01-01");
    }
}
