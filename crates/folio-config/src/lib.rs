//! Configuration management for folio.
//!
//! Parses `folio.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Every field has a
//! default, so a missing file or an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("configuration error: {0}")]
    Validation(String),
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content fetching configuration.
    pub content: ContentConfig,
    /// Listing configuration.
    pub listing: ListingConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
    /// Resolved manifest path (set after loading, relative paths resolved
    /// against the config file's directory).
    #[serde(skip)]
    pub manifest_resolved: Option<PathBuf>,
}

/// Content fetching configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Base URL prepended to external body paths that are not absolute URLs.
    pub base_url: Option<String>,
    /// HTTP timeout in seconds for the single fetch attempt.
    pub timeout_secs: u64,
    /// Manifest file path; when unset the bundled manifest is used.
    pub manifest_path: Option<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 10,
            manifest_path: None,
        }
    }
}

/// Listing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Documents per page.
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: 6 }
    }
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `folio.toml` in the current directory and parents and
    /// falls back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, parsing
    /// fails, or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default()),
        }
    }

    /// Search for the config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;
        Ok(config)
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.manifest_resolved = self
            .content
            .manifest_path
            .as_deref()
            .map(|p| config_dir.join(p));
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field holds an unusable
    /// value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.content.base_url {
            if base_url.is_empty() {
                return Err(ConfigError::Validation(
                    "content.base_url cannot be empty".to_owned(),
                ));
            }
            require_http_url(base_url, "content.base_url")?;
        }
        if self.content.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "content.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.listing.page_size == 0 {
            return Err(ConfigError::Validation(
                "listing.page_size must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.content.timeout_secs, 10);
        assert_eq!(config.listing.page_size, 6);
        assert!(config.content.base_url.is_none());
        assert!(config.manifest_resolved.is_none());
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").expect("empty config is valid");
        assert_eq!(config.listing.page_size, 6);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[content]
base_url = "https://example.com/content"
timeout_secs = 5
manifest_path = "content/manifest.toml"

[listing]
page_size = 10
"#;
        let config: Config = toml::from_str(toml).expect("parses");
        assert_eq!(
            config.content.base_url.as_deref(),
            Some("https://example.com/content")
        );
        assert_eq!(config.content.timeout_secs, 5);
        assert_eq!(config.listing.page_size, 10);
    }

    #[test]
    fn test_resolve_manifest_path() {
        let toml = r#"
[content]
manifest_path = "content/manifest.toml"
"#;
        let mut config: Config = toml::from_str(toml).expect("parses");
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.manifest_resolved,
            Some(PathBuf::from("/project/content/manifest.toml"))
        );
    }

    #[test]
    fn test_validate_default_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.listing.page_size = 0;
        let err = config.validate().expect_err("must fail");
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.content.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_base_url() {
        let mut config = Config::default();
        config.content.base_url = Some("ftp://example.com".to_owned());
        let err = config.validate().expect_err("must fail");
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let err = Config::load(Some(Path::new("/no/such/folio.toml"))).expect_err("must fail");
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
