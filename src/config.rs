//! Configuration file parser for ~/.config/feedreader/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`,
//! which carries the built-in feed list. Unknown keys are ignored by serde,
//! though we log a warning when the file contains potential typos.
//!
//! Feed list validation lives in [`crate::registry`]; both layers report
//! through [`ConfigError`] because a bad feed list is a configuration fault.
use crate::feed::FetchPolicy;
use crate::registry::{FeedDescriptor, FeedRegistry};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// The feed list has no entries.
    #[error("Feed list is empty: at least one feed must be configured")]
    EmptyRegistry,

    #[error("Feed #{index} has no URL")]
    MissingUrl { index: usize },

    #[error("Feed #{index} has no name")]
    MissingName { index: usize },

    #[error("Feed #{index} URL must start with http:// or https://, got '{url}'")]
    UnsupportedScheme { index: usize, url: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feeds shown in the menu, in display order.
    pub feeds: Vec<FeedDescriptor>,

    /// Index of the feed loaded at startup.
    pub initial_feed: usize,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Retries for rate-limited, server-error and truncated responses.
    pub max_retries: u32,

    /// Maximum accepted feed body size in bytes.
    pub max_feed_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        let policy = FetchPolicy::default();
        Self {
            feeds: default_feeds(),
            initial_feed: 0,
            request_timeout_secs: policy.timeout.as_secs(),
            max_retries: policy.max_retries,
            max_feed_bytes: policy.max_feed_bytes,
        }
    }
}

/// The feed list the reader ships with.
pub fn default_feeds() -> Vec<FeedDescriptor> {
    [
        ("Udacity Blog", "http://blog.udacity.com/feed"),
        ("CSS Tricks", "http://feeds.feedburner.com/CssTricks"),
        ("HTML5 Rocks", "http://feeds.feedburner.com/html5rocks"),
        (
            "Linear Digressions",
            "http://feeds.feedburner.com/udacity-linear-digressions",
        ),
    ]
    .into_iter()
    .map(|(name, url)| FeedDescriptor::new(url, name))
    .collect()
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "feeds",
        "initial_feed",
        "request_timeout_secs",
        "max_retries",
        "max_feed_bytes",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    ///
    /// The feed list itself is not validated here; see [`Config::registry`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check file size before reading so a corrupted file can't exhaust memory.
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(feeds = config.feeds.len(), "Loaded configuration");
        Ok(config)
    }

    /// Build and validate the feed registry described by this config.
    pub fn registry(&self) -> Result<FeedRegistry, ConfigError> {
        FeedRegistry::new(self.feeds.clone())
    }

    /// HTTP fetch policy described by this config.
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_secs(self.request_timeout_secs),
            max_retries: self.max_retries,
            max_feed_bytes: self.max_feed_bytes,
            ..FetchPolicy::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(test_name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("feedreader_config_test_{}", test_name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.feeds.len(), 4);
        assert_eq!(config.feeds[0].name, "Udacity Blog");
        assert_eq!(config.initial_feed, 0);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.max_feed_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_default_feeds_form_valid_registry() {
        let registry = Config::default().registry().unwrap();
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/feedreader_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.feeds, default_feeds());
    }

    #[test]
    fn test_empty_file_returns_default() {
        let path = write_config("empty", "");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.feeds, default_feeds());
        cleanup(&path);
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let path = write_config("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.feeds.len(), 4);
        cleanup(&path);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let path = write_config("partial", "max_retries = 1\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.feeds, default_feeds());
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let content = r#"
initial_feed = 1
request_timeout_secs = 10
max_retries = 0
max_feed_bytes = 2048

[[feeds]]
name = "Rust Blog"
url = "https://blog.rust-lang.org/feed.xml"

[[feeds]]
name = "This Week in Rust"
url = "https://this-week-in-rust.org/atom.xml"
"#;
        let path = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.initial_feed, 1);
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feeds[1].name, "This Week in Rust");

        let policy = config.fetch_policy();
        assert_eq!(policy.timeout, Duration::from_secs(10));
        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.max_feed_bytes, 2048);
        cleanup(&path);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        cleanup(&path);
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let path = write_config("wrongtype", "max_retries = \"three\"\n");
        assert!(Config::load(&path).is_err());
        cleanup(&path);
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config("unknown", "theme = \"dark\"\nmax_retries = 2\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.max_retries, 2);
        cleanup(&path);
    }

    #[test]
    fn test_feed_without_url_fails_registry_validation() {
        let content = r#"
[[feeds]]
name = "Nameless URL"
"#;
        let config = Config::from_toml(content).unwrap();
        let err = config.registry().unwrap_err();
        assert!(matches!(err, ConfigError::MissingUrl { index: 0 }));
    }

    #[test]
    fn test_explicitly_empty_feed_list_fails_registry_validation() {
        let config = Config::from_toml("feeds = []\n").unwrap();
        assert!(matches!(
            config.registry().unwrap_err(),
            ConfigError::EmptyRegistry
        ));
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        cleanup(&path);
    }
}
