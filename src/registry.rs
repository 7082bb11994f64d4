//! The validated, immutable list of feeds the reader can load.

use crate::config::ConfigError;
use crate::util::has_web_scheme;
use serde::Deserialize;

/// A named, URL-addressed feed.
///
/// Missing keys deserialize to empty strings so that an undefined field and
/// an empty one are rejected the same way by [`FeedRegistry::new`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedDescriptor {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
}

impl FeedDescriptor {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// Ordered, non-empty list of feeds, fixed once constructed.
///
/// Shared across the loader and UI as `Arc<FeedRegistry>`.
#[derive(Debug, Clone)]
pub struct FeedRegistry {
    feeds: Vec<FeedDescriptor>,
}

impl FeedRegistry {
    /// Validate `feeds` and build a registry.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyRegistry`] if `feeds` is empty
    /// - [`ConfigError::MissingUrl`] / [`ConfigError::MissingName`] for blank fields
    /// - [`ConfigError::UnsupportedScheme`] if a URL is not `http://` or `https://`
    pub fn new(feeds: Vec<FeedDescriptor>) -> Result<Self, ConfigError> {
        if feeds.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        for (index, feed) in feeds.iter().enumerate() {
            if feed.url.trim().is_empty() {
                return Err(ConfigError::MissingUrl { index });
            }
            if !has_web_scheme(&feed.url) {
                return Err(ConfigError::UnsupportedScheme {
                    index,
                    url: feed.url.clone(),
                });
            }
            if feed.name.trim().is_empty() {
                return Err(ConfigError::MissingName { index });
            }
        }

        tracing::debug!(feeds = feeds.len(), "Feed registry validated");
        Ok(Self { feeds })
    }

    /// Registry of the built-in feeds.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(crate::config::default_feeds())
    }

    pub fn list(&self) -> &[FeedDescriptor] {
        &self.feeds
    }

    pub fn get(&self, index: usize) -> Option<&FeedDescriptor> {
        self.feeds.get(index)
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    /// Never true for a constructed registry.
    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}
