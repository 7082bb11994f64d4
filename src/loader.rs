//! Asynchronous feed loading into a render target.
//!
//! [`FeedLoader`] resolves a registry index, retrieves the feed through a
//! [`FeedSource`], parses it, and replaces the render target's content. The
//! retrieval is the only suspension point; the replace step happens under
//! the target's write lock in one go.
//!
//! Two entry points:
//!
//! - [`FeedLoader::load`] - await the [`LoadReport`] directly
//! - [`FeedLoader::load_feed`] - spawn the load and get called back once the
//!   target has settled, on success and failure alike
//!
//! Loads are serialized: a second load waits for the first to finish its
//! fetch-and-write cycle before starting its own.
//!
//! On failure the target keeps whatever it showed before the call.

use crate::feed::{parse_feed, FeedSource, FetchError, ParseError, ParseResult};
use crate::registry::{FeedDescriptor, FeedRegistry};
use crate::render_target::{RenderTarget, SharedRenderTarget};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// A load was requested for a position the registry doesn't have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Feed index {index} out of range ({len} feeds configured)")]
pub struct InvalidIndexError {
    pub index: usize,
    pub len: usize,
}

/// Why a load left the render target untouched.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The retrieval or parse panicked; the panic was caught so the caller
    /// is still released.
    #[error("Load task panicked: {0}")]
    Panicked(String),
}

/// Counts from a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedFeed {
    /// Entries now displayed.
    pub entries: usize,
    /// Entries dropped for non-http(s) links.
    pub skipped: usize,
}

/// Outcome of one completed load.
#[derive(Debug)]
pub struct LoadReport {
    /// Registry index that was loaded
    pub index: usize,
    /// Feed name, for status display
    pub name: String,
    pub result: Result<LoadedFeed, LoadError>,
}

impl LoadReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Loads registry feeds into a shared [`RenderTarget`].
///
/// Cheap to clone; clones share the registry, source, target and the gate
/// that serializes loads.
#[derive(Clone)]
pub struct FeedLoader {
    registry: Arc<FeedRegistry>,
    source: Arc<dyn FeedSource>,
    target: SharedRenderTarget,
    gate: Arc<Mutex<()>>,
}

impl FeedLoader {
    pub fn new(registry: Arc<FeedRegistry>, source: Arc<dyn FeedSource>) -> Self {
        Self {
            registry,
            source,
            target: RenderTarget::shared(),
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn registry(&self) -> &Arc<FeedRegistry> {
        &self.registry
    }

    /// Handle to the render target this loader writes into.
    pub fn target(&self) -> SharedRenderTarget {
        Arc::clone(&self.target)
    }

    /// Load the feed at `index` and wait for the render target to settle.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIndexError`] before any I/O if `index` is out of
    /// range; the render target is not touched. Fetch and parse failures are
    /// not errors here: they come back inside [`LoadReport::result`].
    pub async fn load(&self, index: usize) -> Result<LoadReport, InvalidIndexError> {
        let feed = self.resolve(index)?.clone();
        Ok(self.load_resolved(index, feed).await)
    }

    /// Spawn a load of the feed at `index` and call `on_complete` when done.
    ///
    /// `on_complete` runs exactly once, after the render target reflects the
    /// outcome, whether the load succeeded or failed. An out-of-range index
    /// fails here, synchronously, and `on_complete` is dropped uncalled.
    ///
    /// `on_complete` runs before any other load starts, so the target it
    /// observes is the one this load left behind. It may start further loads
    /// with `load_feed`; those queue behind it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn load_feed<F>(
        &self,
        index: usize,
        on_complete: F,
    ) -> Result<JoinHandle<()>, InvalidIndexError>
    where
        F: FnOnce(LoadReport) + Send + 'static,
    {
        let feed = self.resolve(index)?.clone();
        let loader = self.clone();
        Ok(tokio::spawn(async move {
            // The callback runs inside the gate so no later load can
            // overwrite the target before it has observed this one.
            let _serialized = loader.gate.lock().await;
            let report = loader.load_locked(index, feed).await;
            on_complete(report);
        }))
    }

    fn resolve(&self, index: usize) -> Result<&FeedDescriptor, InvalidIndexError> {
        self.registry.get(index).ok_or_else(|| {
            tracing::warn!(index, len = self.registry.len(), "Rejected out-of-range feed index");
            InvalidIndexError {
                index,
                len: self.registry.len(),
            }
        })
    }

    async fn load_resolved(&self, index: usize, feed: FeedDescriptor) -> LoadReport {
        let _serialized = self.gate.lock().await;
        self.load_locked(index, feed).await
    }

    /// Fetch, parse and write. Caller must hold the gate.
    async fn load_locked(&self, index: usize, feed: FeedDescriptor) -> LoadReport {
        tracing::debug!(index, feed = %feed.name, url = %feed.url, "Loading feed");

        let retrieved = match AssertUnwindSafe(self.retrieve(&feed)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(LoadError::Panicked(panic_message(panic.as_ref()))),
        };

        let result = match retrieved {
            Ok(ParseResult { entries, skipped }) => {
                if skipped > 0 {
                    tracing::warn!(feed = %feed.name, filtered = skipped, "Entries with non-http(s) links skipped");
                }
                let loaded = LoadedFeed {
                    entries: entries.len(),
                    skipped,
                };
                self.target.write().write(feed.name.clone(), entries);
                tracing::info!(index, feed = %feed.name, entries = loaded.entries, "Feed loaded");
                Ok(loaded)
            }
            Err(e) => {
                tracing::warn!(index, feed = %feed.name, error = %e, "Feed load failed, keeping previous entries");
                Err(e)
            }
        };

        LoadReport {
            index,
            name: feed.name,
            result,
        }
    }

    async fn retrieve(&self, feed: &FeedDescriptor) -> Result<ParseResult, LoadError> {
        let bytes = self.source.fetch(&feed.url).await?;
        Ok(parse_feed(&bytes)?)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
