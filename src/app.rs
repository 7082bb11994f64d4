use crate::loader::{FeedLoader, InvalidIndexError, LoadError, LoadReport};
use crate::menu::{MenuController, MenuState};
use crate::registry::FeedRegistry;
use crate::util::validate_url_for_open;
use anyhow::Result;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

// ============================================================================
// Event Types
// ============================================================================

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// A feed load finished and the render target has settled.
    FeedLoaded(LoadReport),
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
///
/// Owns the feed registry (through the loader), the menu state and the
/// cursor state. Entries themselves live in the loader's render target.
pub struct App {
    pub loader: FeedLoader,
    pub menu: MenuController,

    /// Cursor in the feed menu.
    pub selected_feed: usize,
    /// Cursor in the entry list.
    pub selected_entry: usize,
    /// Feed most recently requested, loaded or not.
    pub current_feed: Option<usize>,
    /// Feed whose load is in flight.
    pub loading: Option<usize>,

    /// Status message with the time it was set; expires after 3 seconds.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl App {
    pub fn new(loader: FeedLoader) -> Self {
        Self {
            loader,
            menu: MenuController::new(),
            selected_feed: 0,
            selected_entry: 0,
            current_feed: None,
            loading: None,
            status_message: None,
            needs_redraw: true,
        }
    }

    pub fn registry(&self) -> &Arc<FeedRegistry> {
        self.loader.registry()
    }

    /// The menu icon's action.
    pub fn toggle_menu(&mut self) -> MenuState {
        let state = self.menu.toggle();
        if state == MenuState::Visible {
            // Open the menu on the feed being shown
            if let Some(current) = self.current_feed {
                self.selected_feed = current;
            }
        }
        state
    }

    pub fn nav_up(&mut self) {
        if self.menu.is_hidden() {
            self.selected_entry = self.selected_entry.saturating_sub(1);
        } else {
            self.selected_feed = self.selected_feed.saturating_sub(1);
        }
    }

    pub fn nav_down(&mut self) {
        if self.menu.is_hidden() {
            let count = self.loader.target().read().entry_count();
            if self.selected_entry + 1 < count {
                self.selected_entry += 1;
            }
        } else if self.selected_feed + 1 < self.registry().len() {
            self.selected_feed += 1;
        }
    }

    /// Choose the feed under the menu cursor.
    ///
    /// Picking a feed closes the menu (through its toggle) and starts loading it.
    pub fn select_feed(&mut self, event_tx: &mpsc::Sender<AppEvent>) -> Result<(), InvalidIndexError> {
        if !self.menu.is_hidden() {
            self.menu.toggle();
        }
        self.start_load(self.selected_feed, event_tx)
    }

    /// Reload the feed currently shown.
    pub fn reload(&mut self, event_tx: &mpsc::Sender<AppEvent>) -> Result<(), InvalidIndexError> {
        let index = self.current_feed.unwrap_or(self.selected_feed);
        self.start_load(index, event_tx)
    }

    /// Spawn a load of `index`; completion arrives as [`AppEvent::FeedLoaded`].
    pub fn start_load(
        &mut self,
        index: usize,
        event_tx: &mpsc::Sender<AppEvent>,
    ) -> Result<(), InvalidIndexError> {
        let tx = event_tx.clone();
        self.loader.load_feed(index, move |report| {
            if let Err(e) = tx.try_send(AppEvent::FeedLoaded(report)) {
                tracing::warn!(error = %e, "Failed to deliver feed load result (receiver dropped or full)");
            }
        })?;

        self.current_feed = Some(index);
        self.loading = Some(index);
        let name = self.registry().get(index).map(|f| f.name.clone());
        if let Some(name) = name {
            self.set_status(format!("Loading {}...", name));
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::FeedLoaded(report) => self.handle_feed_loaded(report),
        }
    }

    fn handle_feed_loaded(&mut self, report: LoadReport) {
        if self.loading == Some(report.index) {
            self.loading = None;
        }

        match report.result {
            Ok(loaded) => {
                self.selected_entry = 0;
                let msg = if loaded.skipped > 0 {
                    format!(
                        "{}: {} entries ({} skipped)",
                        report.name, loaded.entries, loaded.skipped
                    )
                } else {
                    format!("{}: {} entries", report.name, loaded.entries)
                };
                self.set_status(msg);
            }
            Err(LoadError::Panicked(e)) => {
                tracing::error!(feed = %report.name, error = %e, "Feed load task panicked");
                self.set_status(format!("Internal error loading {}", report.name));
            }
            Err(e) => {
                self.set_status(format!("Failed to load {}: {}", report.name, e));
            }
        }
    }

    /// Open the selected entry's link in the system browser.
    pub fn open_selected_entry(&mut self) {
        let link = {
            let target = self.loader.target();
            let target = target.read();
            target
                .current_entries()
                .get(self.selected_entry)
                .and_then(|e| e.link.clone())
        };

        let Some(link) = link else {
            self.set_status("Entry has no link");
            return;
        };

        match validate_url_for_open(&link) {
            Ok(url) => match open::that(url.as_str()) {
                Ok(()) => self.set_status("Opened in browser"),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Failed to open browser");
                    self.set_status(format!("Failed to open browser: {}", e));
                }
            },
            Err(e) => self.set_status(format!("Refusing to open link: {}", e)),
        }
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedSource, FetchError};
    use crate::registry::FeedDescriptor;
    use async_trait::async_trait;
    use tokio::time::{self, Duration};

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>T</title>
  <item><title>One</title><link>https://example.com/1</link></item>
  <item><title>Two</title><link>https://example.com/2</link></item>
  <item><title>Three</title></item>
</channel></rss>"#;

    struct FixedSource;

    #[async_trait]
    impl FeedSource for FixedSource {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            if url.contains("down") {
                return Err(FetchError::HttpStatus(503));
            }
            Ok(FEED.as_bytes().to_vec())
        }
    }

    fn test_app() -> App {
        let registry = FeedRegistry::new(vec![
            FeedDescriptor::new("https://one.example/feed", "One"),
            FeedDescriptor::new("https://two.example/feed", "Two"),
            FeedDescriptor::new("https://down.example/feed", "Down"),
        ])
        .unwrap();
        App::new(FeedLoader::new(Arc::new(registry), Arc::new(FixedSource)))
    }

    #[tokio::test]
    async fn test_menu_starts_hidden() {
        let app = test_app();
        assert!(app.menu.is_hidden());
    }

    #[tokio::test]
    async fn test_nav_moves_feed_cursor_only_while_menu_visible() {
        let mut app = test_app();
        app.nav_down();
        assert_eq!(app.selected_feed, 0);

        app.toggle_menu();
        app.nav_down();
        app.nav_down();
        app.nav_down();
        assert_eq!(app.selected_feed, 2); // Clamped to last feed
        app.nav_up();
        assert_eq!(app.selected_feed, 1);
    }

    #[tokio::test]
    async fn test_select_feed_hides_menu_and_loads() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut app = test_app();

        app.toggle_menu();
        app.nav_down();
        app.select_feed(&tx).unwrap();

        assert!(app.menu.is_hidden());
        assert_eq!(app.loading, Some(1));

        let event = rx.recv().await.unwrap();
        app.handle_event(event);
        assert_eq!(app.loading, None);
        assert_eq!(app.current_feed, Some(1));
        assert_eq!(app.loader.target().read().entry_count(), 3);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Two: 3 entries");
    }

    #[tokio::test]
    async fn test_failed_load_sets_error_status() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut app = test_app();

        app.start_load(2, &tx).unwrap();
        app.handle_event(rx.recv().await.unwrap());

        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.starts_with("Failed to load Down"));
        assert_eq!(app.loading, None);
    }

    #[tokio::test]
    async fn test_start_load_out_of_range_changes_nothing() {
        let (tx, _rx) = mpsc::channel(8);
        let mut app = test_app();

        assert!(app.start_load(7, &tx).is_err());
        assert_eq!(app.current_feed, None);
        assert_eq!(app.loading, None);
    }

    #[tokio::test]
    async fn test_entry_cursor_clamped_to_entries() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut app = test_app();
        app.start_load(0, &tx).unwrap();
        app.handle_event(rx.recv().await.unwrap());

        for _ in 0..5 {
            app.nav_down();
        }
        assert_eq!(app.selected_entry, 2);
    }

    #[tokio::test]
    async fn test_open_entry_without_link_reports_status() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut app = test_app();
        app.start_load(0, &tx).unwrap();
        app.handle_event(rx.recv().await.unwrap());

        app.selected_entry = 2;
        app.open_selected_entry();
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Entry has no link");
    }

    #[tokio::test]
    async fn test_reopening_menu_points_at_current_feed() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut app = test_app();
        app.start_load(1, &tx).unwrap();
        app.handle_event(rx.recv().await.unwrap());

        app.toggle_menu();
        assert_eq!(app.selected_feed, 1);
    }

    // Status message expiry with time control
    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some()); // Still present at 2s

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
