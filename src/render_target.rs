//! The surface loaded feed entries are written into.
//!
//! [`RenderTarget`] keeps the structured entries alongside a markup rendering
//! of them. The markup plays the role of a feed container's inner HTML: it is
//! what callers compare to tell whether displayed content changed.

use crate::feed::Entry;
use parking_lot::RwLock;
use std::fmt::Write;
use std::sync::Arc;

/// Shared handle to a render target.
///
/// The loader takes the write lock only for the synchronous replace step, so
/// readers never observe a half-written entry set.
pub type SharedRenderTarget = Arc<RwLock<RenderTarget>>;

#[derive(Debug, Default, Clone)]
pub struct RenderTarget {
    title: Option<String>,
    entries: Vec<Entry>,
    raw_content: String,
}

impl RenderTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedRenderTarget {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Replace the header title and every entry. Never appends.
    pub fn write(&mut self, title: impl Into<String>, entries: Vec<Entry>) {
        self.raw_content = render_entries(&entries);
        self.entries = entries;
        self.title = Some(title.into());
    }

    pub fn current_entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Header title of the feed last written, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Markup for the current entries.
    ///
    /// Two targets return the same string exactly when their entry sequences
    /// are equal: every field is emitted, and all text is escaped so no field
    /// can forge the delimiters of another.
    pub fn current_raw_content(&self) -> &str {
        &self.raw_content
    }
}

fn render_entries(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match &entry.link {
            Some(link) => {
                let _ = write!(out, r#"<a class="entry-link" href="{}">"#, escape(link));
            }
            None => out.push_str(r#"<a class="entry-link">"#),
        }
        out.push_str(r#"<article class="entry">"#);
        let _ = write!(out, "<h2>{}</h2>", escape(&entry.title));
        if let Some(ts) = entry.published {
            let _ = write!(out, r#"<time datetime="{}"></time>"#, ts);
        }
        let _ = write!(out, "<p>{}</p></article></a>", escape(&entry.content));
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
