use crate::util::has_web_scheme;
use feed_rs::parser;
use thiserror::Error;

/// Title used for entries that don't carry one.
const UNTITLED: &str = "Untitled";

/// One item within a loaded feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    /// Always `http://` or `https://` when present.
    pub link: Option<String>,
    /// Summary, else content body; raw markup as served by the feed.
    pub content: String,
    /// Unix timestamp (published, else updated).
    pub published: Option<i64>,
}

#[derive(Debug, Error)]
#[error("Feed is not valid RSS or Atom: {0}")]
pub struct ParseError(#[from] parser::ParseFeedError);

/// Entries parsed from one feed document.
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Entries in document order.
    pub entries: Vec<Entry>,
    /// Entries dropped because their only links were not http(s).
    pub skipped: usize,
}

/// Parse RSS/Atom bytes into entries.
///
/// An entry keeps the first http(s) link it carries. Entries with links but
/// none of them http(s) are skipped and counted; entries without any link
/// are kept with `link: None`.
pub fn parse_feed(bytes: &[u8]) -> Result<ParseResult, ParseError> {
    let feed = parser::parse(bytes)?;

    let mut result = ParseResult::default();
    for entry in feed.entries {
        let link = entry
            .links
            .iter()
            .map(|l| l.href.trim())
            .find(|href| has_web_scheme(href))
            .map(str::to_string);

        if link.is_none() && !entry.links.is_empty() {
            result.skipped += 1;
            continue;
        }

        let title = entry
            .title
            .map(|t| t.content)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());
        let content = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .unwrap_or_default();
        let published = entry.published.or(entry.updated).map(|dt| dt.timestamp());

        result.entries.push(Entry {
            title,
            link,
            content,
            published,
        });
    }

    Ok(result)
}
