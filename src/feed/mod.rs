//! Feed retrieval and parsing.
//!
//! - [`fetcher`] - the [`FeedSource`] seam and its HTTP implementation, with
//!   retry, backoff and size limits
//! - [`parser`] - RSS/Atom parsing into [`Entry`] values using `feed-rs`
//!
//! Neither half touches the render target; [`crate::loader`] composes them.

mod fetcher;
mod parser;

pub use fetcher::{FeedSource, FetchError, FetchPolicy, HttpFeedSource};
pub use parser::{parse_feed, Entry, ParseError, ParseResult};
