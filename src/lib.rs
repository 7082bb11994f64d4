//! A minimal terminal feed reader.
//!
//! A fixed [`registry::FeedRegistry`] of feeds, a [`loader::FeedLoader`] that
//! fetches one feed at a time into a shared [`render_target::RenderTarget`],
//! and a collapsible feed menu driven by [`menu::MenuController`].

pub mod app;
pub mod config;
pub mod feed;
pub mod loader;
pub mod menu;
pub mod registry;
pub mod render_target;
pub mod ui;
pub mod util;
