//! Terminal user interface.

mod entries;
mod feeds;
mod input;
mod loop_runner;
mod render;
mod status;

pub use entries::format_relative_time;
pub use loop_runner::{run, Action};
