//! Utility functions for common operations.
//!
//! - **URL checks**: the http(s) scheme rule for feeds and entry links
//! - **Text processing**: width-aware truncation and sanitizing feed text
//!   for terminal display

mod text;
mod url_validator;

pub use text::{plain_text, strip_control_chars, truncate_to_width};
pub use url_validator::{has_web_scheme, validate_url_for_open, UrlValidationError};
