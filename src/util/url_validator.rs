use thiserror::Error;
use url::Url;

/// Errors that can occur when validating an entry link before opening it.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
}

/// True if `s` starts with `http://` or `https://`.
///
/// This is the scheme rule applied to feed URLs and entry links. It is a
/// prefix check, so it accepts exactly what `^(http|https)://` matches.
pub fn has_web_scheme(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Validates an entry link before handing it to the system browser.
///
/// Only `http` and `https` URLs are opened; anything else (`file://`,
/// `javascript:`) is rejected.
///
/// ```
/// use feedreader::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://example.com/post").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}
