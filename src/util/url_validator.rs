use thiserror::Error;
use url::Url;

/// Errors produced while validating a URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Only http and https are accepted.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates the `image_url` of a reading.
///
/// Image links are only ever displayed or handed to the system opener, so the
/// check is limited to a parseable absolute http(s) URL with a host.
///
/// ```
/// use ray::util::validate_image_url;
///
/// assert!(validate_image_url("https://images.pexels.com/photos/1.jpeg").is_ok());
/// assert!(validate_image_url("file:///etc/passwd").is_err());
/// assert!(validate_image_url("not a url").is_err());
/// ```
pub fn validate_image_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }
    Ok(url)
}

/// Validate a URL before passing it to `open::that()`.
///
/// `open` hands the string to the platform opener (`xdg-open`, `open`,
/// `start`), which would happily launch local files or custom schemes.
/// Returns a user-facing message on rejection.
pub fn validate_url_for_open(url_str: &str) -> Result<(), String> {
    validate_image_url(url_str)
        .map(|_| ())
        .map_err(|e| format!("Refusing to open link: {}", e))
}
