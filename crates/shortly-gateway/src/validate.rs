use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid URL")]
    ValidationFailed,
}

/// Returns `true` iff `url` is an absolute `http` or `https` URL.
///
/// Control characters are rejected as well, since the submitted text is
/// stored verbatim and later sent back in a `Location` header.
pub fn is_valid_url(url: &str) -> bool {
    if url.chars().any(char::is_control) {
        return false;
    }

    Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
}

/// Validates a submitted URL before it reaches the store.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    if is_valid_url(url) {
        Ok(())
    } else {
        Err(ValidationError::ValidationFailed)
    }
}
