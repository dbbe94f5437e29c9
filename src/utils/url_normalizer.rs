//! Long URL normalization.
//!
//! Normalization is limited to the scheme: the stored URL is the input string with
//! `https://` prepended when the policy asks for it. Nothing else is rewritten, so
//! `example.com` is stored as exactly `https://example.com`. The only other check is
//! that the URL can be sent back in a `Location` header.

/// Errors that can occur while preparing a long URL for storage.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlNormalizationError {
    #[error("URL is required")]
    Empty,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

/// How a long URL without an `http://` or `https://` prefix is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemePolicy {
    /// Prepend `https://` when no recognized scheme prefix is present.
    #[default]
    PrependHttps,
    /// Store the URL as given.
    Preserve,
}

impl SchemePolicy {
    pub fn from_flag(normalize: bool) -> Self {
        if normalize {
            Self::PrependHttps
        } else {
            Self::Preserve
        }
    }
}

/// Returns true if the URL starts with a recognized scheme prefix.
pub fn has_http_scheme(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Applies the scheme policy to a long URL.
///
/// Any non-empty input free of control characters is accepted; the URL is not
/// otherwise parsed or checked.
///
/// # Errors
///
/// - [`UrlNormalizationError::Empty`] for empty or whitespace-only input
/// - [`UrlNormalizationError::ControlCharacter`] for tabs, line breaks and other
///   control characters, which a `Location` header cannot carry
///
/// # Examples
///
/// ```
/// use snaplink::utils::url_normalizer::{SchemePolicy, normalize_long_url};
///
/// assert_eq!(
///     normalize_long_url("example.com", SchemePolicy::PrependHttps).unwrap(),
///     "https://example.com"
/// );
/// assert_eq!(
///     normalize_long_url("http://example.com", SchemePolicy::PrependHttps).unwrap(),
///     "http://example.com"
/// );
/// assert_eq!(
///     normalize_long_url("example.com", SchemePolicy::Preserve).unwrap(),
///     "example.com"
/// );
/// ```
pub fn normalize_long_url(
    input: &str,
    policy: SchemePolicy,
) -> Result<String, UrlNormalizationError> {
    if input.trim().is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    if input.chars().any(char::is_control) {
        return Err(UrlNormalizationError::ControlCharacter);
    }

    Ok(match policy {
        SchemePolicy::PrependHttps if !has_http_scheme(input) => format!("https://{input}"),
        _ => input.to_string(),
    })
}
