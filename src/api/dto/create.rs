//! DTOs for the link creation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
///
/// Accepted as JSON (`{"url": "..."}`) or as a form body (`url=...`).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The original URL. A missing field is treated like an empty one.
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,
}

/// Response for a created link.
#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub short_url: String,
    pub short_code: String,
    pub long_url: String,
}
