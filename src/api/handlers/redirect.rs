//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_code;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reject anything that is not a 6-character alphanumeric code (no storage access)
/// 2. Resolve the code, which atomically counts the click
/// 3. Return the configured redirect status (301 by default) with `Location`
///
/// # Errors
///
/// Returns 404 Not Found if the code is malformed or doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if !is_valid_code(&code) {
        debug!(code = %code, "Path is not a short code");
        return Err(AppError::not_found("Not found", json!({})));
    }

    let long_url = match state.link_service.resolve(&code).await {
        Ok(url) => url,
        Err(e @ AppError::NotFound { .. }) => {
            warn!(code = %code, "Short link not found");
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    let location = HeaderValue::try_from(long_url.as_str()).map_err(|_| {
        AppError::internal("Stored URL is not a valid Location header", json!({}))
    })?;

    debug!(code = %code, "Redirecting to {}", long_url);

    Ok((state.redirect_status, [(header::LOCATION, location)]).into_response())
}
