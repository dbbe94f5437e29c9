//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_valid_code;

/// Retrieves the full record for a short link.
///
/// # Endpoint
///
/// `GET /api/stats/{code}`
///
/// # Response
///
/// ```json
/// {
///   "id": 1,
///   "short_code": "aB3xY9",
///   "long_url": "https://example.com",
///   "created_at": "2024-01-01T12:00:00Z",
///   "click_count": 3
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the code is not a 6-character alphanumeric string.
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    if !is_valid_code(&code) {
        return Err(AppError::bad_request(
            "Invalid short code",
            json!({ "code": code }),
        ));
    }

    let link = state.link_service.get_stats(&code).await?;

    Ok(Json(link.into()))
}
