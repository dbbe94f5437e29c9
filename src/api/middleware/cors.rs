//! Cross-origin access for the JSON API.

use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};

/// Creates a CORS middleware allowing any origin to call the API.
///
/// Preflight `OPTIONS` requests are answered by the layer itself; every other
/// response gets:
///
/// ```text
/// Access-Control-Allow-Origin: *
/// Access-Control-Allow-Methods: GET,POST,OPTIONS
/// Access-Control-Allow-Headers: content-type
/// ```
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
