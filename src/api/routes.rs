//! API route configuration.

use crate::api::handlers::{create_link_handler, stats_handler};
use crate::api::middleware::cors;
use crate::state::AppState;
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};

/// JSON API routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `POST    /create`        - Create a short link
/// - `OPTIONS /create`        - CORS preflight
/// - `GET     /stats/{code}`  - Full record for a short link
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/create",
            post(create_link_handler).options(|| async { StatusCode::OK }),
        )
        .route("/stats/{code}", get(stats_handler))
        .layer(cors::layer())
}
