//! Top-level router configuration combining API, redirect and frontend routes.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect
//! - `GET  /health`      - Health check
//! - `/api/*`            - JSON API (CORS enabled)
//! - `GET  /`, `/index.html`, `/style.css`, `/script.js` - Frontend entry files
//! - `/static/*`         - Static assets
//!
//! Static paths take priority over `/{code}`, so frontend files never reach the
//! redirect handler.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::path::Path;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Frontend files served from the site root.
const ROOT_FILES: [&str; 3] = ["index.html", "style.css", "script.js"];

/// Builds the router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `static_dir` - directory holding the frontend files
pub fn build_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();

    let mut router = Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .nest_service("/static", ServeDir::new(static_dir));

    for file in ROOT_FILES {
        router = router.route_service(&format!("/{file}"), ServeFile::new(static_dir.join(file)));
    }

    router.with_state(state).layer(tracing::layer())
}

/// Constructs the served application: [`build_router`] with trailing slashes trimmed.
pub fn app_router(state: AppState, static_dir: impl AsRef<Path>) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, static_dir))
}
