//! Handler for the link creation endpoint.

use axum::{
    Form, Json,
    extract::{FromRequest, Request, State},
    http::{HeaderMap, header},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::create::{CreateLinkRequest, CreateLinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Request body for link creation, decoded according to `Content-Type`.
///
/// `application/x-www-form-urlencoded` bodies are read as forms, everything else
/// as JSON. The decoded request is validated before the handler runs.
#[derive(Debug)]
pub struct CreateLinkBody(pub CreateLinkRequest);

impl<S> FromRequest<S> for CreateLinkBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let payload = if is_form {
            let Form(payload) = Form::<CreateLinkRequest>::from_request(req, state)
                .await
                .map_err(|e| invalid_body(e.body_text()))?;
            payload
        } else {
            let Json(payload) = Json::<CreateLinkRequest>::from_request(req, state)
                .await
                .map_err(|e| invalid_body(e.body_text()))?;
            payload
        };

        payload.validate()?;

        Ok(Self(payload))
    }
}

fn invalid_body(reason: String) -> AppError {
    AppError::bad_request("Invalid request body", json!({ "reason": reason }))
}

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /api/create`
///
/// # Request Body
///
/// ```json
/// { "url": "example.com" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short_url": "http://localhost:8080/aB3xY9",
///   "short_code": "aB3xY9",
///   "long_url": "https://example.com"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or the URL is empty or contains control characters.
/// Returns 500 Internal Server Error on storage failures.
pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    CreateLinkBody(payload): CreateLinkBody,
) -> Result<Json<CreateLinkResponse>, AppError> {
    let link = state.link_service.create_link(&payload.url).await?;

    let host = headers.get(header::HOST).and_then(|v| v.to_str().ok());
    let short_url = state
        .link_service
        .short_url(&state.public_base_url(host), &link.code);

    Ok(Json(CreateLinkResponse {
        short_url,
        short_code: link.code,
        long_url: link.long_url,
    }))
}
