use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;

use super::AppState;

/// Header event producers authenticate with
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Guards the `/api/v1` routes with the configured `api.key`.
///
/// Without a configured key every request passes (local development).
pub async fn api_key_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.settings.api.key.as_deref() {
        check_api_key(req.headers(), expected)?;
    }
    Ok(next.run(req).await)
}

fn check_api_key(headers: &HeaderMap, expected: &str) -> Result<(), AppError> {
    match headers.get(API_KEY_HEADER).map(|v| v.to_str()) {
        Some(Ok(key)) if key == expected => Ok(()),
        Some(_) => {
            tracing::warn!("Rejected event producer with invalid API key");
            Err(AppError::Unauthorized("Invalid API key".to_string()))
        }
        None => {
            tracing::warn!("Rejected event producer without API key");
            Err(AppError::Unauthorized("Missing API key".to_string()))
        }
    }
}
