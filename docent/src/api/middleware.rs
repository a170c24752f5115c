//! Request middleware for the `/api` surface.
//!
//! Bearer authentication protects the forum-responder routes and checks
//! tokens against `DOCENT_API_KEYS`. Rate limiting covers the whole `/api`
//! router and keys clients by forwarded address.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;
use crate::error::DocentError;
use crate::services::RateDecision;

/// Enforces `Authorization: Bearer <token>` against the configured key list.
///
/// An empty key list locks the protected routes down rather than opening
/// them up; the server still starts so the public routes keep working.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if state.config.server.api_keys.is_empty() {
        return DocentError::Unauthorized(
            "API keys not configured. Set DOCENT_API_KEYS to enable access.".to_string(),
        )
        .into_response();
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        Some(_) => {
            return DocentError::Unauthorized(
                "Invalid authorization header format. Expected: Bearer <token>".to_string(),
            )
            .into_response();
        }
        None => {
            return DocentError::Unauthorized("Missing authorization header".to_string())
                .into_response();
        }
    };

    if state.config.server.api_keys.iter().any(|key| key == token) {
        next.run(request).await
    } else {
        DocentError::Unauthorized("Invalid API key".to_string()).into_response()
    }
}

/// Per-client fixed-window rate limiting.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_key(request.headers());
    match state.rate_limiter.check(&client) {
        RateDecision::Allowed => next.run(request).await,
        RateDecision::Limited { retry_after_secs } => {
            tracing::debug!(client = %client, "Request rate limited");
            DocentError::RateLimit {
                retry_after: retry_after_secs,
            }
            .into_response()
        }
    }
}

/// Client identity for rate limiting.
///
/// Behind a proxy the first `X-Forwarded-For` entry is the caller;
/// `X-Real-IP` is the usual single-value alternative. Without either, all
/// traffic shares one bucket.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "unknown".to_string())
}
