use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocentError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limit exceeded, retry after {retry_after} seconds")]
    RateLimit { retry_after: u64 },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM provider returned {status}: {message}")]
    LlmUpstream { status: u16, message: String },

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded, retry after {retry_after:?} seconds")]
    LlmRateLimit { retry_after: Option<u64> },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for DocentError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DocentError::Validation(errors.to_string())
    }
}

impl IntoResponse for DocentError {
    fn into_response(self) -> Response {
        let (status, message, retry_after) = match &self {
            DocentError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            DocentError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            DocentError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            DocentError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            DocentError::RateLimit { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                self.to_string(),
                Some(*retry_after),
            ),
            DocentError::Http(e) => (StatusCode::BAD_GATEWAY, e.to_string(), None),
            DocentError::Json(e) => (StatusCode::BAD_REQUEST, e.to_string(), None),
            DocentError::UrlParse(e) => (StatusCode::BAD_REQUEST, e.to_string(), None),
            DocentError::Llm(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None),
            DocentError::LlmUpstream { status, message } => (
                // Upstream status is passed through to the client when it is a
                // valid HTTP status, otherwise it collapses to 500.
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message.clone(),
                None,
            ),
            DocentError::LlmUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone(), None)
            }
            DocentError::LlmRateLimit { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                self.to_string(),
                *retry_after,
            ),
            DocentError::Internal(msg) => {
                // Details are logged, the client only sees a generic message.
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        let mut response = (status, body).into_response();

        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

pub type Result<T> = std::result::Result<T, DocentError>;
