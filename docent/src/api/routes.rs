use axum::http::HeaderValue;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{auth_middleware, rate_limit_middleware};
use super::{handlers, openapi, AppState};

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);

    let protected = Router::new()
        .route(
            "/discourse-response",
            post(handlers::discourse::discourse_response),
        )
        .route(
            "/discourse-metrics",
            get(handlers::discourse::discourse_metrics),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Rate limiting is applied after the merge so it wraps the protected
    // routes too, running before auth.
    let api = Router::new()
        .route("/keywords", post(handlers::answer::extract_keywords))
        .route("/generate-answer", post(handlers::answer::generate_answer))
        .route(
            "/follow-up-questions",
            post(handlers::answer::follow_up_questions),
        )
        .route(
            "/multi-source-search",
            post(handlers::aggregate::multi_source_search),
        )
        .route("/session/create", post(handlers::session::create_session))
        .route(
            "/session/{id}/history",
            get(handlers::session::session_history),
        )
        .route("/chat/completions", post(handlers::legacy::chat_completions))
        .route("/summarize", post(handlers::legacy::summarize))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router())
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(RequestBodyLimitLayer::new(state.config.server.max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// An empty whitelist opens CORS to any origin; otherwise only the listed
/// origins are allowed.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
