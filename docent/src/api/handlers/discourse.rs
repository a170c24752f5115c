use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::api::dto::{DiscourseRequest, DiscourseResponse};
use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::error::Result;
use crate::services::MetricsSnapshot;

/// `POST /api/discourse-response`
#[utoipa::path(
    post,
    path = "/api/discourse-response",
    tag = "discourse",
    operation_id = "discourse.respond",
    request_body = DiscourseRequest,
    responses(
        (status = 200, description = "Drafted forum reply", body = DiscourseResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Missing or invalid API key"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn discourse_response(
    State(state): State<AppState>,
    AppJson(request): AppJson<DiscourseRequest>,
) -> Result<Json<DiscourseResponse>> {
    request.validate()?;

    let reply = state.discourse.respond(request.into()).await?;

    Ok(Json(DiscourseResponse {
        reply: reply.reply,
        cached: reply.cached,
        validation: reply.validation,
        usage: reply.usage,
    }))
}

/// `GET /api/discourse-metrics`
#[utoipa::path(
    get,
    path = "/api/discourse-metrics",
    tag = "discourse",
    operation_id = "discourse.metrics",
    responses(
        (status = 200, description = "Forum responder counters", body = MetricsSnapshot),
        (status = 401, description = "Missing or invalid API key"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn discourse_metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.discourse.metrics())
}
