use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::answer::validate;
use crate::api::dto::{MultiSourceSearchRequest, MultiSourceSearchResponse};
use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::error::Result;

/// `POST /api/multi-source-search`
///
/// Fans out to the configured community sources, merges with the caller's
/// documents, and synthesizes one answer. Source failures and model
/// failures both degrade instead of erroring.
#[utoipa::path(
    post,
    path = "/api/multi-source-search",
    tag = "aggregation",
    operation_id = "aggregation.search",
    request_body = MultiSourceSearchRequest,
    responses(
        (status = 200, description = "Synthesized answer with ranked sources", body = MultiSourceSearchResponse),
        (status = 400, description = "Invalid request"),
    )
)]
pub async fn multi_source_search(
    State(state): State<AppState>,
    AppJson(request): AppJson<MultiSourceSearchRequest>,
) -> Result<Json<MultiSourceSearchResponse>> {
    request.validate()?;

    let overrides = request.config.unwrap_or_default();
    let aggregated = state
        .aggregator
        .aggregate(
            &request.query,
            request.documents,
            request.system_context.as_deref(),
            &overrides,
        )
        .await;

    let validation = validate(&aggregated.answer, aggregated.sources.len());

    Ok(Json(MultiSourceSearchResponse {
        answer: aggregated.answer,
        sources: aggregated.sources,
        aggregation_metrics: aggregated.metrics,
        validation,
        usage: aggregated.usage,
        origin: aggregated.origin,
    }))
}
