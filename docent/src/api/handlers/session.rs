use axum::extract::{Path, State};
use axum::Json;

use crate::api::dto::{CreateSessionRequest, CreateSessionResponse, SessionHistoryResponse};
use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::error::{DocentError, Result};

/// `POST /api/session/create`
#[utoipa::path(
    post,
    path = "/api/session/create",
    tag = "sessions",
    operation_id = "sessions.create",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "New conversation session", body = CreateSessionResponse),
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateSessionRequest>,
) -> Json<CreateSessionResponse> {
    let session = state.sessions.create(request.context);

    Json(CreateSessionResponse {
        session_id: session.id,
        created_at: session.created_at,
    })
}

/// `GET /api/session/{id}/history`
#[utoipa::path(
    get,
    path = "/api/session/{id}/history",
    tag = "sessions",
    operation_id = "sessions.history",
    params(("id" = String, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Turns recorded for the session", body = SessionHistoryResponse),
        (status = 404, description = "Unknown session"),
    )
)]
pub async fn session_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionHistoryResponse>> {
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| DocentError::NotFound(format!("Session not found: {id}")))?;

    Ok(Json(SessionHistoryResponse {
        session_id: session.id,
        turns: session.turns,
        context: session.context,
    }))
}
