//! Handlers for the answering pipeline: generation, keywords, follow-ups.

use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::api::dto::{
    FollowUpRequest, FollowUpResponse, GenerateAnswerRequest, GenerateAnswerResponse,
    KeywordsRequest, KeywordsResponse,
};
use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::error::Result;
use crate::services::{AnswerRequest, DEFAULT_MAX_KEYWORDS};

/// `POST /api/generate-answer`
#[utoipa::path(
    post,
    path = "/api/generate-answer",
    tag = "answers",
    operation_id = "answers.generate",
    request_body = GenerateAnswerRequest,
    responses(
        (status = 200, description = "Grounded answer with analysis and quality scoring", body = GenerateAnswerResponse),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Bot check rejected the request"),
        (status = 404, description = "Unknown session"),
    )
)]
pub async fn generate_answer(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateAnswerRequest>,
) -> Result<Json<GenerateAnswerResponse>> {
    request.validate()?;
    state.botcheck.verify(request.bot_token.as_deref()).await?;

    let generated = state
        .answers
        .generate(AnswerRequest {
            query: request.query,
            documents: request.documents,
            system_context: request.system_context,
            model: request.model,
            max_tokens: request.max_tokens,
            session_id: request.session_id,
        })
        .await?;

    Ok(Json(GenerateAnswerResponse {
        answer: generated.answer,
        usage: generated.usage,
        model: generated.model,
        query_analysis: generated.analysis,
        validation: generated.validation,
        enhancement: generated.enhancement,
    }))
}

/// `POST /api/keywords`
#[utoipa::path(
    post,
    path = "/api/keywords",
    tag = "answers",
    operation_id = "answers.keywords",
    request_body = KeywordsRequest,
    responses(
        (status = 200, description = "Search keywords for the query", body = KeywordsResponse),
        (status = 400, description = "Invalid request"),
    )
)]
pub async fn extract_keywords(
    State(state): State<AppState>,
    AppJson(request): AppJson<KeywordsRequest>,
) -> Result<Json<KeywordsResponse>> {
    request.validate()?;

    let extraction = state
        .answers
        .keywords(
            &request.query,
            request.system_context.as_deref(),
            request.max_keywords.unwrap_or(DEFAULT_MAX_KEYWORDS),
        )
        .await?;

    Ok(Json(KeywordsResponse {
        keywords: extraction.keywords,
        usage: extraction.usage,
    }))
}

/// `POST /api/follow-up-questions`
#[utoipa::path(
    post,
    path = "/api/follow-up-questions",
    tag = "answers",
    operation_id = "answers.followUps",
    request_body = FollowUpRequest,
    responses(
        (status = 200, description = "Suggested follow-up questions", body = FollowUpResponse),
        (status = 400, description = "Neither a session nor an exchange was given"),
        (status = 404, description = "Unknown session"),
    )
)]
pub async fn follow_up_questions(
    State(state): State<AppState>,
    AppJson(request): AppJson<FollowUpRequest>,
) -> Result<Json<FollowUpResponse>> {
    request.validate()?;

    let (questions, origin) = state
        .answers
        .follow_ups(
            request.session_id.as_deref(),
            request.query.as_deref(),
            request.answer.as_deref(),
            request.count,
        )
        .await?;

    Ok(Json(FollowUpResponse { questions, origin }))
}
