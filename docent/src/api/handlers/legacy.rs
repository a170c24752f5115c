//! Direct model passthrough kept for clients that predate the answering
//! pipeline. No classification, grounding, or validation happens here.

use axum::extract::State;
use axum::Json;
use validator::Validate;

use crate::api::dto::{
    ChatCompletionRequest, ChatCompletionResponse, SummarizeRequest, SummarizeResponse,
};
use crate::api::extractors::AppJson;
use crate::api::state::AppState;
use crate::error::Result;
use crate::llm::{prompts, ChatMessage, CompletionOptions};

const DEFAULT_MAX_WORDS: usize = 100;

/// `POST /api/chat/completions`
#[utoipa::path(
    post,
    path = "/api/chat/completions",
    tag = "legacy",
    operation_id = "legacy.chatCompletions",
    request_body = ChatCompletionRequest,
    responses(
        (status = 200, description = "Raw model completion", body = ChatCompletionResponse),
        (status = 400, description = "Invalid request"),
    )
)]
pub async fn chat_completions(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatCompletionRequest>,
) -> Result<Json<ChatCompletionResponse>> {
    request.validate()?;

    let messages: Vec<ChatMessage> = request.messages.into_iter().map(Into::into).collect();
    let options = CompletionOptions {
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        model: request.model,
    };

    let completion = state.llm.complete_chat(&messages, Some(&options)).await?;

    Ok(Json(ChatCompletionResponse {
        content: completion.content,
        usage: completion.usage,
        model: completion.model,
    }))
}

/// `POST /api/summarize`
#[utoipa::path(
    post,
    path = "/api/summarize",
    tag = "legacy",
    operation_id = "legacy.summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary of the supplied content", body = SummarizeResponse),
        (status = 400, description = "Invalid request"),
    )
)]
pub async fn summarize(
    State(state): State<AppState>,
    AppJson(request): AppJson<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>> {
    request.validate()?;

    let prompt = prompts::summarize_prompt(
        &request.content,
        request.max_words.unwrap_or(DEFAULT_MAX_WORDS),
    );
    let completion = state.llm.complete(&prompt, None, None).await?;

    Ok(Json(SummarizeResponse {
        summary: completion.content,
        usage: completion.usage,
    }))
}
