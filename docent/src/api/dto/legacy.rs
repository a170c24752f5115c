//! Passthrough wire types kept for pre-pipeline clients.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::llm::ChatMessage;
use crate::models::TokenUsage;

/// Request body for `POST /api/chat/completions`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionRequest {
    #[validate(length(min = 1, max = 100))]
    pub messages: Vec<ChatMessageDto>,
    pub model: Option<String>,
    #[validate(range(min = 1, max = 8192))]
    pub max_tokens: Option<u32>,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f32>,
}

/// One chat message: `role` is `system`, `assistant`, or `user`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatMessageDto {
    pub role: String,
    pub content: String,
}

impl From<ChatMessageDto> for ChatMessage {
    fn from(message: ChatMessageDto) -> Self {
        ChatMessage {
            role: message.role,
            content: message.content,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
}

/// Request body for `POST /api/summarize`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    #[validate(length(min = 1))]
    pub content: String,
    /// Summary length cap in words. Defaults to 100.
    #[validate(range(min = 10, max = 500))]
    pub max_words: Option<usize>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeResponse {
    pub summary: String,
    pub usage: TokenUsage,
}
