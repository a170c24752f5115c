//! Answer-generation, keyword, and follow-up wire types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{AnalysisOrigin, Document, QueryAnalysis, TokenUsage, ValidationResult};
use crate::services::AnswerEnhancement;

/// Request body for `POST /api/generate-answer`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAnswerRequest {
    /// The documentation-search query to answer.
    #[validate(length(min = 1, max = 4000))]
    pub query: String,
    /// Documents retrieved by the caller's search, most relevant first.
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Product description folded into the system prompt.
    pub system_context: Option<String>,
    /// Per-request model override, `provider/model` form.
    pub model: Option<String>,
    #[validate(range(min = 1, max = 8192))]
    pub max_tokens: Option<u32>,
    /// Attach the exchange to an existing conversation session.
    pub session_id: Option<String>,
    /// Bot-check token; required when verification is configured.
    pub bot_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAnswerResponse {
    pub answer: String,
    pub usage: TokenUsage,
    pub model: String,
    pub query_analysis: QueryAnalysis,
    pub validation: ValidationResult,
    pub enhancement: AnswerEnhancement,
}

/// Request body for `POST /api/keywords`.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeywordsRequest {
    #[validate(length(min = 1, max = 4000))]
    pub query: String,
    pub system_context: Option<String>,
    #[validate(range(min = 1, max = 20))]
    pub max_keywords: Option<usize>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
    pub usage: TokenUsage,
}

/// Request body for `POST /api/follow-up-questions`.
///
/// Either `sessionId` or the explicit `query`/`answer` pair must be present.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpRequest {
    pub session_id: Option<String>,
    pub query: Option<String>,
    pub answer: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpResponse {
    pub questions: Vec<String>,
    /// Whether the questions came from the model or the canned fallback.
    pub origin: AnalysisOrigin,
}
