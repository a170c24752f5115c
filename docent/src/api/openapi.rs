use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use crate::aggregate;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Docent API",
        version = "0.2.0",
        description = "Documentation answering backend. Classifies search queries, grounds an \
                       LLM on supplied documents, aggregates community sources, and scores \
                       the generated answers.",
    ),
    paths(
        handlers::health::health_check,
        handlers::answer::generate_answer,
        handlers::answer::extract_keywords,
        handlers::answer::follow_up_questions,
        handlers::aggregate::multi_source_search,
        handlers::session::create_session,
        handlers::session::session_history,
        handlers::discourse::discourse_response,
        handlers::discourse::discourse_metrics,
        handlers::legacy::chat_completions,
        handlers::legacy::summarize,
    ),
    components(schemas(
        // Domain models
        models::Document,
        models::MultiSourceResult,
        models::QueryCategory,
        models::SkillLevel,
        models::ConfidenceTag,
        models::SourceKind,
        models::AnalysisOrigin,
        models::QueryAnalysis,
        models::TokenUsage,
        models::QualityMetrics,
        models::ValidationResult,
        models::ConversationTurn,
        // Aggregation
        aggregate::AggregationOverrides,
        aggregate::AggregationMetrics,
        // Services
        services::AnswerEnhancement,
        services::MetricsSnapshot,
        // Answers
        dto::answer::GenerateAnswerRequest,
        dto::answer::GenerateAnswerResponse,
        dto::answer::KeywordsRequest,
        dto::answer::KeywordsResponse,
        dto::answer::FollowUpRequest,
        dto::answer::FollowUpResponse,
        // Aggregation endpoint
        dto::aggregate::MultiSourceSearchRequest,
        dto::aggregate::MultiSourceSearchResponse,
        // Sessions
        dto::session::CreateSessionRequest,
        dto::session::CreateSessionResponse,
        dto::session::SessionHistoryResponse,
        // Discourse
        dto::discourse::DiscourseRequest,
        dto::discourse::DiscourseResponse,
        // Legacy passthrough
        dto::legacy::ChatCompletionRequest,
        dto::legacy::ChatMessageDto,
        dto::legacy::ChatCompletionResponse,
        dto::legacy::SummarizeRequest,
        dto::legacy::SummarizeResponse,
        // Health (handler-local types)
        handlers::health::HealthResponse,
        handlers::health::LlmStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "answers", description = "Grounded answer generation, keywords, and follow-ups"),
        (name = "aggregation", description = "Multi-source search and synthesis"),
        (name = "sessions", description = "Conversation session management"),
        (name = "discourse", description = "Forum reply drafting (auth required)"),
        (name = "legacy", description = "Direct model passthrough for older clients"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
