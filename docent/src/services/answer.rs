use chrono::Utc;
use serde::Serialize;

use crate::answer::{build_context, render_history, validate, FollowUpGenerator, QueryClassifier};
use crate::config::AnswerConfig;
use crate::error::{DocentError, Result};
use crate::llm::{prompts, strip_code_fences, CompletionOptions, LlmProvider};
use crate::models::{
    AnalysisOrigin, ConversationTurn, Document, QueryAnalysis, QueryCategory, TokenUsage,
    ValidationResult,
};
use crate::services::SessionStore;

/// Keywords returned when the request does not say how many it wants.
pub const DEFAULT_MAX_KEYWORDS: usize = 5;

/// Inputs for one answer-generation run.
#[derive(Debug, Clone)]
pub struct AnswerRequest {
    pub query: String,
    pub documents: Vec<Document>,
    pub system_context: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub session_id: Option<String>,
}

/// How the answer was assembled: which template ran and how much context
/// went in.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEnhancement {
    pub template: QueryCategory,
    pub context_documents: usize,
    pub session_turns: usize,
}

#[derive(Debug, Clone)]
pub struct GeneratedAnswer {
    pub answer: String,
    pub model: String,
    pub usage: TokenUsage,
    pub analysis: QueryAnalysis,
    pub validation: ValidationResult,
    pub enhancement: AnswerEnhancement,
}

#[derive(Debug, Clone)]
pub struct KeywordExtraction {
    pub keywords: Vec<String>,
    pub usage: TokenUsage,
}

/// The answering pipeline: classify, build context, complete, validate.
///
/// Classification and follow-up generation degrade to heuristics on their
/// own; only input validation and the primary completion surface errors to
/// the caller.
#[derive(Clone)]
pub struct AnswerService {
    llm: LlmProvider,
    classifier: QueryClassifier,
    follow_ups: FollowUpGenerator,
    sessions: SessionStore,
    config: AnswerConfig,
}

impl AnswerService {
    pub fn new(llm: LlmProvider, sessions: SessionStore, config: AnswerConfig) -> Self {
        Self {
            classifier: QueryClassifier::new(llm.clone()),
            follow_ups: FollowUpGenerator::new(llm.clone()),
            llm,
            sessions,
            config,
        }
    }

    pub async fn generate(&self, request: AnswerRequest) -> Result<GeneratedAnswer> {
        let history = match &request.session_id {
            Some(id) => Some(
                self.sessions
                    .history(id)
                    .ok_or_else(|| DocentError::NotFound(format!("Session not found: {id}")))?,
            ),
            None => None,
        };

        let analysis = self.classifier.classify(&request.query).await;
        let category = analysis.category;

        let context = build_context(&request.documents, self.config.max_context_documents);
        let rendered_history = history
            .as_deref()
            .filter(|turns| !turns.is_empty())
            .map(render_history);

        let template = prompts::answer_template(category, request.system_context.as_deref());
        let prompt = prompts::answer_prompt(&request.query, &context, rendered_history.as_deref());

        let options = CompletionOptions {
            max_tokens: request.max_tokens,
            model: request.model.clone(),
            ..Default::default()
        };

        // The primary completion is the one failure that reaches the client.
        let completion = self
            .llm
            .complete(&prompt, Some(&template), Some(&options))
            .await?;

        let validation = validate(&completion.content, request.documents.len());

        let session_turns = history.as_ref().map_or(0, Vec::len);
        if let Some(id) = &request.session_id {
            self.sessions.append_turn(
                id,
                ConversationTurn {
                    query: request.query.clone(),
                    answer: completion.content.clone(),
                    timestamp: Utc::now(),
                    analysis: Some(analysis.clone()),
                    validation: Some(validation.clone()),
                },
            );
        }

        Ok(GeneratedAnswer {
            answer: completion.content,
            model: completion.model,
            usage: completion.usage,
            analysis,
            validation,
            enhancement: AnswerEnhancement {
                template: category,
                context_documents: request.documents.len().min(self.config.max_context_documents),
                session_turns,
            },
        })
    }

    /// Extract search keywords from a query.
    ///
    /// The completion itself must succeed; malformed output degrades to a
    /// token split of the query, keeping the usage from the real call.
    pub async fn keywords(
        &self,
        query: &str,
        system_context: Option<&str>,
        max_keywords: usize,
    ) -> Result<KeywordExtraction> {
        let prompt = prompts::keyword_extraction_prompt(query, system_context, max_keywords);
        let completion = self.llm.complete(&prompt, None, None).await?;

        let parsed =
            serde_json::from_str::<Vec<String>>(strip_code_fences(&completion.content)).ok();

        let keywords = match parsed {
            Some(list) if !list.is_empty() => list
                .into_iter()
                .map(|keyword| keyword.trim().to_string())
                .filter(|keyword| !keyword.is_empty())
                .take(max_keywords)
                .collect(),
            _ => {
                tracing::warn!("Keyword extraction returned malformed output, using token fallback");
                fallback_keywords(query, max_keywords)
            }
        };

        Ok(KeywordExtraction {
            keywords,
            usage: completion.usage,
        })
    }

    /// Suggest follow-up questions for an explicit exchange or a session's
    /// latest turn.
    pub async fn follow_ups(
        &self,
        session_id: Option<&str>,
        query: Option<&str>,
        answer: Option<&str>,
        count: Option<usize>,
    ) -> Result<(Vec<String>, AnalysisOrigin)> {
        let count = count.unwrap_or(self.config.default_follow_up_count);

        let (query, answer, category) = match (query, answer) {
            (Some(q), Some(a)) => (
                q.to_string(),
                a.to_string(),
                QueryClassifier::heuristic(q).category,
            ),
            _ => {
                let id = session_id.ok_or_else(|| {
                    DocentError::Validation(
                        "Either sessionId or query and answer are required".to_string(),
                    )
                })?;
                let session = self
                    .sessions
                    .get(id)
                    .ok_or_else(|| DocentError::NotFound(format!("Session not found: {id}")))?;
                let turn = session.last_turn().ok_or_else(|| {
                    DocentError::Validation(
                        "Session has no turns to derive follow-ups from".to_string(),
                    )
                })?;

                let category = turn
                    .analysis
                    .as_ref()
                    .map(|analysis| analysis.category)
                    .unwrap_or_else(|| QueryClassifier::heuristic(&turn.query).category);

                (turn.query.clone(), turn.answer.clone(), category)
            }
        };

        Ok(self
            .follow_ups
            .generate(&query, &answer, category, count)
            .await)
    }
}

/// Degraded keyword list: the whole query first, then its longer tokens.
fn fallback_keywords(query: &str, max_keywords: usize) -> Vec<String> {
    let full = query.trim().to_string();

    let mut keywords = vec![full.clone()];
    keywords.extend(
        query
            .split_whitespace()
            .map(|token| {
                token
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|token| token.len() > 2)
            .filter(|token| !token.eq_ignore_ascii_case(&full)),
    );

    keywords.truncate(max_keywords);
    keywords
}
