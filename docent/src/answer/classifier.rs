//! Query classification with a model-first, heuristics-second strategy.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::llm::{prompts, LlmProvider};
use crate::models::{AnalysisOrigin, QueryAnalysis, QueryCategory, SkillLevel};

/// Cap on keywords produced by the heuristic path.
const HEURISTIC_KEYWORD_LIMIT: usize = 5;

// Ordered from most to least specific. A query that mentions an error is a
// troubleshooting query even when it is phrased as "how do I fix...".
static TROUBLESHOOTING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(error|issue|problem|fix|fail(s|ed|ing)?|crash(es|ed)?|broken|not working|doesn't work)\b")
        .unwrap()
});

static CONFIGURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(set ?up|setup|configure|configuration|install(ation)?|settings?)\b")
        .unwrap()
});

static HOW_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhow (to|do|can|should)\b").unwrap());

static WHAT_IS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(what (is|are|does)|define|definition of|meaning of)\b").unwrap()
});

#[derive(Clone)]
pub struct QueryClassifier {
    llm: LlmProvider,
}

impl QueryClassifier {
    pub fn new(llm: LlmProvider) -> Self {
        Self { llm }
    }

    /// Classify a query, degrading from the model to keyword heuristics.
    ///
    /// This never fails: a model error, malformed JSON, or unexpected field
    /// values all collapse into usable defaults so answer generation can
    /// proceed.
    pub async fn classify(&self, query: &str) -> QueryAnalysis {
        match self.llm.complete_json(&prompts::classification_prompt(query), None).await {
            Ok(completion) => Self::from_model_response(query, &completion.value),
            Err(error) => {
                tracing::warn!(error = %error, "Query classification failed, using heuristics");
                Self::heuristic(query)
            }
        }
    }

    /// Build an analysis from model JSON, clamping every field individually.
    fn from_model_response(query: &str, value: &Value) -> QueryAnalysis {
        let category = value["category"]
            .as_str()
            .map(|raw| raw.parse().unwrap_or_default())
            .unwrap_or_default();

        let intent = value["intent"]
            .as_str()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| query.to_string());

        let reformulated_query = value["reformulatedQuery"]
            .as_str()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(str::to_string);

        let keywords = value["keywords"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .map(str::trim)
                    .filter(|raw| !raw.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let complexity = value["complexity"]
            .as_str()
            .map(|raw| raw.parse().unwrap_or_default())
            .unwrap_or_default();

        QueryAnalysis {
            category,
            intent,
            reformulated_query,
            keywords,
            complexity,
            origin: AnalysisOrigin::Model,
        }
    }

    /// Regex-driven fallback used when the model path is unavailable.
    ///
    /// `api-reference` is deliberately absent here: it needs the model to
    /// recognize symbol names, so the heuristics never assign it.
    pub fn heuristic(query: &str) -> QueryAnalysis {
        let category = if TROUBLESHOOTING.is_match(query) {
            QueryCategory::Troubleshooting
        } else if CONFIGURATION.is_match(query) {
            QueryCategory::Configuration
        } else if HOW_TO.is_match(query) {
            QueryCategory::HowTo
        } else if WHAT_IS.is_match(query) {
            QueryCategory::WhatIs
        } else {
            QueryCategory::General
        };

        let intent = match category {
            QueryCategory::Troubleshooting => "resolve a reported problem",
            QueryCategory::Configuration => "set up or configure a feature",
            QueryCategory::HowTo => "get step-by-step instructions",
            QueryCategory::WhatIs => "understand a concept",
            QueryCategory::ApiReference => "look up an API",
            QueryCategory::General => "find relevant documentation",
        };

        QueryAnalysis {
            category,
            intent: intent.to_string(),
            reformulated_query: None,
            keywords: heuristic_keywords(query),
            complexity: SkillLevel::Beginner,
            origin: AnalysisOrigin::Heuristic,
        }
    }
}

/// Lowercased alphanumeric tokens longer than two characters, in query order.
pub fn heuristic_keywords(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(|token| {
            token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|token| token.len() > 2)
        .take(HEURISTIC_KEYWORD_LIMIT)
        .collect()
}
