//! Follow-up question suggestions for a completed question/answer exchange.

use crate::llm::{prompts, LlmProvider};
use crate::models::{AnalysisOrigin, QueryCategory};

#[derive(Clone)]
pub struct FollowUpGenerator {
    llm: LlmProvider,
}

impl FollowUpGenerator {
    pub fn new(llm: LlmProvider) -> Self {
        Self { llm }
    }

    /// Suggest follow-up questions for the given exchange.
    ///
    /// The model path asks for a JSON array; anything else (model failure,
    /// malformed output, an empty list) degrades to canned per-category
    /// questions. The returned origin tells the caller which path produced
    /// the suggestions.
    pub async fn generate(
        &self,
        query: &str,
        answer: &str,
        category: QueryCategory,
        count: usize,
    ) -> (Vec<String>, AnalysisOrigin) {
        let prompt = prompts::follow_up_prompt(query, answer, count);

        match self.llm.complete_json(&prompt, None).await {
            Ok(completion) => {
                let questions: Vec<String> = completion
                    .value
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|item| item.as_str())
                            .map(str::trim)
                            .filter(|q| !q.is_empty())
                            .map(str::to_string)
                            .take(count)
                            .collect()
                    })
                    .unwrap_or_default();

                if questions.is_empty() {
                    tracing::warn!("Follow-up generation returned no usable questions");
                    (canned_questions(category, count), AnalysisOrigin::Fallback)
                } else {
                    (questions, AnalysisOrigin::Model)
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "Follow-up generation failed, using canned questions");
                (canned_questions(category, count), AnalysisOrigin::Fallback)
            }
        }
    }
}

/// Generic but category-appropriate questions for the degraded path.
fn canned_questions(category: QueryCategory, count: usize) -> Vec<String> {
    let pool: &[&str] = match category {
        QueryCategory::HowTo => &[
            "What are common mistakes to avoid here?",
            "Can this be automated or scripted?",
            "How do I undo this change?",
        ],
        QueryCategory::WhatIs => &[
            "How does this compare to related features?",
            "When should I use it?",
            "Are there limits or quotas to know about?",
        ],
        QueryCategory::Troubleshooting => &[
            "Which logs help diagnose this further?",
            "How do I prevent this from happening again?",
            "Is this a known issue with a tracked fix?",
        ],
        QueryCategory::Configuration => &[
            "What are the default values?",
            "Does changing this require a restart?",
            "How do I verify the new configuration took effect?",
        ],
        QueryCategory::ApiReference => &[
            "What errors can this call return?",
            "Is this endpoint rate limited?",
            "Is there an SDK wrapper for this API?",
        ],
        QueryCategory::General => &[
            "Where can I read more about this?",
            "What related features should I know about?",
            "How do I get support if I'm stuck?",
        ],
    };

    pool.iter().take(count).map(|q| q.to_string()).collect()
}
