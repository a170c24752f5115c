//! Fan-out search across sources plus a single fusion call to the model.

use std::cmp::Ordering;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::aggregate::sources::SourceSearch;
use crate::config::AggregationConfig;
use crate::llm::{prompts, LlmProvider};
use crate::models::{AnalysisOrigin, Document, MultiSourceResult, SourceKind, TokenUsage};

/// Per-request knobs for one aggregation call.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregationOverrides {
    /// Restrict the fan-out to these source kinds.
    pub sources: Option<Vec<SourceKind>>,
    /// Cap on sources folded into the combined context.
    pub max_sources: Option<usize>,
}

/// Counts describing what the fan-out found, plus the derived confidence.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregationMetrics {
    pub source_count: usize,
    pub documentation_count: usize,
    pub resolved_github_count: usize,
    /// 0-100. Derived from the source counts, or pinned to the configured
    /// fallback value when the fusion call fails.
    pub confidence: u8,
}

/// The outcome of one aggregation run. Always produced; `origin` records
/// whether the answer came from the model or the degraded source digest.
#[derive(Debug, Clone)]
pub struct AggregatedAnswer {
    pub answer: String,
    pub sources: Vec<MultiSourceResult>,
    pub metrics: AggregationMetrics,
    pub usage: TokenUsage,
    pub origin: AnalysisOrigin,
}

#[derive(Clone)]
pub struct MultiSourceAggregator {
    llm: LlmProvider,
    sources: Vec<Arc<dyn SourceSearch>>,
    config: AggregationConfig,
}

impl MultiSourceAggregator {
    pub fn new(
        llm: LlmProvider,
        sources: Vec<Arc<dyn SourceSearch>>,
        config: AggregationConfig,
    ) -> Self {
        Self {
            llm,
            sources,
            config,
        }
    }

    /// Search every enabled source, rank the merged results, and fuse them
    /// into one answer.
    ///
    /// This never fails. A source that errors is logged and skipped; a failed
    /// fusion call degrades to a plain digest of the top sources with the
    /// configured fallback confidence.
    pub async fn aggregate(
        &self,
        query: &str,
        documents: Vec<Document>,
        system_context: Option<&str>,
        overrides: &AggregationOverrides,
    ) -> AggregatedAnswer {
        // Caller documents go first so they keep their given order among
        // equal weights after the stable sort.
        let mut merged: Vec<MultiSourceResult> = documents
            .into_iter()
            .map(|doc| MultiSourceResult::from_document(doc, SourceKind::Documentation, 0.0))
            .collect();

        let searches = self
            .sources
            .iter()
            .filter(|source| {
                overrides
                    .sources
                    .as_ref()
                    .map_or(true, |allowed| allowed.contains(&source.kind()))
            })
            .map(|source| {
                let kind = source.kind();
                async move {
                    match source.search(query).await {
                        Ok(results) => results,
                        Err(error) => {
                            tracing::warn!(
                                source = %kind,
                                error = %error,
                                "Source search failed, continuing without it"
                            );
                            Vec::new()
                        }
                    }
                }
            });

        merged.extend(join_all(searches).await.into_iter().flatten());

        for result in &mut merged {
            result.weight = self.weight_for(result.source);
        }

        let bonus = self.config.resolved_bonus;
        merged.sort_by(|a, b| {
            b.sort_weight(bonus)
                .partial_cmp(&a.sort_weight(bonus))
                .unwrap_or(Ordering::Equal)
        });

        let mut metrics = self.metrics_for(&merged);

        let limit = overrides.max_sources.unwrap_or(self.config.max_sources);
        merged.truncate(limit);

        let context = combined_context(&merged, bonus);
        let template = prompts::aggregation_template(system_context);
        let prompt = prompts::aggregation_prompt(query, &context);

        match self.llm.complete(&prompt, Some(&template), None).await {
            Ok(completion) => AggregatedAnswer {
                answer: completion.content,
                sources: merged,
                metrics,
                usage: completion.usage,
                origin: AnalysisOrigin::Model,
            },
            Err(error) => {
                tracing::warn!(error = %error, "Aggregation model call failed, returning source digest");
                metrics.confidence = self.config.fallback_confidence;
                AggregatedAnswer {
                    answer: fallback_answer(&merged),
                    sources: merged,
                    metrics,
                    usage: TokenUsage::default(),
                    origin: AnalysisOrigin::Fallback,
                }
            }
        }
    }

    fn weight_for(&self, kind: SourceKind) -> f64 {
        match kind {
            SourceKind::Documentation => self.config.documentation_weight,
            SourceKind::Github => self.config.github_weight,
            SourceKind::Blog => self.config.blog_weight,
            SourceKind::Changelog => self.config.changelog_weight,
        }
    }

    fn metrics_for(&self, merged: &[MultiSourceResult]) -> AggregationMetrics {
        let source_count = merged.len();
        let documentation_count = merged
            .iter()
            .filter(|r| r.source == SourceKind::Documentation)
            .count();
        let resolved_github_count = merged
            .iter()
            .filter(|r| r.source == SourceKind::Github && r.resolved)
            .count();

        let confidence = (self.config.confidence_per_source as usize * source_count
            + self.config.confidence_per_resolved as usize * resolved_github_count
            + self.config.confidence_per_documentation as usize * documentation_count)
            .min(100) as u8;

        AggregationMetrics {
            source_count,
            documentation_count,
            resolved_github_count,
            confidence,
        }
    }
}

/// Render ranked sources for the fusion prompt, annotated with the kind and
/// effective weight so the model can honor the priority order.
fn combined_context(sources: &[MultiSourceResult], resolved_bonus: f64) -> String {
    if sources.is_empty() {
        return "No sources matched the query.".to_string();
    }

    sources
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let mut annotation = format!(
                "source: {}, weight {:.2}",
                result.source,
                result.sort_weight(resolved_bonus)
            );
            if result.resolved {
                annotation.push_str(", resolved");
            }
            if let Some(timestamp) = result.timestamp {
                annotation.push_str(&format!(", updated {}", timestamp.format("%Y-%m-%d")));
            }

            format!(
                "[{}] {} ({}) [{}]\n{}",
                index + 1,
                result.title,
                result.url,
                annotation,
                result.content.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// Digest handed back when the fusion call fails: titles and snippets of the
/// top sources, so the caller still gets something actionable.
fn fallback_answer(sources: &[MultiSourceResult]) -> String {
    if sources.is_empty() {
        return "No sources were available for this query.".to_string();
    }

    let mut lines =
        vec!["Answer generation is temporarily degraded. Most relevant sources found:".to_string()];

    for result in sources {
        lines.push(format!(
            "- {} ({}): {}",
            result.title,
            result.source,
            snippet(&result.content, 200)
        ));
    }

    lines.join("\n")
}

fn snippet(content: &str, limit: usize) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= limit {
        collapsed
    } else {
        let truncated: String = collapsed.chars().take(limit).collect();
        format!("{truncated}...")
    }
}
