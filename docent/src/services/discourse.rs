use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::answer::{build_context, validate};
use crate::config::DiscourseConfig;
use crate::error::Result;
use crate::llm::{prompts, LlmProvider};
use crate::models::{Document, TokenUsage, ValidationResult};
use crate::services::ResponseCache;

/// An incoming forum post to draft a reply for.
#[derive(Debug, Clone)]
pub struct ForumPost {
    pub title: String,
    pub post: String,
    pub category: Option<String>,
    pub trust_level: u8,
    pub username: Option<String>,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone)]
pub struct ForumReply {
    pub reply: String,
    pub cached: bool,
    pub validation: ValidationResult,
    pub usage: TokenUsage,
}

/// Cache payload: everything a hit needs to answer without the model.
#[derive(Debug, Clone)]
struct CachedReply {
    reply: String,
    validation: ValidationResult,
    usage: TokenUsage,
}

/// Counters for the forum surface. Relaxed ordering is enough; these are
/// monotonic tallies, not synchronization points.
#[derive(Debug, Default)]
struct DiscourseMetrics {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    generated: AtomicU64,
    errors: AtomicU64,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub cache_hits: u64,
    pub generated: u64,
    pub errors: u64,
    pub cache_entries: usize,
    pub cache_enabled: bool,
}

/// Drafts forum replies with tone matched to the poster's trust level.
///
/// Identical posts within the cache TTL are answered from the cache so a
/// crossposted question does not burn tokens twice.
#[derive(Clone)]
pub struct DiscourseResponder {
    llm: LlmProvider,
    cache: Option<ResponseCache<CachedReply>>,
    metrics: Arc<DiscourseMetrics>,
    max_context_documents: usize,
}

impl DiscourseResponder {
    pub fn new(llm: LlmProvider, config: &DiscourseConfig, max_context_documents: usize) -> Self {
        let cache = config
            .cache_enabled
            .then(|| ResponseCache::new(config.cache_capacity, config.cache_ttl_secs));

        Self {
            llm,
            cache,
            metrics: Arc::new(DiscourseMetrics::default()),
            max_context_documents,
        }
    }

    pub async fn respond(&self, post: ForumPost) -> Result<ForumReply> {
        self.metrics.requests.fetch_add(1, Ordering::Relaxed);

        let key = ResponseCache::<CachedReply>::generate_key(&cache_input(&post));
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key) {
                self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "Forum reply served from cache");
                return Ok(ForumReply {
                    reply: hit.reply,
                    cached: true,
                    validation: hit.validation,
                    usage: hit.usage,
                });
            }
        }

        let context = build_context(&post.documents, self.max_context_documents);
        let template = prompts::discourse_template(post.category.as_deref(), post.trust_level);
        let prompt =
            prompts::discourse_prompt(&post.title, &post.post, &context, post.username.as_deref());

        let completion = match self.llm.complete(&prompt, Some(&template), None).await {
            Ok(completion) => completion,
            Err(err) => {
                self.metrics.errors.fetch_add(1, Ordering::Relaxed);
                return Err(err);
            }
        };

        let validation = validate(&completion.content, post.documents.len());
        self.metrics.generated.fetch_add(1, Ordering::Relaxed);

        if let Some(cache) = &self.cache {
            cache.put(
                key,
                CachedReply {
                    reply: completion.content.clone(),
                    validation: validation.clone(),
                    usage: completion.usage.clone(),
                },
            );
        }

        Ok(ForumReply {
            reply: completion.content,
            cached: false,
            validation,
            usage: completion.usage,
        })
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.metrics.requests.load(Ordering::Relaxed),
            cache_hits: self.metrics.cache_hits.load(Ordering::Relaxed),
            generated: self.metrics.generated.load(Ordering::Relaxed),
            errors: self.metrics.errors.load(Ordering::Relaxed),
            cache_entries: self.cache.as_ref().map_or(0, ResponseCache::len),
            cache_enabled: self.cache.is_some(),
        }
    }
}

/// Normalized cache identity: whitespace and letter case never split entries,
/// but category and trust level do since they change the reply's tone.
fn cache_input(post: &ForumPost) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        post.title.trim().to_lowercase(),
        post.post.trim().to_lowercase(),
        post.category.as_deref().unwrap_or("").trim().to_lowercase(),
        post.trust_level,
    )
}
