use std::sync::Arc;

use url::Url;

use crate::aggregate::{GithubIssueSearch, JsonFeedSearch, MultiSourceAggregator, SourceSearch};
use crate::config::{AggregationConfig, Config};
use crate::error::Result;
use crate::llm::LlmProvider;
use crate::models::SourceKind;
use crate::services::{
    AnswerService, BotScoreVerifier, DiscourseResponder, RateLimiter, SessionStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: LlmProvider,
    pub sessions: SessionStore,
    pub answers: AnswerService,
    pub aggregator: MultiSourceAggregator,
    pub discourse: DiscourseResponder,
    pub botcheck: BotScoreVerifier,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let llm = LlmProvider::new(config.llm.as_ref());

        let sessions = SessionStore::new(config.session.max_turns);
        let answers = AnswerService::new(llm.clone(), sessions.clone(), config.answer.clone());
        let aggregator = MultiSourceAggregator::new(
            llm.clone(),
            build_sources(&config.aggregation),
            config.aggregation.clone(),
        );
        let discourse = DiscourseResponder::new(
            llm.clone(),
            &config.discourse,
            config.answer.max_context_documents,
        );
        let botcheck = BotScoreVerifier::new(config.botcheck.clone())?;
        let rate_limiter = RateLimiter::new(
            config.server.rate_limit_per_minute,
            config.server.rate_limit_enabled,
        );

        Ok(Self {
            config,
            llm,
            sessions,
            answers,
            aggregator,
            discourse,
            botcheck,
            rate_limiter,
        })
    }
}

/// Assemble the configured community search sources.
///
/// A source with a bad URL is logged and skipped rather than failing
/// startup; aggregation degrades to the remaining sources.
fn build_sources(config: &AggregationConfig) -> Vec<Arc<dyn SourceSearch>> {
    let mut sources: Vec<Arc<dyn SourceSearch>> = Vec::new();

    if let Some(github) = &config.github {
        match GithubIssueSearch::new(github, config.search_timeout_secs) {
            Ok(search) => sources.push(Arc::new(search)),
            Err(err) => tracing::warn!("Skipping GitHub issue search: {err}"),
        }
    }

    for (url, kind) in [
        (&config.blog_search_url, SourceKind::Blog),
        (&config.changelog_search_url, SourceKind::Changelog),
    ] {
        let Some(raw) = url else { continue };
        let parsed = match Url::parse(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("Skipping {kind} search, invalid URL '{raw}': {err}");
                continue;
            }
        };
        match JsonFeedSearch::new(parsed, kind, config.search_timeout_secs) {
            Ok(search) => sources.push(Arc::new(search)),
            Err(err) => tracing::warn!("Skipping {kind} search: {err}"),
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GithubSearchConfig;

    fn aggregation_config() -> AggregationConfig {
        AggregationConfig {
            documentation_weight: 0.5,
            github_weight: 0.3,
            blog_weight: 0.15,
            changelog_weight: 0.05,
            resolved_bonus: 0.1,
            confidence_per_source: 10,
            confidence_per_resolved: 15,
            confidence_per_documentation: 20,
            fallback_confidence: 50,
            max_sources: 10,
            search_timeout_secs: 5,
            github: None,
            blog_search_url: None,
            changelog_search_url: None,
        }
    }

    #[test]
    fn test_no_configured_sources_yields_empty_set() {
        assert!(build_sources(&aggregation_config()).is_empty());
    }

    #[test]
    fn test_all_three_sources_are_built() {
        let mut config = aggregation_config();
        config.github = Some(GithubSearchConfig {
            repo: "acme/widgets".to_string(),
            token: None,
            base_url: "https://api.github.com".to_string(),
        });
        config.blog_search_url = Some("https://blog.example.com/search".to_string());
        config.changelog_search_url = Some("https://changelog.example.com/search".to_string());

        assert_eq!(build_sources(&config).len(), 3);
    }

    #[test]
    fn test_invalid_feed_url_is_skipped() {
        let mut config = aggregation_config();
        config.blog_search_url = Some("not a url".to_string());
        assert!(build_sources(&config).is_empty());
    }
}
