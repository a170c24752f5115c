use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_list(var: &str) -> Vec<String> {
    env::var(var)
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: Option<LlmConfig>,
    pub answer: AnswerConfig,
    pub aggregation: AggregationConfig,
    pub session: SessionConfig,
    pub discourse: DiscourseConfig,
    pub botcheck: Option<BotCheckConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated origin whitelist. Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
    /// Bearer tokens accepted on the forum-responder endpoints.
    pub api_keys: Vec<String>,
    pub rate_limit_enabled: bool,
    /// Requests per client per minute. Zero disables limiting.
    pub rate_limit_per_minute: u32,
    pub max_body_bytes: usize,
}

/// LLM configuration for chat/completion models
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswerConfig {
    /// Cap on documents folded into one prompt context.
    pub max_context_documents: usize,
    pub default_follow_up_count: usize,
}

/// Weights and scoring constants for the multi-source aggregator.
///
/// These are sort-priority heuristics, not calibrated probabilities; every
/// constant can be tuned through the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    pub documentation_weight: f64,
    pub github_weight: f64,
    pub blog_weight: f64,
    pub changelog_weight: f64,
    /// Flat sort bonus for resolved issue-tracker items.
    pub resolved_bonus: f64,
    pub confidence_per_source: u32,
    pub confidence_per_resolved: u32,
    pub confidence_per_documentation: u32,
    /// Confidence reported when the aggregation model call fails.
    pub fallback_confidence: u8,
    /// Cap on sources folded into the combined context.
    pub max_sources: usize,
    pub search_timeout_secs: u64,
    pub github: Option<GithubSearchConfig>,
    pub blog_search_url: Option<String>,
    pub changelog_search_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubSearchConfig {
    /// Repository in `owner/name` form.
    pub repo: String,
    pub token: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub ttl_secs: u64,
    pub sweep_interval_secs: u64,
    /// FIFO cap on turns retained per session.
    pub max_turns: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscourseConfig {
    pub cache_enabled: bool,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotCheckConfig {
    pub secret: String,
    pub verify_url: String,
    pub min_score: f64,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("DOCENT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("DOCENT_PORT", 3000),
                allowed_origins: parse_env_list("ALLOWED_ORIGINS"),
                api_keys: parse_env_list("DOCENT_API_KEYS"),
                rate_limit_enabled: parse_env_or("RATE_LIMIT_ENABLED", true),
                rate_limit_per_minute: parse_env_or("RATE_LIMIT_PER_MINUTE", 60),
                max_body_bytes: parse_env_or("DOCENT_MAX_BODY_BYTES", 1_048_576),
            },
            llm: env::var("LLM_MODEL").ok().map(|model| LlmConfig {
                model,
                api_key: env::var("LLM_API_KEY").ok(),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
                max_output_tokens: parse_env_or("LLM_MAX_OUTPUT_TOKENS", 1024),
            }),
            answer: AnswerConfig {
                max_context_documents: parse_env_or("MAX_CONTEXT_DOCUMENTS", 5),
                default_follow_up_count: parse_env_or("FOLLOW_UP_COUNT", 3),
            },
            aggregation: AggregationConfig {
                documentation_weight: parse_env_or("AGG_WEIGHT_DOCUMENTATION", 0.5),
                github_weight: parse_env_or("AGG_WEIGHT_GITHUB", 0.3),
                blog_weight: parse_env_or("AGG_WEIGHT_BLOG", 0.15),
                changelog_weight: parse_env_or("AGG_WEIGHT_CHANGELOG", 0.05),
                resolved_bonus: parse_env_or("AGG_RESOLVED_BONUS", 0.1),
                confidence_per_source: parse_env_or("AGG_CONFIDENCE_PER_SOURCE", 10),
                confidence_per_resolved: parse_env_or("AGG_CONFIDENCE_PER_RESOLVED", 15),
                confidence_per_documentation: parse_env_or("AGG_CONFIDENCE_PER_DOCUMENTATION", 20),
                fallback_confidence: parse_env_or("AGG_FALLBACK_CONFIDENCE", 50),
                max_sources: parse_env_or("AGG_MAX_SOURCES", 10),
                search_timeout_secs: parse_env_or("SOURCE_SEARCH_TIMEOUT", 10),
                github: env::var("GITHUB_REPO").ok().map(|repo| GithubSearchConfig {
                    repo,
                    token: env::var("GITHUB_TOKEN").ok(),
                    base_url: env::var("GITHUB_API_BASE_URL")
                        .unwrap_or_else(|_| "https://api.github.com".to_string()),
                }),
                blog_search_url: env::var("BLOG_SEARCH_URL").ok(),
                changelog_search_url: env::var("CHANGELOG_SEARCH_URL").ok(),
            },
            session: SessionConfig {
                ttl_secs: parse_env_or("SESSION_TTL_SECS", 1800),
                sweep_interval_secs: parse_env_or("SESSION_SWEEP_INTERVAL_SECS", 300),
                max_turns: parse_env_or("SESSION_MAX_TURNS", 10),
            },
            discourse: DiscourseConfig {
                cache_enabled: parse_env_or("CACHE_ENABLED", true),
                cache_capacity: parse_env_or("DISCOURSE_CACHE_SIZE", 500),
                cache_ttl_secs: parse_env_or("DISCOURSE_CACHE_TTL_SECS", 3600),
            },
            botcheck: env::var("BOTCHECK_SECRET").ok().map(|secret| BotCheckConfig {
                secret,
                verify_url: env::var("BOTCHECK_VERIFY_URL").unwrap_or_else(|_| {
                    "https://www.google.com/recaptcha/api/siteverify".to_string()
                }),
                min_score: parse_env_or("BOTCHECK_MIN_SCORE", 0.5),
                timeout_secs: parse_env_or("BOTCHECK_TIMEOUT", 10),
            }),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}
