//! Shared helpers for the HTTP-level integration tests.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::json;

use docent::api::{create_router, AppState};
use docent::config::{
    AggregationConfig, AnswerConfig, Config, DiscourseConfig, LlmConfig, ServerConfig,
    SessionConfig,
};

/// Config with every optional integration disabled and no LLM.
pub fn base_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origins: Vec::new(),
            api_keys: Vec::new(),
            rate_limit_enabled: false,
            rate_limit_per_minute: 0,
            max_body_bytes: 1_048_576,
        },
        llm: None,
        answer: AnswerConfig {
            max_context_documents: 5,
            default_follow_up_count: 3,
        },
        aggregation: AggregationConfig {
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
        },
        session: SessionConfig {
            ttl_secs: 1800,
            sweep_interval_secs: 300,
            max_turns: 10,
        },
        discourse: DiscourseConfig {
            cache_enabled: true,
            cache_capacity: 100,
            cache_ttl_secs: 3600,
        },
        botcheck: None,
    }
}

/// `base_config` pointed at a mock OpenAI-compatible server.
pub fn config_with_llm(base_url: &str) -> Config {
    let mut config = base_config();
    config.llm = Some(LlmConfig {
        model: "openai/gpt-4o-mini".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url.to_string()),
        timeout_secs: 5,
        max_output_tokens: 512,
    });
    config
}

pub fn build_app(config: Config) -> (Router, AppState) {
    let state = AppState::new(config).expect("state should build");
    (create_router(state.clone()), state)
}

/// OpenAI-shaped chat completion body with the given assistant content.
pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 0,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 40, "completion_tokens": 25, "total_tokens": 65}
    })
}

/// An answer that passes every rubric check.
pub const STRONG_ANSWER: &str = "Rotate the key in three steps:\n\
    1. Open settings [Source: API guide](https://docs.example.com/api).\n\
    2. Click rotate and confirm.\n\
    3. Update clients with `client.set_key(new_key)` before the grace window \
    closes so that running deployments never see a rejected request.\n\
    Confidence: HIGH";

pub fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

pub async fn response_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    serde_json::from_slice(&body).expect("body should be JSON")
}
