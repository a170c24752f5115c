use axum::http::header::RETRY_AFTER;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serial_test::serial;
use std::env;

use docent::config::{parse_llm_provider_model, Config, LlmConfig, KNOWN_LLM_PROVIDERS};
use docent::error::DocentError;

#[test]
fn test_parse_openai_model() {
    let (provider, model) = parse_llm_provider_model("openai/gpt-4o");
    assert_eq!(provider, "openai");
    assert_eq!(model, "gpt-4o");
}

#[test]
fn test_parse_ollama_model() {
    let (provider, model) = parse_llm_provider_model("ollama/llama3.2");
    assert_eq!(provider, "ollama");
    assert_eq!(model, "llama3.2");
}

#[test]
fn test_parse_openrouter_model_keeps_nested_path() {
    let (provider, model) = parse_llm_provider_model("openrouter/anthropic/claude-3.5-sonnet");
    assert_eq!(provider, "openrouter");
    assert_eq!(model, "anthropic/claude-3.5-sonnet");
}

#[test]
fn test_parse_unknown_model_defaults_to_local() {
    let (provider, model) = parse_llm_provider_model("some-custom-model");
    assert_eq!(provider, "local");
    assert_eq!(model, "some-custom-model");
}

#[test]
fn test_parse_unknown_prefix_defaults_to_local() {
    let (provider, model) = parse_llm_provider_model("unknown/model-name");
    assert_eq!(provider, "local");
    assert_eq!(model, "unknown/model-name");
}

#[test]
fn test_known_llm_providers_constant() {
    assert!(KNOWN_LLM_PROVIDERS.contains(&"openai"));
    assert!(KNOWN_LLM_PROVIDERS.contains(&"openrouter"));
    assert!(KNOWN_LLM_PROVIDERS.contains(&"ollama"));
    assert!(KNOWN_LLM_PROVIDERS.contains(&"lmstudio"));
    assert_eq!(KNOWN_LLM_PROVIDERS.len(), 4);
}

#[test]
#[serial]
fn test_llm_config_none_when_no_env() {
    env::remove_var("LLM_MODEL");

    let config = Config::default();

    assert!(
        config.llm.is_none(),
        "LlmConfig should be None when LLM_MODEL is not set"
    );
}

#[test]
#[serial]
fn test_llm_config_defaults_when_only_model_set() {
    env::set_var("LLM_MODEL", "openai/gpt-4o-mini");
    env::remove_var("LLM_API_KEY");
    env::remove_var("LLM_BASE_URL");
    env::remove_var("LLM_TIMEOUT");
    env::remove_var("LLM_MAX_OUTPUT_TOKENS");

    let config = Config::default();

    let llm = config.llm.expect("LlmConfig should exist");
    assert_eq!(llm.model, "openai/gpt-4o-mini");
    assert!(llm.api_key.is_none());
    assert!(llm.base_url.is_none());
    assert_eq!(llm.timeout_secs, 30);
    assert_eq!(llm.max_output_tokens, 1024);

    env::remove_var("LLM_MODEL");
}

#[test]
#[serial]
fn test_llm_config_with_all_env_vars() {
    env::set_var("LLM_MODEL", "openrouter/anthropic/claude-3.5-sonnet");
    env::set_var("LLM_API_KEY", "sk-test-key");
    env::set_var("LLM_BASE_URL", "https://api.custom.com/v1");
    env::set_var("LLM_TIMEOUT", "60");
    env::set_var("LLM_MAX_OUTPUT_TOKENS", "2048");

    let config = Config::default();

    let llm = config.llm.expect("LlmConfig should exist");
    assert_eq!(llm.model, "openrouter/anthropic/claude-3.5-sonnet");
    assert_eq!(llm.api_key, Some("sk-test-key".to_string()));
    assert_eq!(llm.base_url, Some("https://api.custom.com/v1".to_string()));
    assert_eq!(llm.timeout_secs, 60);
    assert_eq!(llm.max_output_tokens, 2048);

    env::remove_var("LLM_MODEL");
    env::remove_var("LLM_API_KEY");
    env::remove_var("LLM_BASE_URL");
    env::remove_var("LLM_TIMEOUT");
    env::remove_var("LLM_MAX_OUTPUT_TOKENS");
}

#[test]
fn test_llm_rate_limit_error_status_code_mapping() {
    let error = DocentError::LlmRateLimit {
        retry_after: Some(60),
    };
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers().get(RETRY_AFTER).unwrap(), "60");
}

#[test]
fn test_llm_rate_limit_error_without_retry_after() {
    let error = DocentError::LlmRateLimit { retry_after: None };
    let response = error.into_response();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().get(RETRY_AFTER).is_none());
}

#[test]
fn test_llm_config_clone() {
    let config = LlmConfig {
        model: "openai/gpt-4o".to_string(),
        api_key: Some("secret".to_string()),
        base_url: Some("https://api.openai.com/v1".to_string()),
        timeout_secs: 30,
        max_output_tokens: 1024,
    };

    let cloned = config.clone();

    assert_eq!(cloned.model, config.model);
    assert_eq!(cloned.api_key, config.api_key);
    assert_eq!(cloned.base_url, config.base_url);
    assert_eq!(cloned.timeout_secs, config.timeout_secs);
    assert_eq!(cloned.max_output_tokens, config.max_output_tokens);
}
