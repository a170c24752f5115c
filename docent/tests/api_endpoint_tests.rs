//! End-to-end tests that drive the full router over `tower::oneshot`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    base_config, build_app, completion_body, config_with_llm, get_request, json_request,
    response_json, STRONG_ANSWER,
};

async fn mount_classification(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Classify the following"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"category": "how-to", "intent": "rotate an API key",
                "keywords": ["rotate", "key"], "complexity": "beginner"}"#,
        )))
        .mount(server)
        .await;
}

async fn mount_answer(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Question:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(STRONG_ANSWER)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health_reports_ok_without_llm() {
    let (app, _) = build_app(base_config());

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["llm"]["status"], "unavailable");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_reports_llm_backend() {
    let (app, _) = build_app(config_with_llm("http://127.0.0.1:1"));

    let response = app.oneshot(get_request("/health")).await.unwrap();

    let json = response_json(response).await;
    assert_eq!(json["llm"]["status"], "available");
    assert_eq!(json["llm"]["provider"], "openai");
    assert_eq!(json["llm"]["model"], "openai/gpt-4o-mini");
}

#[tokio::test]
async fn test_generate_answer_end_to_end_with_session() {
    let server = MockServer::start().await;
    mount_classification(&server).await;
    mount_answer(&server).await;

    let (app, _) = build_app(config_with_llm(&server.uri()));

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/session/create",
            json!({"context": "Acme widget docs"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let session = response_json(response).await;
    let session_id = session["sessionId"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/generate-answer",
            json!({
                "query": "How do I rotate my API key?",
                "documents": [{
                    "title": "API guide",
                    "url": "https://docs.example.com/api",
                    "content": "Keys are rotated from the settings page."
                }],
                "sessionId": session_id,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert!(json["answer"].as_str().unwrap().starts_with("Rotate"));
    assert_eq!(json["model"], "gpt-4o-mini");
    assert_eq!(json["usage"]["totalTokens"], 65);
    assert_eq!(json["queryAnalysis"]["category"], "how-to");
    assert_eq!(json["queryAnalysis"]["origin"], "model");
    assert_eq!(json["validation"]["isValid"], true);
    assert_eq!(json["validation"]["confidence"], "HIGH");
    assert_eq!(json["enhancement"]["template"], "how-to");
    assert_eq!(json["enhancement"]["contextDocuments"], 1);

    let response = app
        .oneshot(get_request(&format!("/api/session/{session_id}/history")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["sessionId"], session_id);
    assert_eq!(json["context"], "Acme widget docs");
    assert_eq!(json["turns"].as_array().unwrap().len(), 1);
    assert_eq!(json["turns"][0]["query"], "How do I rotate my API key?");
}

#[tokio::test]
async fn test_generate_answer_missing_query_is_400() {
    let (app, _) = build_app(base_config());

    let response = app
        .oneshot(json_request("/api/generate-answer", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Missing required field: query"));
}

#[tokio::test]
async fn test_generate_answer_unknown_session_is_404() {
    let server = MockServer::start().await;
    let (app, _) = build_app(config_with_llm(&server.uri()));

    let response = app
        .oneshot(json_request(
            "/api/generate-answer",
            json!({"query": "anything", "sessionId": "nope"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_answer_without_llm_is_503() {
    let (app, _) = build_app(base_config());

    let response = app
        .oneshot(json_request(
            "/api/generate-answer",
            json!({"query": "How do I rotate my API key?"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_keywords_fall_back_to_query_tokens_on_malformed_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "I am unable to answer that question.",
        )))
        .mount(&server)
        .await;

    let (app, _) = build_app(config_with_llm(&server.uri()));

    let response = app
        .oneshot(json_request(
            "/api/keywords",
            json!({"query": "reset two factor authentication", "maxKeywords": 3}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(
        json["keywords"],
        json!(["reset two factor authentication", "reset", "two"])
    );
    assert_eq!(json["usage"]["totalTokens"], 65);
}

#[tokio::test]
async fn test_keywords_model_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(r#"["webhook", "retry", "timeout"]"#)),
        )
        .mount(&server)
        .await;

    let (app, _) = build_app(config_with_llm(&server.uri()));

    let response = app
        .oneshot(json_request(
            "/api/keywords",
            json!({"query": "webhook retries time out"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["keywords"], json!(["webhook", "retry", "timeout"]));
}

#[tokio::test]
async fn test_follow_up_requires_session_or_exchange() {
    let (app, _) = build_app(base_config());

    let response = app
        .oneshot(json_request("/api/follow-up-questions", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_follow_up_from_explicit_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"["Can rotation be automated?", "Does rotation revoke old keys?"]"#,
        )))
        .mount(&server)
        .await;

    let (app, _) = build_app(config_with_llm(&server.uri()));

    let response = app
        .oneshot(json_request(
            "/api/follow-up-questions",
            json!({
                "query": "How do I rotate my API key?",
                "answer": "Use the settings page.",
                "count": 2,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["questions"].as_array().unwrap().len(), 2);
    assert_eq!(json["origin"], "model");
}

#[tokio::test]
async fn test_session_history_unknown_id_is_404() {
    let (app, _) = build_app(base_config());

    let response = app
        .oneshot(get_request("/api/session/missing/history"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_multi_source_search_degrades_without_model() {
    let (app, _) = build_app(base_config());

    let response = app
        .oneshot(json_request(
            "/api/multi-source-search",
            json!({
                "query": "webhook delivery fails",
                "documents": [{
                    "title": "Webhooks",
                    "url": "https://docs.example.com/webhooks",
                    "content": "Delivery retries follow an exponential backoff."
                }],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["origin"], "fallback");
    assert!(json["answer"]
        .as_str()
        .unwrap()
        .contains("temporarily degraded"));
    assert_eq!(json["aggregationMetrics"]["confidence"], 50);
    assert_eq!(json["aggregationMetrics"]["documentationCount"], 1);
    assert_eq!(json["sources"][0]["source"], "documentation");
}

#[tokio::test]
async fn test_multi_source_search_synthesizes_with_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(STRONG_ANSWER)))
        .mount(&server)
        .await;

    let (app, _) = build_app(config_with_llm(&server.uri()));

    let response = app
        .oneshot(json_request(
            "/api/multi-source-search",
            json!({
                "query": "rotate API key",
                "documents": [{
                    "title": "API guide",
                    "url": "https://docs.example.com/api",
                    "content": "Keys are rotated from the settings page."
                }],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["origin"], "model");
    assert_eq!(json["usage"]["totalTokens"], 65);
    assert_eq!(json["validation"]["isValid"], true);
    // One source, one documentation hit: 10 + 20.
    assert_eq!(json["aggregationMetrics"]["confidence"], 30);
}

#[tokio::test]
async fn test_rate_limit_applies_to_api_but_not_health() {
    let mut config = base_config();
    config.server.rate_limit_enabled = true;
    config.server.rate_limit_per_minute = 2;
    let (app, _) = build_app(config);

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(json_request("/api/session/create", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(json_request("/api/session/create", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));

    // Health sits outside the rate-limited router.
    for _ in 0..3 {
        let response = app.clone().oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_chat_completions_passthrough() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("Hello from the model")),
        )
        .mount(&server)
        .await;

    let (app, _) = build_app(config_with_llm(&server.uri()));

    let response = app
        .oneshot(json_request(
            "/api/chat/completions",
            json!({"messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Say hello."}
            ]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["content"], "Hello from the model");
    assert_eq!(json["model"], "gpt-4o-mini");
    assert_eq!(json["usage"]["totalTokens"], 65);
}

#[tokio::test]
async fn test_chat_completions_rejects_unknown_role() {
    let (app, _) = build_app(config_with_llm("http://127.0.0.1:1"));

    let response = app
        .oneshot(json_request(
            "/api/chat/completions",
            json!({"messages": [{"role": "wizard", "content": "cast"}]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_summarize_passthrough() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Summarize the following content"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("Webhooks retry with backoff.")),
        )
        .mount(&server)
        .await;

    let (app, _) = build_app(config_with_llm(&server.uri()));

    let response = app
        .oneshot(json_request(
            "/api/summarize",
            json!({"content": "Long text about webhook delivery and retries.", "maxWords": 20}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["summary"], "Webhooks retry with backoff.");
}

#[tokio::test]
async fn test_openapi_json_and_docs_are_served() {
    let (app, _) = build_app(base_config());

    let response = app
        .clone()
        .oneshot(get_request("/api/openapi.json"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["info"]["title"], "Docent API");
    assert!(json["paths"]["/api/generate-answer"].is_object());

    let response = app.oneshot(get_request("/api/docs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin_by_default() {
    let (app, _) = build_app(base_config());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/keywords")
                .header("origin", "https://docs.example.com")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
}
