//! Chat completions backend tests against a mock HTTP server.

mod common;

use common::{sample_home, TestApp};
use home_energy_service::services::providers::openai::{OpenAiConfig, OpenAiTextProvider};
use home_energy_service::services::providers::{GenerationParams, ProviderError, TextProvider};
use home_energy_service::services::select_advice_provider;
use httpmock::prelude::*;
use secrecy::Secret;
use serde_json::{json, Value};
use std::time::Duration;

fn provider(server: &MockServer, timeout: Duration) -> OpenAiTextProvider {
    OpenAiTextProvider::new(OpenAiConfig {
        api_key: Secret::new("sk-test".to_string()),
        base_url: server.url("/v1"),
        timeout,
    })
    .expect("Failed to build provider")
}

fn params() -> GenerationParams {
    GenerationParams {
        temperature: 0.3,
        candidate_count: 1,
    }
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 80, "completion_tokens": 40, "total_tokens": 120}
    })
}

#[tokio::test]
async fn sends_bearer_model_and_sampling_parameters() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test")
                .json_body_partial(r#"{"model": "gpt-4o-mini", "temperature": 0.3, "n": 1}"#);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(completion("1. Seal drafts\n2. Insulate loft"));
        })
        .await;

    let text = provider(&server, Duration::from_secs(5))
        .complete("gpt-4o-mini", "Home profile", &params())
        .await
        .unwrap();

    api_mock.assert_async().await;
    assert_eq!(text, "1. Seal drafts\n2. Insulate loft");
}

#[tokio::test]
async fn status_codes_map_to_provider_errors() {
    let cases: [(u16, fn(&ProviderError) -> bool); 4] = [
        (401, |e| matches!(e, ProviderError::Unauthorized)),
        (403, |e| matches!(e, ProviderError::Unauthorized)),
        (429, |e| matches!(e, ProviderError::RateLimited)),
        (500, |e| matches!(e, ProviderError::ApiError(_))),
    ];

    for (status, expected) in cases {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(status).body("upstream said no");
            })
            .await;

        let err = provider(&server, Duration::from_secs(5))
            .complete("gpt-4o-mini", "prompt", &params())
            .await
            .unwrap_err();
        assert!(expected(&err), "status {status}: {err:?}");
    }
}

#[tokio::test]
async fn empty_choices_are_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({"choices": []}));
        })
        .await;

    let err = provider(&server, Duration::from_secs(5))
        .complete("gpt-4o-mini", "prompt", &params())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("<html>gateway</html>");
        })
        .await;

    let err = provider(&server, Duration::from_secs(5))
        .complete("gpt-4o-mini", "prompt", &params())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(completion("1. Too late"));
        })
        .await;

    let err = provider(&server, Duration::from_millis(200))
        .complete("gpt-4o-mini", "prompt", &params())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Timeout), "{err:?}");
}

#[tokio::test]
async fn advice_endpoint_parses_backend_reply() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("- Heating: GAS")
                .body_contains("- Insulation: PARTIAL");
            then.status(200).json_body(completion(
                "1. Add loft insulation\n\n2) Fit thermostatic radiator valves\n• Seal drafts",
            ));
        })
        .await;

    let mut config = common::test_config();
    config.llm.api_key = Secret::new("sk-endpoint".to_string());
    config.llm.base_url = server.url("/v1");
    let advice = select_advice_provider(&config.llm).unwrap();
    assert_eq!(advice.name(), "llm");

    let app = TestApp::spawn_with(config, advice).await;
    let id = app.create_home(&sample_home()).await;

    let response = app.post_advice(&id.to_string()).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["recommendations"],
        json!([
            "Add loft insulation",
            "Fit thermostatic radiator valves",
            "Seal drafts"
        ])
    );
    api_mock.assert_async().await;
}

#[tokio::test]
async fn advice_endpoint_returns_503_when_backend_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500).body("internal");
        })
        .await;

    let mut config = common::test_config();
    config.llm.api_key = Secret::new("sk-failing".to_string());
    config.llm.base_url = server.url("/v1");
    let advice = select_advice_provider(&config.llm).unwrap();

    let app = TestApp::spawn_with(config, advice).await;
    let id = app.create_home(&sample_home()).await;

    let response = app.post_advice(&id.to_string()).await;
    assert_eq!(response.status().as_u16(), 503);
    assert_eq!(app.store.lookups(), 1);
}
