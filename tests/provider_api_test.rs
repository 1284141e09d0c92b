//! HTTP-level provider tests against a mock server.

use mockito::Server;

use redstone::domain::ports::{CompletionProvider, CompletionRequest};
use redstone::infrastructure::providers::{
    AnthropicConfig, AnthropicProvider, OpenAiConfig, OpenAiProvider,
};
use redstone::SwarmError;

fn anthropic_response_body() -> String {
    serde_json::json!({
        "id": "msg_01ABC123",
        "type": "message",
        "role": "assistant",
        "content": [{
            "type": "text",
            "text": "Hello from the swarm"
        }],
        "model": "claude-3-5-sonnet-20241022",
        "stop_reason": "end_turn"
    })
    .to_string()
}

fn openai_response_body() -> String {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": "Hello from the swarm"
            },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn anthropic_complete_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-api-key")
        .match_header("anthropic-version", "2023-06-01")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(anthropic_response_body())
        .create_async()
        .await;

    let config = AnthropicConfig::new("test-api-key").with_base_url(server.url());
    let provider = AnthropicProvider::new(config).expect("Failed to create provider");

    let request = CompletionRequest::new("You are helpful.", "Say hello");
    let response = provider.complete(request).await.expect("Completion failed");

    assert_eq!(response.text, "Hello from the swarm");
    assert_eq!(response.model, "claude-3-5-sonnet-20241022");
    mock.assert_async().await;
}

#[tokio::test]
async fn anthropic_translates_generic_model_in_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "model": "claude-3-haiku-20240307"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(anthropic_response_body())
        .create_async()
        .await;

    let config = AnthropicConfig::new("test-api-key").with_base_url(server.url());
    let provider = AnthropicProvider::new(config).expect("Failed to create provider");

    let request = CompletionRequest::new("sys", "hi").with_model("gpt-4o-mini");
    provider.complete(request).await.expect("Completion failed");

    mock.assert_async().await;
}

#[tokio::test]
async fn anthropic_error_status_surfaces_detail() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(429)
        .with_body(r#"{"error": {"type": "rate_limit_error"}}"#)
        .create_async()
        .await;

    let config = AnthropicConfig::new("test-api-key").with_base_url(server.url());
    let provider = AnthropicProvider::new(config).expect("Failed to create provider");

    let request = CompletionRequest::new("sys", "hi");
    let err = provider.complete(request).await.unwrap_err();

    match err {
        SwarmError::Provider { provider, message } => {
            assert_eq!(provider, "anthropic");
            assert!(message.contains("429"));
            assert!(message.contains("rate_limit_error"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn openai_complete_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-api-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(openai_response_body())
        .create_async()
        .await;

    let config = OpenAiConfig::new("test-api-key").with_base_url(server.url());
    let provider = OpenAiProvider::new(config).expect("Failed to create provider");

    let request = CompletionRequest::new("You are helpful.", "Say hello").with_model("gpt-4o-mini");
    let response = provider.complete(request).await.expect("Completion failed");

    assert_eq!(response.text, "Hello from the swarm");
    assert_eq!(response.model, "gpt-4o-mini");
    mock.assert_async().await;
}

#[tokio::test]
async fn openai_malformed_body_is_provider_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let config = OpenAiConfig::new("test-api-key").with_base_url(server.url());
    let provider = OpenAiProvider::new(config).expect("Failed to create provider");

    let request = CompletionRequest::new("sys", "hi");
    let err = provider.complete(request).await.unwrap_err();
    assert!(matches!(err, SwarmError::Provider { .. }));
}
