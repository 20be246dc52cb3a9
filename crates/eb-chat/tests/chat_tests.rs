//! Chat proxy tests
//!
//! The completion client runs against a wiremock upstream; the router runs
//! against both a scripted backend and the real client.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eb_chat::{
    chat_router, ChatClientConfig, ChatCompletion, ChatError, ChatState, OpenAiChatClient,
};

fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

fn client_for(server: &MockServer) -> OpenAiChatClient {
    OpenAiChatClient::new(ChatClientConfig::new(
        "test-key",
        format!("{}/v1", server.uri()),
        "gpt-4",
    ))
    .unwrap()
}

async fn post_chat(router: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Echoes the prompt back, or fails when asked to.
struct ScriptedCompletion;

#[async_trait]
impl ChatCompletion for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        if prompt == "fail" {
            return Err(ChatError::EmptyResponse);
        }
        Ok(format!("echo: {}", prompt))
    }
}

fn scripted_router() -> Router {
    chat_router(ChatState {
        completion: Arc::new(ScriptedCompletion),
    })
}

mod client_tests {
    use super::*;

    #[tokio::test]
    async fn test_sends_user_message_and_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header_eq("authorization", "Bearer test-key"))
            .and(body_json(json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": "Hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hi there")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).complete("Hello").await.unwrap();
        assert_eq!(reply, "Hi there");
    }

    #[tokio::test]
    async fn test_upstream_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        match client_for(&server).complete("Hello").await {
            Err(ChatError::Upstream { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("expected Upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        assert!(matches!(
            client_for(&server).complete("Hello").await,
            Err(ChatError::EmptyResponse)
        ));
    }
}

mod router_tests {
    use super::*;

    #[tokio::test]
    async fn test_welcome() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = scripted_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"message": "Welcome to the chat API!"}));
    }

    #[tokio::test]
    async fn test_chat_returns_completion() {
        let (status, body) = post_chat(scripted_router(), r#"{"query":"ping"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"response": "echo: ping"}));
    }

    #[tokio::test]
    async fn test_backend_failure_is_500() {
        let (status, body) = post_chat(scripted_router(), r#"{"query":"fail"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "CHAT_ERROR");
    }

    #[tokio::test]
    async fn test_missing_query_is_validation_error() {
        let (status, body) = post_chat(scripted_router(), r#"{"prompt":"hi"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_chat_through_real_client() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("42")))
            .mount(&server)
            .await;

        let router = chat_router(ChatState {
            completion: Arc::new(client_for(&server)),
        });
        let (status, body) = post_chat(router, r#"{"query":"answer?"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "42");
    }
}
