//! Completion service abstraction.
//!
//! The [`CompletionClient`] trait decouples the session from the text-generation
//! backend (currently an Ollama-compatible chat endpoint). Tests use scripted
//! clients that return predetermined replies without touching the network.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::core::history::Message;
use crate::io::config::ThurberConfig;

/// A completion call that did not produce text.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The request could not be sent or the response could not be read.
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The service answered successfully but without `message.content`.
    #[error("malformed completion response: {0}")]
    Decode(String),
}

/// Abstraction over completion backends.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the full message list and return the reply text.
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: String,
}

/// Client for an Ollama `/api/chat` endpoint (non-streaming).
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OllamaClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
        }
    }

    pub fn from_config(cfg: &ThurberConfig) -> Self {
        Self::new(&cfg.endpoint, &cfg.model).with_api_key(cfg.api_key())
    }

    /// Send `Authorization: Bearer <key>` with every request.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    #[instrument(skip_all, fields(model = %self.model, messages = messages.len()))]
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!(endpoint = %self.endpoint, "sending completion request");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|err| CompletionError::Decode(err.to_string()))?;
        debug!(bytes = parsed.message.content.len(), "completion received");
        Ok(parsed.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoint(server: &MockServer) -> String {
        format!("{}/api/chat", server.uri())
    }

    #[tokio::test]
    async fn returns_message_content_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "model": "llama2",
                "stream": false,
                "messages": [{"role": "user", "content": "hi"}],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama2",
                "message": {"role": "assistant", "content": "hello there"},
                "done": true,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OllamaClient::new(endpoint(&server), "llama2");
        let reply = client
            .complete(&[Message::user("hi")])
            .await
            .expect("complete");
        assert_eq!(reply, "hello there");
    }

    #[tokio::test]
    async fn non_success_status_carries_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model 'nope' not found"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(endpoint(&server), "nope");
        let err = client.complete(&[Message::user("hi")]).await.unwrap_err();
        match err {
            CompletionError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "model 'nope' not found");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_content_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "old api"})))
            .mount(&server)
            .await;

        let client = OllamaClient::new(endpoint(&server), "llama2");
        let err = client.complete(&[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, CompletionError::Decode(_)));
    }

    #[tokio::test]
    async fn sends_bearer_token_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": {"content": "ok"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client =
            OllamaClient::new(endpoint(&server), "llama2").with_api_key(Some("secret".into()));
        let reply = client
            .complete(&[Message::user("hi")])
            .await
            .expect("complete");
        assert_eq!(reply, "ok");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let client = OllamaClient::new("http://127.0.0.1:9/api/chat", "llama2");
        let err = client.complete(&[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, CompletionError::Request(_)));
    }
}
