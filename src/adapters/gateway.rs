use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::adapters::llm::{AdapterConfig, CompletionAdapter, CompletionRequest, CompletionResult};
use crate::error::{AdapterError, Result};

/// Client-side ceiling on the round trip. The gateway itself enforces no
/// timeout, so without this a dead endpoint blocks the caller forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Adapter for a hosted prompt-completion gateway that accepts a batch-style
/// JSON payload and returns the generated text in a `response` field.
///
/// Stateless across calls: each `complete` builds its own request, issues
/// exactly one POST, and hands the parsed text back. Holding the adapter in
/// an `Arc` and calling it from concurrent tasks is fine.
pub struct GatewayAdapter {
    client: Client,
    config: AdapterConfig,
}

#[derive(Serialize)]
struct GatewayRequest<'a> {
    user: &'a str,
    model: &'a str,
    system: &'a str,
    // The gateway takes a prompt batch; this adapter always sends one.
    prompt: [&'a str; 1],
    stop: [&'a str; 0],
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GatewayResponse {
    response: Option<String>,
}

impl GatewayAdapter {
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionAdapter for GatewayAdapter {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult> {
        if !self.config.stop_sequences.is_empty() {
            return Err(AdapterError::Usage(
                "stop sequences are not permitted by the gateway backend".to_string(),
            ));
        }

        let payload = GatewayRequest {
            user: &self.config.user_id,
            model: &self.config.model_name,
            system: &self.config.system_prompt,
            prompt: [request.prompt.as_str()],
            stop: [],
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        };

        debug!(
            model = %self.config.model_name,
            "sending completion request to {}", self.config.endpoint_url
        );

        let response = self
            .client
            .post(&self.config.endpoint_url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "completion round trip finished");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::Remote { status, body });
        }

        let body = response.text().await?;
        let parsed: GatewayResponse =
            serde_json::from_str(&body).map_err(|e| AdapterError::Parse(e.to_string()))?;
        let text = parsed.response.ok_or_else(|| {
            AdapterError::Parse("body is missing the `response` field".to_string())
        })?;

        Ok(CompletionResult { text })
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn test_config(endpoint: &str) -> AdapterConfig {
        AdapterConfig {
            endpoint_url: endpoint.to_string(),
            user_id: "tester".to_string(),
            model_name: "gpt35".to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            temperature: 0.8,
            top_p: 0.7,
            stop_sequences: Vec::new(),
        }
    }

    #[test]
    fn prompt_serializes_as_single_element_array() {
        for prompt in ["", "plain", "with \"quotes\", {braces} and \\backslash\n"] {
            let payload = GatewayRequest {
                user: "tester",
                model: "gpt35",
                system: "sys",
                prompt: [prompt],
                stop: [],
                temperature: 0.8,
                top_p: 0.7,
            };

            let value = serde_json::to_value(&payload).unwrap();
            assert_eq!(value["prompt"], json!([prompt]));
            assert_eq!(value["stop"], json!([]));
        }
    }

    #[tokio::test]
    async fn sends_exact_wire_payload() {
        let mut server = mockito::Server::new_async().await;
        let prompt = "embedded \"json\" {chars}: [1, 2]";
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "user": "tester",
                "model": "gpt35",
                "system": "You are a helpful assistant.",
                "prompt": [prompt],
                "stop": [],
                "temperature": 0.8,
                "top_p": 0.7,
            })))
            .with_status(200)
            .with_body(r#"{"response": "ok"}"#)
            .create_async()
            .await;

        let adapter = GatewayAdapter::new(test_config(&server.url())).unwrap();
        let result = adapter
            .complete(CompletionRequest::new(prompt))
            .await
            .unwrap();

        assert_eq!(result.text, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejects_stop_sequences_before_any_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/").expect(0).create_async().await;

        let mut config = test_config(&server.url());
        config.stop_sequences = vec!["\n".to_string()];
        let adapter = GatewayAdapter::new(config).unwrap();

        let err = adapter
            .complete(CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::Usage(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn returns_response_field_on_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"response": "hello"}"#)
            .create_async()
            .await;

        let adapter = GatewayAdapter::new(test_config(&server.url())).unwrap();
        let result = adapter
            .complete(CompletionRequest::new("hi"))
            .await
            .unwrap();

        assert_eq!(result.text, "hello");
    }

    #[tokio::test]
    async fn surfaces_non_200_as_remote_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let adapter = GatewayAdapter::new(test_config(&server.url())).unwrap();
        let err = adapter
            .complete(CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        match err {
            AdapterError::Remote { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_response_field_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let adapter = GatewayAdapter::new(test_config(&server.url())).unwrap();
        let err = adapter
            .complete(CompletionRequest::new("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::Parse(_)));
    }

    #[tokio::test]
    async fn concurrent_calls_do_not_interfere() {
        let mut server = mockito::Server::new_async().await;
        for (prompt, reply) in [("alpha", "first"), ("beta", "second")] {
            server
                .mock("POST", "/")
                .match_body(Matcher::PartialJson(json!({ "prompt": [prompt] })))
                .with_status(200)
                .with_body(json!({ "response": reply }).to_string())
                .create_async()
                .await;
        }

        let adapter = GatewayAdapter::new(test_config(&server.url())).unwrap();
        let (a, b) = tokio::join!(
            adapter.complete(CompletionRequest::new("alpha")),
            adapter.complete(CompletionRequest::new("beta")),
        );

        assert_eq!(a.unwrap().text, "first");
        assert_eq!(b.unwrap().text, "second");
    }
}
