use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{CompletionRequest, CompletionResult, Completer};
use crate::config::GatewayConfig;
use crate::consts::{MAX_DIAGNOSTIC_BODY, truncate_body};
use crate::error::GatewayError;

/// Calls an OpenAI-compatible chat completions endpoint (OpenRouter by
/// default). One attempt per request, bounded by the configured timeout.
pub struct OpenRouterCompleter {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenRouterCompleter {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key().map(str::to_string),
        })
    }

    /// Pull `choices[0].message.content` out of a response body.
    ///
    /// The body must be JSON with a non-empty `choices` array. Inside the
    /// first choice, missing keys read as an empty string; an empty result
    /// is still an error so callers never get a blank success.
    fn parse_completion(status: u16, body: &str) -> CompletionResult {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            GatewayError::upstream(format!("response is not valid JSON ({e})"), status, body)
        })?;

        let Some(first) = value
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
        else {
            return Err(GatewayError::upstream(no_choices_detail(&value), status, body));
        };

        if let Some(usage) = value.get("usage") {
            debug!(
                prompt_tokens = usage.get("prompt_tokens").and_then(serde_json::Value::as_u64),
                completion_tokens = usage.get("completion_tokens").and_then(serde_json::Value::as_u64),
                "token usage"
            );
        }

        let content = first
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .unwrap_or("");

        if content.trim().is_empty() {
            return Err(GatewayError::upstream(
                "completion has no content",
                status,
                body,
            ));
        }
        Ok(content.to_string())
    }
}

#[async_trait]
impl Completer for OpenRouterCompleter {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GatewayError::MissingApiKey);
        };

        let body = ApiRequest {
            model: &request.model,
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(
            status = status.as_u16(),
            body = %truncate_body(&text, MAX_DIAGNOSTIC_BODY),
            "completion response"
        );

        Self::parse_completion(status.as_u16(), &text)
    }
}

/// Explain a missing `choices` array, surfacing the API's own error message
/// when it sent one (`{"error": {"message": ...}}`).
fn no_choices_detail(value: &Value) -> String {
    let upstream = value
        .get("error")
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(Value::as_str);
    match upstream {
        Some(msg) => format!("no choices returned: {msg}"),
        None => "no choices returned".to_string(),
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protocol_body(result: CompletionResult) -> String {
        match result {
            Err(GatewayError::UpstreamProtocol { body, .. }) => body,
            other => panic!("expected UpstreamProtocol, got {other:?}"),
        }
    }

    #[test]
    fn parse_well_formed_response() {
        let body = r#"{"choices":[{"message":{"content":"Hello"}}]}"#;
        assert_eq!(
            OpenRouterCompleter::parse_completion(200, body),
            Ok("Hello".to_string())
        );
    }

    #[test]
    fn parse_ignores_usage_block() {
        let body = r#"{"choices":[{"message":{"content":"Hello"}}],"usage":{"prompt_tokens":12,"completion_tokens":"n/a"}}"#;
        assert_eq!(
            OpenRouterCompleter::parse_completion(200, body),
            Ok("Hello".to_string())
        );
    }

    #[test]
    fn parse_uses_first_choice() {
        let body = r#"{"choices":[{"message":{"content":"first"}},{"message":{"content":"second"}}]}"#;
        assert_eq!(
            OpenRouterCompleter::parse_completion(200, body),
            Ok("first".to_string())
        );
    }

    #[test]
    fn parse_keeps_content_unmodified() {
        let body = r#"{"choices":[{"message":{"content":"  spaced\nout  "}}]}"#;
        assert_eq!(
            OpenRouterCompleter::parse_completion(200, body),
            Ok("  spaced\nout  ".to_string())
        );
    }

    #[test]
    fn parse_empty_choices_carries_body() {
        let body = r#"{"choices":[]}"#;
        assert_eq!(
            protocol_body(OpenRouterCompleter::parse_completion(200, body)),
            body
        );
    }

    #[test]
    fn parse_missing_choices_carries_body() {
        let body = r#"{"id":"gen-123","object":"chat.completion"}"#;
        let err = OpenRouterCompleter::parse_completion(200, body).unwrap_err();
        assert!(err.to_string().contains(body));
    }

    #[test]
    fn parse_choices_not_a_list() {
        let body = r#"{"choices":{"message":{"content":"x"}}}"#;
        assert_eq!(
            protocol_body(OpenRouterCompleter::parse_completion(200, body)),
            body
        );
    }

    #[test]
    fn parse_invalid_json() {
        let body = "<html>Bad Gateway</html>";
        let err = OpenRouterCompleter::parse_completion(502, body).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("not valid JSON"));
        assert!(msg.contains(body));
        assert!(msg.contains("HTTP 502"));
    }

    #[test]
    fn parse_missing_message_is_empty_completion() {
        let body = r#"{"choices":[{"finish_reason":"stop"}]}"#;
        let err = OpenRouterCompleter::parse_completion(200, body).unwrap_err();
        assert!(err.to_string().contains("no content"));
    }

    #[test]
    fn parse_non_string_content_is_empty_completion() {
        let body = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert!(OpenRouterCompleter::parse_completion(200, body).is_err());
    }

    #[test]
    fn parse_surfaces_upstream_error_message() {
        let body = r#"{"error":{"message":"No auth credentials found","code":401}}"#;
        let err = OpenRouterCompleter::parse_completion(401, body).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No auth credentials found"));
        assert!(msg.contains("HTTP 401"));
        assert!(msg.contains(body));
    }

    #[test]
    fn parse_truncates_huge_bodies() {
        let body = format!(r#"{{"padding":"{}"}}"#, "x".repeat(10_000));
        let kept = protocol_body(OpenRouterCompleter::parse_completion(200, &body));
        assert!(kept.len() < body.len());
        assert!(kept.contains("truncated"));
    }

    #[test]
    fn no_choices_detail_plain() {
        assert_eq!(no_choices_detail(&serde_json::json!({})), "no choices returned");
    }

    #[test]
    fn no_choices_detail_string_error() {
        let value = serde_json::json!({"error": "rate limited"});
        assert_eq!(no_choices_detail(&value), "no choices returned: rate limited");
    }

    #[test]
    fn request_body_shape() {
        let body = ApiRequest {
            model: "openai/gpt-4o-mini",
            messages: [Message {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "openai/gpt-4o-mini",
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[tokio::test]
    async fn missing_key_short_circuits() {
        // Unroutable endpoint: reaching the network would fail differently.
        let config = GatewayConfig::new(None).with_endpoint("http://0.0.0.0:1/never");
        let completer = OpenRouterCompleter::new(&config).unwrap();
        let request = CompletionRequest {
            prompt: "hi".to_string(),
            model: "m".to_string(),
        };
        assert_eq!(
            completer.complete(&request).await,
            Err(GatewayError::MissingApiKey)
        );
    }
}
