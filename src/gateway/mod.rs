//! The inference gateway: prompt in, typed result out.
//!
//! [`Gateway`] owns the task logic (input checks, prompt rendering, model
//! selection). The actual call is delegated to a [`Completer`], so tests can
//! swap the remote API for a [`mock::MockCompleter`].

pub mod mock;
pub mod openrouter;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::future;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::prompts::{build_sentiment_prompt, build_summary_prompt};

use openrouter::OpenRouterCompleter;

/// One completion call: a rendered prompt and the model to run it on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
}

/// Either the model's text or the reason there is none.
pub type CompletionResult = std::result::Result<String, GatewayError>;

/// Anything that can turn a [`CompletionRequest`] into text.
///
/// Implementations must not panic or leak faults: every failure comes back
/// as an `Err`.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult;
}

/// Results of running both tasks on the same input.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub summary: CompletionResult,
    pub sentiment: CompletionResult,
}

impl Analysis {
    /// True when both halves succeeded.
    pub fn is_complete(&self) -> bool {
        self.summary.is_ok() && self.sentiment.is_ok()
    }
}

/// Summaries and sentiment over a [`Completer`].
#[derive(Clone)]
pub struct Gateway {
    completer: Arc<dyn Completer>,
    default_model: String,
}

impl Gateway {
    pub fn new(completer: Arc<dyn Completer>, default_model: impl Into<String>) -> Self {
        Self {
            completer,
            default_model: default_model.into(),
        }
    }

    /// Gateway backed by the OpenRouter completion API.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let completer = OpenRouterCompleter::new(config)?;
        Ok(Self::new(Arc::new(completer), config.model.clone()))
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Summarize `text` in a few sentences.
    pub async fn summarize(&self, text: &str, model: Option<&str>) -> CompletionResult {
        let text = require_text(text)?;
        self.invoke("summary", build_summary_prompt(text), model)
            .await
    }

    /// Ask the model for a sentiment judgment as JSON. The text comes back
    /// untouched; see [`crate::sentiment::decode`] for turning it into a
    /// [`crate::sentiment::SentimentResult`].
    pub async fn analyze_sentiment(&self, text: &str, model: Option<&str>) -> CompletionResult {
        let text = require_text(text)?;
        self.invoke("sentiment", build_sentiment_prompt(text), model)
            .await
    }

    /// Run both tasks concurrently. The two calls are independent.
    pub async fn analyze(&self, text: &str, model: Option<&str>) -> Analysis {
        let (summary, sentiment) = future::join(
            self.summarize(text, model),
            self.analyze_sentiment(text, model),
        )
        .await;
        Analysis { summary, sentiment }
    }

    fn resolve_model(&self, model: Option<&str>) -> String {
        model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.default_model.as_str())
            .to_string()
    }

    async fn invoke(&self, task: &str, prompt: String, model: Option<&str>) -> CompletionResult {
        let request = CompletionRequest {
            prompt,
            model: self.resolve_model(model),
        };
        debug!(
            task,
            model = %request.model,
            prompt_len = request.prompt.len(),
            "requesting completion"
        );

        let result = self.completer.complete(&request).await;
        match &result {
            Ok(text) => debug!(task, len = text.len(), "completion received"),
            Err(e) => debug!(task, kind = ?e.kind(), "completion failed: {e}"),
        }
        result
    }
}

fn require_text(text: &str) -> Result<&str, GatewayError> {
    if text.trim().is_empty() {
        Err(GatewayError::MissingInput)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockCompleter;
    use super::*;

    fn gateway(mock: Arc<MockCompleter>) -> Gateway {
        Gateway::new(mock, "test/model")
    }

    #[tokio::test]
    async fn default_model_used_without_override() {
        let mock = Arc::new(MockCompleter::replying("ok"));
        gateway(mock.clone()).summarize("hello", None).await.unwrap();
        assert_eq!(mock.requests()[0].model, "test/model");
    }

    #[tokio::test]
    async fn override_model_wins() {
        let mock = Arc::new(MockCompleter::replying("ok"));
        gateway(mock.clone())
            .summarize("hello", Some("other/model"))
            .await
            .unwrap();
        assert_eq!(mock.requests()[0].model, "other/model");
    }

    #[tokio::test]
    async fn blank_override_falls_back_to_default() {
        let mock = Arc::new(MockCompleter::replying("ok"));
        gateway(mock.clone())
            .analyze_sentiment("hello", Some("  "))
            .await
            .unwrap();
        assert_eq!(mock.requests()[0].model, "test/model");
    }

    #[tokio::test]
    async fn summary_prompt_embeds_text() {
        let mock = Arc::new(MockCompleter::replying("ok"));
        gateway(mock.clone())
            .summarize("  padded text  ", None)
            .await
            .unwrap();
        let prompt = &mock.requests()[0].prompt;
        assert!(prompt.contains("  padded text  "));
        assert!(prompt.contains("3-6 sentences"));
    }

    #[tokio::test]
    async fn sentiment_prompt_asks_for_json() {
        let mock = Arc::new(MockCompleter::replying("ok"));
        gateway(mock.clone())
            .analyze_sentiment("meh", None)
            .await
            .unwrap();
        let prompt = &mock.requests()[0].prompt;
        assert!(prompt.contains("JSON"));
        assert!(prompt.contains("meh"));
    }

    #[tokio::test]
    async fn empty_input_short_circuits() {
        let mock = Arc::new(MockCompleter::replying("ok"));
        let gw = gateway(mock.clone());
        for text in ["", " ", "\n\t  "] {
            assert_eq!(gw.summarize(text, None).await, Err(GatewayError::MissingInput));
            assert_eq!(
                gw.analyze_sentiment(text, None).await,
                Err(GatewayError::MissingInput)
            );
        }
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn completer_errors_pass_through() {
        let mock = Arc::new(MockCompleter::scripted(vec![Err(
            GatewayError::upstream("no choices returned", 200, "{}"),
        )]));
        let result = gateway(mock).summarize("hello", None).await;
        assert!(matches!(result, Err(GatewayError::UpstreamProtocol { .. })));
    }

    #[tokio::test]
    async fn analyze_makes_one_call_per_task() {
        let mock = Arc::new(MockCompleter::replying("ok"));
        let analysis = gateway(mock.clone()).analyze("hello", None).await;
        assert_eq!(analysis.summary, Ok("ok".to_string()));
        assert_eq!(analysis.sentiment, Ok("ok".to_string()));
        assert!(analysis.is_complete());
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn analyze_keeps_halves_independent() {
        let mock = Arc::new(MockCompleter::new(|req| {
            if req.prompt.contains("Analyze the sentiment") {
                Err(GatewayError::MissingApiKey)
            } else {
                Ok("ok".to_string())
            }
        }));
        let analysis = gateway(mock).analyze("hello", None).await;
        assert_eq!(analysis.summary, Ok("ok".to_string()));
        assert_eq!(analysis.sentiment, Err(GatewayError::MissingApiKey));
        assert!(!analysis.is_complete());
    }

    #[tokio::test]
    async fn analyze_with_empty_input_makes_no_calls() {
        let mock = Arc::new(MockCompleter::replying("ok"));
        let analysis = gateway(mock.clone()).analyze("   ", None).await;
        assert_eq!(analysis.summary, Err(GatewayError::MissingInput));
        assert_eq!(analysis.sentiment, Err(GatewayError::MissingInput));
        assert!(!analysis.is_complete());
        assert_eq!(mock.calls(), 0);
    }
}
