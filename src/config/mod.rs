//! Gateway configuration.
//!
//! Built once at startup (from CLI flags and environment, see `main.rs`)
//! and handed to the gateway by value. Nothing reads the environment after
//! that point.

use std::fmt;
use std::time::Duration;

use crate::consts::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT};

/// Everything a completion call needs besides the prompt.
#[derive(Clone)]
pub struct GatewayConfig {
    pub endpoint: String,
    api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Default endpoint, model and timeout with the given key.
    /// Blank keys are treated as unset.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: normalize_key(api_key),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the default model. Blank names keep the current one.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = model.trim().to_string();
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn normalize_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.has_api_key());
    }

    #[test]
    fn key_is_kept() {
        let config = GatewayConfig::new(Some("sk-or-test".to_string()));
        assert_eq!(config.api_key(), Some("sk-or-test"));
    }

    #[test]
    fn blank_key_counts_as_unset() {
        assert!(!GatewayConfig::new(Some(String::new())).has_api_key());
        assert!(!GatewayConfig::new(Some("   ".to_string())).has_api_key());
    }

    #[test]
    fn key_is_trimmed() {
        let config = GatewayConfig::new(Some("  sk-or-test\n".to_string()));
        assert_eq!(config.api_key(), Some("sk-or-test"));
    }

    #[test]
    fn model_override() {
        let config = GatewayConfig::default().with_model("anthropic/claude-3.5-haiku");
        assert_eq!(config.model, "anthropic/claude-3.5-haiku");
    }

    #[test]
    fn blank_model_keeps_default() {
        let config = GatewayConfig::default().with_model("  ");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn builders_chain() {
        let config = GatewayConfig::new(Some("k".to_string()))
            .with_endpoint("http://127.0.0.1:9/v1/chat/completions")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.endpoint, "http://127.0.0.1:9/v1/chat/completions");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn debug_redacts_key() {
        let config = GatewayConfig::new(Some("sk-or-secret".to_string()));
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-or-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
