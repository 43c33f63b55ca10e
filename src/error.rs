//! Gateway error types.
//!
//! Every failure a completion call can hit is folded into [`GatewayError`]
//! at the gateway boundary. Callers that only need the broad category (e.g.
//! to pick an HTTP status) match on [`ErrorKind`] instead.

use std::error::Error as _;

use serde::Serialize;

use crate::consts::{MAX_DIAGNOSTIC_BODY, truncate_body};

/// Broad failure categories, stable enough to expose to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Configuration,
    Input,
    UpstreamProtocol,
    Transport,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// The input text was empty or whitespace.
    #[error("no text provided")]
    MissingInput,

    /// No API key is configured.
    #[error("API key not set")]
    MissingApiKey,

    /// The upstream answered, but not with something we can use.
    #[error("{detail} (HTTP {status}). Raw response: {body}")]
    UpstreamProtocol {
        detail: String,
        status: u16,
        body: String,
    },

    /// The request never completed.
    #[error("{message}")]
    Transport { message: String, timed_out: bool },
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingInput => ErrorKind::Input,
            Self::MissingApiKey => ErrorKind::Configuration,
            Self::UpstreamProtocol { .. } => ErrorKind::UpstreamProtocol,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// Build a protocol error, keeping only a bounded slice of the body.
    pub fn upstream(detail: impl Into<String>, status: u16, body: &str) -> Self {
        Self::UpstreamProtocol {
            detail: detail.into(),
            status,
            body: truncate_body(body, MAX_DIAGNOSTIC_BODY),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's Display stops at the outer layer; the useful part
        // ("connection refused", "operation timed out") lives in the sources.
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        let timed_out = err.is_timeout();
        if timed_out && !message.contains("timed out") {
            message.push_str(": request timed out");
        }
        Self::Transport { message, timed_out }
    }
}
