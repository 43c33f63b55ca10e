//! Output shapes shared by the HTTP routes and the CLI.
//!
//! `/analyze` and `precis analyze --json` emit the same [`AnalysisReport`],
//! and every error anywhere is an [`ErrorBody`].

use serde::Serialize;

use crate::error::{ErrorKind, GatewayError};
use crate::gateway::{Analysis, CompletionResult};
use crate::sentiment::{self, SentimentResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&GatewayError> for ErrorBody {
    fn from(err: &GatewayError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}

/// One half of an analysis: the value, or why it is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part<T> {
    Ok(T),
    Err(ErrorBody),
}

impl<T> Part<T> {
    pub fn from_result(result: CompletionResult, f: impl FnOnce(String) -> T) -> Self {
        match result {
            Ok(text) => Self::Ok(f(text)),
            Err(err) => Self::Err(ErrorBody::from(&err)),
        }
    }
}

/// Summary plus decoded sentiment, each possibly an inline error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: Part<String>,
    pub sentiment: Part<SentimentResult>,
}

impl From<Analysis> for AnalysisReport {
    fn from(analysis: Analysis) -> Self {
        Self {
            summary: Part::from_result(analysis.summary, |s| s),
            sentiment: Part::from_result(analysis.sentiment, |raw| sentiment::decode(&raw)),
        }
    }
}

/// Render an analysis for the terminal.
///
/// Text mode prints the model's replies under `=== Summary ===` and
/// `=== Sentiment ===` headers; a failed half prints `error: ...` in place.
/// JSON mode prints an [`AnalysisReport`].
pub fn render_analysis(analysis: &Analysis, json: bool) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string_pretty(&AnalysisReport::from(analysis.clone()));
    }
    Ok(format!(
        "=== Summary ===\n{}\n\n=== Sentiment ===\n{}",
        display(&analysis.summary),
        display(&analysis.sentiment)
    ))
}

/// Render a sentiment reply: the raw text, or the decoded result as JSON.
pub fn render_sentiment(raw: &str, json: bool) -> serde_json::Result<String> {
    if json {
        serde_json::to_string_pretty(&sentiment::decode(raw))
    } else {
        Ok(raw.to_string())
    }
}

fn display(result: &CompletionResult) -> String {
    match result {
        Ok(text) => text.clone(),
        Err(e) => format!("error: {e}"),
    }
}
