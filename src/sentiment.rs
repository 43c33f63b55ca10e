//! Decoding the model's sentiment answer.
//!
//! The model is asked for `{"sentiment", "confidence", "explanation"}` but
//! nothing guarantees it complies. [`try_decode`] is the strict path and
//! reports why a reply was rejected; [`decode`] never fails and degrades to
//! [`Sentiment::Unknown`] with the raw reply attached.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Unknown,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

impl FromStr for Sentiment {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            "unknown" => Ok(Self::Unknown),
            _ => Err(DecodeError::UnknownLabel(s.to_string())),
        }
    }
}

/// A structured sentiment judgment. `raw` is only set when the model's
/// reply could not be decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl SentimentResult {
    /// The degraded result for a reply we could not decode.
    pub fn unknown(raw: &str) -> Self {
        Self {
            sentiment: Sentiment::Unknown,
            confidence: None,
            explanation: None,
            raw: Some(raw.to_string()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.raw.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("reply is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("reply is JSON but not an object")]
    NotAnObject,

    #[error("reply has no string \"sentiment\" field")]
    MissingSentiment,

    #[error("unrecognized sentiment label: {0:?}")]
    UnknownLabel(String),

    #[error("confidence must be a number between 0 and 1, got {0}")]
    InvalidConfidence(String),
}

/// Strictly decode a sentiment reply.
///
/// Accepts the object bare or wrapped in markdown code fences. Labels match
/// case-insensitively. `confidence`, when present, must be a number (or a
/// numeric string) in `[0, 1]`. Extra keys are ignored.
pub fn try_decode(text: &str) -> Result<SentimentResult, DecodeError> {
    let value: Value = serde_json::from_str(extract_json(text))?;
    let obj = value.as_object().ok_or(DecodeError::NotAnObject)?;

    let sentiment = obj
        .get("sentiment")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingSentiment)?
        .parse::<Sentiment>()?;

    let confidence = match obj.get("confidence") {
        None | Some(Value::Null) => None,
        Some(v) => Some(parse_confidence(v)?),
    };

    let explanation = obj
        .get("explanation")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(SentimentResult {
        sentiment,
        confidence,
        explanation,
        raw: None,
    })
}

/// Decode a sentiment reply, falling back to `Unknown` with the raw text
/// attached. Never fails.
pub fn decode(text: &str) -> SentimentResult {
    match try_decode(text) {
        Ok(result) => result,
        Err(e) => {
            debug!("sentiment reply not decodable, degrading: {e}");
            SentimentResult::unknown(text)
        }
    }
}

fn parse_confidence(value: &Value) -> Result<f64, DecodeError> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if (0.0..=1.0).contains(&n) => Ok(n),
        _ => Err(DecodeError::InvalidConfidence(value.to_string())),
    }
}

/// Extract JSON from text that may be wrapped in markdown code fences.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    for fence in ["```json", "```"] {
        if let Some(inner) = trimmed
            .strip_prefix(fence)
            .and_then(|after| after.strip_suffix("```"))
        {
            return inner.trim();
        }
    }

    trimmed
}
