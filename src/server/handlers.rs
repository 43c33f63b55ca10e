//! Route handlers. Each one is a thin adapter over the gateway.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::AppState;
use super::page::INDEX_HTML;
use crate::error::{ErrorKind, GatewayError};
use crate::report::{AnalysisReport, ErrorBody};
use crate::sentiment::{self, SentimentResult};

/// Body accepted by every POST route.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub sentiment: SentimentResult,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub api_key_configured: bool,
}

/// A failed request on its way out as an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// The body was not a usable `TextRequest`.
    Body(JsonRejection),
    Gateway(GatewayError),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self::Gateway(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Body(rejection) => {
                let body = ErrorBody {
                    error: rejection.body_text(),
                    kind: ErrorKind::Input,
                };
                (rejection.status(), Json(body)).into_response()
            }
            Self::Gateway(err) => {
                let status = status_for(&err);
                if status.is_server_error() {
                    warn!(kind = ?err.kind(), status = status.as_u16(), "{}", err);
                }
                (status, Json(ErrorBody::from(&err))).into_response()
            }
        }
    }
}

/// HTTP status for a gateway failure.
pub fn status_for(err: &GatewayError) -> StatusCode {
    match err.kind() {
        ErrorKind::Input => StatusCode::BAD_REQUEST,
        ErrorKind::Configuration => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::UpstreamProtocol => StatusCode::BAD_GATEWAY,
        ErrorKind::Transport if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::Transport => StatusCode::BAD_GATEWAY,
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.gateway.default_model().to_string(),
        api_key_configured: state.api_key_configured,
    })
}

pub async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(req) = payload?;
    let summary = state
        .gateway
        .summarize(&req.text, req.model.as_deref())
        .await?;
    info!(len = summary.len(), "POST /summarize ok");
    Ok(Json(SummaryResponse { summary }))
}

pub async fn sentiment(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<SentimentResponse>, ApiError> {
    let Json(req) = payload?;
    let raw = state
        .gateway
        .analyze_sentiment(&req.text, req.model.as_deref())
        .await?;
    let sentiment = sentiment::decode(&raw);
    info!(sentiment = %sentiment.sentiment, "POST /sentiment ok");
    Ok(Json(SentimentResponse { sentiment }))
}

/// Both tasks in one round trip. Succeeds if either half does; the failed
/// half carries its error inline.
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>, ApiError> {
    let Json(req) = payload?;
    let analysis = state
        .gateway
        .analyze(&req.text, req.model.as_deref())
        .await;

    if let (Err(err), Err(_)) = (&analysis.summary, &analysis.sentiment) {
        return Err(err.clone().into());
    }

    info!("POST /analyze ok");
    Ok(Json(AnalysisReport::from(analysis)))
}
