use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::{ErrorCategory, TruthGuardError};
use crate::types::{AnalysisRequest, InputKind};

use super::AppState;

/// `POST /api/analyze-chat` body.
#[derive(Debug, Deserialize, Serialize)]
pub struct ChatBody {
    #[serde(default)]
    pub text: String,
}

/// `POST /api/analyze-image` body.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBody {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Error payload returned for every failure.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(err: &TruthGuardError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() && err.category() != ErrorCategory::Configuration {
        warn!(error = %err, category = ?err.category(), "Analysis failed");
    }
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|err| {
        error_response(&TruthGuardError::validation(format!("Invalid JSON body: {err}")))
    })
}

async fn run_analysis(state: &AppState, request: Result<AnalysisRequest, Response>) -> Response {
    let request = match request {
        Ok(request) => request,
        Err(response) => return response,
    };
    match state.analyzer.analyze(&request).await {
        Ok(analysis) => (StatusCode::OK, Json(analysis.result)).into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET /health
pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "configured": state.analyzer.check_credential().is_ok(),
    }))
}

/// POST /api/analyze-chat
pub async fn handle_analyze_chat(State(state): State<AppState>, body: Bytes) -> Response {
    let span = info_span!("analyze", request_id = %Uuid::new_v4(), kind = %InputKind::Text);
    async move {
        // Credential first: a misconfigured server answers 500 whatever the input.
        if let Err(err) = state.analyzer.check_credential() {
            return error_response(&err);
        }
        let request = parse_body::<ChatBody>(&body).and_then(|chat| {
            AnalysisRequest::text(chat.text).map_err(|err| error_response(&err))
        });
        run_analysis(&state, request).await
    }
    .instrument(span)
    .await
}

/// POST /api/analyze-image
pub async fn handle_analyze_image(State(state): State<AppState>, body: Bytes) -> Response {
    let span = info_span!("analyze", request_id = %Uuid::new_v4(), kind = %InputKind::Image);
    async move {
        if let Err(err) = state.analyzer.check_credential() {
            return error_response(&err);
        }
        let request = parse_body::<ImageBody>(&body).and_then(|image| {
            AnalysisRequest::image(image.image, image.mime_type).map_err(|err| error_response(&err))
        });
        run_analysis(&state, request).await
    }
    .instrument(span)
    .await
}
