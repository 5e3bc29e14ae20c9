//! Extraction route.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

use crate::extract::{ErrorCode, ExtractError, ExtractedGraphic};
use crate::services::extraction::extract_page;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub url: String,
    pub count: usize,
    pub svgs: Vec<ExtractedGraphic>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Validate a request body into an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns [`ExtractError::MissingUrl`] when the body is not a JSON object
/// with a non-empty string `url`, and [`ExtractError::InvalidUrl`] when it
/// does not parse or uses another scheme.
pub fn parse_request(body: &[u8]) -> Result<Url, ExtractError> {
    let value: serde_json::Value = serde_json::from_slice(body).map_err(|_| ExtractError::MissingUrl)?;
    let raw = value
        .get("url")
        .and_then(serde_json::Value::as_str)
        .filter(|url| !url.is_empty())
        .ok_or(ExtractError::MissingUrl)?;

    let url = Url::parse(raw).map_err(|_| ExtractError::InvalidUrl)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ExtractError::InvalidUrl);
    }
    Ok(url)
}

pub fn extract_error_to_status(err: &ExtractError) -> StatusCode {
    match err {
        ExtractError::MissingUrl | ExtractError::InvalidUrl => StatusCode::BAD_REQUEST,
        ExtractError::Navigation(_)
        | ExtractError::Timeout(_)
        | ExtractError::Extraction(_)
        | ExtractError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: &ExtractError) -> Response {
    (extract_error_to_status(err), Json(ErrorResponse { error: err.to_string() })).into_response()
}

/// `POST /api/extract` — extract every graphic from the page at `url`.
pub async fn extract(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();

    let url = match parse_request(&body) {
        Ok(url) => url,
        Err(e) => {
            warn!(%request_id, code = e.error_code(), error = %e, "extract: rejected request");
            return error_response(&e);
        }
    };

    info!(%request_id, %url, "extract: started");
    match extract_page(state.engine.as_ref(), &url, &state.options).await {
        Ok(svgs) => {
            info!(%request_id, %url, count = svgs.len(), "extract: finished");
            Json(ExtractResponse { url: url.to_string(), count: svgs.len(), svgs }).into_response()
        }
        Err(e) => {
            error!(%request_id, %url, code = e.error_code(), error = %e, "extract: failed");
            error_response(&e)
        }
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
