//! Mapping of service errors to HTTP responses

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use stockdash_core::DashError;
use tracing::{error, warn};

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub DashError);

impl From<DashError> for ApiError {
    fn from(err: DashError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DashError::InvalidInput(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DashError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DashError::NoData { .. } => StatusCode::NOT_FOUND,
            DashError::MarketData { .. } | DashError::Generation(_) | DashError::Directory(_) => {
                StatusCode::BAD_GATEWAY
            }
            DashError::UpstreamParse { .. }
            | DashError::Configuration(_)
            | DashError::Template(_)
            | DashError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        let body = match self.0.raw_response() {
            Some(raw) => json!({ "error": self.0.to_string(), "rawResponse": raw }),
            None => json!({ "error": self.0.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
