//! Relay error taxonomy and its uniform `{ok:false, error}` JSON response.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

pub const DELIVERY_FAILED: &str = "Email send failed";
pub const UNEXPECTED: &str = "Unexpected server error";

#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing or malformed caller input, detected before any outbound call.
    #[error("{0}")]
    Validation(String),

    /// The completion provider reported an error or returned nothing usable.
    #[error("{0}")]
    Upstream(String),

    /// The mail provider rejected or failed the send.
    #[error("Email delivery failed: {0}")]
    Delivery(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// Body refused by the JSON extractor with a status other than 400
    /// (oversized, wrong content type, wrong field types).
    #[error("{1}")]
    Rejected(StatusCode, String),
}

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(status, _) => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Delivery and unexpected faults keep their detail server-side.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Upstream(msg) | Self::Rejected(_, msg) => msg.clone(),
            Self::Delivery(_) => DELIVERY_FAILED.to_string(),
            Self::Unexpected(_) => UNEXPECTED.to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(msg) | Self::Rejected(_, msg) => debug!("Rejected request: {}", msg),
            Self::Upstream(msg) => warn!("Completion provider failed: {}", msg),
            Self::Delivery(detail) => error!("Email send error: {}", detail),
            Self::Unexpected(detail) => error!("Unexpected relay error: {}", detail),
        }

        let body = Json(json!({
            "ok": false,
            "error": self.public_message(),
        }));
        (self.status(), body).into_response()
    }
}

impl From<JsonRejection> for RelayError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::BAD_REQUEST => Self::Validation(rejection.body_text()),
            status => Self::Rejected(status, rejection.body_text()),
        }
    }
}

impl From<anyhow::Error> for RelayError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unexpected(format!("{:#}", err))
    }
}

/// Result type for relay operations and their handlers.
pub type RelayResult<T> = Result<T, RelayError>;
