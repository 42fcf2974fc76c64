//! Email share endpoint.

use crate::api::error::{RelayError, RelayResult};
use crate::api::AppState;
use crate::mail::{self, ShareRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};

/// Success body of `POST /api/share`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub ok: bool,
    /// Provider-assigned message id.
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ShareResponse {
    pub fn success(message_id: String) -> Self {
        Self {
            ok: true,
            message_id: Some(message_id),
            error: None,
        }
    }
}

/// Create the share router.
pub fn router() -> Router<AppState> {
    Router::new().route("/share", post(share_summary))
}

/// POST /api/share - Email a summary to the given recipients.
async fn share_summary(
    State(state): State<AppState>,
    payload: Result<Json<ShareRequest>, JsonRejection>,
) -> RelayResult<Json<ShareResponse>> {
    let Json(request) = payload.map_err(RelayError::from)?;

    let message_id = mail::share(state.mailer.as_ref(), &state.config.mail, &request).await?;

    Ok(Json(ShareResponse::success(message_id)))
}
