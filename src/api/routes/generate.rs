//! Summary generation endpoint.

use crate::api::error::{RelayError, RelayResult};
use crate::api::AppState;
use crate::summary::{self, GenerateRequest};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};

/// Success body of `POST /api/generate`. Failures use the shared error shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerateResponse {
    pub fn success(summary: String) -> Self {
        Self {
            ok: true,
            summary: Some(summary),
            error: None,
        }
    }
}

/// Create the generate router.
pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generate_summary))
}

/// POST /api/generate - Summarize a transcript with the completion provider.
async fn generate_summary(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> RelayResult<Json<GenerateResponse>> {
    let Json(request) = payload.map_err(RelayError::from)?;

    let summary = summary::generate(
        state.completion.as_ref(),
        &state.config.completion,
        &request,
    )
    .await?;

    Ok(Json(GenerateResponse::success(summary)))
}
