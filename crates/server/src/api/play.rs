//! Playback redirect handler.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{debug, warn};

use sharestream_core::SessionToken;

use super::ErrorResponse;
use crate::metrics::PLAYBACK_REDIRECTS;
use crate::state::AppState;

/// Players may reuse a resolved link for five hours.
pub const PLAYBACK_CACHE_CONTROL: &str = "max-age=18000, must-revalidate, proxy-revalidate";

#[derive(Debug, Deserialize)]
pub struct PlayParams {
    pub token: String,
}

/// GET /play/{ident}?token=..
///
/// Redirect to the provider's stream link for a file.
pub async fn play(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
    Query(params): Query<PlayParams>,
) -> Response {
    let token = SessionToken(params.token);
    match state.provider().file_link(&ident, &token).await {
        Ok(link) => {
            debug!(ident = %ident, "Redirecting to stream link");
            PLAYBACK_REDIRECTS.with_label_values(&["ok"]).inc();
            (
                StatusCode::FOUND,
                [
                    (header::LOCATION, link),
                    (header::CACHE_CONTROL, PLAYBACK_CACHE_CONTROL.to_string()),
                ],
            )
                .into_response()
        }
        Err(e) => {
            warn!(ident = %ident, error = %e, "Failed to resolve stream link");
            PLAYBACK_REDIRECTS.with_label_values(&["error"]).inc();
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}
