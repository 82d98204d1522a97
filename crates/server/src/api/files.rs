//! Provider file detail handler.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use sharestream_core::{Credentials, FileMeta, SearchError};

use super::ErrorResponse;
use crate::state::AppState;

/// POST /api/v1/files/{ident}
///
/// Detail view of a single file: parsed name, summary, preview image and
/// the provider's web page.
pub async fn file_meta(
    State(state): State<Arc<AppState>>,
    Path(ident): Path<String>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<FileMeta>, (StatusCode, Json<ErrorResponse>)> {
    match state.searcher().file_meta(&ident, &credentials).await {
        Ok(Some(meta)) => Ok(Json(meta)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("File not found: {}", ident))),
        )),
        Err(SearchError::Authentication(message)) => {
            Err((StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))))
        }
        Err(e) => {
            warn!(ident = %ident, error = %e, "File detail lookup failed");
            Err((StatusCode::BAD_GATEWAY, Json(ErrorResponse::new(e.to_string()))))
        }
    }
}
