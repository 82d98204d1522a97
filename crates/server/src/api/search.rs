//! Direct search and password salting handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use sharestream_core::{Credentials, ProviderError, RawCandidate, SearchError};

use super::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub files: Vec<RawCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct SaltRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SaltResponse {
    pub salted_password: String,
}

/// POST /api/v1/search
///
/// Free-text provider search without matching or ranking.
pub async fn direct_search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .searcher()
        .direct_search(&body.query, &body.credentials)
        .await
    {
        Ok(files) => Ok(Json(SearchResponse { files })),
        Err(SearchError::Authentication(message)) => {
            Err((StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))))
        }
        Err(e) => {
            warn!(query = %body.query, error = %e, "Direct search failed");
            Ok(Json(SearchResponse { files: Vec::new() }))
        }
    }
}

/// POST /api/v1/salt
///
/// Derive the salted password so clients can store it instead of the
/// plain one.
pub async fn salt(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaltRequest>,
) -> Result<Json<SaltResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .provider()
        .salted_password(&body.login, &body.password)
        .await
    {
        Ok(salted_password) => Ok(Json(SaltResponse { salted_password })),
        Err(ProviderError::Authentication(message)) => {
            Err((StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))))
        }
        Err(e) => {
            warn!(login = %body.login, error = %e, "Salt lookup failed");
            Err((StatusCode::BAD_GATEWAY, Json(ErrorResponse::new(e.to_string()))))
        }
    }
}
