//! Stream search API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sharestream_core::{
    Credentials, MediaId, MediaKind, SearchError, ShowDescriptor, SortMethod, StreamResult,
};

use super::ErrorResponse;
use crate::metrics::STREAM_REQUESTS;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StreamsRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub sort_method: Option<SortMethod>,
    pub descriptor: ShowDescriptor,
}

#[derive(Debug, Deserialize)]
pub struct StreamsByIdRequest {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub sort_method: Option<SortMethod>,
}

#[derive(Debug, Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<StreamResult>,
}

impl StreamsResponse {
    fn empty() -> Json<Self> {
        Json(Self {
            streams: Vec::new(),
        })
    }
}

type StreamsResult = Result<Json<StreamsResponse>, (StatusCode, Json<ErrorResponse>)>;

/// Media ids naming a provider file directly, as handed out for direct
/// search hits (`webshare:<ident>`).
pub const FILE_ID_PREFIX: &str = "webshare:";

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/streams
///
/// Search streams for an explicit descriptor.
pub async fn search_streams(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StreamsRequest>,
) -> StreamsResult {
    run_search(&state, "streams", &body.descriptor, &body.credentials, body.sort_method).await
}

/// POST /api/v1/streams/{kind}/{media_id}
///
/// Resolve the title through the metadata resolver, then search streams.
/// A `webshare:<ident>` id skips both and answers with that one file.
pub async fn streams_for_id(
    State(state): State<Arc<AppState>>,
    Path((kind, media_id)): Path<(String, String)>,
    Json(body): Json<StreamsByIdRequest>,
) -> StreamsResult {
    const ROUTE: &str = "streams_by_id";

    let kind: MediaKind = kind
        .parse()
        .map_err(|e: String| (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e))))?;

    if let Some(ident) = media_id.strip_prefix(FILE_ID_PREFIX) {
        return direct_stream(&state, ident, &body.credentials).await;
    }

    let resolver = state.metadata().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Metadata lookup not configured")),
        )
    })?;

    let Some(id) = MediaId::parse(&media_id) else {
        debug!(media_id = %media_id, "Unsupported media id");
        STREAM_REQUESTS.with_label_values(&[ROUTE, "unresolved"]).inc();
        return Ok(StreamsResponse::empty());
    };

    let descriptor = match resolver.describe(kind, &id).await {
        Ok(Some(descriptor)) => descriptor,
        Ok(None) => {
            debug!(media_id = %id, kind = %kind, "Title not found");
            STREAM_REQUESTS.with_label_values(&[ROUTE, "unresolved"]).inc();
            return Ok(StreamsResponse::empty());
        }
        Err(e) => {
            warn!(media_id = %id, resolver = resolver.name(), error = %e, "Metadata lookup failed");
            STREAM_REQUESTS.with_label_values(&[ROUTE, "unresolved"]).inc();
            return Ok(StreamsResponse::empty());
        }
    };

    run_search(&state, ROUTE, &descriptor, &body.credentials, body.sort_method).await
}

async fn direct_stream(state: &AppState, ident: &str, credentials: &Credentials) -> StreamsResult {
    const ROUTE: &str = "streams_by_file";

    if ident.is_empty() {
        STREAM_REQUESTS.with_label_values(&[ROUTE, "unresolved"]).inc();
        return Ok(StreamsResponse::empty());
    }

    match state.searcher().direct_stream(ident, credentials).await {
        Ok(stream) => {
            STREAM_REQUESTS.with_label_values(&[ROUTE, "ok"]).inc();
            Ok(Json(StreamsResponse {
                streams: vec![stream],
            }))
        }
        Err(SearchError::Authentication(message)) => {
            STREAM_REQUESTS
                .with_label_values(&[ROUTE, "unauthorized"])
                .inc();
            Err((StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))))
        }
        Err(e) => {
            warn!(ident = %ident, error = %e, "Direct stream failed, returning no streams");
            STREAM_REQUESTS.with_label_values(&[ROUTE, "empty"]).inc();
            Ok(StreamsResponse::empty())
        }
    }
}

/// Authentication failures become 401; any other failure an empty list.
async fn run_search(
    state: &AppState,
    route: &str,
    descriptor: &ShowDescriptor,
    credentials: &Credentials,
    sort_method: Option<SortMethod>,
) -> StreamsResult {
    match state
        .searcher()
        .search_streams(descriptor, credentials, sort_method)
        .await
    {
        Ok(streams) => {
            let result = if streams.is_empty() { "empty" } else { "ok" };
            STREAM_REQUESTS.with_label_values(&[route, result]).inc();
            Ok(Json(StreamsResponse { streams }))
        }
        Err(SearchError::Authentication(message)) => {
            STREAM_REQUESTS
                .with_label_values(&[route, "unauthorized"])
                .inc();
            Err((StatusCode::UNAUTHORIZED, Json(ErrorResponse::new(message))))
        }
        Err(e) => {
            warn!(route = route, error = %e, "Stream search failed, returning no streams");
            STREAM_REQUESTS.with_label_values(&[route, "empty"]).inc();
            Ok(StreamsResponse::empty())
        }
    }
}
