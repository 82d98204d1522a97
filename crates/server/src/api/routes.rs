use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{files, handlers, middleware::metrics_middleware, play, search, streams};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Streams
        .route("/streams", post(streams::search_streams))
        .route("/streams/{kind}/{media_id}", post(streams::streams_for_id))
        .route("/files/{ident}", post(files::file_meta))
        // Provider passthrough
        .route("/search", post(search::direct_search))
        .route("/salt", post(search::salt));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/play/{ident}", get(play::play))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
