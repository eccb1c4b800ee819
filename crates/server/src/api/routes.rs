use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::{conversion, handlers, listing, media};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.static_dir().to_path_buf();

    // API routes
    let api_routes = Router::new()
        .route("/config", get(handlers::get_config))
        .route("/status", get(conversion::get_status))
        .route("/convert", post(conversion::start_conversion));

    // Serve front-end with index fallback
    let index_path = static_dir.join("index.html");
    let serve_dir = ServeDir::new(&static_dir).fallback(ServeFile::new(&index_path));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/list", get(listing::list_media))
        .route("/media/{*filename}", get(media::serve_media))
        .nest("/api", api_routes)
        .with_state(state)
        .fallback_service(serve_dir)
        .layer(TraceLayer::new_for_http())
}
