//! Media file handler.
//!
//! Converted artifacts shadow originals: a name present in the cache
//! directory is served from there, anything else from the source directory.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::path::{Component, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;

use super::handlers::ErrorResponse;
use crate::state::AppState;

/// Serve a media file, preferring the cache
pub async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    request: Request,
) -> Response {
    let Some(relative) = safe_relative_path(&filename) else {
        debug!("Rejected media path {:?}", filename);
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid media path")),
        )
            .into_response();
    };

    let Some(path) = locate(&[state.cache_dir(), state.source_dir()], &relative).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Media not found: {}", filename))),
        )
            .into_response();
    };

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new).into_response(),
        Err(never) => match never {},
    }
}

/// First regular file at `relative` under `dirs`, in order.
pub async fn locate(dirs: &[&std::path::Path], relative: &std::path::Path) -> Option<PathBuf> {
    for dir in dirs {
        let path = dir.join(relative);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => return Some(path),
            _ => continue,
        }
    }
    None
}

/// Relative path made only of normal components, or `None` if it could
/// escape the served directories.
pub fn safe_relative_path(filename: &str) -> Option<PathBuf> {
    let path = std::path::Path::new(filename);
    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!relative.as_os_str().is_empty()).then_some(relative)
}
