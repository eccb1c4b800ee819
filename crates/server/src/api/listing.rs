//! Gallery listing.
//!
//! Pairs each displayable image with its video by base name. Legacy
//! containers only appear once their converted artifact is in the cache, so
//! the list grows as a background run progresses.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::error;

use super::handlers::ErrorResponse;
use crate::state::AppState;

/// One gallery entry. Names are relative to `/media/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaPair {
    pub image: Option<String>,
    pub video: Option<String>,
}

const DIRECT_IMAGES: [&str; 3] = ["jpg", "jpeg", "png"];
const PAIRED_VIDEOS: [&str; 2] = ["mp4", "mov"];
const PAIRED_IMAGES: [&str; 4] = ["jpg", "jpeg", "png", "heic"];

/// List image/video pairs
pub async fn list_media(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MediaPair>>, (StatusCode, Json<ErrorResponse>)> {
    let source = state.source_dir().to_path_buf();
    let cache = state.cache_dir().to_path_buf();

    let listed = tokio::task::spawn_blocking(move || list_pairs(&source, &cache))
        .await
        .map_err(|e| e.to_string())
        .and_then(|r| r.map_err(|e| e.to_string()));

    listed.map(Json).map_err(|e| {
        error!("Failed to list media: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Failed to list media: {}", e))),
        )
    })
}

/// Builds the gallery from `media_dir`, consulting `cache_dir` for
/// converted artifacts. Entries are in file name order.
pub fn list_pairs(media_dir: &Path, cache_dir: &Path) -> std::io::Result<Vec<MediaPair>> {
    let mut names: Vec<String> = std::fs::read_dir(media_dir)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    let in_media = |name: &str| media_dir.join(name).exists();
    let in_cache = |name: &str| cache_dir.join(name).exists();

    let mut pairs = Vec::new();
    for name in &names {
        let Some((base, ext)) = name.rsplit_once('.') else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        let cached_jpg = format!("{}.jpg", base);
        let cached_mp4 = format!("{}.mp4", base);

        if DIRECT_IMAGES.contains(&ext.as_str()) {
            let video = PAIRED_VIDEOS.iter().find_map(|vext| {
                let candidate = format!("{}.{}", base, vext);
                if in_cache(&cached_mp4) {
                    Some(cached_mp4.clone())
                } else if in_media(&candidate) {
                    Some(candidate)
                } else {
                    None
                }
            });
            pairs.push(MediaPair {
                image: Some(name.clone()),
                video,
            });
        } else if ext == "heic" {
            if in_cache(&cached_jpg) {
                pairs.push(MediaPair {
                    image: Some(cached_jpg),
                    video: None,
                });
            }
        } else if ext == "mov" {
            if !in_cache(&cached_mp4) {
                continue;
            }
            let image = PAIRED_IMAGES.iter().find_map(|iext| {
                let candidate = format!("{}.{}", base, iext);
                if in_cache(&cached_jpg) {
                    Some(cached_jpg.clone())
                } else if in_media(&candidate) {
                    Some(candidate)
                } else {
                    None
                }
            });
            pairs.push(MediaPair {
                image,
                video: Some(cached_mp4),
            });
        }
    }

    Ok(pairs)
}
