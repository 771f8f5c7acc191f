//! Router HTTP
//!
//! Axum ne sait pas reconnaître un suffixe à l'intérieur d'un segment :
//! `/{segment}` est capturé en entier et seuls les segments en `.xml`
//! désignent un flux. Les deux formes acceptent un `/` final, que certains
//! clients de podcast ajoutent.

use crate::AppState;
use crate::error::AppError;
use axum::Router;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use pmoaudiocache::{AudioCache, serve_file};
use pmofeed::{RSS_CONTENT_TYPE, render_feed};
use tracing::{debug, info};

const FEED_SUFFIX: &str = ".xml";

/// Crée le router de l'application
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/{segment}", get(get_feed))
        .route("/{segment}/", get(get_feed))
        .route("/{playlist_id}/{item_id}", get(get_audio))
        .route("/{playlist_id}/{item_id}/", get(get_audio))
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// GET /{playlist_id}.xml
async fn get_feed(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Response, AppError> {
    let playlist_id = segment
        .strip_suffix(FEED_SUFFIX)
        .filter(|id| !id.is_empty())
        .ok_or(AppError::NotFound)?;

    let items = state.playlists.get(playlist_id).await?;
    let episodes = state.filter.apply(&items);
    let xml = render_feed(&episodes, playlist_id, &state.base_url)?;

    info!(
        "Served RSS feed for playlist {} ({} episodes)",
        playlist_id,
        episodes.len()
    );
    Ok(([(CONTENT_TYPE, RSS_CONTENT_TYPE)], xml).into_response())
}

/// GET /{playlist_id}/{item_id}
///
/// L'identifiant de playlist ne sert pas à retrouver l'audio : le cache est
/// indexé par vidéo seulement.
async fn get_audio(
    State(state): State<AppState>,
    Path((playlist_id, item_id)): Path<(String, String)>,
    request: Request,
) -> Result<Response, AppError> {
    AudioCache::validate_id(&item_id)?;
    debug!("Audio request for {} in playlist {}", item_id, playlist_id);

    let path = state.audio.ensure(&item_id).await?;
    Ok(serve_file(&path, request).await)
}
