//! Conversion des erreurs en réponses HTTP
//!
//! Le client ne reçoit qu'un message générique ; la cause est journalisée.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pmoaudiocache::AudioCacheError;
use pmofeed::FeedError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("playlist fetch failed: {0}")]
    Upstream(#[from] pmoyoutube::Error),

    #[error("feed rendering failed: {0}")]
    Feed(#[from] FeedError),

    #[error("audio retrieval failed: {0}")]
    Retrieval(AudioCacheError),
}

impl From<AudioCacheError> for AppError {
    fn from(err: AudioCacheError) -> Self {
        match err {
            AudioCacheError::InvalidId(_) => Self::NotFound,
            other => Self::Retrieval(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound => return (StatusCode::NOT_FOUND, "404 page not found").into_response(),
            Self::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching playlist items"),
            Self::Feed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Error generating RSS feed"),
            Self::Retrieval(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Error downloading audio"),
        };

        error!("{}: {}", message, self);
        (status, message).into_response()
    }
}
