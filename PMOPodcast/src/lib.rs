//! # PMOPodcast
//!
//! Passerelle qui expose une playlist YouTube comme un podcast :
//!
//! - `GET /health` : sonde de vie
//! - `GET /{playlist}.xml` : flux RSS de la playlist
//! - `GET /{playlist}/{video}` : audio MP3 de la vidéo, avec requêtes partielles
//!
//! Le binaire assemble les caches et le router ; cette bibliothèque expose
//! le router pour les tests.

pub mod error;
pub mod routes;

use pmoaudiocache::AudioCache;
use pmofeed::EpisodeFilter;
use pmoyoutube::PlaylistCache;
use std::sync::Arc;

pub use error::AppError;
pub use routes::create_router;

/// État partagé entre les handlers
#[derive(Clone)]
pub struct AppState {
    pub playlists: Arc<PlaylistCache>,
    pub filter: Arc<EpisodeFilter>,
    pub audio: Arc<AudioCache>,
    /// URL publique, sans `/` final
    pub base_url: String,
}

impl AppState {
    pub fn new(
        playlists: Arc<PlaylistCache>,
        filter: EpisodeFilter,
        audio: Arc<AudioCache>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            playlists,
            filter: Arc::new(filter),
            audio,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}
