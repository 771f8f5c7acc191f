//! # pmoaudiocache - Cache audio de PMOPodcast
//!
//! Stocke sur disque la piste audio MP3 de chaque vidéo demandée :
//!
//! - [`AudioCache`] : un fichier par vidéo, extrait à la première demande
//!   puis servi depuis le disque
//! - [`AudioExtractor`] / [`YtDlpExtractor`] : l'extraction, déléguée à
//!   `yt-dlp`
//! - [`serve_file`] : réponse HTTP avec support des requêtes partielles
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use pmoaudiocache::{AudioCache, YtDlpExtractor};
//! use std::sync::Arc;
//!
//! # async fn example() -> pmoaudiocache::Result<()> {
//! let cache = AudioCache::new("./audio_cache", Arc::new(YtDlpExtractor::default()))?;
//! let path = cache.ensure("dQw4w9WgXcQ").await?;
//! println!("Audio available at {:?}", path);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod extractor;
pub mod http;

pub use cache::{AudioCache, AUDIO_EXTENSION, STAGING_DIR};
pub use error::{AudioCacheError, Result};
pub use extractor::{
    AudioExtractor, YtDlpExtractor, DEFAULT_EXTRACTION_TIMEOUT, DEFAULT_YTDLP_PROGRAM,
};
pub use http::serve_file;
