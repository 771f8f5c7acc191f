//! # pmoyoutube - Playlists YouTube pour PMOPodcast
//!
//! Cette crate fournit :
//! - [`PlaylistSource`] : la capacité de listage paginé d'une playlist
//! - [`fetch_all`] : le suivi du curseur de pagination jusqu'à la dernière page
//! - [`YouTubeClient`] : l'implémentation via l'API YouTube Data v3
//! - [`PlaylistCache`] : le cache en mémoire avec TTL, partagé entre requêtes
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use pmoyoutube::{PlaylistCache, YouTubeClient};
//! use std::{sync::Arc, time::Duration};
//!
//! #[tokio::main]
//! async fn main() -> pmoyoutube::Result<()> {
//!     let client = YouTubeClient::builder("my-api-key").build()?;
//!     let cache = PlaylistCache::new(Arc::new(client), Duration::from_secs(3600));
//!
//!     let items = cache.get("PLxxxxxxxx").await?;
//!     for item in items.iter() {
//!         println!("{} - {}", item.video_id, item.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod models;
pub mod source;

pub use cache::PlaylistCache;
pub use client::{ClientBuilder, YouTubeClient};
pub use error::{Error, Result};
pub use models::{PlaylistItem, PlaylistPage, watch_url};
pub use source::{PlaylistSource, fetch_all};
