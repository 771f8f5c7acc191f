//! # pmofeed - Flux de podcast pour PMOPodcast
//!
//! Transforme une liste d'éléments de playlist en document RSS 2.0 :
//!
//! - [`EpisodeFilter`] : filtrage optionnel par motif sur le titre, puis
//!   ordre du plus récent au plus ancien
//! - [`RssFeed`] : construction et sérialisation du flux (via `quick-xml`)
//!
//! ## Exemple
//!
//! ```rust
//! use pmofeed::{EpisodeFilter, render_feed};
//! use pmoyoutube::PlaylistItem;
//!
//! let items = vec![
//!     PlaylistItem::new("v1", "Episode 1", ""),
//!     PlaylistItem::new("v2", "Bonus", ""),
//!     PlaylistItem::new("v3", "Episode 2", ""),
//! ];
//!
//! let filter = EpisodeFilter::new(Some("^Episode")).unwrap();
//! let episodes = filter.apply(&items);
//! let xml = render_feed(&episodes, "show1", "http://localhost:8080").unwrap();
//!
//! assert!(xml.contains("http://localhost:8080/show1/v3"));
//! assert!(!xml.contains("Bonus"));
//! ```

pub mod error;
pub mod filter;
pub mod rss;

pub use error::{FeedError, Result};
pub use filter::EpisodeFilter;
pub use rss::{AUDIO_MIME_TYPE, RSS_CONTENT_TYPE, RssFeed, enclosure_url, feed_url, render_feed};
