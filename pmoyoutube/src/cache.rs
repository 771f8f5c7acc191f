//! Cache en mémoire des playlists avec TTL
//!
//! Chaque entrée associe un identifiant de playlist à la liste complète de
//! ses éléments et à l'instant de récupération. Une entrée est fraîche tant
//! que `now - fetched_at < ttl` ; au-delà, la playlist est entièrement
//! re-téléchargée puis l'entrée est remplacée d'un bloc.
//!
//! # Concurrence
//!
//! - La map est protégée par un `RwLock` : lectures concurrentes, verrou
//!   exclusif uniquement pour l'échange atomique d'une entrée.
//! - Le téléchargement se fait hors du verrou de la map.
//! - Un mutex par clé garantit qu'un seul rafraîchissement a lieu par clé
//!   et par fenêtre d'expiration ; les appelants en attente réutilisent le
//!   résultat du premier.

use crate::error::Result;
use crate::models::PlaylistItem;
use crate::source::{fetch_all, PlaylistSource};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Entrée du cache : éléments + instant de récupération
#[derive(Debug, Clone)]
struct CacheEntry {
    items: Arc<Vec<PlaylistItem>>,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Cache des playlists
///
/// Note : ce type est conçu pour être partagé derrière un `Arc<PlaylistCache>`.
pub struct PlaylistCache {
    source: Arc<dyn PlaylistSource>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Mutex de rafraîchissement par clé (single-flight)
    refresh_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PlaylistCache {
    /// Crée un cache vide
    ///
    /// # Arguments
    ///
    /// * `source` - Capacité de listage paginé
    /// * `ttl` - Durée de validité d'une entrée, fixée pour la vie du processus
    pub fn new(source: Arc<dyn PlaylistSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            entries: RwLock::new(HashMap::new()),
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Retourne les éléments de la playlist, depuis le cache ou l'API
    ///
    /// # Errors
    ///
    /// Renvoie l'erreur amont si un rafraîchissement était nécessaire et a
    /// échoué. L'entrée précédente, périmée, n'est jamais servie dans ce cas.
    pub async fn get(&self, playlist_id: &str) -> Result<Arc<Vec<PlaylistItem>>> {
        if let Some(items) = self.fresh_entry(playlist_id).await {
            debug!("Using cached playlist items for playlist {}", playlist_id);
            return Ok(items);
        }

        let refresh_lock = self.refresh_lock(playlist_id).await;
        let _guard = refresh_lock.lock().await;

        // Un autre appelant a pu rafraîchir pendant l'attente
        if let Some(items) = self.fresh_entry(playlist_id).await {
            debug!(
                "Playlist {} refreshed by a concurrent request, reusing it",
                playlist_id
            );
            return Ok(items);
        }

        info!("Fetching playlist items from YouTube API for playlist {}", playlist_id);
        let items = match fetch_all(self.source.as_ref(), playlist_id).await {
            Ok(items) => Arc::new(items),
            Err(e) => {
                warn!("Error fetching playlist items for {}: {}", playlist_id, e);
                return Err(e);
            }
        };

        let entry = CacheEntry {
            items: items.clone(),
            fetched_at: Instant::now(),
        };
        self.entries
            .write()
            .await
            .insert(playlist_id.to_string(), entry);
        info!(
            "Updated cache for playlist {} ({} items)",
            playlist_id,
            items.len()
        );

        Ok(items)
    }

    /// Nombre de playlists en cache (fraîches ou non)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn fresh_entry(&self, playlist_id: &str) -> Option<Arc<Vec<PlaylistItem>>> {
        let entries = self.entries.read().await;
        entries
            .get(playlist_id)
            .filter(|entry| entry.is_fresh(self.ttl, Instant::now()))
            .map(|entry| entry.items.clone())
    }

    async fn refresh_lock(&self, playlist_id: &str) -> Arc<Mutex<()>> {
        self.refresh_locks
            .lock()
            .await
            .entry(playlist_id.to_string())
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::PlaylistPage;
    use crate::source::tests::PagedSource;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(3600);

    /// Source qui compte les appels et peut échouer à la demande
    struct CountingSource {
        calls: AtomicUsize,
        failing: AtomicBool,
        delay: Duration,
    }

    impl CountingSource {
        fn new() -> Arc<Self> {
            Self::with_delay(Duration::ZERO)
        }

        fn with_delay(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlaylistSource for CountingSource {
        async fn fetch_page(
            &self,
            playlist_id: &str,
            _page_token: Option<&str>,
        ) -> Result<PlaylistPage> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(Error::api(503, "unavailable"));
            }
            Ok(PlaylistPage {
                items: vec![PlaylistItem::new(
                    format!("{}-v{}", playlist_id, call),
                    format!("Fetch {}", call),
                    "",
                )],
                next_page_token: None,
            })
        }
    }

    #[test]
    fn test_ttl() {
        let cache = PlaylistCache::new(CountingSource::new(), TTL);
        assert_eq!(cache.ttl(), TTL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_is_served_from_cache() {
        let source = CountingSource::new();
        let cache = PlaylistCache::new(source.clone(), TTL);

        let first = cache.get("show1").await.unwrap();
        tokio::time::advance(TTL - Duration::from_millis(1)).await;
        let second = cache.get("show1").await.unwrap();

        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_triggers_refetch() {
        let source = CountingSource::new();
        let cache = PlaylistCache::new(source.clone(), TTL);

        let first = cache.get("show1").await.unwrap();
        tokio::time::advance(TTL + Duration::from_millis(1)).await;
        let second = cache.get("show1").await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(first[0].title, "Fetch 1");
        assert_eq!(second[0].title, "Fetch 2");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_exactly_at_ttl() {
        let source = CountingSource::new();
        let cache = PlaylistCache::new(source.clone(), TTL);

        cache.get("show1").await.unwrap();
        tokio::time::advance(TTL).await;
        cache.get("show1").await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let source = CountingSource::new();
        let cache = PlaylistCache::new(source.clone(), TTL);

        let a = cache.get("a").await.unwrap();
        let b = cache.get("b").await.unwrap();
        cache.get("a").await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(a[0].video_id, "a-v1");
        assert_eq!(b[0].video_id, "b-v2");
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_never_serves_stale_data() {
        let source = CountingSource::new();
        let cache = PlaylistCache::new(source.clone(), TTL);

        cache.get("show1").await.unwrap();
        tokio::time::advance(TTL * 2).await;
        source.failing.store(true, Ordering::SeqCst);

        assert!(cache.get("show1").await.is_err());

        // L'entrée suivante est récupérée dès que l'amont répond de nouveau
        source.failing.store(false, Ordering::SeqCst);
        let items = cache.get("show1").await.unwrap();
        assert_eq!(items[0].title, "Fetch 3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_on_first_fetch_leaves_no_entry() {
        let source = CountingSource::new();
        source.failing.store(true, Ordering::SeqCst);
        let cache = PlaylistCache::new(source.clone(), TTL);

        assert!(cache.get("show1").await.is_err());
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_refreshes_are_collapsed() {
        let source = CountingSource::with_delay(Duration::from_secs(1));
        let cache = Arc::new(PlaylistCache::new(source.clone(), TTL));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get("show1").await })
            })
            .collect();

        for handle in handles {
            let items = handle.await.unwrap().unwrap();
            assert_eq!(items[0].title, "Fetch 1");
        }
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_stores_all_pages() {
        let source = Arc::new(PagedSource::new(vec![50, 50, 12]));
        let cache = PlaylistCache::new(source, TTL);

        let items = cache.get("PL1").await.unwrap();
        assert_eq!(items.len(), 112);
    }
}
