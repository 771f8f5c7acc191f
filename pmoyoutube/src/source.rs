//! Source paginée de playlists
//!
//! [`PlaylistSource`] abstrait la capacité de listage page par page ;
//! [`fetch_all`] suit le curseur jusqu'à la dernière page.

use crate::error::Result;
use crate::models::{PlaylistItem, PlaylistPage};
use async_trait::async_trait;
use tracing::debug;

/// Capacité de listage paginé d'une collection
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Récupère une page de la collection
    ///
    /// `page_token` vaut `None` pour la première page.
    async fn fetch_page(&self, playlist_id: &str, page_token: Option<&str>)
    -> Result<PlaylistPage>;
}

/// Récupère tous les éléments d'une collection, dans l'ordre d'arrivée
///
/// Tout-ou-rien : une erreur sur n'importe quelle page abandonne les éléments
/// déjà accumulés. Aucun retry n'est tenté.
pub async fn fetch_all<S>(source: &S, playlist_id: &str) -> Result<Vec<PlaylistItem>>
where
    S: PlaylistSource + ?Sized,
{
    let mut all_items = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.fetch_page(playlist_id, page_token.as_deref()).await?;
        pages += 1;
        all_items.extend(page.items);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    debug!(
        "Fetched {} playlist items in {} page(s) for playlist {}",
        all_items.len(),
        pages,
        playlist_id
    );
    Ok(all_items)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source simulée servant des pages de tailles données
    pub(crate) struct PagedSource {
        pub page_sizes: Vec<usize>,
        pub fail_on_page: Option<usize>,
        pub calls: AtomicUsize,
    }

    impl PagedSource {
        pub(crate) fn new(page_sizes: Vec<usize>) -> Self {
            Self {
                page_sizes,
                fail_on_page: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PlaylistSource for PagedSource {
        async fn fetch_page(
            &self,
            playlist_id: &str,
            page_token: Option<&str>,
        ) -> Result<PlaylistPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let index: usize = match page_token {
                None => 0,
                Some(token) => token
                    .strip_prefix("page-")
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| Error::other(format!("bad token {}", token)))?,
            };

            if self.fail_on_page == Some(index) {
                return Err(Error::api(500, "backend error"));
            }

            let offset: usize = self.page_sizes[..index].iter().sum();
            let items = (0..self.page_sizes[index])
                .map(|i| {
                    let n = offset + i;
                    PlaylistItem::new(format!("{}-{}", playlist_id, n), format!("Item {}", n), "")
                })
                .collect();
            let next_page_token =
                (index + 1 < self.page_sizes.len()).then(|| format!("page-{}", index + 1));

            Ok(PlaylistPage {
                items,
                next_page_token,
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_all_follows_pagination() {
        let source = PagedSource::new(vec![50, 50, 12]);

        let items = fetch_all(&source, "PL1").await.unwrap();

        assert_eq!(items.len(), 112);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        let unique: HashSet<_> = items.iter().map(|i| i.video_id.as_str()).collect();
        assert_eq!(unique.len(), 112);
        // Ordre d'arrivée préservé
        assert_eq!(items.first().unwrap().title, "Item 0");
        assert_eq!(items.last().unwrap().title, "Item 111");
    }

    #[tokio::test]
    async fn test_fetch_all_single_page() {
        let source = PagedSource::new(vec![3]);
        let items = fetch_all(&source, "PL1").await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_discards_partial_results() {
        let mut source = PagedSource::new(vec![50, 50, 12]);
        source.fail_on_page = Some(2);

        let result = fetch_all(&source, "PL1").await;

        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }
}
