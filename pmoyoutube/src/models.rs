//! Structures de données pour les playlists YouTube

use serde::{Deserialize, Serialize};

/// URL de visionnage d'une vidéo
pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Construit le permalien d'une vidéo
pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL, video_id)
}

/// Un élément d'une playlist
///
/// Immutable une fois récupéré ; partagé en lecture par le cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// Identifiant stable de la vidéo
    pub video_id: String,
    pub title: String,
    pub description: String,
    /// Permalien vers le contenu original
    pub link: String,
}

impl PlaylistItem {
    /// Crée un élément dont le permalien est dérivé de l'identifiant
    pub fn new(
        video_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let video_id = video_id.into();
        Self {
            link: watch_url(&video_id),
            video_id,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Une page de résultats de l'API de listage
#[derive(Debug, Clone, Default)]
pub struct PlaylistPage {
    pub items: Vec<PlaylistItem>,
    /// Jeton de la page suivante, absent sur la dernière page
    pub next_page_token: Option<String>,
}

// ============ Réponses de l'API YouTube Data v3 ============

/// Réponse de l'endpoint /playlistItems
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItemResource>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistItemResource {
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceId {
    pub video_id: String,
}

impl From<PlaylistItemResource> for PlaylistItem {
    fn from(resource: PlaylistItemResource) -> Self {
        let snippet = resource.snippet;
        PlaylistItem::new(snippet.resource_id.video_id, snippet.title, snippet.description)
    }
}

impl From<PlaylistItemListResponse> for PlaylistPage {
    fn from(response: PlaylistItemListResponse) -> Self {
        Self {
            items: response.items.into_iter().map(PlaylistItem::from).collect(),
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}
