//! Génération du flux RSS 2.0
//!
//! Le flux est une fonction pure de la liste filtrée, de l'identifiant de
//! la playlist et de l'URL publique du service ; il est recalculé à chaque
//! requête. Chaque épisode pointe vers `{base_url}/{playlist_id}/{video_id}`,
//! servi par le cache audio.

use crate::error::Result;
use pmoyoutube::PlaylistItem;
use serde::Serialize;
use tracing::debug;

/// Type MIME déclaré pour les enclosures
pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

/// Type MIME du document RSS
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Racine d'un document RSS
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "rss")]
pub struct RssFeed {
    #[serde(rename = "@version")]
    pub version: String,
    pub channel: RssChannel,
}

#[derive(Debug, Clone, Serialize)]
pub struct RssChannel {
    pub title: String,
    pub description: String,
    /// Lien vers le flux lui-même
    pub link: String,
    #[serde(rename = "item")]
    pub items: Vec<RssItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RssItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub guid: String,
    pub enclosure: Enclosure,
}

#[derive(Debug, Clone, Serialize)]
pub struct Enclosure {
    #[serde(rename = "@url")]
    pub url: String,
    /// Taille inconnue à la génération du flux : toujours 0
    #[serde(rename = "@length")]
    pub length: u64,
    #[serde(rename = "@type")]
    pub mime_type: String,
}

/// URL audio d'un épisode
pub fn enclosure_url(base_url: &str, playlist_id: &str, video_id: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        playlist_id,
        video_id
    )
}

/// URL du flux d'une playlist
pub fn feed_url(base_url: &str, playlist_id: &str) -> String {
    format!("{}/{}.xml", base_url.trim_end_matches('/'), playlist_id)
}

/// Remplace les caractères interdits en XML 1.0 par U+FFFD
///
/// L'échappement de quick-xml ne couvre que `&`, `<`, `>` et les guillemets ;
/// les caractères de contrôle (hors tabulation et fins de ligne) ainsi que
/// U+FFFE et U+FFFF rendraient le document invalide.
fn xml_text(text: &str) -> String {
    text.chars()
        .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
        .collect()
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

impl RssFeed {
    /// Construit le flux d'une playlist
    ///
    /// # Arguments
    ///
    /// * `items` - Éléments déjà filtrés et ordonnés
    /// * `playlist_id` - Identifiant de la playlist (identité du flux)
    /// * `base_url` - URL publique du service
    pub fn build(items: &[&PlaylistItem], playlist_id: &str, base_url: &str) -> Self {
        let items: Vec<RssItem> = items
            .iter()
            .map(|item| RssItem {
                title: xml_text(&item.title),
                description: xml_text(&item.description),
                link: xml_text(&item.link),
                guid: xml_text(&item.video_id),
                enclosure: Enclosure {
                    url: xml_text(&enclosure_url(base_url, playlist_id, &item.video_id)),
                    length: 0,
                    mime_type: AUDIO_MIME_TYPE.to_string(),
                },
            })
            .collect();

        debug!(
            "Generated RSS feed with {} items for playlist {}",
            items.len(),
            playlist_id
        );

        Self {
            version: "2.0".to_string(),
            channel: RssChannel {
                title: xml_text(&format!("YouTube Playlist {}", playlist_id)),
                description: "Generated podcast feed from YouTube playlist".to_string(),
                link: xml_text(&feed_url(base_url, playlist_id)),
                items,
            },
        }
    }

    /// Sérialise le flux en XML indenté, avec la déclaration XML
    ///
    /// Le texte a déjà été assaini par [`RssFeed::build`] ; l'échappement
    /// est fait par le sérialiseur.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::from(XML_HEADER);
        let mut serializer = quick_xml::se::Serializer::new(&mut xml);
        serializer.indent(' ', 2);
        self.serialize(serializer)?;
        Ok(xml)
    }
}

/// Construit et sérialise le flux en une étape
pub fn render_feed(items: &[&PlaylistItem], playlist_id: &str, base_url: &str) -> Result<String> {
    RssFeed::build(items, playlist_id, base_url).to_xml()
}
