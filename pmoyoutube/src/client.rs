//! HTTP client for the YouTube Data API v3
//!
//! Only the `playlistItems` listing is used. The client is stateless and does
//! not cache responses; caching is the job of [`crate::PlaylistCache`].
//!
//! # Example
//!
//! ```no_run
//! use pmoyoutube::{YouTubeClient, fetch_all};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YouTubeClient::builder("my-api-key").build()?;
//!     let items = fetch_all(&client, "PLxxxxxxxx").await?;
//!     println!("{} videos", items.len());
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{PlaylistItemListResponse, PlaylistPage};
use crate::source::PlaylistSource;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Default YouTube Data API base URL
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum page size accepted by the API
pub const MAX_PAGE_SIZE: u32 = 50;

/// YouTube Data API client
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
    page_size: u32,
}

impl YouTubeClient {
    /// Create a builder for configuring the client
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Traite la réponse HTTP
    async fn handle_response(response: Response) -> Result<PlaylistPage> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body).unwrap_or(body);
            warn!("YouTube API error ({}): {}", status.as_u16(), message);
            return Err(Error::api(status.as_u16(), message));
        }

        let text = response.text().await.map_err(|e| Error::Http(e.without_url()))?;
        let parsed: PlaylistItemListResponse = serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse playlistItems response: {}", e);
            Error::Json(e)
        })?;
        Ok(parsed.into())
    }
}

/// Extrait `error.message` d'une réponse d'erreur Google
fn api_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl PlaylistSource for YouTubeClient {
    async fn fetch_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage> {
        let url = format!("{}/playlistItems", self.base_url);
        let page_size = self.page_size.to_string();

        debug!(
            "GET {} playlistId={} pageToken={:?}",
            url, playlist_id, page_token
        );

        let mut params = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", page_size.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        // `without_url` : l'URL contient la clé d'API, elle ne doit pas finir dans les logs
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;

        Self::handle_response(response).await
    }
}

/// Builder for [`YouTubeClient`]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    page_size: u32,
}

impl ClientBuilder {
    fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Override the API base URL (tests, proxies)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Page size, clamped to `1..=50`
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn build(self) -> Result<YouTubeClient> {
        let client = Client::builder().timeout(self.timeout).build()?;
        Ok(YouTubeClient {
            client,
            api_key: self.api_key,
            base_url: self.base_url,
            page_size: self.page_size,
        })
    }
}
