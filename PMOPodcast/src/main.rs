use anyhow::Context;
use pmoaudiocache::{AudioCache, YtDlpExtractor};
use pmoconfig::{Config, load_env_file, log_level_from_env};
use pmofeed::EpisodeFilter;
use pmopodcast::{AppState, create_router};
use pmoserver::{LoggingOptions, ServerBuilder, init_logging};
use pmoyoutube::{PlaylistCache, YouTubeClient};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Le subscriber doit exister avant que la configuration n'émette ses avertissements
    let env_file = load_env_file();

    init_logging(LoggingOptions {
        level: log_level_from_env(),
        ..Default::default()
    });

    // ========== Configuration ==========
    info!("🎙️ Starting PMOPodcast");
    match env_file {
        Ok(Some(path)) => info!("Loaded .env file {}", path.display()),
        Ok(None) => {}
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }

    let config = Config::from_env()?;
    info!("Public URL: {}", config.get_base_url());
    match config.get_filter_pattern() {
        Some(pattern) => info!("Filter pattern: {}", pattern),
        None => info!("No filter pattern, all videos are published"),
    }
    if config.get_convert_to_mp3() {
        warn!("CONVERT_TO_MP3 is set: audio is always extracted as MP3, the flag has no effect");
    }

    let filter = EpisodeFilter::new(config.get_filter_pattern())
        .context("Invalid FILTER_PATTERN")?;

    // ========== Playlists ==========
    let client = YouTubeClient::builder(config.get_api_key())
        .build()
        .context("Error creating YouTube client")?;
    let playlists = Arc::new(PlaylistCache::new(Arc::new(client), config.get_cache_ttl()));
    info!("Playlist cache TTL: {:?}", playlists.ttl());

    // ========== Audio ==========
    let audio_dir = config.ensure_audio_cache_dir()?;
    let extractor = YtDlpExtractor::new(config.get_ytdlp_path(), config.get_extraction_timeout());
    info!(
        "Audio extractor: {} (timeout {:?})",
        extractor.program().display(),
        extractor.timeout()
    );
    let audio = Arc::new(
        AudioCache::new(&audio_dir, Arc::new(extractor))
            .with_context(|| format!("Error opening audio cache in {}", audio_dir.display()))?,
    );
    info!("📁 Audio cache directory: {}", audio_dir.display());

    // ========== Serveur HTTP ==========
    let state = AppState::new(playlists, filter, audio, config.get_base_url());

    let mut server = ServerBuilder::from_config(&config).build();
    server.add_router("/", create_router(state)).await;
    server
        .start()
        .await
        .with_context(|| format!("Error starting server on port {}", config.get_http_port()))?;

    let info = server.info();
    info!(
        "✅ {} listening on port {} ({})",
        info.name, info.http_port, info.base_url
    );
    server.wait().await;
    info!("Server stopped");

    Ok(())
}
