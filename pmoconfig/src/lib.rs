//! # PMOPodcast Configuration Module
//!
//! This module provides configuration management for PMOPodcast, including:
//! - Loading an optional `.env` file
//! - Environment variable lookup with typed defaults
//! - Validation of the mandatory API key
//! - Creation of the audio cache directory
//!
//! ## Usage
//!
//! ```no_run
//! use pmoconfig::Config;
//!
//! let config = Config::load()?;
//!
//! let port = config.get_http_port();
//! let ttl = config.get_cache_ttl();
//! let cache_dir = config.ensure_audio_cache_dir()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Context, Result};
use std::{
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use tracing::{info, warn};

pub const ENV_API_KEY: &str = "API_KEY";
/// Nom historique de la clé, accepté si `API_KEY` est absent
pub const ENV_API_KEY_LEGACY: &str = "YOUTUBE_API_KEY";
pub const ENV_SERVER_URL: &str = "SERVER_URL";
pub const ENV_PORT: &str = "PORT";
pub const ENV_CACHE_TTL: &str = "CACHE_TTL";
pub const ENV_FILTER_PATTERN: &str = "FILTER_PATTERN";
pub const ENV_CONVERT_TO_MP3: &str = "CONVERT_TO_MP3";
pub const ENV_AUDIO_CACHE_DIR: &str = "AUDIO_CACHE_DIR";
pub const ENV_YTDLP_PATH: &str = "YTDLP_PATH";
pub const ENV_EXTRACTION_TIMEOUT: &str = "EXTRACTION_TIMEOUT";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

// Default values for configuration
const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
const DEFAULT_AUDIO_CACHE_DIR: &str = "./audio_cache";
const DEFAULT_YTDLP_PATH: &str = "yt-dlp";
const DEFAULT_EXTRACTION_TIMEOUT_SECS: u64 = 600;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration of the podcast gateway
///
/// Built once at startup and shared read-only afterwards. Every value has a
/// default except the API key, whose absence is a fatal configuration error.
///
/// # Examples
///
/// ```
/// use pmoconfig::Config;
/// use std::collections::HashMap;
///
/// let env: HashMap<&str, &str> = [("API_KEY", "secret"), ("PORT", "9000")].into();
/// let config = Config::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap();
///
/// assert_eq!(config.get_http_port(), 9000);
/// assert_eq!(config.get_base_url(), "http://localhost:9000");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    api_key: String,
    base_url: String,
    http_port: u16,
    cache_ttl: Duration,
    filter_pattern: Option<String>,
    convert_to_mp3: bool,
    audio_cache_dir: PathBuf,
    ytdlp_path: String,
    extraction_timeout: Duration,
    log_level: String,
}

impl Config {
    /// Loads the configuration from the process environment
    ///
    /// A `.env` file in the current directory (or a parent) is read first when
    /// present; variables already set in the environment take precedence.
    ///
    /// Warnings about invalid values are emitted through `tracing`: install
    /// the subscriber first, or use [`load_env_file`] + [`Config::from_env`].
    pub fn load() -> Result<Self> {
        match load_env_file() {
            Ok(Some(path)) => info!(env_file=%path.display(), "Loaded .env file"),
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_env()
    }

    /// Builds the configuration from the process environment only
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key/value lookup
    ///
    /// # Errors
    ///
    /// Returns an error when neither `API_KEY` nor `YOUTUBE_API_KEY` is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(ENV_API_KEY)
            .or_else(|| non_empty(ENV_API_KEY_LEGACY))
            .ok_or_else(|| anyhow!("YouTube API key not set ({} is required)", ENV_API_KEY))?;

        let http_port = parse_or_default(ENV_PORT, non_empty(ENV_PORT), DEFAULT_HTTP_PORT);
        let ttl_secs = parse_or_default(
            ENV_CACHE_TTL,
            non_empty(ENV_CACHE_TTL),
            DEFAULT_CACHE_TTL_SECS,
        );
        let timeout_secs = parse_or_default(
            ENV_EXTRACTION_TIMEOUT,
            non_empty(ENV_EXTRACTION_TIMEOUT),
            DEFAULT_EXTRACTION_TIMEOUT_SECS,
        );

        let base_url = non_empty(ENV_SERVER_URL)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", http_port));

        Ok(Self {
            api_key,
            base_url,
            http_port,
            cache_ttl: Duration::from_secs(ttl_secs),
            filter_pattern: non_empty(ENV_FILTER_PATTERN),
            convert_to_mp3: lookup(ENV_CONVERT_TO_MP3).is_some_and(|v| v.trim() == "true"),
            audio_cache_dir: non_empty(ENV_AUDIO_CACHE_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_AUDIO_CACHE_DIR)),
            ytdlp_path: non_empty(ENV_YTDLP_PATH).unwrap_or_else(|| DEFAULT_YTDLP_PATH.into()),
            extraction_timeout: Duration::from_secs(timeout_secs),
            log_level: non_empty(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.into()),
        })
    }

    pub fn get_api_key(&self) -> &str {
        &self.api_key
    }

    /// Public base URL used in feed enclosures, without trailing slash
    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get_http_port(&self) -> u16 {
        self.http_port
    }

    pub fn get_cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn get_filter_pattern(&self) -> Option<&str> {
        self.filter_pattern.as_deref()
    }

    /// Valeur brute de `CONVERT_TO_MP3`
    ///
    /// The extraction pipeline always produces MP3; the flag is only reported.
    pub fn get_convert_to_mp3(&self) -> bool {
        self.convert_to_mp3
    }

    pub fn get_audio_cache_dir(&self) -> &Path {
        &self.audio_cache_dir
    }

    pub fn get_ytdlp_path(&self) -> &str {
        &self.ytdlp_path
    }

    pub fn get_extraction_timeout(&self) -> Duration {
        self.extraction_timeout
    }

    pub fn get_log_level(&self) -> &str {
        &self.log_level
    }

    /// Creates the audio cache directory if needed and returns its path
    pub fn ensure_audio_cache_dir(&self) -> Result<PathBuf> {
        let dir = &self.audio_cache_dir;
        if !dir.exists() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Error creating audio cache directory {}", dir.display())
            })?;
            info!(directory=%dir.display(), "Created audio cache directory");
        }
        if !dir.is_dir() {
            return Err(anyhow!("{} is not a directory", dir.display()));
        }
        Ok(dir.clone())
    }
}

/// Reads the `.env` file into the process environment
///
/// Returns the path of the file, or `None` when there is no such file.
pub fn load_env_file() -> Result<Option<PathBuf>> {
    match dotenv::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(anyhow!(e)),
    }
}

/// Niveau de log demandé, lisible avant la construction de [`Config`]
///
/// Permet d'installer le subscriber avant que la configuration n'émette
/// ses avertissements.
pub fn log_level_from_env() -> String {
    log_level_from_lookup(|key| env::var(key).ok())
}

fn log_level_from_lookup<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(ENV_LOG_LEVEL)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.into())
}

/// Parse une valeur numérique, avec repli sur la valeur par défaut
fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy,
{
    match raw {
        None => default,
        Some(value) => match value.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(key, value=%value, "Invalid numeric value, using default");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("API_KEY", "secret")]).unwrap();

        assert_eq!(config.get_api_key(), "secret");
        assert_eq!(config.get_http_port(), 8080);
        assert_eq!(config.get_base_url(), "http://localhost:8080");
        assert_eq!(config.get_cache_ttl(), Duration::from_secs(3600));
        assert_eq!(config.get_filter_pattern(), None);
        assert!(!config.get_convert_to_mp3());
        assert_eq!(config.get_audio_cache_dir(), Path::new("./audio_cache"));
        assert_eq!(config.get_ytdlp_path(), "yt-dlp");
        assert_eq!(config.get_extraction_timeout(), Duration::from_secs(600));
        assert_eq!(config.get_log_level(), "info");
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("API_KEY", "  ")]).is_err());
    }

    #[test]
    fn test_legacy_api_key() {
        let config = config_from(&[("YOUTUBE_API_KEY", "legacy")]).unwrap();
        assert_eq!(config.get_api_key(), "legacy");

        let config = config_from(&[("API_KEY", "new"), ("YOUTUBE_API_KEY", "legacy")]).unwrap();
        assert_eq!(config.get_api_key(), "new");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("API_KEY", "secret"),
            ("PORT", "9090"),
            ("SERVER_URL", "https://podcasts.example.org/"),
            ("CACHE_TTL", "60"),
            ("FILTER_PATTERN", "^Episode"),
            ("CONVERT_TO_MP3", "true"),
            ("AUDIO_CACHE_DIR", "/var/cache/audio"),
        ])
        .unwrap();

        assert_eq!(config.get_http_port(), 9090);
        assert_eq!(config.get_base_url(), "https://podcasts.example.org");
        assert_eq!(config.get_cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.get_filter_pattern(), Some("^Episode"));
        assert!(config.get_convert_to_mp3());
        assert_eq!(config.get_audio_cache_dir(), Path::new("/var/cache/audio"));
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = config_from(&[
            ("API_KEY", "secret"),
            ("PORT", "not-a-port"),
            ("CACHE_TTL", "-5"),
        ])
        .unwrap();

        assert_eq!(config.get_http_port(), 8080);
        assert_eq!(config.get_cache_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_empty_filter_pattern_is_none() {
        let config = config_from(&[("API_KEY", "secret"), ("FILTER_PATTERN", "")]).unwrap();
        assert_eq!(config.get_filter_pattern(), None);
    }

    #[test]
    fn test_ensure_audio_cache_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("nested").join("audio");
        let config = config_from(&[
            ("API_KEY", "secret"),
            ("AUDIO_CACHE_DIR", target.to_str().unwrap()),
        ])
        .unwrap();

        let dir = config.ensure_audio_cache_dir().unwrap();
        assert!(dir.is_dir());
        // Idempotent
        assert!(config.ensure_audio_cache_dir().is_ok());
    }

    #[test]
    fn test_log_level_lookup() {
        assert_eq!(log_level_from_lookup(|_| None), "info");
        assert_eq!(log_level_from_lookup(|_| Some("  ".into())), "info");
        assert_eq!(
            log_level_from_lookup(|k| (k == "LOG_LEVEL").then(|| "debug".into())),
            "debug"
        );
    }

    #[test]
    fn test_filter_pattern_is_kept_verbatim() {
        let config = config_from(&[("API_KEY", "secret"), ("FILTER_PATTERN", " Live")]).unwrap();
        assert_eq!(config.get_filter_pattern(), Some(" Live"));
    }

    /// Tampon partagé servant de sortie au subscriber de test
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_invalid_number_is_reported_to_the_subscriber() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            config_from(&[("API_KEY", "secret"), ("PORT", "abc")])
        })
        .unwrap();

        assert_eq!(config.get_http_port(), 8080);
        let output = logs.contents();
        assert!(output.contains("Invalid numeric value, using default"), "{output}");
        assert!(output.contains("PORT"), "{output}");
        assert!(output.contains("WARN"), "{output}");
    }
}
