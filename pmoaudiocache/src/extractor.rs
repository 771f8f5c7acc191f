//! Extraction audio via un outil externe
//!
//! Le trait [`AudioExtractor`] isole le cache de l'outil réellement utilisé ;
//! [`YtDlpExtractor`] lance `yt-dlp` en sous-processus.

use crate::error::{AudioCacheError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Programme utilisé par défaut
pub const DEFAULT_YTDLP_PROGRAM: &str = "yt-dlp";

/// Durée maximale par défaut d'une extraction
pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(600);

/// Nombre de lignes de stderr conservées dans les messages d'erreur
const STDERR_TAIL_LINES: usize = 5;

/// Capacité d'extraction de la piste audio d'une vidéo
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Extrait l'audio de `item_id` dans `output_dir`
    ///
    /// Le répertoire est dédié à cet appel. Retourne le chemin du fichier
    /// MP3 produit, que l'appelant déplacera ensuite dans le cache.
    async fn extract(&self, item_id: &str, output_dir: &Path) -> Result<PathBuf>;
}

/// Extracteur basé sur `yt-dlp`
///
/// Commande lancée :
/// `yt-dlp -f bestaudio --extract-audio --audio-format mp3 -o {dir}/{id}.%(ext)s {url}`
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    program: PathBuf,
    timeout: Duration,
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_YTDLP_PROGRAM, DEFAULT_EXTRACTION_TIMEOUT)
    }
}

impl YtDlpExtractor {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, item_id: &str, output_dir: &Path) -> Command {
        let template = output_dir.join(format!("{}.%(ext)s", item_id));

        let mut command = Command::new(&self.program);
        command
            .arg("-f")
            .arg("bestaudio")
            .arg("--extract-audio")
            .arg("--audio-format")
            .arg("mp3")
            .arg("-o")
            .arg(template)
            .arg(pmoyoutube::watch_url(item_id))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl AudioExtractor for YtDlpExtractor {
    async fn extract(&self, item_id: &str, output_dir: &Path) -> Result<PathBuf> {
        info!("Downloading audio for video {} with {:?}", item_id, self.program);

        let child = self.command(item_id, output_dir).spawn().map_err(|e| {
            AudioCacheError::extraction(
                item_id,
                format!("failed to launch {}: {}", self.program.display(), e),
            )
        })?;

        // Le processus est tué si le délai expire (kill_on_drop)
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| AudioCacheError::Timeout {
                item_id: item_id.to_string(),
                seconds: self.timeout.as_secs(),
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AudioCacheError::extraction(
                item_id,
                format!("{} ({})", output.status, stderr_tail(&stderr)),
            ));
        }

        let produced = output_dir.join(format!("{}.mp3", item_id));
        if !tokio::fs::try_exists(&produced).await? {
            return Err(AudioCacheError::MissingOutput(item_id.to_string()));
        }

        debug!("Extracted audio for {} into {:?}", item_id, produced);
        Ok(produced)
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}
