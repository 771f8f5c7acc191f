//! Erreurs du cache audio

use std::sync::Arc;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AudioCacheError>;

/// Erreurs du cache audio
///
/// `Clone` : le résultat d'une extraction est partagé entre toutes les
/// requêtes qui l'attendent.
#[derive(Error, Debug, Clone)]
pub enum AudioCacheError {
    /// Identifiant refusé avant tout accès disque
    #[error("Invalid item id: {0:?}")]
    InvalidId(String),

    /// L'extracteur a échoué (code de sortie non nul, lancement impossible...)
    #[error("Audio extraction failed for {item_id}: {message}")]
    Extraction { item_id: String, message: String },

    #[error("Audio extraction for {item_id} timed out after {seconds}s")]
    Timeout { item_id: String, seconds: u64 },

    /// L'extracteur a terminé sans produire le fichier attendu
    #[error("Extractor produced no audio file for {0}")]
    MissingOutput(String),

    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for AudioCacheError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl AudioCacheError {
    pub fn extraction(item_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            item_id: item_id.into(),
            message: message.into(),
        }
    }
}
