//! Gestion des erreurs pour le client YouTube

use thiserror::Error;

/// Type Result personnalisé pour pmoyoutube
pub type Result<T> = std::result::Result<T, Error>;

/// Erreurs possibles lors de la récupération d'une playlist
///
/// Toutes les variantes signifient « pas de données fiables » : aucune liste
/// partielle n'est jamais renvoyée avec une erreur.
#[derive(Error, Debug)]
pub enum Error {
    /// Erreur HTTP (connexion, timeout, lecture du corps)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// L'API a répondu avec un statut d'erreur
    #[error("YouTube API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Erreur générique
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
