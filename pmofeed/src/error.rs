//! Erreurs de génération du flux

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FeedError>;

#[derive(Error, Debug)]
pub enum FeedError {
    /// Erreur de sérialisation XML
    #[error("RSS serialization error: {0}")]
    Serialize(#[from] quick_xml::se::SeError),
}
