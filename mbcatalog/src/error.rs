//! Erreurs du catalogue musical

use thiserror::Error;

/// Erreurs pouvant survenir dans la gestion du catalogue
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Erreur du backend de stockage
    #[error("Store error: {0}")]
    Store(#[from] mbstore::StoreError),

    /// Erreur HTTP lors d'un appel à l'endpoint d'agrégation
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de désérialisation JSON
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Métadonnées de morceau invalides
    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    /// Morceau introuvable
    #[error("Track not found: {0}")]
    TrackNotFound(i64),

    /// Fichier audio irrécupérable, toutes les sources ont échoué
    #[error("Failed to fetch audio file: {0}")]
    AudioUnavailable(String),

    /// Erreur de configuration
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

/// Alias de Result pour le catalogue
pub type Result<T> = std::result::Result<T, CatalogError>;
