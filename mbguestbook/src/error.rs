//! Erreurs du livre d'or

use thiserror::Error;

/// Erreurs pouvant survenir dans la gestion du livre d'or
#[derive(Error, Debug)]
pub enum GuestbookError {
    /// Erreur du backend de stockage
    #[error("Store error: {0}")]
    Store(#[from] mbstore::StoreError),

    /// Entrée invalide, champs obligatoires absents
    #[error("Missing required fields")]
    MissingFields,

    /// Entrée introuvable
    #[error("Entry not found: {0}")]
    EntryNotFound(i64),

    /// Erreur de configuration
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

/// Alias de Result pour le livre d'or
pub type Result<T> = std::result::Result<T, GuestbookError>;
