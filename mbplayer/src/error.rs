use thiserror::Error;

/// Erreurs du contrôleur de lecture et des moteurs audio.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// La commande n'a pas pu être transmise au moteur audio.
    #[error("Engine backend error: {0}")]
    Backend(String),

    /// Le moteur a épuisé toutes les sources du morceau courant.
    #[error("All audio sources failed for the current track")]
    SourcesExhausted,

    /// Erreur de configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
