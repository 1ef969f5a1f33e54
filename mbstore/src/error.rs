//! Gestion des erreurs pour le client du backend de stockage

use thiserror::Error;

/// Type Result personnalisé pour mbstore
pub type Result<T> = std::result::Result<T, StoreError>;

/// Erreurs possibles lors de l'utilisation du client de stockage
#[derive(Error, Debug)]
pub enum StoreError {
    /// Erreur d'authentification (clé API ou credentials invalides)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Ressource non trouvée (ligne, objet, bucket, etc.)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erreur HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Erreur d'entrée/sortie (fichier d'état de session)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Erreur de configuration (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Erreur de configuration du store (URL, clés, etc.)
    #[error("Store configuration error: {0}")]
    Configuration(String),

    /// Erreur renvoyée par l'API du backend
    #[error("Store API error (code {code}): {message}")]
    ApiError { code: u16, message: String },

    /// Quota dépassé (rate limiting)
    #[error("Rate limit exceeded, please try again later")]
    RateLimitExceeded,

    /// Erreur générique
    #[error("Store error: {0}")]
    Other(String),
}

impl StoreError {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            401 | 403 => Self::Unauthorized(message.into()),
            404 => Self::NotFound(message.into()),
            429 => Self::RateLimitExceeded,
            _ => Self::ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Vérifie si l'erreur est une erreur de credentials (401/403)
    /// ou de clé API invalide (400 avec un message explicite)
    pub fn is_auth_error(&self) -> bool {
        match self {
            StoreError::Unauthorized(_) => true,
            StoreError::ApiError { code: 400, message }
                if message.contains("API key") || message.contains("JWT") => true,
            _ => false,
        }
    }

    /// Vérifie si l'erreur est une erreur de rate limiting
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, StoreError::RateLimitExceeded)
    }
}
