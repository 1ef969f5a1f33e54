//! Track : métadonnées d'un morceau du catalogue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Un morceau du catalogue musical
///
/// Reflet direct d'une ligne de la table des métadonnées : `file_path` est la
/// clé relative de l'objet audio dans le bucket de stockage, pas un chemin
/// local. Le modèle est immuable une fois récupéré, la lecture travaille sur
/// un instantané du catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Clé primaire côté backend
    pub id: i64,
    /// Titre affiché
    pub title: String,
    /// Clé de l'objet audio dans le bucket
    pub file_path: String,
    /// Artiste (optionnel)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    /// Email ou identifiant du compte ayant ajouté le morceau
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// Date d'insertion côté backend
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Métadonnées d'un nouveau morceau à insérer
///
/// L'id et la date de création sont attribués par le backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrack {
    pub title: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl NewTrack {
    /// Crée un morceau à insérer avec les champs obligatoires
    pub fn new(title: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file_path: file_path.into(),
            artist: None,
            created_by: None,
        }
    }
}
