//! Modèles du livre d'or

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Une entrée du livre d'or
///
/// Reflet direct d'une ligne de la table distante. L'email et le téléphone
/// sont saisis librement par le visiteur ; ils servent aux notifications et
/// à la vue de modération.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestbookEntry {
    /// Clé primaire côté backend
    pub id: i64,
    /// Nom affiché du visiteur
    pub name: String,
    /// Message laissé dans le livre d'or
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Date d'insertion côté backend
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Une entrée à insérer
///
/// L'id et la date de création sont attribués par le backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl NewEntry {
    /// Crée une entrée avec les champs obligatoires
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            email: None,
            phone: None,
        }
    }

    /// Les champs obligatoires sont-ils renseignés ?
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && !self.message.trim().is_empty()
    }
}
