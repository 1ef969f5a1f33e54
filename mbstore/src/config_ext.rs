//! Extension pour intégrer la configuration du backend de stockage
//!
//! Ce module fournit le trait `StoreConfigExt` qui étend `mbconfig::Config`
//! avec les accesseurs propres au backend : URL, clés d'API, noms de tables
//! et de bucket, credentials administrateur.

use anyhow::{anyhow, Result};
use mbconfig::Config;
use serde_yaml::Value;

/// Trait d'extension pour la configuration du backend de stockage
pub trait StoreConfigExt {
    /// Récupère l'URL de base du backend
    ///
    /// # Errors
    ///
    /// Retourne une erreur si l'URL n'est pas configurée
    fn get_store_url(&self) -> Result<String>;

    /// Définit l'URL de base du backend
    fn set_store_url(&self, url: &str) -> Result<()>;

    /// Récupère la clé anonyme
    fn get_store_anon_key(&self) -> Result<String>;

    /// Définit la clé anonyme
    fn set_store_anon_key(&self, key: &str) -> Result<()>;

    /// Récupère la clé de service, ou None si non configurée
    fn get_store_service_key(&self) -> Result<Option<String>>;

    /// Définit la clé de service
    fn set_store_service_key(&self, key: &str) -> Result<()>;

    /// Nom de la table des métadonnées de morceaux
    fn get_tracks_table(&self) -> String;

    /// Nom de la table des entrées du livre d'or
    fn get_guestbook_table(&self) -> String;

    /// Nom de la table des comptes administrateurs
    fn get_admins_table(&self) -> String;

    /// Nom du bucket des fichiers audio
    fn get_songs_bucket(&self) -> String;

    /// Credentials administrateur configurés localement
    ///
    /// Retourne None si l'email ou le mot de passe est absent ou vide.
    fn get_admin_credentials(&self) -> Result<Option<(String, String)>>;

    /// Répertoire d'état de l'application (créé s'il n'existe pas)
    fn get_state_dir(&self) -> Result<String>;
}

/// Lit une chaîne avec valeur par défaut
fn string_or(config: &Config, path: &[&str], default: &str) -> String {
    match config.get_value(path) {
        Ok(Value::String(s)) if !s.is_empty() => s,
        _ => default.to_string(),
    }
}

impl StoreConfigExt for Config {
    fn get_store_url(&self) -> Result<String> {
        match self.get_value(&["store", "url"])? {
            Value::String(s) if !s.is_empty() => Ok(s),
            _ => Err(anyhow!("Store URL not configured")),
        }
    }

    fn set_store_url(&self, url: &str) -> Result<()> {
        self.set_value(&["store", "url"], Value::String(url.to_string()))
    }

    fn get_store_anon_key(&self) -> Result<String> {
        match self.get_value(&["store", "anon_key"])? {
            Value::String(s) if !s.is_empty() => Ok(s),
            _ => Err(anyhow!("Store anon key not configured")),
        }
    }

    fn set_store_anon_key(&self, key: &str) -> Result<()> {
        self.set_value(&["store", "anon_key"], Value::String(key.to_string()))
    }

    fn get_store_service_key(&self) -> Result<Option<String>> {
        match self.get_value(&["store", "service_key"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(Some(s)),
            Ok(_) => Ok(None),  // Empty string or wrong type
            Err(_) => Ok(None), // Not configured
        }
    }

    fn set_store_service_key(&self, key: &str) -> Result<()> {
        self.set_value(&["store", "service_key"], Value::String(key.to_string()))
    }

    fn get_tracks_table(&self) -> String {
        string_or(self, &["store", "tables", "tracks"], "music_meta")
    }

    fn get_guestbook_table(&self) -> String {
        string_or(self, &["store", "tables", "guestbook"], "guestbook_entries")
    }

    fn get_admins_table(&self) -> String {
        string_or(self, &["store", "tables", "admins"], "admin_users")
    }

    fn get_songs_bucket(&self) -> String {
        string_or(self, &["store", "buckets", "songs"], "songs")
    }

    fn get_admin_credentials(&self) -> Result<Option<(String, String)>> {
        let email = match self.get_value(&["admin", "email"]) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => return Ok(None),
        };
        let password = match self.get_value(&["admin", "password"]) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => return Ok(None),
        };
        Ok(Some((email, password)))
    }

    fn get_state_dir(&self) -> Result<String> {
        self.get_managed_dir(&["host", "state", "directory"], "state")
    }
}
