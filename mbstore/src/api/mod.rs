//! Couche d'accès bas-niveau à l'API REST du backend de stockage
//!
//! Ce module parle directement aux trois surfaces HTTP du backend :
//! les tables (`/rest/v1/...`), le stockage d'objets (`/storage/v1/...`)
//! et l'authentification (`/auth/v1/...`).

pub mod auth;
pub mod storage;
pub mod tables;

use crate::error::{Result, StoreError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Client API bas-niveau pour le backend de stockage
#[derive(Debug)]
pub struct StoreApi {
    /// Client HTTP
    client: Client,
    /// URL de base du backend (sans slash final)
    base_url: String,
    /// Clé publique (anonyme)
    anon_key: String,
    /// Clé de service (optionnelle, privilégiée)
    service_key: Option<String>,
}

impl StoreApi {
    /// Crée une nouvelle instance de l'API
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_key: Option<String>,
    ) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(StoreError::Configuration(
                "Store base URL is not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            service_key: service_key.filter(|k| !k.is_empty()),
        })
    }

    /// Retourne l'URL de base du backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Indique si une clé de service est configurée
    pub fn has_service_key(&self) -> bool {
        self.service_key.is_some()
    }

    /// Retourne la clé à utiliser pour une requête
    ///
    /// En mode privilégié la clé de service est préférée si elle existe,
    /// sinon on retombe sur la clé anonyme.
    pub(crate) fn key(&self, privileged: bool) -> &str {
        if privileged {
            self.service_key.as_deref().unwrap_or(&self.anon_key)
        } else {
            &self.anon_key
        }
    }

    /// Accès au client HTTP sous-jacent
    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Construit une URL absolue à partir d'un chemin d'API
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ajoute les headers d'authentification standard à une requête
    pub(crate) fn with_auth(
        &self,
        request: reqwest::RequestBuilder,
        privileged: bool,
    ) -> reqwest::RequestBuilder {
        let key = self.key(privileged);
        request
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
    }

    /// Traite une réponse HTTP et désérialise le corps JSON
    pub(crate) async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let response = self.check_response(response).await?;
        let text = response.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse store response: {}", e);
            StoreError::JsonParse(e)
        })
    }

    /// Vérifie le statut d'une réponse, sans consommer le corps en cas de succès
    pub(crate) async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        let status_code = status.as_u16();

        debug!("Store response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = extract_message(&error_text);
            warn!("Store API error ({}): {}", status_code, message);
            return Err(StoreError::from_status_code(status_code, message));
        }

        Ok(response)
    }
}

/// Extrait un message d'erreur lisible d'un corps de réponse
///
/// Le backend renvoie ses erreurs en JSON avec des champs variables selon
/// la surface (`message`, `msg`, `error_description`, `error`). À défaut,
/// le texte brut est retourné tel quel.
fn extract_message(text: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(text) {
        for field in ["message", "msg", "error_description", "error"] {
            if let Some(m) = json.get(field).and_then(|m| m.as_str()) {
                return m.to_string();
            }
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_creation() {
        let api = StoreApi::new("https://store.example/", "anon", None).unwrap();
        assert_eq!(api.base_url(), "https://store.example");
        assert!(!api.has_service_key());
        assert_eq!(api.key(true), "anon");
    }

    #[test]
    fn test_api_creation_requires_base_url() {
        let err = StoreApi::new("", "anon", None).unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));
    }

    #[test]
    fn test_service_key_preferred_when_privileged() {
        let api =
            StoreApi::new("https://store.example", "anon", Some("service".to_string())).unwrap();
        assert_eq!(api.key(true), "service");
        assert_eq!(api.key(false), "anon");
    }

    #[test]
    fn test_empty_service_key_ignored() {
        let api = StoreApi::new("https://store.example", "anon", Some(String::new())).unwrap();
        assert!(!api.has_service_key());
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(extract_message(r#"{"message":"row not found"}"#), "row not found");
        assert_eq!(extract_message(r#"{"msg":"bad key"}"#), "bad key");
        assert_eq!(extract_message("plain text"), "plain text");
    }
}
