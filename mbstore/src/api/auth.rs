//! Module d'authentification auprès du backend de stockage
//!
//! Seul le grant par mot de passe est utilisé ; les sessions longues
//! sont portées par le drapeau local de [`crate::AdminSession`].

use super::StoreApi;
use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Réponse de l'endpoint de login
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

/// Informations utilisateur retournées par l'API
#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Informations d'authentification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthInfo {
    /// Token d'accès
    pub access_token: String,
    /// ID utilisateur
    pub user_id: String,
    /// Email de l'utilisateur
    pub email: Option<String>,
}

impl StoreApi {
    /// Authentifie un utilisateur par email et mot de passe
    ///
    /// # Errors
    ///
    /// * `StoreError::Unauthorized` - Credentials invalides
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthInfo> {
        info!("Attempting store sign-in as {}", email);

        let url = self.url("/auth/v1/token");
        let body = serde_json::json!({ "email": email, "password": password });

        let request = self
            .client()
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", self.key(false))
            .json(&body);

        let response = request.send().await?;
        let status = response.status().as_u16();

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            // Le backend répond 400 pour un mauvais mot de passe
            return Err(match status {
                400 | 401 | 403 => StoreError::Unauthorized("Invalid login credentials".into()),
                _ => StoreError::from_status_code(status, text),
            });
        }

        let token: TokenResponse = response.json().await?;
        debug!("Sign-in successful - user id: {}", token.user.id);

        Ok(AuthInfo {
            access_token: token.access_token,
            user_id: token.user.id,
            email: token.user.email,
        })
    }

    /// Révoque un token d'accès (best-effort côté appelant)
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        debug!("Signing out from store");

        let url = self.url("/auth/v1/logout");
        let request = self
            .client()
            .post(&url)
            .header("apikey", self.key(false))
            .header("Authorization", format!("Bearer {}", access_token));

        let response = request.send().await?;
        self.check_response(response).await?;
        Ok(())
    }
}
