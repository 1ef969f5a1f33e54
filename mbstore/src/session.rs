//! Session administrateur
//!
//! La session est un objet explicite construit au démarrage de
//! l'application, jamais un état global. Elle combine :
//! - un drapeau local durable (fichier JSON dans le répertoire d'état),
//!   consulté en premier ;
//! - une authentification distante par mot de passe, utilisée quand les
//!   credentials configurés localement ne correspondent pas.
//!
//! Un échec d'authentification ne crée aucune session partielle.

use crate::client::StoreClient;
use crate::config_ext::StoreConfigExt;
use crate::error::{Result, StoreError};
use mbconfig::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Contenu du fichier d'état durable
///
/// Seul le drapeau (et l'email associé) est persisté ; le token distant
/// reste en mémoire et meurt avec le processus.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFlag {
    is_admin: bool,
    #[serde(default)]
    email: Option<String>,
}

/// État courant de la session
#[derive(Debug, Default)]
struct SessionState {
    is_admin: bool,
    email: Option<String>,
    access_token: Option<String>,
}

/// Session administrateur explicite
pub struct AdminSession {
    client: Arc<StoreClient>,
    /// Credentials administrateur configurés localement
    local_email: Option<String>,
    local_password: Option<String>,
    /// Fichier d'état durable
    flag_path: PathBuf,
    state: Mutex<SessionState>,
}

impl AdminSession {
    /// Crée une session avec un chemin d'état explicite
    ///
    /// L'état durable est rechargé depuis le fichier s'il existe.
    pub fn new(
        client: Arc<StoreClient>,
        local_credentials: Option<(String, String)>,
        flag_path: PathBuf,
    ) -> Self {
        let flag = load_flag(&flag_path);
        if flag.is_admin {
            info!("Admin session flag restored from {}", flag_path.display());
        }

        let (local_email, local_password) = match local_credentials {
            Some((e, p)) => (Some(e), Some(p)),
            None => (None, None),
        };

        Self {
            client,
            local_email,
            local_password,
            flag_path,
            state: Mutex::new(SessionState {
                is_admin: flag.is_admin,
                email: flag.email,
                access_token: None,
            }),
        }
    }

    /// Crée une session depuis la configuration
    pub fn from_config(config: &Config, client: Arc<StoreClient>) -> Result<Self> {
        let state_dir = config.get_state_dir()?;
        let flag_path = Path::new(&state_dir).join("admin_session.json");
        let credentials = config.get_admin_credentials()?;

        Ok(Self::new(client, credentials, flag_path))
    }

    /// Authentifie l'administrateur
    ///
    /// Les credentials configurés localement court-circuitent tout appel
    /// réseau ; sinon le grant par mot de passe est tenté, suivi d'une
    /// vérification dans la table des administrateurs.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        // 1. Credentials locaux
        if let (Some(local_email), Some(local_password)) =
            (self.local_email.as_deref(), self.local_password.as_deref())
        {
            if local_email == email && local_password == password {
                debug!("Admin sign-in matched local credentials");
                self.grant(email.to_string(), None)?;
                return Ok(());
            }
        }

        // 2. Authentification distante
        let auth = self.client.sign_in(email, password).await?;

        let known_email = auth.email.as_deref().unwrap_or(email);
        if !self.client.is_admin_user(known_email).await? {
            // Révoquer le token obtenu : pas de session partielle
            if let Err(err) = self.client.sign_out(&auth.access_token).await {
                warn!(error = %err, "Failed to revoke token for non-admin account");
            }
            return Err(StoreError::Unauthorized(
                "Account is not an administrator".to_string(),
            ));
        }

        self.grant(known_email.to_string(), Some(auth.access_token))?;
        Ok(())
    }

    /// Termine la session
    ///
    /// Le drapeau local est effacé de façon durable ; la révocation du
    /// token distant est best-effort.
    pub async fn sign_out(&self) -> Result<()> {
        let token = {
            let mut state = self.state.lock().unwrap();
            let token = state.access_token.take();
            state.is_admin = false;
            state.email = None;
            token
        };

        self.persist()?;

        if let Some(token) = token {
            if let Err(err) = self.client.sign_out(&token).await {
                warn!(error = %err, "Remote sign-out failed");
            }
        }

        info!("Admin session closed");
        Ok(())
    }

    /// Indique si la session est administrateur
    ///
    /// Le drapeau local est consulté en premier ; à défaut, l'appartenance
    /// à la table des administrateurs est vérifiée à distance.
    pub async fn is_admin(&self) -> bool {
        let (flag, email) = {
            let state = self.state.lock().unwrap();
            (state.is_admin, state.email.clone())
        };

        if flag {
            return true;
        }

        match email {
            Some(email) => self.client.is_admin_user(&email).await.unwrap_or(false),
            None => false,
        }
    }

    /// Email de l'administrateur connecté, le cas échéant
    pub fn email(&self) -> Option<String> {
        self.state.lock().unwrap().email.clone()
    }

    fn grant(&self, email: String, access_token: Option<String>) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            state.is_admin = true;
            state.email = Some(email);
            state.access_token = access_token;
        }
        self.persist()?;
        info!("Admin session opened");
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let flag = {
            let state = self.state.lock().unwrap();
            SessionFlag {
                is_admin: state.is_admin,
                email: state.email.clone(),
            }
        };

        if let Some(parent) = self.flag_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.flag_path, serde_json::to_string_pretty(&flag)?)?;
        Ok(())
    }
}

fn load_flag(path: &Path) -> SessionFlag {
    match std::fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
        Err(_) => SessionFlag::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Arc<StoreClient> {
        // Aucune requête réseau n'est émise par les chemins locaux
        Arc::new(StoreClient::new("https://store.invalid", "anon", None).unwrap())
    }

    #[tokio::test]
    async fn test_local_credentials_short_circuit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin_session.json");
        let session = AdminSession::new(
            client(),
            Some(("admin@example.com".into(), "secret".into())),
            path,
        );

        assert!(!session.is_admin().await);
        session
            .sign_in("admin@example.com", "secret")
            .await
            .unwrap();
        assert!(session.is_admin().await);
    }

    #[tokio::test]
    async fn test_flag_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin_session.json");

        {
            let session = AdminSession::new(
                client(),
                Some(("admin@example.com".into(), "secret".into())),
                path.clone(),
            );
            session
                .sign_in("admin@example.com", "secret")
                .await
                .unwrap();
        }

        let restored = AdminSession::new(client(), None, path);
        assert!(restored.is_admin().await);
    }

    #[tokio::test]
    async fn test_sign_out_clears_flag_durably() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("admin_session.json");

        let session = AdminSession::new(
            client(),
            Some(("admin@example.com".into(), "secret".into())),
            path.clone(),
        );
        session
            .sign_in("admin@example.com", "secret")
            .await
            .unwrap();
        session.sign_out().await.unwrap();

        assert!(!session.is_admin().await);

        let restored = AdminSession::new(client(), None, path);
        assert!(!restored.is_admin().await);
    }
}
