//! Client principal pour interagir avec le backend de stockage
//!
//! Ce module fournit un client haut-niveau construit explicitement depuis la
//! configuration et passé aux services qui en ont besoin. Il connaît les noms
//! des tables et du bucket audio, et délègue les requêtes à [`StoreApi`].

use crate::api::auth::AuthInfo;
use crate::api::StoreApi;
use crate::config_ext::StoreConfigExt;
use crate::error::Result;
use mbconfig::Config;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

/// Client haut-niveau du backend de stockage
pub struct StoreClient {
    /// API bas-niveau
    api: StoreApi,
    /// Table des métadonnées de morceaux
    tracks_table: String,
    /// Table des entrées du livre d'or
    guestbook_table: String,
    /// Table des comptes administrateurs
    admins_table: String,
    /// Bucket des fichiers audio
    songs_bucket: String,
}

impl StoreClient {
    /// Crée un client avec les noms de tables par défaut
    ///
    /// # Arguments
    ///
    /// * `base_url` - URL de base du backend
    /// * `anon_key` - Clé publique
    /// * `service_key` - Clé de service privilégiée (optionnelle)
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        service_key: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            api: StoreApi::new(base_url, anon_key, service_key)?,
            tracks_table: "music_meta".to_string(),
            guestbook_table: "guestbook_entries".to_string(),
            admins_table: "admin_users".to_string(),
            songs_bucket: "songs".to_string(),
        })
    }

    /// Crée un client depuis un objet de configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.get_store_url()?;
        let anon_key = config.get_store_anon_key()?;
        let service_key = config.get_store_service_key()?;

        info!(base_url = %base_url, "Creating store client");

        Ok(Self {
            api: StoreApi::new(base_url, anon_key, service_key)?,
            tracks_table: config.get_tracks_table(),
            guestbook_table: config.get_guestbook_table(),
            admins_table: config.get_admins_table(),
            songs_bucket: config.get_songs_bucket(),
        })
    }

    /// Accès à l'API bas-niveau
    pub fn api(&self) -> &StoreApi {
        &self.api
    }

    /// Nom de la table des morceaux
    pub fn tracks_table(&self) -> &str {
        &self.tracks_table
    }

    /// Nom de la table du livre d'or
    pub fn guestbook_table(&self) -> &str {
        &self.guestbook_table
    }

    /// Nom du bucket audio
    pub fn songs_bucket(&self) -> &str {
        &self.songs_bucket
    }

    // ============ Tables ============

    /// Récupère toutes les lignes d'une table
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        order_desc_by: Option<&str>,
    ) -> Result<Vec<T>> {
        self.api.select_all(table, order_desc_by).await
    }

    /// Insère une ligne et retourne la représentation créée
    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        row: &T,
    ) -> Result<Vec<R>> {
        self.api.insert(table, row).await
    }

    /// Supprime les lignes dont `id` vaut la valeur donnée
    pub async fn delete_by_id(&self, table: &str, id: &str) -> Result<()> {
        self.api.delete_rows(table, "id", id).await
    }

    // ============ Stockage ============

    /// URL publique d'un objet du bucket audio
    pub fn song_public_url(&self, path: &str) -> Option<String> {
        self.api.storage_public_url(&self.songs_bucket, path)
    }

    /// Téléverse un fichier audio
    pub async fn upload_song(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.api
            .storage_upload(&self.songs_bucket, path, bytes, content_type)
            .await
    }

    /// Télécharge un fichier audio via l'endpoint authentifié
    pub async fn download_song(&self, path: &str) -> Result<Vec<u8>> {
        self.api.storage_download(&self.songs_bucket, path).await
    }

    /// Supprime un fichier audio du bucket
    pub async fn remove_song(&self, path: &str) -> Result<()> {
        self.api.storage_remove(&self.songs_bucket, &[path]).await
    }

    /// Télécharge le contenu d'une URL publique
    pub async fn fetch_public(&self, url: &str) -> Result<Vec<u8>> {
        self.api.fetch_public(url).await
    }

    // ============ Authentification ============

    /// Authentifie un utilisateur par email et mot de passe
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthInfo> {
        self.api.sign_in(email, password).await
    }

    /// Révoque un token d'accès
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        self.api.sign_out(access_token).await
    }

    /// Vérifie qu'un email correspond à un compte administrateur
    pub async fn is_admin_user(&self, email: &str) -> Result<bool> {
        let rows: Vec<serde_json::Value> = self
            .api
            .select_eq(&self.admins_table, "email", email)
            .await?;
        Ok(!rows.is_empty())
    }
}
