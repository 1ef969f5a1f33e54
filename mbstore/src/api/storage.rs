//! Opérations sur le stockage d'objets du backend
//!
//! Les objets audio vivent dans un bucket ; les chemins relatifs
//! (`file_path` des morceaux) sont encodés segment par segment pour
//! construire les URLs d'objet.

use super::StoreApi;
use crate::error::{Result, StoreError};
use reqwest::Url;
use tracing::{debug, warn};

impl StoreApi {
    /// Construit l'URL d'un objet de stockage
    ///
    /// # Arguments
    ///
    /// * `public` - true pour l'URL publique (`/object/public/...`)
    /// * `bucket` - Nom du bucket
    /// * `path` - Chemin relatif de l'objet dans le bucket
    fn object_url(&self, public: bool, bucket: &str, path: &str) -> Result<Url> {
        let mut url = Url::parse(self.base_url())
            .map_err(|e| StoreError::Configuration(format!("Invalid store base URL: {}", e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StoreError::Configuration("Store base URL cannot be a base".into()))?;
            segments.extend(["storage", "v1", "object"]);
            if public {
                segments.push("public");
            }
            segments.push(bucket);
            // Encodage segment par segment : les '/' du chemin restent des séparateurs
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }

        Ok(url)
    }

    /// Retourne l'URL publique d'un objet, si elle peut être construite
    pub fn storage_public_url(&self, bucket: &str, path: &str) -> Option<String> {
        match self.object_url(true, bucket, path) {
            Ok(url) => Some(url.to_string()),
            Err(err) => {
                warn!(bucket, path, error = %err, "Cannot build public object URL");
                None
            }
        }
    }

    /// Téléverse un objet dans un bucket
    pub async fn storage_upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let url = self.object_url(false, bucket, path)?;
        debug!(bucket, path, size = bytes.len(), "Uploading object");

        let request = self
            .client()
            .post(url)
            .header("Content-Type", content_type)
            .body(bytes);

        let response = self.with_auth(request, true).send().await?;
        self.check_response(response).await?;
        Ok(())
    }

    /// Télécharge un objet via l'endpoint authentifié
    pub async fn storage_download(&self, bucket: &str, path: &str) -> Result<Vec<u8>> {
        let url = self.object_url(false, bucket, path)?;
        debug!(bucket, path, "Downloading object");

        let request = self.client().get(url);
        let response = self.with_auth(request, true).send().await?;
        let response = self.check_response(response).await?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Supprime des objets d'un bucket
    pub async fn storage_remove(&self, bucket: &str, paths: &[&str]) -> Result<()> {
        let url = self.url(&format!("/storage/v1/object/{}", bucket));
        debug!(bucket, count = paths.len(), "Removing objects");

        let body = serde_json::json!({ "prefixes": paths });
        let request = self.client().delete(&url).json(&body);

        let response = self.with_auth(request, true).send().await?;
        self.check_response(response).await?;
        Ok(())
    }

    /// Télécharge le contenu d'une URL arbitraire (typiquement une URL
    /// publique d'objet) et retourne les octets bruts
    pub async fn fetch_public(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "Fetching public URL");

        let response = self.client().get(url).send().await?;
        let response = self.check_response(response).await?;

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_shape() {
        let api = StoreApi::new("https://store.example", "anon", None).unwrap();
        let url = api.storage_public_url("songs", "ambient/track.mp3").unwrap();
        assert_eq!(
            url,
            "https://store.example/storage/v1/object/public/songs/ambient/track.mp3"
        );
    }

    #[test]
    fn test_public_url_encodes_segments() {
        let api = StoreApi::new("https://store.example", "anon", None).unwrap();
        let url = api.storage_public_url("songs", "my track.mp3").unwrap();
        assert_eq!(
            url,
            "https://store.example/storage/v1/object/public/songs/my%20track.mp3"
        );
    }
}
