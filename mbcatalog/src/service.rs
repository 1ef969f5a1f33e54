//! Service du catalogue : listing en cache, ajout, suppression, audio
//!
//! Réunit le fetcher, le résolveur de sources et le client de stockage
//! derrière une même façade, partagée entre le serveur HTTP et le contrôleur
//! de lecture. Le listing passe par un cache TTL pour absorber les relances
//! fréquentes des pages ouvertes.

use std::sync::Arc;
use std::time::Duration;

use mbconfig::Config;
use mbstore::StoreClient;
use moka::future::Cache as MokaCache;
use tracing::{debug, info, warn};

use crate::config_ext::CatalogConfigExt;
use crate::error::{CatalogError, Result};
use crate::fetcher::CatalogFetcher;
use crate::resolver::{audio_content_type, SourceResolver};
use crate::track::{NewTrack, Track};

/// Clé unique du listing dans le cache
const LIST_KEY: &str = "catalog";

/// Résultat d'une suppression de morceau
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    /// Le morceau supprimé
    pub removed: Track,
    /// Avertissement si l'objet audio n'a pas pu être retiré du bucket
    pub storage_warning: Option<String>,
}

/// Service du catalogue musical
pub struct CatalogService {
    store: Arc<StoreClient>,
    fetcher: CatalogFetcher,
    resolver: SourceResolver,
    /// Cache du listing, invalidé à chaque écriture
    list_cache: MokaCache<&'static str, Arc<Vec<Track>>>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

impl CatalogService {
    /// Crée un service avec un TTL de cache explicite
    pub fn new(
        store: Arc<StoreClient>,
        fetcher: CatalogFetcher,
        resolver: SourceResolver,
        cache_ttl: Duration,
    ) -> Self {
        let list_cache = MokaCache::builder()
            .max_capacity(1)
            .time_to_live(cache_ttl)
            .build();
        Self {
            store,
            fetcher,
            resolver,
            list_cache,
        }
    }

    /// Crée un service depuis un objet de configuration
    pub fn from_config(config: &Config, store: Arc<StoreClient>) -> Result<Self> {
        let fetcher = CatalogFetcher::from_config(config, store.clone())?;
        let resolver = SourceResolver::from_config(config, store.clone());
        let ttl = Duration::from_secs(config.get_catalog_cache_ttl_secs());
        Ok(Self::new(store, fetcher, resolver, ttl))
    }

    /// Listing du catalogue, via le cache
    ///
    /// Ne retourne jamais d'erreur : un backend injoignable donne un listing
    /// vide, déjà journalisé par le fetcher.
    pub async fn list(&self) -> Arc<Vec<Track>> {
        if let Some(tracks) = self.list_cache.get(LIST_KEY).await {
            return tracks;
        }
        let tracks = Arc::new(self.fetcher.fetch().await);
        // Un listing vide n'est jamais mis en cache
        if !tracks.is_empty() {
            self.list_cache.insert(LIST_KEY, tracks.clone()).await;
        }
        tracks
    }

    /// Recherche un morceau par id, directement en table
    pub async fn find(&self, id: i64) -> Result<Option<Track>> {
        let rows: Vec<Track> = self
            .store
            .api()
            .select_eq(self.store.tracks_table(), "id", &id.to_string())
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Sources de lecture d'un morceau, du meilleur au moins bon
    pub fn resolve(&self, track: &Track) -> Vec<String> {
        self.resolver.resolve(track)
    }

    /// Insère les métadonnées d'un nouveau morceau
    ///
    /// Retourne la représentation créée par le backend (normalement une
    /// seule ligne) et invalide le listing en cache.
    pub async fn add_track(&self, new_track: NewTrack) -> Result<Vec<Track>> {
        if new_track.title.trim().is_empty() {
            return Err(CatalogError::InvalidTrack("title is required".to_string()));
        }
        if new_track.file_path.trim().is_empty() {
            return Err(CatalogError::InvalidTrack(
                "file_path is required".to_string(),
            ));
        }

        let created: Vec<Track> = self
            .store
            .insert(self.store.tracks_table(), &new_track)
            .await?;
        info!("Track added: '{}' ({})", new_track.title, new_track.file_path);
        self.list_cache.invalidate(LIST_KEY).await;
        Ok(created)
    }

    /// Supprime un morceau : l'objet du bucket d'abord, la ligne ensuite
    ///
    /// L'échec du retrait stockage est toléré et remonté en avertissement ;
    /// l'échec de la suppression de la ligne interrompt l'opération et
    /// l'état antérieur reste en place.
    pub async fn delete_track(&self, id: i64) -> Result<DeleteOutcome> {
        let track = self.find(id).await?.ok_or(CatalogError::TrackNotFound(id))?;

        let storage_warning = match self.store.remove_song(&track.file_path).await {
            Ok(()) => None,
            Err(e) => {
                warn!("Storage removal failed for '{}': {e}", track.file_path);
                Some(format!("Audio file could not be removed: {e}"))
            }
        };

        self.store
            .delete_by_id(self.store.tracks_table(), &id.to_string())
            .await?;
        info!("Track deleted: '{}' (id {})", track.title, id);
        self.list_cache.invalidate(LIST_KEY).await;

        Ok(DeleteOutcome {
            removed: track,
            storage_warning,
        })
    }

    /// Récupère les octets d'un fichier audio du bucket
    ///
    /// Deux chemins essayés dans l'ordre : l'URL publique de l'objet, puis le
    /// téléchargement authentifié. Retourne les octets et le Content-Type
    /// déduit de l'extension.
    pub async fn fetch_audio(&self, path: &str) -> Result<(Vec<u8>, &'static str)> {
        if path.trim().is_empty() {
            return Err(CatalogError::InvalidTrack(
                "file path is required".to_string(),
            ));
        }

        if let Some(url) = self.store.song_public_url(path) {
            match self.store.fetch_public(&url).await {
                Ok(bytes) => return Ok((bytes, audio_content_type(path))),
                Err(e) => {
                    debug!("Public fetch failed for '{path}', trying authenticated download: {e}")
                }
            }
        }

        match self.store.download_song(path).await {
            Ok(bytes) => Ok((bytes, audio_content_type(path))),
            Err(e) => {
                warn!("Audio unavailable for '{path}': {e}");
                Err(CatalogError::AudioUnavailable(path.to_string()))
            }
        }
    }
}
