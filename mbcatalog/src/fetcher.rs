//! Récupération du catalogue avec chemin de repli
//!
//! Le catalogue est cherché d'abord sur l'endpoint d'agrégation configuré,
//! puis directement dans la table des métadonnées. Un double échec produit un
//! catalogue vide, jamais une erreur : la lecture ambiante ne doit pas voir
//! les pannes du backend.

use std::sync::Arc;
use std::time::Duration;

use mbconfig::Config;
use mbstore::StoreClient;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config_ext::CatalogConfigExt;
use crate::error::Result;
use crate::track::Track;

/// Timeout des appels à l'endpoint d'agrégation
const ENDPOINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Enveloppe `{ "data": [...] }` retournée par l'endpoint d'agrégation
#[derive(Debug, Deserialize)]
struct TracksEnvelope {
    #[serde(default)]
    data: Vec<Track>,
}

/// Récupère le catalogue musical
pub struct CatalogFetcher {
    /// Client HTTP dédié à l'endpoint d'agrégation
    http: reqwest::Client,
    /// URL complète de l'endpoint d'agrégation, si configuré
    endpoint: Option<String>,
    /// Accès direct à la table des métadonnées
    store: Arc<StoreClient>,
}

impl CatalogFetcher {
    /// Crée un fetcher
    ///
    /// `endpoint` est l'URL complète de l'endpoint d'agrégation, ou None pour
    /// interroger uniquement la table.
    pub fn new(store: Arc<StoreClient>, endpoint: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(ENDPOINT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint,
            store,
        })
    }

    /// Crée un fetcher depuis un objet de configuration
    pub fn from_config(config: &Config, store: Arc<StoreClient>) -> Result<Self> {
        Self::new(store, config.get_catalog_endpoint())
    }

    /// Récupère le catalogue, sans jamais échouer
    ///
    /// L'endpoint d'agrégation n'est accepté que s'il retourne une liste non
    /// vide ; sinon la table est interrogée, triée par date de création
    /// décroissante. Aucun retry au-delà de ce repli : la relance périodique
    /// du contrôleur est le seul mécanisme de récupération.
    pub async fn fetch(&self) -> Vec<Track> {
        if let Some(endpoint) = &self.endpoint {
            match self.fetch_endpoint(endpoint).await {
                Ok(tracks) if !tracks.is_empty() => {
                    debug!("Catalog fetched from endpoint ({} tracks)", tracks.len());
                    return tracks;
                }
                Ok(_) => debug!("Catalog endpoint returned no tracks, falling back to table"),
                Err(e) => warn!("Catalog endpoint failed, falling back to table: {e}"),
            }
        }

        match self
            .store
            .select_all::<Track>(self.store.tracks_table(), Some("created_at"))
            .await
        {
            Ok(tracks) => {
                debug!("Catalog fetched from table ({} tracks)", tracks.len());
                tracks
            }
            Err(e) => {
                warn!("Catalog unavailable, playing nothing: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_endpoint(&self, endpoint: &str) -> Result<Vec<Track>> {
        let response = self.http.get(endpoint).send().await?.error_for_status()?;
        let envelope: TracksEnvelope = response.json().await?;
        Ok(envelope.data)
    }
}
