use std::fmt::Debug;

use tokio::sync::broadcast;

use crate::error::Result;

use super::{BackendEvent, EngineId};

/// Backend audio partagé par tous les moteurs.
///
/// Chaque commande est adressée à une instance de moteur par son
/// [`EngineId`] ; le backend est libre d'ignorer les identifiants qu'il ne
/// connaît plus. Les événements repartent par un canal de diffusion unique,
/// chaque événement portant l'identifiant du moteur concerné.
#[async_trait::async_trait]
pub trait EngineBackend: Debug + Send + Sync {
    /// Charge une source audio dans le moteur `id`.
    async fn load(&self, id: EngineId, url: &str) -> Result<()>;

    /// Démarre ou reprend la lecture.
    async fn play(&self, id: EngineId) -> Result<()>;

    /// Suspend la lecture.
    async fn pause(&self, id: EngineId) -> Result<()>;

    /// Arrête le moteur et libère sa source.
    async fn stop(&self, id: EngineId) -> Result<()>;

    /// Règle le volume du moteur, entre 0.0 et 1.0.
    async fn set_volume(&self, id: EngineId, level: f32) -> Result<()>;

    /// Déplace la tête de lecture, en secondes depuis le début.
    async fn seek(&self, id: EngineId, seconds: f64) -> Result<()>;

    /// S'abonne au flux d'événements du backend.
    fn subscribe(&self) -> broadcast::Receiver<BackendEvent>;
}
