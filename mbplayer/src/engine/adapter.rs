use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{PlayerError, Result};

use super::{BackendEvent, EngineBackend, EngineId, EngineState};

/// Signal produit par l'adaptateur après traitement d'un événement backend.
///
/// `None` côté [`EngineAdapter::on_event`] signifie que l'événement était
/// périmé, postérieur à un arrêt, ou absorbé par la bascule de source.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterSignal {
    /// Une source est chargée, le morceau peut démarrer.
    Loaded { duration_seconds: f64 },
    /// La lecture a démarré.
    Play,
    /// La lecture est suspendue.
    Pause,
    /// Le moteur s'est arrêté.
    Stop,
    /// Fin naturelle du morceau.
    Ended,
    /// Toutes les sources ont échoué.
    Failed,
}

/// Adaptateur de moteur, créé pour un seul morceau.
///
/// L'adaptateur reçoit la liste ordonnée des sources candidates du morceau.
/// Il charge la première, et à chaque échec de chargement bascule lui-même
/// sur la suivante ; il ne remonte [`AdapterSignal::Failed`] qu'une fois la
/// liste épuisée. Après [`stop`](EngineAdapter::stop), plus aucun événement
/// n'est observable.
pub struct EngineAdapter {
    id: EngineId,
    backend: Arc<dyn EngineBackend>,
    sources: Vec<String>,
    source_index: usize,
    state: EngineState,
    duration_seconds: f64,
    volume: f32,
}

impl EngineAdapter {
    /// Crée un adaptateur avec un identifiant frais.
    pub fn new(backend: Arc<dyn EngineBackend>, sources: Vec<String>) -> Self {
        Self {
            id: EngineId::next(),
            backend,
            sources,
            source_index: 0,
            state: EngineState::Idle,
            duration_seconds: 0.0,
            volume: 1.0,
        }
    }

    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Durée rapportée au chargement, 0.0 tant qu'elle est inconnue.
    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    /// Dernier volume appliqué au moteur.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Source en cours d'essai ou de lecture.
    pub fn current_source(&self) -> Option<&str> {
        self.sources.get(self.source_index).map(String::as_str)
    }

    /// Position de la source courante dans la liste des candidates.
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Charge la première source.
    pub async fn load(&mut self) -> Result<()> {
        if self.sources.is_empty() {
            self.state = EngineState::LoadError;
            return Err(PlayerError::SourcesExhausted);
        }
        self.source_index = 0;
        self.state = EngineState::Loading;
        let url = self.sources[0].clone();
        self.backend.load(self.id, &url).await
    }

    /// Démarre ou reprend la lecture. Sans effet sur un moteur terminal.
    pub async fn play(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Ok(());
        }
        self.backend.play(self.id).await
    }

    /// Suspend la lecture. Sans effet sur un moteur terminal.
    pub async fn pause(&mut self) -> Result<()> {
        if self.state.is_terminal() {
            return Ok(());
        }
        self.backend.pause(self.id).await
    }

    /// Arrête le moteur. Les événements ultérieurs seront ignorés.
    pub async fn stop(&mut self) -> Result<()> {
        if self.state == EngineState::Stopped {
            return Ok(());
        }
        // L'état passe à Stopped avant l'envoi de la commande, pour que les
        // événements déjà en vol soient écartés.
        self.state = EngineState::Stopped;
        self.backend.stop(self.id).await
    }

    /// Règle le volume du moteur, borné entre 0.0 et 1.0.
    pub async fn set_volume(&mut self, level: f32) -> Result<()> {
        let level = level.clamp(0.0, 1.0);
        self.volume = level;
        if self.state.is_terminal() {
            return Ok(());
        }
        self.backend.set_volume(self.id, level).await
    }

    /// Déplace la tête de lecture. La cible est bornée entre 0 et la durée
    /// connue du morceau ; retourne la position réellement demandée.
    pub async fn seek(&mut self, seconds: f64) -> Result<f64> {
        let target = seconds.clamp(0.0, self.duration_seconds.max(0.0));
        if self.state.is_terminal() {
            return Ok(target);
        }
        self.backend.seek(self.id, target).await?;
        Ok(target)
    }

    /// Traite un événement du backend.
    ///
    /// Les événements d'un autre moteur, ou reçus après un arrêt ou un échec
    /// définitif, sont écartés sans effet.
    pub async fn on_event(&mut self, event: BackendEvent) -> Option<AdapterSignal> {
        if event.engine_id() != self.id {
            return None;
        }
        if self.state.is_terminal() {
            return None;
        }

        match event {
            BackendEvent::Loaded {
                duration_seconds, ..
            } => {
                self.duration_seconds = duration_seconds.max(0.0);
                self.state = EngineState::Ready;
                Some(AdapterSignal::Loaded {
                    duration_seconds: self.duration_seconds,
                })
            }
            BackendEvent::Play { .. } => {
                self.state = EngineState::Playing;
                Some(AdapterSignal::Play)
            }
            BackendEvent::Pause { .. } => {
                self.state = EngineState::Paused;
                Some(AdapterSignal::Pause)
            }
            BackendEvent::Stop { .. } => {
                self.state = EngineState::Stopped;
                Some(AdapterSignal::Stop)
            }
            BackendEvent::Ended { .. } => Some(AdapterSignal::Ended),
            BackendEvent::LoadError { message, .. } => self.advance_source(&message).await,
        }
    }

    /// Bascule sur la source suivante après un échec de chargement.
    async fn advance_source(&mut self, message: &str) -> Option<AdapterSignal> {
        while self.source_index + 1 < self.sources.len() {
            self.source_index += 1;
            let url = self.sources[self.source_index].clone();
            debug!(
                "Engine {}: source failed ({message}), trying fallback {url}",
                self.id
            );
            self.state = EngineState::Loading;
            match self.backend.load(self.id, &url).await {
                Ok(()) => return None,
                Err(e) => warn!("Engine {}: could not submit source {url}: {e}", self.id),
            }
        }

        warn!(
            "Engine {}: all {} sources failed ({message})",
            self.id,
            self.sources.len()
        );
        self.state = EngineState::LoadError;
        Some(AdapterSignal::Failed)
    }
}

impl std::fmt::Debug for EngineAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineAdapter")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("source_index", &self.source_index)
            .field("sources", &self.sources.len())
            .finish()
    }
}
