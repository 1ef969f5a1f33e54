//! Moteurs audio
//!
//! Un moteur est l'élément qui joue réellement un morceau. Le contrôleur ne
//! parle jamais au moteur directement : il passe par un [`EngineAdapter`],
//! créé pour un seul morceau, qui pilote un backend partagé via des commandes
//! et observe ses événements. Le backend fourni ici est [`WebBackend`], qui
//! relaie les commandes vers la page ouverte et reçoit en retour les
//! événements de l'élément audio du navigateur.

mod adapter;
mod backend;
mod web;

pub use adapter::{AdapterSignal, EngineAdapter};
pub use backend::EngineBackend;
pub use web::{EngineCommand, WebBackend};

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifiant d'une instance de moteur.
///
/// Chaque morceau chargé reçoit un identifiant frais ; les événements d'un
/// moteur relâché portent un identifiant périmé et sont ignorés.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EngineId(pub u64);

impl EngineId {
    /// Alloue l'identifiant suivant.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        EngineId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for EngineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// États d'un moteur audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Créé, aucune source chargée.
    Idle,
    /// Chargement d'une source en cours.
    Loading,
    /// Source chargée, prête à jouer.
    Ready,
    /// Lecture en cours.
    Playing,
    /// Lecture suspendue.
    Paused,
    /// Moteur arrêté, plus aucun événement observable.
    Stopped,
    /// Toutes les sources ont échoué. État terminal.
    LoadError,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Loading => "loading",
            EngineState::Ready => "ready",
            EngineState::Playing => "playing",
            EngineState::Paused => "paused",
            EngineState::Stopped => "stopped",
            EngineState::LoadError => "load_error",
        }
    }

    /// Un état terminal ne change plus.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineState::Stopped | EngineState::LoadError)
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Événements remontés par un backend audio.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// La source est chargée et la durée connue.
    Loaded { id: EngineId, duration_seconds: f64 },
    /// La lecture a effectivement démarré.
    Play { id: EngineId },
    /// La lecture est suspendue.
    Pause { id: EngineId },
    /// Le moteur est arrêté.
    Stop { id: EngineId },
    /// Le morceau est arrivé à son terme.
    Ended { id: EngineId },
    /// La source courante n'a pas pu être chargée.
    LoadError { id: EngineId, message: String },
}

impl BackendEvent {
    /// Identifiant du moteur concerné par l'événement.
    pub fn engine_id(&self) -> EngineId {
        match self {
            BackendEvent::Loaded { id, .. }
            | BackendEvent::Play { id }
            | BackendEvent::Pause { id }
            | BackendEvent::Stop { id }
            | BackendEvent::Ended { id }
            | BackendEvent::LoadError { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_ids_are_unique() {
        let a = EngineId::next();
        let b = EngineId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_terminal_states() {
        assert!(EngineState::Stopped.is_terminal());
        assert!(EngineState::LoadError.is_terminal());
        assert!(!EngineState::Playing.is_terminal());
        assert!(!EngineState::Loading.is_terminal());
    }

    #[test]
    fn test_event_engine_id() {
        let id = EngineId(42);
        let event = BackendEvent::LoadError {
            id,
            message: "network".to_string(),
        };
        assert_eq!(event.engine_id(), id);
    }
}
