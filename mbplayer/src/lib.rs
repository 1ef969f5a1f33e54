//! # mbplayer - Contrôleur de playlist ambiante de MemoBook
//!
//! Cette crate pilote la musique de fond du site : récupération du
//! catalogue, mélange, lecture du premier morceau, fondu de fin, morceau
//! suivant tiré au hasard. Le contrôleur tourne côté serveur ; le navigateur
//! n'est qu'un pont audio qui exécute les commandes reçues en SSE et
//! rapporte les événements de son élément `<audio>`.
//!
//! # Architecture
//!
//! ```text
//! PlaylistController ── start()/toggle_play()/next()/set_volume()/...
//!   ├── CatalogProvider ── catalogue + sources candidates par morceau
//!   ├── EngineAdapter ── un moteur par morceau, bascule de source à l'échec
//!   │     └── EngineBackend ── WebBackend : commandes SSE ↔ événements POST
//!   ├── rampe de fondu ── volume moteur vers zéro, consigne intacte
//!   └── événements ── TrackChanged, StateChanged, Notice, ... (broadcast)
//! ```
//!
//! Toutes les opérations absorbent les échecs du backend : un fond sonore
//! préfère le silence à une page d'erreur.

mod config_ext;
mod controller;
mod effects;
mod engine;
mod error;
mod events;
mod options;
mod provider;
mod session;

#[cfg(feature = "mbserver")]
pub mod api;
#[cfg(feature = "mbserver")]
pub mod openapi;
#[cfg(feature = "mbserver")]
pub mod sse;

// Réexports publics
pub use config_ext::PlayerConfigExt;
pub use controller::{PlayerState, PlaylistController};
pub use effects::VisualEffect;
pub use engine::{
    AdapterSignal, BackendEvent, EngineAdapter, EngineBackend, EngineCommand, EngineId,
    EngineState, WebBackend,
};
pub use error::{PlayerError, Result};
pub use events::{ControllerEvent, NoticeLevel};
pub use options::{CrossfadeOptions, PlayerOptions};
pub use provider::CatalogProvider;
pub use session::PlaybackSession;
