//! Flux SSE du lecteur
//!
//! Deux flux Server-Sent Events sortent de ce module :
//! - Les événements du contrôleur (morceau courant, état, fondu, effets),
//!   consommés par l'interface du lecteur ;
//! - Les commandes moteur, consommées par le pont audio de la page, qui les
//!   applique à son élément `<audio>` et rapporte les événements en retour.
//!
//! Routes:
//! - GET /api/player/events - Événements du contrôleur
//! - GET /api/player/commands - Commandes moteur pour la page
//!
//! ⚠️ Les payloads d'événements servent de signaux de rafraîchissement :
//! l'interface refetch l'instantané complet via GET /api/player/state, seule
//! source de vérité.

use async_stream::stream;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::api::PlayerApiState;
use crate::events::ControllerEvent;

/// Payload SSE pour un événement du contrôleur
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEventPayload {
    TrackChanged {
        index: usize,
        track_id: i64,
        title: String,
        artist: Option<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    StateChanged {
        is_playing: bool,
        volume: f32,
        position_seconds: f64,
        duration_seconds: f64,
        is_crossfading: bool,
        current_index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    PlaylistChanged {
        track_count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    CrossfadeStarted {
        from_index: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    EffectChanged {
        effect: Option<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
    Notice {
        level: String,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Handler SSE pour les événements du contrôleur
///
/// Route: GET /api/player/events
///
/// Diffuse en temps réel les changements de morceau, d'état de lecture, de
/// playlist et d'effet visuel.
#[utoipa::path(
    get,
    path = "/api/player/events",
    responses(
        (status = 200, description = "Flux SSE des événements du lecteur", content_type = "text/event-stream")
    ),
    tag = "player"
)]
pub async fn player_events_sse(State(state): State<PlayerApiState>) -> impl IntoResponse {
    let mut rx = state.controller.subscribe();

    let stream = stream! {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Player event stream lagged, {skipped} events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            let timestamp = chrono::Utc::now();

            let payload = match event {
                ControllerEvent::TrackChanged { index, track } => {
                    PlayerEventPayload::TrackChanged {
                        index,
                        track_id: track.id,
                        title: track.title,
                        artist: track.artist,
                        timestamp,
                    }
                }
                ControllerEvent::StateChanged { session } => {
                    PlayerEventPayload::StateChanged {
                        is_playing: session.is_playing,
                        volume: session.volume,
                        position_seconds: session.position_seconds,
                        duration_seconds: session.duration_seconds,
                        is_crossfading: session.is_crossfading,
                        current_index: session.current_index,
                        timestamp,
                    }
                }
                ControllerEvent::PlaylistChanged { track_count } => {
                    PlayerEventPayload::PlaylistChanged {
                        track_count,
                        timestamp,
                    }
                }
                ControllerEvent::CrossfadeStarted { from_index } => {
                    PlayerEventPayload::CrossfadeStarted {
                        from_index,
                        timestamp,
                    }
                }
                ControllerEvent::EffectChanged { effect } => {
                    PlayerEventPayload::EffectChanged {
                        effect: effect.map(|e| e.as_str().to_string()),
                        timestamp,
                    }
                }
                ControllerEvent::Notice { level, message } => {
                    PlayerEventPayload::Notice {
                        level: level.as_str().to_string(),
                        message,
                        timestamp,
                    }
                }
            };

            if let Ok(json) = serde_json::to_string(&payload) {
                yield Ok::<_, axum::Error>(Event::default().event("player").data(json));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handler SSE pour les commandes moteur
///
/// Route: GET /api/player/commands
///
/// Diffuse les commandes audio (load, play, pause, stop, volume, seek) vers
/// le pont de la page. Chaque commande porte l'identifiant du moteur visé ;
/// la page écarte celles d'un moteur déjà remplacé.
#[utoipa::path(
    get,
    path = "/api/player/commands",
    responses(
        (status = 200, description = "Flux SSE des commandes moteur", content_type = "text/event-stream")
    ),
    tag = "player"
)]
pub async fn engine_commands_sse(State(state): State<PlayerApiState>) -> impl IntoResponse {
    let mut rx = state.web.subscribe_commands();

    let stream = stream! {
        loop {
            match rx.recv().await {
                Ok(command) => {
                    if let Ok(json) = serde_json::to_string(&command) {
                        yield Ok::<_, axum::Error>(Event::default().event("engine").data(json));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Engine command stream lagged, {skipped} commands dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
