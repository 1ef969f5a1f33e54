//! API REST du lecteur
//!
//! Expose le contrôleur de playlist à la page : état courant, commandes de
//! transport, et le point d'entrée par lequel le pont audio rapporte les
//! événements de son élément `<audio>`. Les flux SSE associés sont montés
//! par le même routeur, voir [`crate::sse`].

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::controller::{PlayerState, PlaylistController};
use crate::engine::{BackendEvent, EngineId, WebBackend};

/// État partagé des handlers du lecteur.
#[derive(Clone)]
pub struct PlayerApiState {
    pub controller: Arc<PlaylistController>,
    pub web: Arc<WebBackend>,
}

/// Crée le routeur du lecteur.
pub fn player_api_router(controller: Arc<PlaylistController>, web: Arc<WebBackend>) -> Router {
    Router::new()
        .route("/api/player/state", get(player_state))
        .route("/api/player/play", post(play))
        .route("/api/player/pause", post(pause))
        .route("/api/player/toggle", post(toggle_play))
        .route("/api/player/next", post(next_track))
        .route("/api/player/previous", post(previous_track))
        .route("/api/player/shuffle", post(shuffle_playlist))
        .route("/api/player/volume", post(set_volume))
        .route("/api/player/seek", post(seek))
        .route("/api/player/interaction", post(notify_interaction))
        .route("/api/player/engine-events", post(report_engine_event))
        .route("/api/player/events", get(crate::sse::player_events_sse))
        .route("/api/player/commands", get(crate::sse::engine_commands_sse))
        .with_state(PlayerApiState { controller, web })
}

// ============================================================================
// DTOs
// ============================================================================

/// Morceau courant, vue réduite pour l'interface.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentTrackResponse {
    pub id: i64,
    pub title: String,
    pub artist: Option<String>,
}

/// Instantané complet de l'état du lecteur.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerStateResponse {
    pub is_playing: bool,
    pub volume: f32,
    pub position_seconds: f64,
    pub duration_seconds: f64,
    pub is_crossfading: bool,
    pub current_index: usize,
    pub track_count: usize,
    pub current_track: Option<CurrentTrackResponse>,
    pub effect: Option<String>,
    /// L'interface doit se replier après un délai d'inactivité.
    pub auto_hide: bool,
}

/// Requête de réglage du volume de session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VolumeRequest {
    /// Niveau demandé, borné côté serveur entre 0.0 et 1.0.
    #[schema(example = 0.5)]
    pub level: f32,
}

/// Requête de déplacement de la tête de lecture.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SeekRequest {
    #[schema(example = 42.0)]
    pub seconds: f64,
}

/// Événement audio rapporté par le pont de la page.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EngineEventRequest {
    /// Moteur concerné, tel que reçu dans la commande `load`.
    pub engine_id: u64,
    /// Nom de l'événement : loaded, play, pause, stop, ended, error.
    #[schema(example = "loaded")]
    pub event: String,
    /// Durée du morceau, pour `loaded`.
    pub duration_seconds: Option<f64>,
    /// Détail de l'échec, pour `error`.
    pub message: Option<String>,
}

/// Acquittement générique des commandes.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
}

/// Réponse d'erreur REST générique.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<PlayerState> for PlayerStateResponse {
    fn from(state: PlayerState) -> Self {
        Self {
            is_playing: state.session.is_playing,
            volume: state.session.volume,
            position_seconds: state.session.position_seconds,
            duration_seconds: state.session.duration_seconds,
            is_crossfading: state.session.is_crossfading,
            current_index: state.session.current_index,
            track_count: state.track_count,
            current_track: state.current_track.map(|track| CurrentTrackResponse {
                id: track.id,
                title: track.title,
                artist: track.artist,
            }),
            effect: state.effect.map(|e| e.as_str().to_string()),
            auto_hide: false,
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

#[utoipa::path(
    get,
    path = "/api/player/state",
    tag = "player",
    responses(
        (status = 200, description = "État courant du lecteur", body = PlayerStateResponse)
    )
)]
pub async fn player_state(State(state): State<PlayerApiState>) -> Response {
    let snapshot = state.controller.get_state().await;
    let mut payload = PlayerStateResponse::from(snapshot);
    payload.auto_hide = state.controller.options().auto_hide;
    (StatusCode::OK, Json(payload)).into_response()
}

#[utoipa::path(
    post,
    path = "/api/player/play",
    tag = "player",
    responses(
        (status = 200, description = "Commande de lecture transmise", body = StatusResponse)
    )
)]
pub async fn play(State(state): State<PlayerApiState>) -> Response {
    state.controller.play().await;
    ok_response()
}

#[utoipa::path(
    post,
    path = "/api/player/pause",
    tag = "player",
    responses(
        (status = 200, description = "Commande de pause transmise", body = StatusResponse)
    )
)]
pub async fn pause(State(state): State<PlayerApiState>) -> Response {
    state.controller.pause().await;
    ok_response()
}

#[utoipa::path(
    post,
    path = "/api/player/toggle",
    tag = "player",
    responses(
        (status = 200, description = "Bascule lecture/pause transmise", body = StatusResponse)
    )
)]
pub async fn toggle_play(State(state): State<PlayerApiState>) -> Response {
    state.controller.toggle_play().await;
    ok_response()
}

#[utoipa::path(
    post,
    path = "/api/player/next",
    tag = "player",
    responses(
        (status = 200, description = "Passage au morceau suivant", body = StatusResponse)
    )
)]
pub async fn next_track(State(state): State<PlayerApiState>) -> Response {
    state.controller.next().await;
    ok_response()
}

#[utoipa::path(
    post,
    path = "/api/player/previous",
    tag = "player",
    responses(
        (status = 200, description = "Nouveau tirage de morceau", body = StatusResponse)
    )
)]
pub async fn previous_track(State(state): State<PlayerApiState>) -> Response {
    state.controller.previous().await;
    ok_response()
}

#[utoipa::path(
    post,
    path = "/api/player/shuffle",
    tag = "player",
    responses(
        (status = 200, description = "Suite de la playlist re-mélangée", body = StatusResponse)
    )
)]
pub async fn shuffle_playlist(State(state): State<PlayerApiState>) -> Response {
    state.controller.shuffle_remaining().await;
    ok_response()
}

#[utoipa::path(
    post,
    path = "/api/player/volume",
    tag = "player",
    request_body = VolumeRequest,
    responses(
        (status = 200, description = "Volume de session réglé", body = StatusResponse),
        (status = 400, description = "Niveau invalide", body = ErrorResponse)
    )
)]
pub async fn set_volume(
    State(state): State<PlayerApiState>,
    Json(req): Json<VolumeRequest>,
) -> Response {
    if !req.level.is_finite() {
        return map_status(
            StatusCode::BAD_REQUEST,
            "INVALID_LEVEL",
            "Volume level must be a finite number",
        );
    }
    state.controller.set_volume(req.level).await;
    ok_response()
}

#[utoipa::path(
    post,
    path = "/api/player/seek",
    tag = "player",
    request_body = SeekRequest,
    responses(
        (status = 200, description = "Tête de lecture déplacée", body = StatusResponse),
        (status = 400, description = "Position invalide", body = ErrorResponse)
    )
)]
pub async fn seek(State(state): State<PlayerApiState>, Json(req): Json<SeekRequest>) -> Response {
    if !req.seconds.is_finite() {
        return map_status(
            StatusCode::BAD_REQUEST,
            "INVALID_POSITION",
            "Seek position must be a finite number",
        );
    }
    state.controller.seek(req.seconds).await;
    ok_response()
}

#[utoipa::path(
    post,
    path = "/api/player/interaction",
    tag = "player",
    responses(
        (status = 200, description = "Premier geste utilisateur enregistré", body = StatusResponse)
    )
)]
pub async fn notify_interaction(State(state): State<PlayerApiState>) -> Response {
    state.controller.notify_interaction().await;
    ok_response()
}

#[utoipa::path(
    post,
    path = "/api/player/engine-events",
    tag = "player",
    request_body = EngineEventRequest,
    responses(
        (status = 200, description = "Événement moteur injecté", body = StatusResponse),
        (status = 400, description = "Événement inconnu", body = ErrorResponse)
    )
)]
pub async fn report_engine_event(
    State(state): State<PlayerApiState>,
    Json(req): Json<EngineEventRequest>,
) -> Response {
    let Some(event) = parse_engine_event(&req) else {
        return map_status(
            StatusCode::BAD_REQUEST,
            "UNKNOWN_EVENT",
            format!("Unknown engine event '{}'", req.event),
        );
    };
    state.web.report(event);
    ok_response()
}

fn parse_engine_event(req: &EngineEventRequest) -> Option<BackendEvent> {
    let id = EngineId(req.engine_id);
    match req.event.as_str() {
        "loaded" => Some(BackendEvent::Loaded {
            id,
            duration_seconds: req.duration_seconds.unwrap_or(0.0),
        }),
        "play" => Some(BackendEvent::Play { id }),
        "pause" => Some(BackendEvent::Pause { id }),
        "stop" => Some(BackendEvent::Stop { id }),
        "ended" => Some(BackendEvent::Ended { id }),
        "error" => Some(BackendEvent::LoadError {
            id,
            message: req
                .message
                .clone()
                .unwrap_or_else(|| "unspecified error".to_string()),
        }),
        _ => None,
    }
}

fn ok_response() -> Response {
    (StatusCode::OK, Json(StatusResponse { success: true })).into_response()
}

fn map_status<S: Into<String>>(status: StatusCode, error: &str, message: S) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
        .into_response()
}
