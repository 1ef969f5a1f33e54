//! API REST du catalogue musical.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use mbstore::AdminSession;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CatalogError;
use crate::service::CatalogService;
use crate::track::{NewTrack, Track};

/// État partagé des handlers du catalogue
#[derive(Clone)]
pub struct CatalogApiState {
    pub service: Arc<CatalogService>,
    pub admin: Arc<AdminSession>,
}

/// Router des endpoints REST du catalogue.
pub fn catalog_api_router(service: Arc<CatalogService>, admin: Arc<AdminSession>) -> Router {
    Router::new()
        .route("/api/music-tracks", get(list_tracks))
        .route("/api/music-tracks/{id}", delete(delete_track))
        .route("/api/music-play", get(play_track))
        .route("/api/music-upload", post(upload_track))
        .with_state(CatalogApiState { service, admin })
}

/// Un morceau tel qu'exposé par l'API.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackResponse {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub artist: Option<String>,
    pub created_by: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Enveloppe du listing du catalogue.
#[derive(Debug, Serialize, ToSchema)]
pub struct TracksResponse {
    pub data: Vec<TrackResponse>,
}

/// Requête d'ajout de métadonnées d'un morceau.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadTrackRequest {
    pub title: String,
    pub file_path: String,
    pub artist: Option<String>,
    pub created_by: Option<String>,
}

/// Réponse à un ajout de morceau.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub data: Vec<TrackResponse>,
}

/// Réponse à une suppression de morceau.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Réponse d'erreur REST du catalogue.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Paramètres de la requête de streaming.
#[derive(Debug, Deserialize)]
pub struct PlayQuery {
    pub path: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/music-tracks",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalogue complet, plus récent en premier. Un backend injoignable donne une liste vide, jamais une erreur.", body = TracksResponse)
    )
)]
pub async fn list_tracks(State(state): State<CatalogApiState>) -> Response {
    let tracks = state.service.list().await;
    let data = tracks.iter().cloned().map(TrackResponse::from).collect();
    (StatusCode::OK, Json(TracksResponse { data })).into_response()
}

#[utoipa::path(
    get,
    path = "/api/music-play",
    tag = "catalog",
    params(
        ("path" = Option<String>, Query, description = "Clé de l'objet audio dans le bucket")
    ),
    responses(
        (status = 200, description = "Octets du fichier audio", content_type = "audio/mpeg"),
        (status = 400, description = "Paramètre path absent", body = ErrorResponse),
        (status = 404, description = "Fichier irrécupérable", body = ErrorResponse)
    )
)]
pub async fn play_track(
    State(state): State<CatalogApiState>,
    Query(query): Query<PlayQuery>,
) -> Response {
    let Some(path) = query.path.filter(|p| !p.trim().is_empty()) else {
        return map_status(StatusCode::BAD_REQUEST, "File path is required");
    };

    match state.service.fetch_audio(&path).await {
        Ok((bytes, content_type)) => audio_response(bytes, content_type),
        Err(CatalogError::InvalidTrack(_)) => {
            map_status(StatusCode::BAD_REQUEST, "File path is required")
        }
        Err(_) => map_status(StatusCode::NOT_FOUND, "Failed to fetch audio file"),
    }
}

#[utoipa::path(
    post,
    path = "/api/music-upload",
    tag = "catalog",
    request_body = UploadTrackRequest,
    responses(
        (status = 200, description = "Métadonnées insérées", body = UploadResponse),
        (status = 400, description = "Titre ou chemin manquant", body = ErrorResponse),
        (status = 500, description = "Insertion refusée par le backend", body = ErrorResponse)
    )
)]
pub async fn upload_track(
    State(state): State<CatalogApiState>,
    Json(req): Json<UploadTrackRequest>,
) -> Response {
    let new_track = NewTrack {
        title: req.title,
        file_path: req.file_path,
        artist: req.artist,
        created_by: req.created_by,
    };

    match state.service.add_track(new_track).await {
        Ok(created) => (
            StatusCode::OK,
            Json(UploadResponse {
                success: true,
                data: created.into_iter().map(TrackResponse::from).collect(),
            }),
        )
            .into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/music-tracks/{id}",
    tag = "catalog",
    params(
        ("id" = i64, Path, description = "Identifiant du morceau")
    ),
    responses(
        (status = 200, description = "Morceau supprimé, avertissement éventuel sur le stockage", body = DeleteResponse),
        (status = 401, description = "Session administrateur requise", body = ErrorResponse),
        (status = 404, description = "Morceau introuvable", body = ErrorResponse)
    )
)]
pub async fn delete_track(State(state): State<CatalogApiState>, Path(id): Path<i64>) -> Response {
    if !state.admin.is_admin().await {
        return map_status(StatusCode::UNAUTHORIZED, "Admin session required");
    }

    match state.service.delete_track(id).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(DeleteResponse {
                success: true,
                warning: outcome.storage_warning,
            }),
        )
            .into_response(),
        Err(err) => map_error(err),
    }
}

impl From<Track> for TrackResponse {
    fn from(value: Track) -> Self {
        Self {
            id: value.id,
            title: value.title,
            file_path: value.file_path,
            artist: value.artist,
            created_by: value.created_by,
            created_at: value.created_at,
        }
    }
}

/// Réponse audio brute avec les en-têtes CORS et cache du proxy
fn audio_response(bytes: Vec<u8>, content_type: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=86400"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                "Content-Type, Authorization",
            ),
            (
                HeaderName::from_static("cross-origin-resource-policy"),
                "cross-origin",
            ),
        ],
        bytes,
    )
        .into_response()
}

fn map_status<S: Into<String>>(status: StatusCode, message: S) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn map_error(error: CatalogError) -> Response {
    let status = match &error {
        CatalogError::InvalidTrack(_) => StatusCode::BAD_REQUEST,
        CatalogError::TrackNotFound(_) | CatalogError::AudioUnavailable(_) => StatusCode::NOT_FOUND,
        CatalogError::Store(e) if e.is_auth_error() => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    map_status(status, error.to_string())
}
