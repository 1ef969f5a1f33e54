//! API REST du livre d'or.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use chrono::{DateTime, Utc};
use mbstore::AdminSession;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::GuestbookError;
use crate::models::{GuestbookEntry, NewEntry};
use crate::service::GuestbookService;

/// État partagé des handlers du livre d'or
#[derive(Clone)]
pub struct GuestbookApiState {
    pub service: Arc<GuestbookService>,
    pub admin: Arc<AdminSession>,
}

/// Router des endpoints REST du livre d'or.
pub fn guestbook_api_router(service: Arc<GuestbookService>, admin: Arc<AdminSession>) -> Router {
    Router::new()
        .route("/api/guestbook", get(list_entries).post(submit_entry))
        .route("/api/guestbook/{id}", delete(delete_entry))
        .with_state(GuestbookApiState { service, admin })
}

/// Un message tel qu'exposé par l'API.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryResponse {
    pub id: i64,
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Enveloppe du listing des messages.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntriesResponse {
    pub data: Vec<EntryResponse>,
}

/// Requête de dépôt d'un message.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitEntryRequest {
    pub name: String,
    pub message: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Réponse à un dépôt de message.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitResponse {
    pub success: bool,
    pub data: EntryResponse,
}

/// Réponse à une suppression de message.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Réponse d'erreur REST du livre d'or.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[utoipa::path(
    get,
    path = "/api/guestbook",
    tag = "guestbook",
    responses(
        (status = 200, description = "Messages du livre d'or, plus récent en premier", body = EntriesResponse),
        (status = 500, description = "Backend de stockage injoignable", body = ErrorResponse)
    )
)]
pub async fn list_entries(State(state): State<GuestbookApiState>) -> Response {
    match state.service.list().await {
        Ok(entries) => {
            let data = entries.into_iter().map(EntryResponse::from).collect();
            (StatusCode::OK, Json(EntriesResponse { data })).into_response()
        }
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/api/guestbook",
    tag = "guestbook",
    request_body = SubmitEntryRequest,
    responses(
        (status = 200, description = "Message enregistré", body = SubmitResponse),
        (status = 400, description = "Nom ou message manquant", body = ErrorResponse),
        (status = 500, description = "Insertion refusée par le backend", body = ErrorResponse)
    )
)]
pub async fn submit_entry(
    State(state): State<GuestbookApiState>,
    Json(req): Json<SubmitEntryRequest>,
) -> Response {
    let entry = NewEntry {
        name: req.name,
        message: req.message,
        email: req.email,
        phone: req.phone,
    };

    match state.service.submit(entry).await {
        Ok(created) => (
            StatusCode::OK,
            Json(SubmitResponse {
                success: true,
                data: created.into(),
            }),
        )
            .into_response(),
        Err(err) => map_error(err),
    }
}

#[utoipa::path(
    delete,
    path = "/api/guestbook/{id}",
    tag = "guestbook",
    params(
        ("id" = i64, Path, description = "Identifiant du message")
    ),
    responses(
        (status = 200, description = "Message supprimé", body = DeleteResponse),
        (status = 401, description = "Session administrateur requise", body = ErrorResponse),
        (status = 404, description = "Message introuvable", body = ErrorResponse)
    )
)]
pub async fn delete_entry(State(state): State<GuestbookApiState>, Path(id): Path<i64>) -> Response {
    if !state.admin.is_admin().await {
        return map_status(StatusCode::UNAUTHORIZED, "Admin session required");
    }

    match state.service.delete(id).await {
        Ok(()) => (StatusCode::OK, Json(DeleteResponse { success: true })).into_response(),
        Err(err) => map_error(err),
    }
}

impl From<GuestbookEntry> for EntryResponse {
    fn from(value: GuestbookEntry) -> Self {
        Self {
            id: value.id,
            name: value.name,
            message: value.message,
            email: value.email,
            phone: value.phone,
            created_at: value.created_at,
        }
    }
}

fn map_status<S: Into<String>>(status: StatusCode, message: S) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message.into(),
        }),
    )
        .into_response()
}

fn map_error(error: GuestbookError) -> Response {
    let status = match &error {
        GuestbookError::MissingFields => StatusCode::BAD_REQUEST,
        GuestbookError::EntryNotFound(_) => StatusCode::NOT_FOUND,
        GuestbookError::Store(e) if e.is_auth_error() => StatusCode::UNAUTHORIZED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    map_status(status, error.to_string())
}
