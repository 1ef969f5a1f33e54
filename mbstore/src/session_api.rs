//! API REST de la session administrateur.
//!
//! Les endpoints admin des autres crates (suppression d'un morceau, d'un
//! message du livre d'or) consultent la même `AdminSession` partagée : se
//! connecter ici ouvre la modération partout.

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

use crate::session::AdminSession;

/// Router des endpoints d'authentification.
pub fn auth_api_router(admin: Arc<AdminSession>) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
        .with_state(admin)
}

/// Requête de connexion administrateur.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Réponse à une connexion réussie.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub email: String,
}

/// Réponse à une déconnexion.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub success: bool,
}

/// État courant de la session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Réponse d'erreur des endpoints d'authentification.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session administrateur ouverte", body = LoginResponse),
        (status = 401, description = "Credentials refusés ou compte non administrateur", body = ErrorResponse),
        (status = 500, description = "Backend d'authentification injoignable", body = ErrorResponse)
    )
)]
pub async fn login(
    State(admin): State<Arc<AdminSession>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    match admin.sign_in(&req.email, &req.password).await {
        Ok(()) => {
            let email = admin.email().unwrap_or(req.email);
            (
                StatusCode::OK,
                Json(LoginResponse {
                    success: true,
                    email,
                }),
            )
                .into_response()
        }
        Err(err) => {
            let status = if err.is_auth_error() {
                StatusCode::UNAUTHORIZED
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            map_status(status, err.to_string())
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session fermée (idempotent)", body = StatusResponse),
        (status = 500, description = "L'état durable n'a pas pu être effacé", body = ErrorResponse)
    )
)]
pub async fn logout(State(admin): State<Arc<AdminSession>>) -> Response {
    match admin.sign_out().await {
        Ok(()) => (StatusCode::OK, Json(StatusResponse { success: true })).into_response(),
        Err(err) => map_status(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "État courant de la session", body = SessionResponse)
    )
)]
pub async fn session(State(admin): State<Arc<AdminSession>>) -> Response {
    let is_admin = admin.is_admin().await;
    let email = if is_admin { admin.email() } else { None };

    (StatusCode::OK, Json(SessionResponse { is_admin, email })).into_response()
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
