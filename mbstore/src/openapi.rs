//! Documentation OpenAPI pour les endpoints d'authentification.

use utoipa::OpenApi;

/// Documentation OpenAPI pour l'API d'authentification
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::session_api::login,
        crate::session_api::logout,
        crate::session_api::session,
    ),
    components(
        schemas(
            crate::session_api::LoginRequest,
            crate::session_api::LoginResponse,
            crate::session_api::StatusResponse,
            crate::session_api::SessionResponse,
            crate::session_api::ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Session administrateur : connexion, déconnexion, état")
    ),
    info(
        title = "MemoBook Auth API",
        version = "0.1.0",
        description = r#"
# Session administrateur

Endpoints REST de la session :
- `POST /api/auth/login` : connexion par email et mot de passe
- `POST /api/auth/logout` : déconnexion (idempotente)
- `GET /api/auth/session` : état courant `{ is_admin, email? }`

Un échec de connexion ne laisse aucune session partielle. Les endpoints
de modération des autres surfaces consultent la même session.
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
