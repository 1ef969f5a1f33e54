//! Documentation OpenAPI pour les endpoints du livre d'or.

use utoipa::OpenApi;

/// Documentation OpenAPI pour l'API du livre d'or
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::list_entries,
        crate::api::submit_entry,
        crate::api::delete_entry,
    ),
    components(
        schemas(
            crate::api::EntryResponse,
            crate::api::EntriesResponse,
            crate::api::SubmitEntryRequest,
            crate::api::SubmitResponse,
            crate::api::DeleteResponse,
            crate::api::ErrorResponse,
        )
    ),
    tags(
        (name = "guestbook", description = "Livre d'or : lecture, dépôt et modération des messages")
    ),
    info(
        title = "MemoBook Guestbook API",
        version = "0.1.0",
        description = r#"
# Livre d'or

Endpoints REST du livre d'or :
- `GET /api/guestbook` : messages, du plus récent au plus ancien
- `POST /api/guestbook` : dépôt d'un message (nom et texte obligatoires)
- `DELETE /api/guestbook/{id}` : suppression (session administrateur)

Le dépôt déclenche les notifications configurées (webhook), en best-effort :
un webhook muet n'empêche jamais l'enregistrement du message.
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
