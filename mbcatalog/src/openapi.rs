//! Documentation OpenAPI pour les endpoints du catalogue musical.

use utoipa::OpenApi;

/// Documentation OpenAPI pour l'API du catalogue
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::list_tracks,
        crate::api::play_track,
        crate::api::upload_track,
        crate::api::delete_track,
    ),
    components(
        schemas(
            crate::api::TrackResponse,
            crate::api::TracksResponse,
            crate::api::UploadTrackRequest,
            crate::api::UploadResponse,
            crate::api::DeleteResponse,
            crate::api::ErrorResponse,
        )
    ),
    tags(
        (name = "catalog", description = "Catalogue musical : listing, streaming et gestion des morceaux")
    ),
    info(
        title = "MemoBook Catalog API",
        version = "0.1.0",
        description = r#"
# Catalogue musical

Endpoints REST du catalogue :
- `GET /api/music-tracks` : listing complet, du plus récent au plus ancien
- `GET /api/music-play?path=...` : proxy de streaming même-origine
- `POST /api/music-upload` : insertion des métadonnées d'un morceau
- `DELETE /api/music-tracks/{id}` : suppression (session administrateur)

Le listing ne retourne jamais d'erreur : un backend injoignable donne une
liste vide. La suppression retire d'abord l'objet du bucket (échec toléré,
remonté en avertissement) puis la ligne de métadonnées.
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
