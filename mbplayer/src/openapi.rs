//! Documentation OpenAPI pour les endpoints du lecteur.

use utoipa::OpenApi;

/// Documentation OpenAPI pour l'API du lecteur
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::player_state,
        crate::api::play,
        crate::api::pause,
        crate::api::toggle_play,
        crate::api::next_track,
        crate::api::previous_track,
        crate::api::shuffle_playlist,
        crate::api::set_volume,
        crate::api::seek,
        crate::api::notify_interaction,
        crate::api::report_engine_event,
        crate::sse::player_events_sse,
        crate::sse::engine_commands_sse,
    ),
    components(
        schemas(
            crate::api::PlayerStateResponse,
            crate::api::CurrentTrackResponse,
            crate::api::VolumeRequest,
            crate::api::SeekRequest,
            crate::api::EngineEventRequest,
            crate::api::StatusResponse,
            crate::api::ErrorResponse,
        )
    ),
    tags(
        (name = "player", description = "Contrôleur de playlist ambiante : transport, volume, fondu et pont audio")
    ),
    info(
        title = "MemoBook Player API",
        version = "0.1.0",
        description = r#"
# Lecteur ambiant

Le contrôleur de playlist tourne côté serveur ; la page n'est qu'un pont
audio. Les commandes moteur descendent par `GET /api/player/commands` (SSE),
la page les applique à son élément `<audio>` et rapporte chaque événement
via `POST /api/player/engine-events`.

Endpoints de transport :
- `GET /api/player/state` : instantané complet, source de vérité
- `POST /api/player/play|pause|toggle|next|previous|shuffle`
- `POST /api/player/volume` : consigne de session, bornée entre 0 et 1
- `POST /api/player/seek` : position bornée à la durée du morceau
- `POST /api/player/interaction` : premier geste utilisateur, à usage unique

Les événements du contrôleur sortent par `GET /api/player/events` (SSE).
        "#,
        license(
            name = "MIT",
        ),
    )
)]
pub struct ApiDoc;
