use std::sync::Arc;

use mbcatalog::CatalogService;
use mbconfig::Config;
use mbguestbook::GuestbookService;
use mbplayer::{CatalogProvider, EngineBackend, PlayerOptions, PlaylistController, WebBackend};
use mbserver::{logs::init_logging, Server};
use mbstore::{AdminSession, StoreClient};
use tracing::info;
use utoipa::OpenApi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Configuration et infrastructure ==========

    let config = Arc::new(Config::load_config("")?);
    let log_state = init_logging(&config);

    info!("🚀 Starting MemoBook...");

    let store = Arc::new(StoreClient::from_config(&config)?);
    let admin = Arc::new(AdminSession::from_config(&config, store.clone())?);

    // ========== PHASE 2 : Services métier ==========

    info!("🎼 Initializing music catalog...");
    let catalog = Arc::new(CatalogService::from_config(&config, store.clone())?);

    info!("🎵 Initializing playlist controller...");
    let web_backend = Arc::new(WebBackend::new());
    let engine_backend: Arc<dyn EngineBackend> = web_backend.clone();
    let provider: Arc<dyn CatalogProvider> = catalog.clone();
    let controller = PlaylistController::new(
        PlayerOptions::from_config(&config),
        engine_backend,
        provider.clone(),
    );
    controller.start(provider.fetch().await).await;

    info!("📖 Initializing guestbook...");
    let guestbook = Arc::new(GuestbookService::from_config(&config, store.clone())?);

    // ========== PHASE 3 : Serveur HTTP ==========

    let mut server = Server::from_config(&config);
    server.attach_logs(log_state).await;

    server
        .add_route("/info", || async {
            serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })
        })
        .await;

    server
        .add_openapi(
            mbcatalog::api::catalog_api_router(catalog.clone(), admin.clone()),
            mbcatalog::openapi::ApiDoc::openapi(),
            "catalog",
        )
        .await;

    server
        .add_openapi(
            mbplayer::api::player_api_router(controller.clone(), web_backend.clone()),
            mbplayer::openapi::ApiDoc::openapi(),
            "player",
        )
        .await;

    server
        .add_openapi(
            mbguestbook::api::guestbook_api_router(guestbook.clone(), admin.clone()),
            mbguestbook::openapi::ApiDoc::openapi(),
            "guestbook",
        )
        .await;

    server
        .add_openapi(
            mbstore::session_api::auth_api_router(admin.clone()),
            mbstore::openapi::ApiDoc::openapi(),
            "auth",
        )
        .await;

    info!("🌐 Starting HTTP server...");
    server.start().await?;

    info!("✅ MemoBook is ready!");
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    // ========== PHASE 4 : Arrêt ==========

    controller.shutdown().await;
    info!("👋 MemoBook stopped");

    Ok(())
}
