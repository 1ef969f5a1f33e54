//! # Serveur HTTP de MemoBook - surcouche Axum
//!
//! Ce module masque la construction du router et le cycle de vie du serveur
//! derrière une petite API impérative.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **Routes JSON** : une closure async devient un endpoint GET via `add_route()`
//! - 🔀 **Redirections** : renvoi permanent d'un chemin vers un autre via `add_redirect()`
//! - 🎯 **Handlers personnalisés** : SSE et handlers à état via `add_handler_with_state()`
//! - 📚 **Swagger** : chaque API montée publie sa documentation via `add_openapi()`
//! - ⚡ **Gestion gracieuse** : arrêt propre sur Ctrl+C ou via `stop()`

use crate::logs::{create_logs_router, log_dump, log_sse, LogState, LogsApiDoc};
use anyhow::Result;
use axum::handler::Handler;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Json, Router};
use mbconfig::Config;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Identité du serveur, sérialisable pour les endpoints d'info
#[derive(Clone, Serialize, utoipa::ToSchema)]
pub struct ServerInfo {
    pub name: String,
    pub base_url: String,
    pub http_port: u16,
}

/// Serveur HTTP de MemoBook
pub struct Server {
    name: String,
    base_url: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
    join_handle: Option<JoinHandle<()>>,
    shutdown: Arc<Notify>,
    log_state: Option<LogState>,
}

impl Server {
    /// Construit un serveur sans aucune route
    ///
    /// # Arguments
    ///
    /// * `name` - Nom affiché dans les logs
    /// * `base_url` - URL de base (ex: "http://localhost:8080")
    /// * `http_port` - Port d'écoute HTTP
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
            join_handle: None,
            shutdown: Arc::new(Notify::new()),
            log_state: None,
        }
    }

    /// Crée un serveur depuis la configuration
    pub fn from_config(config: &Config) -> Self {
        let url = config.get_base_url();
        let port = config.get_http_port();
        Self::new("MemoBook", url, port)
    }

    /// Monte une route GET renvoyant du JSON
    ///
    /// La closure est appelée à chaque requête et sa valeur de retour est
    /// sérialisée dans la réponse.
    ///
    /// # Exemple
    ///
    /// ```rust,no_run
    /// # use mbserver::Server;
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let mut server = Server::new("Test", "http://localhost:8080", 8080);
    /// server.add_route("/info", || async {
    ///     serde_json::json!({ "version": "0.1.0" })
    /// }).await;
    /// # }
    /// ```
    pub async fn add_route<F, Fut, T>(&mut self, path: &str, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Serialize + Send + 'static,
    {
        let f = Arc::new(f);
        let handler = {
            let f = f.clone();
            move || {
                let f = f.clone();
                async move { Json(f().await) }
            }
        };

        let route = Router::new().route("/", get(handler));

        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(route)
        } else {
            std::mem::take(&mut *r).nest(path, route)
        };
    }

    /// Monte un handler Axum GET sans état
    pub async fn add_handler<H, T>(&mut self, path: &str, handler: H)
    where
        H: Handler<T, ()> + Clone + 'static,
        T: 'static,
    {
        let route = Router::new().route("/", get(handler.clone()));

        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(route)
        } else {
            std::mem::take(&mut *r).nest(path, route)
        };
    }

    /// Monte un handler POST avec état partagé
    pub async fn add_post_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new()
            .route("/", post(handler.clone()))
            .with_state(state.clone());

        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(route)
        } else {
            std::mem::take(&mut *r).nest(path, route)
        };
    }

    /// Monte un handler GET avec état partagé
    pub async fn add_handler_with_state<H, T, S>(&mut self, path: &str, handler: H, state: S)
    where
        H: Handler<T, S> + Clone + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let route = Router::new()
            .route("/", get(handler.clone()))
            .with_state(state.clone());

        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(route)
        } else {
            std::mem::take(&mut *r).nest(path, route)
        };
    }

    /// Ajoute une redirection HTTP permanente (308)
    pub async fn add_redirect(&mut self, from: &str, to: &str) {
        let to = to.to_string();
        let make_handler = || {
            let target = to.clone();
            get(move || async move { Redirect::permanent(&target) })
        };

        let mut r = self.router.write().await;
        *r = if from == "/" {
            std::mem::take(&mut *r).merge(Router::new().route("/", make_handler()))
        } else {
            std::mem::take(&mut *r).nest(from, Router::new().route("/", make_handler()))
        };
    }

    /// Monte un sous-router sur le chemin donné
    ///
    /// - "/" merge le sous-router directement au router principal
    /// - tout autre chemin le nest, normalisé avec un "/" de tête
    pub async fn nest_router(&mut self, path: &str, sub_router: Router) {
        let mut r = self.router.write().await;
        *r = if path == "/" {
            std::mem::take(&mut *r).merge(sub_router)
        } else {
            let normalized = format!("/{}", path.trim_start_matches('/'));
            std::mem::take(&mut *r).nest(&normalized, sub_router)
        };
    }

    /// Monte une API et publie sa documentation Swagger
    ///
    /// Le `api_router` fourni déclare ses chemins complets (`/api/...`) et il
    /// est mergé tel quel au router principal ; les pages du site dépendent de
    /// ces chemins exacts. Chaque appel ajoute sa propre documentation :
    ///
    /// - `/swagger-ui/{name}` affiche la documentation Swagger
    /// - `/api-docs/{name}.json` sert le document OpenAPI
    pub async fn add_openapi(
        &mut self,
        api_router: Router,
        openapi: utoipa::openapi::OpenApi,
        name: &str,
    ) {
        let swagger_path = format!("/swagger-ui/{}", name);
        let swagger_path_static: &'static str = Box::leak(swagger_path.into_boxed_str());

        let openapi_json_path = format!("/api-docs/{}.json", name);
        let openapi_json_path_static: &'static str = Box::leak(openapi_json_path.into_boxed_str());

        let swagger = SwaggerUi::new(swagger_path_static).url(openapi_json_path_static, openapi);

        let mut r = self.router.write().await;
        *r = std::mem::take(&mut *r).merge(api_router).merge(swagger);
    }

    /// Enregistre les routes de logs
    ///
    /// - `/log-sse` : flux SSE des entrées (historique puis temps réel)
    /// - `/log-dump` : dump JSON du buffer circulaire
    /// - `/api/log_setup` : lecture et mise à jour du niveau de log
    pub async fn attach_logs(&mut self, log_state: LogState) {
        self.add_handler_with_state("/log-sse", log_sse, log_state.clone())
            .await;
        self.add_handler_with_state("/log-dump", log_dump, log_state.clone())
            .await;
        self.add_openapi(
            create_logs_router(log_state.clone()),
            LogsApiDoc::openapi(),
            "logs",
        )
        .await;

        self.log_state = Some(log_state);
    }

    /// Démarre l'écoute HTTP
    ///
    /// Lie le port configuré puis sert le router dans une tâche de fond.
    /// L'arrêt gracieux est déclenché par Ctrl+C ou par [`Server::stop`].
    ///
    /// # Exemple
    ///
    /// ```rust,no_run
    /// # use mbserver::Server;
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// # let mut server = Server::new("Test", "http://localhost:8080", 8080);
    /// server.start().await?;
    /// server.wait().await;  // bloque jusqu'à Ctrl+C
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start(&mut self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = TcpListener::bind(addr).await?;

        info!(
            "Server {} running at {} (port {})",
            self.name, self.base_url, self.http_port
        );

        let router = self.router.read().await.clone();
        let shutdown = self.shutdown.clone();

        self.join_handle = Some(tokio::spawn(async move {
            let serve = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown_signal(shutdown));
            if let Err(e) = serve.await {
                warn!("HTTP server terminated with error: {}", e);
            }
        }));

        Ok(())
    }

    /// Bloque jusqu'à l'arrêt du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Déclenche l'arrêt gracieux du serveur
    pub fn stop(&self) {
        self.shutdown.notify_waiters();
    }

    /// Nom, URL de base et port du serveur
    pub fn info(&self) -> ServerInfo {
        ServerInfo {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            http_port: self.http_port,
        }
    }
}

/// Attend Ctrl+C ou une demande d'arrêt programmatique
async fn shutdown_signal(shutdown: Arc<Notify>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C reçu, arrêt gracieux"),
        _ = shutdown.notified() => info!("Arrêt demandé, arrêt gracieux"),
    }
}

/// Construction fluide d'un [`Server`]
pub struct ServerBuilder {
    name: String,
    base_url: String,
    http_port: u16,
}

impl ServerBuilder {
    /// Amorce un builder avec l'identité du serveur
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        }
    }

    /// Builder initialisé depuis la configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: "MemoBook".to_string(),
            base_url: config.get_base_url(),
            http_port: config.get_http_port(),
        }
    }

    /// Finalise le serveur
    pub fn build(self) -> Server {
        Server::new(self.name, self.base_url, self.http_port)
    }
}
