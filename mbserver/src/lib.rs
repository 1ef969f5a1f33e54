//! # mbserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour créer le serveur HTTP de
//! MemoBook : montage des routers REST des autres crates, documentation
//! Swagger, logs SSE et arrêt gracieux.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **API de haut niveau** : Interface simple pour créer des serveurs HTTP avec Axum
//! - 📡 **Server-Sent Events (SSE)** : Logs en temps réel via SSE
//! - 🔀 **Redirections** : Support pour les redirections HTTP
//! - 📚 **Documentation OpenAPI** : Génération automatique de Swagger UI
//! - ⚡ **Arrêt gracieux** : Ctrl+C ou arrêt programmatique via `stop()`
//!
//! ## Architecture
//!
//! - [`server`] : Implémentation du serveur principal et du builder
//! - [`logs`] : Système de logs SSE et niveau rechargeable à chaud
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use mbconfig::Config;
//! use mbserver::{logs::init_logging, Server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_config("")?;
//!
//!     // Logs : console + buffer SSE, niveau rechargeable
//!     let log_state = init_logging(&config);
//!
//!     // Création et démarrage du serveur
//!     let mut server = Server::from_config(&config);
//!     server.attach_logs(log_state).await;
//!
//!     server.add_route("/info", || async {
//!         serde_json::json!({ "version": "0.1.0" })
//!     }).await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{init_logging, log_dump, log_sse, LogState, SseLayer};
pub use server::{Server, ServerBuilder, ServerInfo};
