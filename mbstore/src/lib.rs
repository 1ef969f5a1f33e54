//! # mbstore - Client du backend de stockage pour MemoBook
//!
//! Cette crate fournit un client Rust pour le backend de stockage distant
//! (tables, stockage d'objets, authentification). Toute la persistance de
//! MemoBook est déléguée à ce backend ; rien n'est stocké localement en
//! dehors du drapeau de session administrateur.
//!
//! ## Architecture
//!
//! La crate suit le pattern des autres crates mb :
//! - `StoreClient` : client principal, construit depuis la configuration
//! - `api` : couche d'accès bas-niveau aux trois surfaces REST
//! - `AdminSession` : session administrateur explicite (drapeau local +
//!   authentification distante)
//! - `error` : taxonomie d'erreurs de la crate
//!
//! ## Structure des modules
//!
//! ```text
//! mbstore/
//! ├── src/
//! │   ├── lib.rs              # Module principal (ce fichier)
//! │   ├── client.rs           # Client haut-niveau
//! │   ├── api/
//! │   │   ├── mod.rs          # API bas-niveau (headers, erreurs)
//! │   │   ├── tables.rs       # Tables (conventions PostgREST)
//! │   │   ├── storage.rs      # Stockage d'objets
//! │   │   └── auth.rs         # Authentification par mot de passe
//! │   ├── session.rs          # Session administrateur
//! │   ├── session_api.rs      # API REST de la session (feature mbserver)
//! │   ├── config_ext.rs       # Extension de mbconfig::Config
//! │   └── error.rs            # Gestion des erreurs
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mbconfig::Config;
//! use mbstore::StoreClient;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Arc::new(Config::load_config("")?);
//! let store = Arc::new(StoreClient::from_config(&config)?);
//!
//! let rows: Vec<serde_json::Value> = store
//!     .select_all(store.tracks_table(), Some("created_at"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
mod client;
mod config_ext;
mod error;
mod session;

#[cfg(feature = "mbserver")]
pub mod openapi;
#[cfg(feature = "mbserver")]
pub mod session_api;

// Réexports publics
pub use api::auth::AuthInfo;
pub use api::StoreApi;
pub use client::StoreClient;
pub use config_ext::StoreConfigExt;
pub use error::{Result, StoreError};
pub use session::AdminSession;
