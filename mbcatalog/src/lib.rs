//! # mbcatalog - Catalogue musical de MemoBook
//!
//! Cette crate gère le catalogue des morceaux d'ambiance :
//! - récupération du catalogue avec chemin de repli (endpoint d'agrégation,
//!   puis table des métadonnées, sinon catalogue vide)
//! - résolution des sources de lecture d'un morceau, du proxy même-origine à
//!   l'URL publique du bucket
//! - service partagé avec cache TTL sur le listing, ajout et suppression de
//!   morceaux, récupération des octets audio
//! - API REST optionnelle (feature `mbserver`)
//!
//! # Architecture
//!
//! ```text
//! CatalogService ── list()/add_track()/delete_track()/fetch_audio()
//!   ├── CatalogFetcher ── endpoint d'agrégation → table des métadonnées
//!   ├── SourceResolver ── proxy /api/music-play → URL publique du bucket
//!   └── StoreClient (mbstore) ── tables + stockage
//! ```
//!
//! La récupération du catalogue n'échoue jamais : la lecture ambiante doit
//! continuer, ou se taire, mais jamais afficher une panne.

mod config_ext;
mod error;
mod fetcher;
mod resolver;
mod service;
mod track;

#[cfg(feature = "mbserver")]
pub mod api;
#[cfg(feature = "mbserver")]
pub mod openapi;

// Réexports publics
pub use config_ext::{CatalogConfigExt, DEFAULT_CACHE_TTL_SECS};
pub use error::{CatalogError, Result};
pub use fetcher::CatalogFetcher;
pub use resolver::{audio_content_type, SourceResolver};
pub use service::{CatalogService, DeleteOutcome};
pub use track::{NewTrack, Track};
