//! # mbguestbook - Livre d'or de MemoBook
//!
//! Cette crate gère les messages laissés par les visiteurs :
//! - validation et dépôt d'un message (nom et texte obligatoires, email et
//!   téléphone facultatifs)
//! - listing du plus récent au plus ancien
//! - suppression réservée à la session administrateur
//! - notifications vers un webhook configurable, en best-effort
//! - API REST optionnelle (feature `mbserver`)
//!
//! # Architecture
//!
//! ```text
//! GuestbookService ── submit()/list()/delete()
//!   ├── StoreClient (mbstore) ── table des messages
//!   └── Notifier ── WebhookNotifier | NoopNotifier
//! ```
//!
//! L'envoi d'emails reste hors du serveur : les notifications partent en JSON
//! vers une automatisation externe, et leurs échecs sont seulement journalisés.

mod config_ext;
mod error;
mod models;
mod notify;
mod service;

#[cfg(feature = "mbserver")]
pub mod api;
#[cfg(feature = "mbserver")]
pub mod openapi;

// Réexports publics
pub use config_ext::GuestbookConfigExt;
pub use error::{GuestbookError, Result};
pub use models::{GuestbookEntry, NewEntry};
pub use notify::{notifier_from_config, NoopNotifier, Notifier, WebhookNotifier};
pub use service::GuestbookService;
