//! Service du livre d'or : lecture, dépôt et modération des messages
//!
//! Toutes les écritures passent par le backend de stockage distant ; le
//! service n'ajoute que la validation des champs et les notifications.
//! Une notification qui échoue est journalisée puis oubliée : le message
//! du visiteur est déjà enregistré, il n'y a rien à annuler.

use std::sync::Arc;

use mbconfig::Config;
use mbstore::StoreClient;
use tracing::{debug, info, warn};

use crate::error::{GuestbookError, Result};
use crate::models::{GuestbookEntry, NewEntry};
use crate::notify::{notifier_from_config, Notifier};

/// Service du livre d'or
pub struct GuestbookService {
    store: Arc<StoreClient>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for GuestbookService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestbookService")
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl GuestbookService {
    /// Crée un service avec un notificateur explicite
    pub fn new(store: Arc<StoreClient>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Crée un service depuis la configuration (webhook optionnel)
    pub fn from_config(config: &Config, store: Arc<StoreClient>) -> Result<Self> {
        let notifier = notifier_from_config(config)?;
        Ok(Self::new(store, notifier))
    }

    /// Liste les messages, du plus récent au plus ancien
    pub async fn list(&self) -> Result<Vec<GuestbookEntry>> {
        let entries = self
            .store
            .select_all::<GuestbookEntry>(self.store.guestbook_table(), Some("created_at"))
            .await?;
        debug!(count = entries.len(), "Guestbook entries fetched");
        Ok(entries)
    }

    /// Dépose un nouveau message et retourne l'entrée créée
    ///
    /// Valide le nom et le message avant toute écriture. Les notifications
    /// (webhook et remerciement) partent après l'insertion et n'affectent
    /// jamais le résultat.
    pub async fn submit(&self, entry: NewEntry) -> Result<GuestbookEntry> {
        if !entry.is_valid() {
            return Err(GuestbookError::MissingFields);
        }

        let rows: Vec<GuestbookEntry> = self
            .store
            .insert(self.store.guestbook_table(), &entry)
            .await?;
        let created = rows.into_iter().next().ok_or_else(|| {
            mbstore::StoreError::Other("insert returned no representation".to_string())
        })?;

        info!(
            id = created.id,
            name = %created.name,
            "📖 New guestbook entry"
        );

        if let Err(e) = self.notifier.entry_created(&created).await {
            warn!("Guestbook notification failed: {}", e);
        }
        if created.email.is_some() {
            if let Err(e) = self.notifier.thank_you(&created).await {
                warn!("Thank-you notification failed: {}", e);
            }
        }

        Ok(created)
    }

    /// Supprime un message (réservé à l'administrateur)
    pub async fn delete(&self, id: i64) -> Result<()> {
        let table = self.store.guestbook_table();
        let matching: Vec<GuestbookEntry> = self
            .store
            .api()
            .select_eq(table, "id", &id.to_string())
            .await?;
        if matching.is_empty() {
            return Err(GuestbookError::EntryNotFound(id));
        }

        self.store.delete_by_id(table, &id.to_string()).await?;
        info!(id, "Guestbook entry deleted");
        Ok(())
    }
}
