//! Notifications du livre d'or
//!
//! L'envoi d'emails sortants n'est pas du ressort du serveur : chaque
//! notification part en JSON vers un webhook configurable, branché sur une
//! automatisation externe qui prévient le propriétaire et remercie le
//! visiteur. Sans webhook configuré, le notificateur inactif prend la place.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use mbconfig::Config;
use serde::Serialize;

use crate::config_ext::GuestbookConfigExt;
use crate::error::Result;
use crate::models::GuestbookEntry;

/// Délai maximum d'un appel au webhook
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Frontière de livraison externe des notifications.
///
/// Les deux appels sont best-effort : le service journalise les échecs mais
/// l'insertion de l'entrée n'en dépend jamais.
#[async_trait::async_trait]
pub trait Notifier: Debug + Send + Sync {
    /// Prévient le propriétaire qu'une entrée vient d'être déposée.
    async fn entry_created(&self, entry: &GuestbookEntry) -> anyhow::Result<()>;

    /// Remercie le visiteur, quand il a laissé un email.
    async fn thank_you(&self, entry: &GuestbookEntry) -> anyhow::Result<()>;
}

/// Notificateur inactif, pour les déploiements sans webhook.
#[derive(Debug, Default)]
pub struct NoopNotifier;

#[async_trait::async_trait]
impl Notifier for NoopNotifier {
    async fn entry_created(&self, _entry: &GuestbookEntry) -> anyhow::Result<()> {
        Ok(())
    }

    async fn thank_you(&self, _entry: &GuestbookEntry) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

/// Poste chaque notification en JSON sur le webhook configuré.
#[derive(Debug)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(anyhow::Error::from)?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    async fn post(&self, payload: &WebhookPayload<'_>) -> anyhow::Result<()> {
        let response = self.http.post(&self.url).json(payload).send().await?;
        response.error_for_status()?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn entry_created(&self, entry: &GuestbookEntry) -> anyhow::Result<()> {
        self.post(&WebhookPayload {
            kind: "entry_created",
            name: &entry.name,
            message: &entry.message,
            email: entry.email.as_deref(),
        })
        .await
    }

    async fn thank_you(&self, entry: &GuestbookEntry) -> anyhow::Result<()> {
        self.post(&WebhookPayload {
            kind: "thank_you",
            name: &entry.name,
            message: &entry.message,
            email: entry.email.as_deref(),
        })
        .await
    }
}

/// Construit le notificateur selon la configuration.
pub fn notifier_from_config(config: &Config) -> Result<Arc<dyn Notifier>> {
    match config.get_guestbook_webhook_url() {
        Some(url) => Ok(Arc::new(WebhookNotifier::new(url)?)),
        None => Ok(Arc::new(NoopNotifier)),
    }
}
