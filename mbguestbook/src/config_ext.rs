//! Extension pour intégrer la configuration du livre d'or

use anyhow::Result;
use mbconfig::Config;
use serde_yaml::Value;

/// Trait d'extension pour la configuration du livre d'or
pub trait GuestbookConfigExt {
    /// URL du webhook de notification, ou None si absent
    fn get_guestbook_webhook_url(&self) -> Option<String>;

    /// Définit l'URL du webhook de notification
    fn set_guestbook_webhook_url(&self, url: &str) -> Result<()>;
}

impl GuestbookConfigExt for Config {
    fn get_guestbook_webhook_url(&self) -> Option<String> {
        match self.get_value(&["guestbook", "webhook_url"]) {
            Ok(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    fn set_guestbook_webhook_url(&self, url: &str) -> Result<()> {
        self.set_value(&["guestbook", "webhook_url"], Value::String(url.to_string()))
    }
}
