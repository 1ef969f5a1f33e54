//! Extension pour intégrer la configuration du catalogue
//!
//! Fournit le trait `CatalogConfigExt` qui étend `mbconfig::Config` avec les
//! accesseurs propres au catalogue : endpoint d'agrégation et durée de vie du
//! cache de listing.

use anyhow::Result;
use mbconfig::Config;
use serde_yaml::Value;

/// Durée de vie par défaut du cache de listing (secondes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Trait d'extension pour la configuration du catalogue
pub trait CatalogConfigExt {
    /// Endpoint d'agrégation interrogé avant la table, ou None si absent
    fn get_catalog_endpoint(&self) -> Option<String>;

    /// Définit l'endpoint d'agrégation
    fn set_catalog_endpoint(&self, url: &str) -> Result<()>;

    /// Durée de vie du cache de listing, en secondes
    fn get_catalog_cache_ttl_secs(&self) -> u64;
}

impl CatalogConfigExt for Config {
    fn get_catalog_endpoint(&self) -> Option<String> {
        match self.get_value(&["catalog", "endpoint"]) {
            Ok(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    fn set_catalog_endpoint(&self, url: &str) -> Result<()> {
        self.set_value(&["catalog", "endpoint"], Value::String(url.to_string()))
    }

    fn get_catalog_cache_ttl_secs(&self) -> u64 {
        match self.get_value(&["catalog", "cache_ttl_secs"]) {
            Ok(Value::Number(n)) => n.as_u64().unwrap_or(DEFAULT_CACHE_TTL_SECS),
            _ => DEFAULT_CACHE_TTL_SECS,
        }
    }
}
