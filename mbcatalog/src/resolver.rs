//! Résolution des sources de lecture d'un morceau
//!
//! Pour chaque morceau on construit la liste ordonnée des URLs candidates,
//! du meilleur au moins bon : le proxy de streaming même-origine d'abord,
//! puis l'URL publique de l'objet dans le bucket. La résolution est purement
//! syntaxique, ne consulte pas le réseau et n'échoue jamais ; c'est
//! l'adaptateur de lecture qui parcourt la liste et tolère les candidats
//! morts.

use std::path::Path;
use std::sync::Arc;

use mbconfig::Config;
use mbstore::StoreClient;
use reqwest::Url;
use tracing::warn;

use crate::track::Track;

/// Résout les URLs candidates pour la lecture d'un morceau
pub struct SourceResolver {
    /// URL de base du site, sans slash final
    base_url: String,
    /// Client de stockage, pour l'URL publique des objets
    store: Arc<StoreClient>,
}

impl SourceResolver {
    /// Crée un résolveur pour un site servi à `base_url`
    pub fn new(base_url: impl Into<String>, store: Arc<StoreClient>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    /// Crée un résolveur depuis un objet de configuration
    ///
    /// `host.base_url` peut être une URL complète ou un simple nom d'hôte ;
    /// dans ce second cas l'URL est composée avec le port HTTP configuré.
    pub fn from_config(config: &Config, store: Arc<StoreClient>) -> Self {
        let base = config.get_base_url();
        let base = if base.starts_with("http://") || base.starts_with("https://") {
            base
        } else {
            format!("http://{}:{}", base, config.get_http_port())
        };
        Self::new(base, store)
    }

    /// Liste ordonnée des URLs candidates pour un morceau
    ///
    /// Le proxy vient toujours en premier ; l'URL publique est ajoutée en
    /// secours quand le client de stockage sait la construire.
    pub fn resolve(&self, track: &Track) -> Vec<String> {
        let mut sources = Vec::with_capacity(2);

        match Url::parse_with_params(
            &format!("{}/api/music-play", self.base_url),
            &[("path", track.file_path.as_str())],
        ) {
            Ok(url) => sources.push(url.to_string()),
            Err(e) => warn!("Cannot build proxy URL from '{}': {e}", self.base_url),
        }

        if let Some(url) = self.store.song_public_url(&track.file_path) {
            sources.push(url);
        }

        if sources.is_empty() {
            warn!("No playable source for '{}'", track.title);
        }
        sources
    }
}

/// Content-Type d'un fichier audio d'après son extension
pub fn audio_content_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("m4a") => "audio/mp4",
        _ => "audio/mpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(file_path: &str) -> Track {
        Track {
            id: 1,
            title: "Hello".to_string(),
            file_path: file_path.to_string(),
            artist: None,
            created_by: None,
            created_at: None,
        }
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(audio_content_type("songs/a.mp3"), "audio/mpeg");
        assert_eq!(audio_content_type("songs/a.WAV"), "audio/wav");
        assert_eq!(audio_content_type("a.ogg"), "audio/ogg");
        assert_eq!(audio_content_type("a.m4a"), "audio/mp4");
        assert_eq!(audio_content_type("no-extension"), "audio/mpeg");
    }

    #[test]
    fn resolve_puts_proxy_first_and_encodes_path() {
        let store = Arc::new(StoreClient::new("http://store.example", "anon", None).unwrap());
        let resolver = SourceResolver::new("http://memobook.example:8080/", store);

        let sources = resolver.resolve(&track("songs/Hello World.mp3"));

        assert_eq!(sources.len(), 2);
        assert!(sources[0].starts_with("http://memobook.example:8080/api/music-play?"));
        assert!(sources[0].ends_with("path=songs%2FHello+World.mp3"));
        assert!(sources[1].ends_with("/storage/v1/object/public/songs/songs/Hello%20World.mp3"));
    }

    #[test]
    fn resolve_skips_proxy_when_base_url_is_invalid() {
        let store = Arc::new(StoreClient::new("http://store.example", "anon", None).unwrap());
        let resolver = SourceResolver::new("not a url", store);

        let sources = resolver.resolve(&track("songs/a.mp3"));

        assert_eq!(sources.len(), 1);
        assert!(sources[0].contains("/storage/v1/object/public/songs/"));
    }
}
