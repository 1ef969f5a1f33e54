//! Logs en mémoire : buffer circulaire, flux SSE et niveau rechargeable
//!
//! Le layer [`SseLayer`] pousse chaque événement de tracing dans un buffer
//! circulaire partagé et vers un canal broadcast. Les handlers exposent
//! l'historique (`/log-dump`), le temps réel (`/log-sse`) et la configuration
//! du niveau (`/api/log_setup`), rechargée à chaud via `tracing_subscriber`.

mod sselayer;

pub use sselayer::SseLayer;

use std::{
    collections::VecDeque,
    sync::{Arc, RwLock},
    time::SystemTime,
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use mbconfig::Config;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter,
    layer::SubscriberExt,
    reload,
    util::SubscriberInitExt,
    Registry,
};

/// Capacité du canal broadcast des entrées de log
const LOG_CHANNEL_CAPACITY: usize = 1000;

/// Une entrée de log prête à sérialiser
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub level: String,
    pub target: String,
    pub message: String,
}

/// État partagé des logs : historique borné, diffusion, niveau courant
#[derive(Clone)]
pub struct LogState {
    buffer: Arc<RwLock<VecDeque<LogEntry>>>,
    capacity: usize,
    tx: broadcast::Sender<LogEntry>,
    max_level: Arc<RwLock<Level>>,
    reload_handle: Arc<RwLock<reload::Handle<LevelFilter, Registry>>>,
}

impl LogState {
    pub fn new(
        capacity: usize,
        initial_level: Level,
        reload_handle: reload::Handle<LevelFilter, Registry>,
    ) -> Self {
        Self {
            buffer: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
            tx: broadcast::channel(LOG_CHANNEL_CAPACITY).0,
            max_level: Arc::new(RwLock::new(initial_level)),
            reload_handle: Arc::new(RwLock::new(reload_handle)),
        }
    }

    pub fn set_max_level(&self, level: Level) {
        *self.max_level.write().unwrap() = level;

        // Recharger le filtre dynamiquement ; le pipeline de logs est en
        // cours de reconfiguration, on passe par stderr.
        let filter = LevelFilter::from_level(level);
        if let Err(e) = self.reload_handle.write().unwrap().reload(filter) {
            eprintln!("Failed to reload log level filter: {}", e);
        }
    }

    pub fn get_max_level(&self) -> Level {
        *self.max_level.read().unwrap()
    }

    pub(crate) fn push(&self, entry: LogEntry) {
        let mut buf = self.buffer.write().unwrap();
        if buf.len() == self.capacity {
            buf.pop_front();
        }
        buf.push_back(entry.clone());
        let _ = self.tx.send(entry);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.tx.subscribe()
    }

    pub fn dump(&self) -> Vec<LogEntry> {
        self.buffer.read().unwrap().iter().cloned().collect()
    }
}

/// Paramètres de filtrage de `/log-sse`
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub error: Option<bool>,
    #[serde(default)]
    pub warn: Option<bool>,
    #[serde(default)]
    pub info: Option<bool>,
    #[serde(default)]
    pub debug: Option<bool>,
    #[serde(default)]
    pub trace: Option<bool>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Handler SSE : rejoue l'historique puis suit le flux en direct
pub async fn log_sse(
    State(state): State<LogState>,
    Query(params): Query<LogQuery>,
) -> impl IntoResponse {
    let mut rx = state.subscribe();

    // Historique du buffer et niveau courant
    let history = state.dump();
    let stream_state = state.clone();
    let current_level = stream_state.get_max_level();

    let stream = async_stream::stream! {
        // 1. L'historique, filtré par le niveau courant
        for entry in history {
            if !is_level_allowed(&entry.level, current_level) {
                continue;
            }
            if !filter_entry(&entry, &params) {
                continue;
            }
            if let Ok(json) = serde_json::to_string(&entry) {
                yield Ok::<_, axum::Error>(Event::default().data(json));
            }
        }

        // 2. Puis les nouvelles entrées en temps réel
        while let Ok(entry) = rx.recv().await {
            let max_level = stream_state.get_max_level();
            if !is_level_allowed(&entry.level, max_level) {
                continue;
            }
            if !filter_entry(&entry, &params) {
                continue;
            }
            if let Ok(json) = serde_json::to_string(&entry) {
                yield Ok::<_, axum::Error>(Event::default().data(json));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handler REST : dump JSON du buffer circulaire
pub async fn log_dump(State(state): State<LogState>) -> impl IntoResponse {
    Json(state.dump())
}

/// Une entrée passe-t-elle le niveau maximum configuré ?
///
/// Les niveaux de tracing s'ordonnent du moins verbeux au plus verbeux ;
/// un niveau non reconnu est écarté.
fn is_level_allowed(log_level: &str, max_level: Level) -> bool {
    match log_level.parse::<Level>() {
        Ok(level) => level <= max_level,
        Err(_) => false,
    }
}

/// Applique les filtres de la requête SSE à une entrée
///
/// Sans aucun flag de niveau, tout passe ; sinon seuls les niveaux cochés
/// passent. Le mot-clé `search` restreint ensuite sur le message ou la cible.
fn filter_entry(entry: &LogEntry, q: &LogQuery) -> bool {
    let flags = [
        (q.error, "error"),
        (q.warn, "warn"),
        (q.info, "info"),
        (q.debug, "debug"),
        (q.trace, "trace"),
    ];

    let any_flag = flags.iter().any(|(flag, _)| flag.unwrap_or(false));
    let lvl = entry.level.to_lowercase();
    let mut allowed = !any_flag
        || flags
            .iter()
            .any(|(flag, name)| flag.unwrap_or(false) && lvl == *name);

    if let Some(search) = &q.search {
        allowed &= entry.message.contains(search) || entry.target.contains(search);
    }

    allowed
}

/// Monte le pipeline de logging : filtre rechargeable, SSE, console en option
///
/// Le niveau minimum, la capacité du buffer et la sortie console viennent de
/// la section `host.logger` de la configuration.
///
/// # Retourne
///
/// Le `LogState` à passer à [`crate::Server::attach_logs`].
pub fn init_logging(config: &Config) -> LogState {
    let level = config
        .get_log_min_level()
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let (filter, reload_handle) = reload::Layer::new(LevelFilter::from_level(level));

    let buffer_capacity = config.get_log_cache_size().unwrap_or(1000);
    let log_state = LogState::new(buffer_capacity, level, reload_handle);

    // Le filtre rechargeable s'applique avant le SseLayer
    let subscriber = Registry::default()
        .with(filter)
        .with(SseLayer::new(log_state.clone()));

    let enable_console = config.get_log_enable_console().unwrap_or(true);

    if enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .init();
    } else {
        subscriber.init();
    }

    log_state
}

/// Corps de la requête de changement de niveau
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LogSetupRequest {
    pub level: String,
}

/// Niveau courant et niveaux disponibles
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LogSetupResponse {
    pub current_level: String,
    pub available_levels: Vec<String>,
}

/// Handler GET /api/log_setup : niveau de log courant
#[utoipa::path(
    get,
    path = "/api/log_setup",
    responses(
        (status = 200, description = "Log configuration retrieved successfully", body = LogSetupResponse)
    ),
    tag = "logs"
)]
pub async fn log_setup_get(State(state): State<LogState>) -> impl IntoResponse {
    Json(LogSetupResponse {
        current_level: state.get_max_level().to_string(),
        available_levels: available_levels(),
    })
}

/// Handler POST /api/log_setup : change le niveau de log à chaud
#[utoipa::path(
    post,
    path = "/api/log_setup",
    request_body = LogSetupRequest,
    responses(
        (status = 200, description = "Log level updated successfully", body = LogSetupResponse),
        (status = 400, description = "Invalid log level")
    ),
    tag = "logs"
)]
pub async fn log_setup_post(
    State(state): State<LogState>,
    Json(payload): Json<LogSetupRequest>,
) -> impl IntoResponse {
    let level = match payload.level.parse::<Level>() {
        Ok(l) => l,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "Unknown log level, expected one of: ERROR, WARN, INFO, DEBUG, TRACE"
                })),
            )
                .into_response();
        }
    };

    state.set_max_level(level);
    tracing::info!("Log level set to {}", level);

    (
        StatusCode::OK,
        Json(LogSetupResponse {
            current_level: level.to_string(),
            available_levels: available_levels(),
        }),
    )
        .into_response()
}

fn available_levels() -> Vec<String> {
    ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Router des endpoints de configuration des logs
///
/// Le chemin complet est déclaré ici ; le router est mergé tel quel au
/// router principal.
pub fn create_logs_router(log_state: LogState) -> axum::Router {
    use axum::routing::get;
    axum::Router::new()
        .route("/api/log_setup", get(log_setup_get).post(log_setup_post))
        .with_state(log_state)
}

/// Documentation OpenAPI des endpoints de logs
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        log_setup_get,
        log_setup_post,
    ),
    components(
        schemas(LogSetupRequest, LogSetupResponse)
    ),
    tags(
        (name = "logs", description = "Log level configuration endpoints")
    )
)]
pub struct LogsApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> LogState {
        let (_, handle) = reload::Layer::<LevelFilter, Registry>::new(LevelFilter::INFO);
        LogState::new(3, Level::INFO, handle)
    }

    fn entry(level: &str, message: &str) -> LogEntry {
        LogEntry {
            timestamp: SystemTime::now(),
            level: level.to_string(),
            target: "mbserver::tests".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_buffer_drops_oldest_entries() {
        let state = state();
        for i in 0..5 {
            state.push(entry("INFO", &format!("message {}", i)));
        }

        let dump = state.dump();
        assert_eq!(dump.len(), 3);
        assert_eq!(dump[0].message, "message 2");
        assert_eq!(dump[2].message, "message 4");
    }

    #[test]
    fn test_level_gate_follows_max_level() {
        assert!(is_level_allowed("ERROR", Level::WARN));
        assert!(is_level_allowed("WARN", Level::WARN));
        assert!(!is_level_allowed("INFO", Level::WARN));
        assert!(is_level_allowed("trace", Level::TRACE));
        assert!(!is_level_allowed("unknown", Level::TRACE));
    }

    #[test]
    fn test_query_filter_defaults_to_everything() {
        let q = LogQuery {
            error: None,
            warn: None,
            info: None,
            debug: None,
            trace: None,
            search: None,
        };
        assert!(filter_entry(&entry("INFO", "hello"), &q));

        let q = LogQuery {
            error: Some(true),
            warn: None,
            info: None,
            debug: None,
            trace: None,
            search: None,
        };
        assert!(filter_entry(&entry("ERROR", "boom"), &q));
        assert!(!filter_entry(&entry("INFO", "hello"), &q));
    }

    #[test]
    fn test_search_filter_matches_message_and_target() {
        let q = LogQuery {
            error: None,
            warn: None,
            info: None,
            debug: None,
            trace: None,
            search: Some("mbserver".to_string()),
        };
        assert!(filter_entry(&entry("INFO", "hello"), &q));

        let q = LogQuery {
            search: Some("absent".to_string()),
            error: None,
            warn: None,
            info: None,
            debug: None,
            trace: None,
        };
        assert!(!filter_entry(&entry("INFO", "hello"), &q));
    }
}
