//! Tests du contrôleur de playlist avec un backend scripté.
//!
//! Le backend enregistre chaque commande reçue et répond par les événements
//! qu'un élément audio produirait : `Loaded` au chargement d'une source
//! saine, `LoadError` pour une source marquée défaillante, `Play`/`Pause`
//! en écho des commandes de transport.

use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::broadcast;

use mbcatalog::Track;
use mbplayer::{
    AdapterSignal, BackendEvent, CatalogProvider, ControllerEvent, CrossfadeOptions,
    EngineAdapter, EngineBackend, EngineId, EngineState, NoticeLevel, PlayerOptions,
    PlaylistController,
};

// ============================================================================
// BACKEND SCRIPTÉ
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Load(u64, String),
    Play(u64),
    Pause(u64),
    Stop(u64),
    SetVolume(u64, f32),
    Seek(u64, f64),
}

#[derive(Debug)]
struct ScriptedBackend {
    events: broadcast::Sender<BackendEvent>,
    commands: StdMutex<Vec<Command>>,
    failing: StdMutex<HashSet<String>>,
}

impl ScriptedBackend {
    fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            events,
            commands: StdMutex::new(Vec::new()),
            failing: StdMutex::new(HashSet::new()),
        })
    }

    /// Marque une URL comme impossible à charger.
    fn fail_url(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    /// Injecte un événement, comme le ferait la page.
    fn emit(&self, event: BackendEvent) {
        let _ = self.events.send(event);
    }

    fn record(&self, command: Command) {
        self.commands.lock().unwrap().push(command);
    }

    fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    fn loads(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::Load(_, url) => Some(url),
                _ => None,
            })
            .collect()
    }

    fn last_load_id(&self) -> Option<u64> {
        self.commands()
            .into_iter()
            .rev()
            .find_map(|c| match c {
                Command::Load(id, _) => Some(id),
                _ => None,
            })
    }

    fn play_count(&self) -> usize {
        self.commands()
            .iter()
            .filter(|c| matches!(c, Command::Play(_)))
            .count()
    }

    fn volume_levels_for(&self, engine_id: u64) -> Vec<f32> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::SetVolume(id, level) if id == engine_id => Some(level),
                _ => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl EngineBackend for ScriptedBackend {
    async fn load(&self, id: EngineId, url: &str) -> mbplayer::Result<()> {
        self.record(Command::Load(id.0, url.to_string()));
        if self.failing.lock().unwrap().contains(url) {
            self.emit(BackendEvent::LoadError {
                id,
                message: "scripted failure".to_string(),
            });
        } else {
            self.emit(BackendEvent::Loaded {
                id,
                duration_seconds: 180.0,
            });
        }
        Ok(())
    }

    async fn play(&self, id: EngineId) -> mbplayer::Result<()> {
        self.record(Command::Play(id.0));
        self.emit(BackendEvent::Play { id });
        Ok(())
    }

    async fn pause(&self, id: EngineId) -> mbplayer::Result<()> {
        self.record(Command::Pause(id.0));
        self.emit(BackendEvent::Pause { id });
        Ok(())
    }

    async fn stop(&self, id: EngineId) -> mbplayer::Result<()> {
        self.record(Command::Stop(id.0));
        self.emit(BackendEvent::Stop { id });
        Ok(())
    }

    async fn set_volume(&self, id: EngineId, level: f32) -> mbplayer::Result<()> {
        self.record(Command::SetVolume(id.0, level));
        Ok(())
    }

    async fn seek(&self, id: EngineId, seconds: f64) -> mbplayer::Result<()> {
        self.record(Command::Seek(id.0, seconds));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.events.subscribe()
    }
}

// ============================================================================
// FOURNISSEUR DE CATALOGUE SCRIPTÉ
// ============================================================================

#[derive(Debug)]
struct ScriptedProvider {
    tracks: StdMutex<Vec<Track>>,
}

impl ScriptedProvider {
    fn new(tracks: Vec<Track>) -> Arc<Self> {
        Arc::new(Self {
            tracks: StdMutex::new(tracks),
        })
    }

    fn set_tracks(&self, tracks: Vec<Track>) {
        *self.tracks.lock().unwrap() = tracks;
    }
}

#[async_trait::async_trait]
impl CatalogProvider for ScriptedProvider {
    async fn fetch(&self) -> Vec<Track> {
        self.tracks.lock().unwrap().clone()
    }

    fn resolve(&self, track: &Track) -> Vec<String> {
        vec![
            format!("test://{}/primary", track.id),
            format!("test://{}/fallback", track.id),
        ]
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn track(id: i64, title: &str) -> Track {
    Track {
        id,
        title: title.to_string(),
        file_path: format!("songs/{title}.mp3"),
        artist: None,
        created_by: None,
        created_at: None,
    }
}

/// Options déterministes : pas de mélange, pas de fondu, pas d'effets.
fn quiet_options() -> PlayerOptions {
    PlayerOptions {
        autoplay: false,
        auto_hide: false,
        shuffle_on_fetch: false,
        visual_effects: false,
        crossfade: None,
        initial_volume: 0.5,
        refresh_interval: Duration::from_secs(3600),
        effect_linger: Duration::from_millis(30),
    }
}

fn build(
    options: PlayerOptions,
) -> (
    Arc<PlaylistController>,
    Arc<ScriptedBackend>,
    Arc<ScriptedProvider>,
) {
    let backend = ScriptedBackend::new();
    let provider = ScriptedProvider::new(Vec::new());
    let backend_dyn: Arc<dyn EngineBackend> = backend.clone();
    let provider_dyn: Arc<dyn CatalogProvider> = provider.clone();
    let controller = PlaylistController::new(options, backend_dyn, provider_dyn);
    (controller, backend, provider)
}

/// Laisse la pompe d'événements traiter ce qui est en vol.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(60)).await;
}

fn drain(rx: &mut broadcast::Receiver<ControllerEvent>) -> Vec<ControllerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ============================================================================
// ADAPTATEUR DE MOTEUR
// ============================================================================

#[tokio::test]
async fn adapter_walks_sources_in_order() {
    let backend = ScriptedBackend::new();
    backend.fail_url("test://1/primary");
    let mut rx = backend.subscribe();

    let backend_dyn: Arc<dyn EngineBackend> = backend.clone();
    let mut adapter = EngineAdapter::new(
        backend_dyn,
        vec![
            "test://1/primary".to_string(),
            "test://1/fallback".to_string(),
        ],
    );
    adapter.load().await.unwrap();
    assert_eq!(adapter.state(), EngineState::Loading);

    // L'échec de la source primaire est absorbé : bascule silencieuse.
    let event = rx.recv().await.unwrap();
    assert!(matches!(event, BackendEvent::LoadError { .. }));
    assert_eq!(adapter.on_event(event).await, None);
    assert_eq!(adapter.source_index(), 1);
    assert_eq!(
        backend.loads(),
        vec!["test://1/primary", "test://1/fallback"]
    );

    // La source de repli se charge.
    let event = rx.recv().await.unwrap();
    let signal = adapter.on_event(event).await;
    assert_eq!(
        signal,
        Some(AdapterSignal::Loaded {
            duration_seconds: 180.0
        })
    );
    assert_eq!(adapter.state(), EngineState::Ready);
}

#[tokio::test]
async fn adapter_fails_only_after_exhausting_sources() {
    let backend = ScriptedBackend::new();
    backend.fail_url("test://2/primary");
    backend.fail_url("test://2/fallback");
    let mut rx = backend.subscribe();

    let backend_dyn: Arc<dyn EngineBackend> = backend.clone();
    let mut adapter = EngineAdapter::new(
        backend_dyn,
        vec![
            "test://2/primary".to_string(),
            "test://2/fallback".to_string(),
        ],
    );
    adapter.load().await.unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(adapter.on_event(event).await, None);

    let event = rx.recv().await.unwrap();
    assert_eq!(adapter.on_event(event).await, Some(AdapterSignal::Failed));
    assert_eq!(adapter.state(), EngineState::LoadError);

    // État terminal : plus rien n'est observable.
    let stale = BackendEvent::Loaded {
        id: adapter.id(),
        duration_seconds: 10.0,
    };
    assert_eq!(adapter.on_event(stale).await, None);
    assert_eq!(adapter.state(), EngineState::LoadError);
}

#[tokio::test]
async fn adapter_clamps_seek_and_volume() {
    let backend = ScriptedBackend::new();
    let mut rx = backend.subscribe();
    let backend_dyn: Arc<dyn EngineBackend> = backend.clone();
    let mut adapter = EngineAdapter::new(backend_dyn, vec!["test://3/primary".to_string()]);
    adapter.load().await.unwrap();
    let event = rx.recv().await.unwrap();
    adapter.on_event(event).await;
    assert_eq!(adapter.duration_seconds(), 180.0);

    adapter.set_volume(1.7).await.unwrap();
    assert_eq!(adapter.volume(), 1.0);
    adapter.set_volume(-0.2).await.unwrap();
    assert_eq!(adapter.volume(), 0.0);

    assert_eq!(adapter.seek(-5.0).await.unwrap(), 0.0);
    assert_eq!(adapter.seek(500.0).await.unwrap(), 180.0);
    assert_eq!(adapter.seek(90.0).await.unwrap(), 90.0);
}

#[tokio::test]
async fn adapter_ignores_events_after_stop() {
    let backend = ScriptedBackend::new();
    let backend_dyn: Arc<dyn EngineBackend> = backend.clone();
    let mut adapter = EngineAdapter::new(backend_dyn, vec!["test://4/primary".to_string()]);
    adapter.load().await.unwrap();
    adapter.stop().await.unwrap();
    assert_eq!(adapter.state(), EngineState::Stopped);

    let late = BackendEvent::Ended { id: adapter.id() };
    assert_eq!(adapter.on_event(late).await, None);
    let late = BackendEvent::Loaded {
        id: adapter.id(),
        duration_seconds: 60.0,
    };
    assert_eq!(adapter.on_event(late).await, None);
    assert_eq!(adapter.state(), EngineState::Stopped);
}

// ============================================================================
// CONTRÔLEUR : DÉMARRAGE ET BARRIÈRE D'AUTOPLAY
// ============================================================================

#[tokio::test]
async fn start_defers_autoplay_until_first_interaction() {
    let options = PlayerOptions {
        autoplay: true,
        ..quiet_options()
    };
    let (controller, backend, _provider) = build(options);

    controller.start(vec![track(1, "Aube")]).await;
    settle().await;

    // Chargé, mais la lecture attend le premier geste.
    assert_eq!(backend.loads().len(), 1);
    assert_eq!(backend.play_count(), 0);

    controller.notify_interaction().await;
    settle().await;
    assert_eq!(backend.play_count(), 1);
    assert!(controller.get_state().await.session.is_playing);

    // À usage unique : un second geste ne relance rien.
    controller.notify_interaction().await;
    settle().await;
    assert_eq!(backend.play_count(), 1);

    controller.shutdown().await;
}

#[tokio::test]
async fn start_with_empty_catalog_loads_nothing() {
    let (controller, backend, _provider) = build(quiet_options());
    controller.start(Vec::new()).await;
    settle().await;

    assert!(backend.commands().is_empty());
    let state = controller.get_state().await;
    assert_eq!(state.track_count, 0);
    assert!(state.current_track.is_none());

    controller.shutdown().await;
}

#[tokio::test]
async fn explicit_play_counts_as_interaction() {
    let options = PlayerOptions {
        autoplay: true,
        ..quiet_options()
    };
    let (controller, backend, _provider) = build(options);
    controller.start(vec![track(1, "Aurore")]).await;
    settle().await;
    assert_eq!(backend.play_count(), 0);

    controller.toggle_play().await;
    settle().await;
    assert_eq!(backend.play_count(), 1);

    controller.shutdown().await;
}

// ============================================================================
// CONTRÔLEUR : AVANCEMENT
// ============================================================================

#[tokio::test]
async fn next_is_a_noop_with_a_single_track() {
    let (controller, backend, _provider) = build(quiet_options());
    controller.start(vec![track(1, "Seule")]).await;
    settle().await;
    assert_eq!(backend.loads().len(), 1);

    controller.next().await;
    controller.previous().await;
    settle().await;

    assert_eq!(backend.loads().len(), 1);
    assert_eq!(controller.get_state().await.session.current_index, 0);

    controller.shutdown().await;
}

#[tokio::test]
async fn next_never_repeats_the_current_index() {
    let (controller, _backend, _provider) = build(quiet_options());
    controller
        .start(vec![track(1, "Un"), track(2, "Deux"), track(3, "Trois")])
        .await;

    for _ in 0..20 {
        let before = controller.get_state().await.session.current_index;
        controller.next().await;
        let after = controller.get_state().await.session.current_index;
        assert_ne!(before, after);
        assert!(after < 3);
    }

    controller.shutdown().await;
}

#[tokio::test]
async fn ended_without_crossfade_advances_immediately() {
    let (controller, backend, _provider) = build(quiet_options());
    let mut rx = controller.subscribe();
    controller.start(vec![track(1, "Un"), track(2, "Deux")]).await;
    settle().await;
    let first_engine = backend.last_load_id().unwrap();

    backend.emit(BackendEvent::Ended {
        id: EngineId(first_engine),
    });
    settle().await;

    assert_eq!(backend.loads().len(), 2);
    assert_eq!(controller.get_state().await.session.current_index, 1);
    let events = drain(&mut rx);
    assert!(!events
        .iter()
        .any(|e| matches!(e, ControllerEvent::CrossfadeStarted { .. })));

    controller.shutdown().await;
}

#[tokio::test]
async fn failed_track_advances_without_notice() {
    let (controller, backend, _provider) = build(quiet_options());
    backend.fail_url("test://1/primary");
    backend.fail_url("test://1/fallback");
    let mut rx = controller.subscribe();

    controller.start(vec![track(1, "Cassé"), track(2, "Sain")]).await;
    settle().await;

    // Les deux sources du premier morceau échouent, puis le second se charge.
    assert_eq!(
        backend.loads(),
        vec!["test://1/primary", "test://1/fallback", "test://2/primary"]
    );
    assert_eq!(controller.get_state().await.session.current_index, 1);

    let events = drain(&mut rx);
    assert!(!events
        .iter()
        .any(|e| matches!(e, ControllerEvent::Notice { .. })));

    controller.shutdown().await;
}

#[tokio::test]
async fn stale_engine_events_are_ignored() {
    let (controller, backend, _provider) = build(quiet_options());
    controller.start(vec![track(1, "Un"), track(2, "Deux")]).await;
    settle().await;
    let loads_before = backend.loads().len();

    backend.emit(BackendEvent::Ended {
        id: EngineId(999_999),
    });
    settle().await;

    assert_eq!(backend.loads().len(), loads_before);
    assert_eq!(controller.get_state().await.session.current_index, 0);

    controller.shutdown().await;
}

// ============================================================================
// CONTRÔLEUR : FONDU ET EFFETS
// ============================================================================

#[tokio::test]
async fn crossfade_ramps_engine_volume_then_advances() {
    let options = PlayerOptions {
        autoplay: true,
        visual_effects: true,
        crossfade: Some(CrossfadeOptions {
            steps: 4,
            interval: Duration::from_millis(20),
        }),
        ..quiet_options()
    };
    let (controller, backend, _provider) = build(options);
    controller.notify_interaction().await;
    let mut rx = controller.subscribe();

    controller.start(vec![track(1, "Un"), track(2, "Deux")]).await;
    settle().await;
    let first_engine = backend.last_load_id().unwrap();
    assert!(controller.get_state().await.session.is_playing);

    backend.emit(BackendEvent::Ended {
        id: EngineId(first_engine),
    });
    // Rampe de 4 × 20 ms, puis rémanence de l'effet (30 ms).
    tokio::time::sleep(Duration::from_millis(300)).await;

    // Volume du moteur : consigne initiale puis descente stricte vers zéro.
    assert_eq!(
        backend.volume_levels_for(first_engine),
        vec![0.5, 0.375, 0.25, 0.125, 0.0]
    );

    // Le morceau suivant est parti, à la consigne de session intacte.
    let second_engine = backend.last_load_id().unwrap();
    assert_ne!(second_engine, first_engine);
    assert_eq!(backend.volume_levels_for(second_engine), vec![0.5]);
    let state = controller.get_state().await;
    assert_eq!(state.session.volume, 0.5);
    assert!(!state.session.is_crossfading);

    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, ControllerEvent::CrossfadeStarted { from_index: 0 })));
    // Un effet apparaît au début du fondu puis s'efface après la rémanence.
    let effects: Vec<bool> = events
        .iter()
        .filter_map(|e| match e {
            ControllerEvent::EffectChanged { effect } => Some(effect.is_some()),
            _ => None,
        })
        .collect();
    assert_eq!(effects, vec![true, false]);

    controller.shutdown().await;
}

#[tokio::test]
async fn volume_set_during_crossfade_is_deferred() {
    let options = PlayerOptions {
        autoplay: true,
        crossfade: Some(CrossfadeOptions {
            steps: 50,
            interval: Duration::from_millis(40),
        }),
        ..quiet_options()
    };
    let (controller, backend, _provider) = build(options);
    controller.notify_interaction().await;
    controller.start(vec![track(1, "Un"), track(2, "Deux")]).await;
    settle().await;
    let first_engine = backend.last_load_id().unwrap();

    backend.emit(BackendEvent::Ended {
        id: EngineId(first_engine),
    });
    settle().await;
    assert!(controller.get_state().await.session.is_crossfading);

    // La consigne change pendant la rampe : retenue, pas appliquée au moteur.
    controller.set_volume(0.9).await;
    let state = controller.get_state().await;
    assert_eq!(state.session.volume, 0.9);
    assert!(!backend
        .volume_levels_for(first_engine)
        .contains(&0.9));

    controller.shutdown().await;
}

// ============================================================================
// CONTRÔLEUR : PLAYLIST
// ============================================================================

#[tokio::test]
async fn shuffle_remaining_pins_current_track_first() {
    let (controller, backend, _provider) = build(quiet_options());
    let tracks: Vec<Track> = (1..=5).map(|i| track(i, &format!("Morceau {i}"))).collect();
    controller.start(tracks).await;
    settle().await;
    controller.next().await;
    settle().await;

    let current = controller.get_state().await.current_track.unwrap();
    let loads_before = backend.loads().len();
    let mut rx = controller.subscribe();

    controller.shuffle_remaining().await;

    let state = controller.get_state().await;
    assert_eq!(state.session.current_index, 0);
    assert_eq!(state.current_track.unwrap().id, current.id);
    assert_eq!(state.track_count, 5);
    // Pas de rechargement : la lecture continue.
    assert_eq!(backend.loads().len(), loads_before);

    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, ControllerEvent::PlaylistChanged { track_count: 5 })));
    assert!(events.iter().any(|e| matches!(
        e,
        ControllerEvent::Notice {
            level: NoticeLevel::Info,
            ..
        }
    )));

    controller.shutdown().await;
}

#[tokio::test]
async fn toggle_play_pauses_and_resumes() {
    let (controller, backend, _provider) = build(quiet_options());
    controller.start(vec![track(1, "Un")]).await;
    settle().await;

    controller.toggle_play().await;
    settle().await;
    assert!(controller.get_state().await.session.is_playing);
    assert_eq!(backend.play_count(), 1);

    controller.toggle_play().await;
    settle().await;
    assert!(!controller.get_state().await.session.is_playing);

    controller.shutdown().await;
}

#[tokio::test]
async fn set_volume_clamps_to_unit_range() {
    let (controller, backend, _provider) = build(quiet_options());
    controller.start(vec![track(1, "Un")]).await;
    settle().await;
    let engine = backend.last_load_id().unwrap();

    controller.set_volume(1.8).await;
    assert_eq!(controller.get_state().await.session.volume, 1.0);
    controller.set_volume(-0.4).await;
    assert_eq!(controller.get_state().await.session.volume, 0.0);

    let levels = backend.volume_levels_for(engine);
    assert_eq!(levels, vec![0.5, 1.0, 0.0]);

    controller.shutdown().await;
}

// ============================================================================
// CONTRÔLEUR : RAFRAÎCHISSEMENT DU CATALOGUE
// ============================================================================

#[tokio::test]
async fn refresh_follows_the_current_track() {
    let (controller, backend, provider) = build(quiet_options());
    controller
        .start(vec![track(1, "Un"), track(2, "Deux"), track(3, "Trois")])
        .await;
    settle().await;
    let loads_before = backend.loads().len();

    // Le morceau courant (id 1) change de position dans le nouveau catalogue.
    provider.set_tracks(vec![track(3, "Trois"), track(2, "Deux"), track(1, "Un")]);
    controller.refresh_catalog().await;

    let state = controller.get_state().await;
    assert_eq!(state.track_count, 3);
    assert_eq!(state.current_track.unwrap().id, 1);
    assert_eq!(state.session.current_index, 2);
    // Lecture ininterrompue : aucun rechargement.
    assert_eq!(backend.loads().len(), loads_before);

    controller.shutdown().await;
}

#[tokio::test]
async fn refresh_advances_when_current_track_vanishes() {
    let (controller, backend, provider) = build(quiet_options());
    controller.start(vec![track(1, "Un"), track(2, "Deux")]).await;
    settle().await;
    let loads_before = backend.loads().len();

    provider.set_tracks(vec![track(2, "Deux"), track(3, "Trois")]);
    controller.refresh_catalog().await;
    settle().await;

    let state = controller.get_state().await;
    assert_eq!(state.track_count, 2);
    let current = state.current_track.unwrap();
    assert!(current.id == 2 || current.id == 3);
    assert_eq!(backend.loads().len(), loads_before + 1);

    controller.shutdown().await;
}

#[tokio::test]
async fn refresh_with_empty_catalog_keeps_playing() {
    let (controller, backend, provider) = build(quiet_options());
    controller.start(vec![track(1, "Un"), track(2, "Deux")]).await;
    settle().await;
    let loads_before = backend.loads().len();

    provider.set_tracks(Vec::new());
    controller.refresh_catalog().await;

    let state = controller.get_state().await;
    assert_eq!(state.track_count, 2);
    assert_eq!(state.current_track.unwrap().id, 1);
    assert_eq!(backend.loads().len(), loads_before);

    controller.shutdown().await;
}

#[tokio::test]
async fn refresh_starts_playback_once_catalog_appears() {
    let (controller, backend, provider) = build(quiet_options());
    controller.start(Vec::new()).await;
    settle().await;
    assert!(backend.commands().is_empty());

    provider.set_tracks(vec![track(7, "Sept"), track(8, "Huit")]);
    controller.refresh_catalog().await;
    settle().await;

    assert_eq!(backend.loads(), vec!["test://7/primary"]);
    let state = controller.get_state().await;
    assert_eq!(state.session.current_index, 0);
    assert_eq!(state.current_track.unwrap().id, 7);

    controller.shutdown().await;
}

// ============================================================================
// CONTRÔLEUR : ARRÊT
// ============================================================================

#[tokio::test]
async fn shutdown_stops_engine_and_ignores_late_events() {
    let (controller, backend, _provider) = build(quiet_options());
    controller.start(vec![track(1, "Un"), track(2, "Deux")]).await;
    settle().await;
    let engine = backend.last_load_id().unwrap();

    controller.shutdown().await;
    assert!(backend
        .commands()
        .contains(&Command::Stop(engine)));
    let loads_before = backend.loads().len();

    // Un événement tardif du moteur arrêté ne relance rien.
    backend.emit(BackendEvent::Ended {
        id: EngineId(engine),
    });
    settle().await;
    assert_eq!(backend.loads().len(), loads_before);
    assert!(!controller.get_state().await.session.is_playing);
}
