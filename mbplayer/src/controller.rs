use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use mbcatalog::Track;

use crate::effects::VisualEffect;
use crate::engine::{AdapterSignal, BackendEvent, EngineAdapter, EngineBackend, EngineId};
use crate::events::{ControllerEvent, NoticeLevel};
use crate::options::PlayerOptions;
use crate::provider::CatalogProvider;
use crate::session::PlaybackSession;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Photographie de l'état du lecteur, pour l'API et les tests.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub session: PlaybackSession,
    pub current_track: Option<Track>,
    pub track_count: usize,
    pub effect: Option<VisualEffect>,
}

/// État mutable du contrôleur, derrière un seul verrou.
struct Inner {
    playlist: Vec<Track>,
    session: PlaybackSession,
    engine: Option<EngineAdapter>,
    current_effect: Option<VisualEffect>,
    /// Le premier geste utilisateur n'est pas encore arrivé.
    interaction_armed: bool,
    /// Un morceau est chargé et attend le premier geste pour démarrer.
    autoplay_pending: bool,
    crossfade_task: Option<JoinHandle<()>>,
    effect_task: Option<JoinHandle<()>>,
}

impl Inner {
    fn cancel_crossfade(&mut self) {
        if let Some(handle) = self.crossfade_task.take() {
            handle.abort();
        }
        self.session.is_crossfading = false;
    }

    fn cancel_effect_timer(&mut self) {
        if let Some(handle) = self.effect_task.take() {
            handle.abort();
        }
    }
}

/// Contrôleur de playlist ambiante.
///
/// Cycle de vie : récupération du catalogue, mélange, lecture du premier
/// morceau, fondu de fin, morceau suivant tiré au hasard. Le contrôleur
/// tourne côté serveur ; il pilote un [`EngineBackend`] par commandes et
/// réagit aux événements que le backend lui renvoie. Toutes les opérations
/// publiques absorbent les échecs du backend : un site de fond sonore
/// préfère le silence à une page d'erreur.
pub struct PlaylistController {
    options: PlayerOptions,
    backend: Arc<dyn EngineBackend>,
    catalog: Arc<dyn CatalogProvider>,
    inner: Mutex<Inner>,
    events: broadcast::Sender<ControllerEvent>,
    background: std::sync::Mutex<Vec<JoinHandle<()>>>,
}

impl PlaylistController {
    /// Crée le contrôleur et démarre ses tâches de fond (pompe d'événements
    /// du backend, rafraîchissement périodique du catalogue).
    ///
    /// Le contrôleur reste vivant tant que ses tâches tournent ; appeler
    /// [`shutdown`](Self::shutdown) pour le libérer.
    pub fn new(
        options: PlayerOptions,
        backend: Arc<dyn EngineBackend>,
        catalog: Arc<dyn CatalogProvider>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session = PlaybackSession {
            volume: options.initial_volume.clamp(0.0, 1.0),
            ..PlaybackSession::default()
        };

        let controller = Arc::new(Self {
            options,
            backend,
            catalog,
            inner: Mutex::new(Inner {
                playlist: Vec::new(),
                session,
                engine: None,
                current_effect: None,
                interaction_armed: true,
                autoplay_pending: false,
                crossfade_task: None,
                effect_task: None,
            }),
            events,
            background: std::sync::Mutex::new(Vec::new()),
        });

        controller.spawn_event_pump();
        controller.spawn_refresh_task();
        controller
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    /// S'abonne aux événements du contrôleur.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Photographie de l'état courant.
    pub async fn get_state(&self) -> PlayerState {
        let inner = self.inner.lock().await;
        PlayerState {
            session: inner.session.clone(),
            current_track: inner.playlist.get(inner.session.current_index).cloned(),
            track_count: inner.playlist.len(),
            effect: inner.current_effect,
        }
    }

    /// Installe une playlist et lance le premier morceau.
    ///
    /// Le catalogue est mélangé si `shuffle_on_fetch` est actif ; la lecture
    /// démarre à l'index 0. Un catalogue vide installe une playlist vide et
    /// ne charge rien.
    pub async fn start(&self, catalog: Vec<Track>) {
        let mut inner = self.inner.lock().await;
        let mut playlist = catalog;
        if self.options.shuffle_on_fetch {
            playlist.shuffle(&mut rand::rng());
        }
        info!("🎵 Starting playlist with {} tracks", playlist.len());
        inner.playlist = playlist;
        inner.session.current_index = 0;
        self.emit(ControllerEvent::PlaylistChanged {
            track_count: inner.playlist.len(),
        });
        if inner.playlist.is_empty() {
            return;
        }
        self.start_track(&mut inner, 0).await;
    }

    /// Bascule lecture/pause. Vaut geste utilisateur pour la barrière
    /// d'autoplay.
    pub async fn toggle_play(&self) {
        let mut inner = self.inner.lock().await;
        if inner.session.is_playing {
            self.pause_locked(&mut inner).await;
        } else {
            self.play_locked(&mut inner).await;
        }
    }

    pub async fn play(&self) {
        let mut inner = self.inner.lock().await;
        self.play_locked(&mut inner).await;
    }

    pub async fn pause(&self) {
        let mut inner = self.inner.lock().await;
        self.pause_locked(&mut inner).await;
    }

    /// Passe à un morceau tiré au hasard, différent du courant.
    pub async fn next(&self) {
        self.advance_random().await;
    }

    /// La playlist étant déjà mélangée, revenir en arrière est un nouveau
    /// tirage au même titre qu'avancer.
    pub async fn previous(&self) {
        self.advance_random().await;
    }

    /// Règle le volume de session, borné entre 0.0 et 1.0.
    ///
    /// Pendant un fondu le volume du moteur appartient à la rampe ; la
    /// consigne est retenue et s'appliquera au morceau suivant.
    pub async fn set_volume(&self, level: f32) {
        let level = level.clamp(0.0, 1.0);
        let mut inner = self.inner.lock().await;
        inner.session.volume = level;
        if !inner.session.is_crossfading {
            if let Some(adapter) = inner.engine.as_mut() {
                let _ = adapter.set_volume(level).await;
            }
        }
        self.emit_state(&inner.session);
    }

    /// Déplace la tête de lecture du morceau courant.
    pub async fn seek(&self, seconds: f64) {
        let mut inner = self.inner.lock().await;
        let Some(adapter) = inner.engine.as_mut() else {
            return;
        };
        match adapter.seek(seconds).await {
            Ok(position) => {
                inner.session.position_seconds = position;
                self.emit_state(&inner.session);
            }
            Err(e) => warn!("Seek command failed: {e}"),
        }
    }

    /// Re-mélange la suite de la playlist sans toucher au morceau courant.
    ///
    /// Le morceau courant passe en tête, le reste est redistribué ; le moteur
    /// n'est pas rechargé, la lecture continue.
    pub async fn shuffle_remaining(&self) {
        let mut inner = self.inner.lock().await;
        if inner.playlist.len() <= 1 {
            return;
        }
        let current = inner.session.current_index.min(inner.playlist.len() - 1);
        let mut rest = std::mem::take(&mut inner.playlist);
        let current_track = rest.swap_remove(current);
        rest.shuffle(&mut rand::rng());

        let mut playlist = Vec::with_capacity(rest.len() + 1);
        playlist.push(current_track);
        playlist.extend(rest);
        inner.playlist = playlist;
        inner.session.current_index = 0;

        info!("Playlist reshuffled, current track pinned first");
        self.emit(ControllerEvent::PlaylistChanged {
            track_count: inner.playlist.len(),
        });
        self.emit(ControllerEvent::Notice {
            level: NoticeLevel::Info,
            message: "Playlist shuffled".to_string(),
        });
        self.emit_state(&inner.session);
    }

    /// Recharge le catalogue et réconcilie la playlist.
    ///
    /// Le morceau courant est suivi par identifiant : s'il figure encore
    /// dans le nouveau catalogue la lecture continue sans coupure, sinon le
    /// contrôleur enchaîne sur un autre morceau. Une récupération vide
    /// conserve la playlist en place.
    pub async fn refresh_catalog(&self) {
        let fetched = self.catalog.fetch().await;
        if fetched.is_empty() {
            debug!("Catalog refresh returned nothing, keeping current playlist");
            return;
        }

        let mut inner = self.inner.lock().await;
        let current_id = inner
            .playlist
            .get(inner.session.current_index)
            .map(|track| track.id);
        let was_empty = inner.playlist.is_empty();

        let mut playlist = fetched;
        if self.options.shuffle_on_fetch {
            playlist.shuffle(&mut rand::rng());
        }
        inner.playlist = playlist;
        self.emit(ControllerEvent::PlaylistChanged {
            track_count: inner.playlist.len(),
        });

        if was_empty {
            info!(
                "🎵 Catalog now has {} tracks, starting playback",
                inner.playlist.len()
            );
            inner.session.current_index = 0;
            self.start_track(&mut inner, 0).await;
            return;
        }

        let found = current_id.and_then(|id| inner.playlist.iter().position(|t| t.id == id));
        match found {
            Some(position) => {
                inner.session.current_index = position;
                self.emit_state(&inner.session);
            }
            None => {
                info!("Current track left the catalog, advancing");
                let target = rand::rng().random_range(0..inner.playlist.len());
                self.start_track(&mut inner, target).await;
            }
        }
    }

    /// Signale le premier geste utilisateur de la page.
    ///
    /// Débloque la lecture différée par la politique d'autoplay des
    /// navigateurs. À usage unique : les appels suivants sont ignorés.
    pub async fn notify_interaction(&self) {
        let mut inner = self.inner.lock().await;
        if !inner.interaction_armed {
            return;
        }
        inner.interaction_armed = false;
        if inner.autoplay_pending {
            inner.autoplay_pending = false;
            debug!("First page interaction received, starting deferred playback");
            if let Some(adapter) = inner.engine.as_mut() {
                if let Err(e) = adapter.play().await {
                    warn!("Deferred play failed: {e}");
                }
            }
        }
    }

    /// Arrête la lecture et toutes les tâches de fond.
    pub async fn shutdown(&self) {
        info!("Shutting down playlist controller");
        let handles: Vec<JoinHandle<()>> = {
            let mut background = self
                .background
                .lock()
                .expect("Background task mutex poisoned");
            background.drain(..).collect()
        };
        for handle in handles {
            handle.abort();
        }

        let mut inner = self.inner.lock().await;
        inner.cancel_crossfade();
        inner.cancel_effect_timer();
        inner.interaction_armed = false;
        inner.autoplay_pending = false;
        if let Some(mut adapter) = inner.engine.take() {
            let _ = adapter.stop().await;
        }
        inner.session.is_playing = false;
        self.emit_state(&inner.session);
    }

    // ----- tâches de fond -----

    fn spawn_event_pump(self: &Arc<Self>) {
        let this = Arc::clone(self);
        let mut rx = self.backend.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => this.on_backend_event(event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Engine event stream lagged, {skipped} events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        self.background
            .lock()
            .expect("Background task mutex poisoned")
            .push(handle);
    }

    fn spawn_refresh_task(self: &Arc<Self>) {
        let this = Arc::clone(self);
        let interval = self.options.refresh_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // Le premier tick part immédiatement, on le consomme.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                this.refresh_catalog().await;
            }
        });
        self.background
            .lock()
            .expect("Background task mutex poisoned")
            .push(handle);
    }

    /// Traite un événement du backend audio.
    async fn on_backend_event(self: &Arc<Self>, event: BackendEvent) {
        let mut inner = self.inner.lock().await;

        let signal = match inner.engine.as_mut() {
            Some(adapter) if adapter.id() == event.engine_id() => adapter.on_event(event).await,
            _ => {
                debug!("Stale engine event ignored");
                None
            }
        };
        let Some(signal) = signal else { return };

        match signal {
            AdapterSignal::Loaded { duration_seconds } => {
                inner.session.duration_seconds = duration_seconds;
                inner.session.position_seconds = 0.0;
                if self.options.autoplay {
                    if inner.interaction_armed {
                        inner.autoplay_pending = true;
                        debug!("Autoplay deferred until first page interaction");
                    } else if let Some(adapter) = inner.engine.as_mut() {
                        if let Err(e) = adapter.play().await {
                            warn!("Could not start playback: {e}");
                        }
                    }
                }
                self.emit_state(&inner.session);
            }
            AdapterSignal::Play => {
                inner.session.is_playing = true;
                self.emit_state(&inner.session);
            }
            AdapterSignal::Pause | AdapterSignal::Stop => {
                inner.session.is_playing = false;
                self.emit_state(&inner.session);
            }
            AdapterSignal::Ended => {
                if inner.session.is_crossfading {
                    return;
                }
                if self.options.crossfade.is_some() && inner.session.is_playing {
                    self.begin_crossfade(&mut inner);
                } else {
                    drop(inner);
                    self.advance_random().await;
                }
            }
            AdapterSignal::Failed => {
                debug!("Current track failed on every source, advancing");
                drop(inner);
                self.advance_random().await;
            }
        }
    }

    /// Démarre la rampe de fondu sur le moteur courant.
    ///
    /// La rampe fait descendre le volume du moteur de son niveau courant
    /// vers zéro, palier par palier, puis enchaîne sur le morceau suivant.
    /// La consigne de session n'est pas modifiée.
    fn begin_crossfade(self: &Arc<Self>, inner: &mut Inner) {
        let Some(crossfade) = self.options.crossfade.clone() else {
            return;
        };
        let Some(adapter) = inner.engine.as_ref() else {
            return;
        };
        let engine_id = adapter.id();
        let start_level = adapter.volume();

        inner.session.is_crossfading = true;
        inner.cancel_effect_timer();
        if self.options.visual_effects {
            let effect = VisualEffect::random();
            inner.current_effect = Some(effect);
            self.emit(ControllerEvent::EffectChanged {
                effect: Some(effect),
            });
        }
        self.emit(ControllerEvent::CrossfadeStarted {
            from_index: inner.session.current_index,
        });
        self.emit_state(&inner.session);
        debug!(
            "Crossfade started on engine {engine_id}, {} steps of {:?}",
            crossfade.steps, crossfade.interval
        );

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let steps = crossfade.steps.max(1);
            for step in 1..=steps {
                tokio::time::sleep(crossfade.interval).await;
                let mut inner = this.inner.lock().await;
                let Some(adapter) = inner.engine.as_mut() else {
                    return;
                };
                if adapter.id() != engine_id {
                    return;
                }
                let remaining = 1.0 - step as f32 / steps as f32;
                let _ = adapter.set_volume(start_level * remaining).await;
            }
            this.finish_crossfade(engine_id).await;
        });
        inner.crossfade_task = Some(handle);
    }

    /// Fin de rampe : efface l'état de fondu, programme l'effacement de
    /// l'effet visuel et enchaîne sur le morceau suivant.
    async fn finish_crossfade(self: &Arc<Self>, engine_id: EngineId) {
        {
            let mut inner = self.inner.lock().await;
            if inner.engine.as_ref().map(EngineAdapter::id) != Some(engine_id) {
                return;
            }
            // La rampe retire elle-même son handle, sans abort : c'est la
            // tâche courante.
            inner.crossfade_task = None;
            inner.session.is_crossfading = false;
            self.schedule_effect_clear(&mut inner);
        }
        self.advance_random().await;
    }

    /// Programme l'effacement de l'effet visuel après la rémanence.
    fn schedule_effect_clear(self: &Arc<Self>, inner: &mut Inner) {
        if inner.current_effect.is_none() {
            return;
        }
        inner.cancel_effect_timer();
        let this = Arc::clone(self);
        let linger = self.options.effect_linger;
        inner.effect_task = Some(tokio::spawn(async move {
            tokio::time::sleep(linger).await;
            let mut inner = this.inner.lock().await;
            if inner.current_effect.take().is_some() {
                this.emit(ControllerEvent::EffectChanged { effect: None });
            }
            inner.effect_task = None;
        }));
    }

    /// Tire un morceau différent du courant et le lance.
    async fn advance_random(&self) {
        let mut inner = self.inner.lock().await;
        let len = inner.playlist.len();
        if len <= 1 {
            debug!("Playlist too small to advance");
            return;
        }
        let current = inner.session.current_index.min(len - 1);
        // Un décalage dans [1, len) garantit un index différent du courant,
        // uniforme sur les autres morceaux.
        let offset = rand::rng().random_range(1..len);
        let target = (current + offset) % len;
        self.start_track(&mut inner, target).await;
    }

    /// Arrête le moteur courant et charge le morceau à `index`.
    async fn start_track(&self, inner: &mut Inner, index: usize) {
        inner.cancel_crossfade();
        if let Some(mut old) = inner.engine.take() {
            let _ = old.stop().await;
        }

        let Some(track) = inner.playlist.get(index).cloned() else {
            warn!("Track index {index} out of bounds");
            return;
        };
        inner.session.current_index = index;
        inner.session.reset_track();

        let sources = self.catalog.resolve(&track);
        let mut adapter = EngineAdapter::new(Arc::clone(&self.backend), sources);
        info!("🎶 Loading track '{}' (engine {})", track.title, adapter.id());
        match adapter.load().await {
            Ok(()) => {
                let volume = inner.session.volume;
                let _ = adapter.set_volume(volume).await;
            }
            Err(e) => {
                warn!("Track '{}' has no playable source: {e}", track.title);
            }
        }
        inner.engine = Some(adapter);
        self.emit(ControllerEvent::TrackChanged { index, track });
        self.emit_state(&inner.session);
    }

    async fn play_locked(&self, inner: &mut Inner) {
        // Une commande explicite vaut geste utilisateur.
        inner.interaction_armed = false;
        inner.autoplay_pending = false;
        if let Some(adapter) = inner.engine.as_mut() {
            if let Err(e) = adapter.play().await {
                warn!("Play command failed: {e}");
            }
        }
    }

    async fn pause_locked(&self, inner: &mut Inner) {
        if let Some(adapter) = inner.engine.as_mut() {
            if let Err(e) = adapter.pause().await {
                warn!("Pause command failed: {e}");
            }
        }
    }

    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }

    fn emit_state(&self, session: &PlaybackSession) {
        self.emit(ControllerEvent::StateChanged {
            session: session.clone(),
        });
    }
}

impl std::fmt::Debug for PlaylistController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistController")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
