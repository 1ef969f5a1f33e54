use mbcatalog::Track;
use serde::Serialize;

use crate::effects::VisualEffect;
use crate::session::PlaybackSession;

/// Gravité d'une notice destinée à l'interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
        }
    }
}

/// Événements émis par le contrôleur de lecture.
///
/// Chaque changement observable produit au plus un événement ; les abonnés
/// (flux SSE, tests) reçoivent une copie de chacun.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// Un nouveau morceau vient d'être chargé.
    TrackChanged { index: usize, track: Track },
    /// L'état de lecture a changé (lecture, pause, volume, fondu).
    StateChanged { session: PlaybackSession },
    /// La playlist a été remplacée ou réordonnée.
    PlaylistChanged { track_count: usize },
    /// Une rampe de fondu vient de démarrer sur le morceau courant.
    CrossfadeStarted { from_index: usize },
    /// L'effet visuel courant a changé, `None` quand il s'efface.
    EffectChanged { effect: Option<VisualEffect> },
    /// Message ponctuel destiné à l'utilisateur.
    Notice { level: NoticeLevel, message: String },
}
