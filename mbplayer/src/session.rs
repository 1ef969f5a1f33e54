use serde::Serialize;

/// Volume de session appliqué avant toute configuration.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// État de lecture courant du contrôleur.
///
/// Le volume de session est la consigne de l'utilisateur ; pendant un fondu
/// le volume du moteur descend sans que cette valeur ne bouge, et chaque
/// nouveau morceau repart de la consigne.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSession {
    /// Position du morceau courant dans la playlist.
    pub current_index: usize,
    /// Lecture en cours, telle que rapportée par le moteur.
    pub is_playing: bool,
    /// Volume de session, entre 0.0 et 1.0.
    pub volume: f32,
    /// Dernière position de lecture connue, en secondes.
    pub position_seconds: f64,
    /// Durée du morceau courant rapportée au chargement, en secondes.
    pub duration_seconds: f64,
    /// Une rampe de fondu est en cours sur le moteur courant.
    pub is_crossfading: bool,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            volume: DEFAULT_VOLUME,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            is_crossfading: false,
        }
    }
}

impl PlaybackSession {
    /// Réinitialise les champs liés au morceau courant, en conservant la
    /// consigne de volume.
    pub fn reset_track(&mut self) {
        self.is_playing = false;
        self.position_seconds = 0.0;
        self.duration_seconds = 0.0;
        self.is_crossfading = false;
    }
}
