use std::time::Duration;

use mbconfig::Config;

use crate::config_ext::PlayerConfigExt;

/// Paramètres du fondu de fin de morceau.
///
/// Le volume du moteur descend linéairement vers zéro en `steps` paliers
/// espacés de `interval`, puis le contrôleur passe au morceau suivant.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossfadeOptions {
    /// Nombre de paliers de la rampe de volume.
    pub steps: u32,
    /// Durée entre deux paliers.
    pub interval: Duration,
}

impl Default for CrossfadeOptions {
    fn default() -> Self {
        Self {
            steps: 60,
            interval: Duration::from_millis(100),
        }
    }
}

impl CrossfadeOptions {
    /// Durée totale de la rampe.
    pub fn total_duration(&self) -> Duration {
        self.interval * self.steps.max(1)
    }
}

/// Options de comportement du contrôleur de lecture.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOptions {
    /// Démarre la lecture dès qu'un morceau est chargé.
    pub autoplay: bool,
    /// Replie l'interface du lecteur après un délai d'inactivité (côté page).
    pub auto_hide: bool,
    /// Mélange la playlist à chaque récupération du catalogue.
    pub shuffle_on_fetch: bool,
    /// Active la sélection d'un effet visuel au début de chaque fondu.
    pub visual_effects: bool,
    /// Fondu de fin de morceau, ou `None` pour enchaîner sans rampe.
    pub crossfade: Option<CrossfadeOptions>,
    /// Volume de session initial, entre 0.0 et 1.0.
    pub initial_volume: f32,
    /// Intervalle entre deux rafraîchissements du catalogue.
    pub refresh_interval: Duration,
    /// Durée d'affichage de l'effet visuel après la fin du fondu.
    pub effect_linger: Duration,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            autoplay: true,
            auto_hide: false,
            shuffle_on_fetch: true,
            visual_effects: true,
            crossfade: Some(CrossfadeOptions::default()),
            initial_volume: 0.5,
            refresh_interval: Duration::from_secs(300),
            effect_linger: Duration::from_secs(4),
        }
    }
}

impl PlayerOptions {
    /// Construit les options depuis la section `player` de la configuration.
    pub fn from_config(config: &Config) -> Self {
        let crossfade = if config.get_player_crossfade_enabled() {
            Some(CrossfadeOptions {
                steps: config.get_player_crossfade_steps(),
                interval: Duration::from_millis(config.get_player_crossfade_interval_ms()),
            })
        } else {
            None
        };

        Self {
            autoplay: config.get_player_autoplay(),
            auto_hide: config.get_player_auto_hide(),
            shuffle_on_fetch: config.get_player_shuffle_on_fetch(),
            visual_effects: config.get_player_visual_effects(),
            crossfade,
            initial_volume: config.get_player_initial_volume(),
            refresh_interval: Duration::from_secs(config.get_player_refresh_interval_secs()),
            effect_linger: Duration::from_secs(config.get_player_effect_linger_secs()),
        }
    }
}
