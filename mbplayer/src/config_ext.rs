//! Extension pour intégrer la configuration du lecteur
//!
//! Fournit le trait `PlayerConfigExt` qui étend `mbconfig::Config` avec les
//! accesseurs de la section `player` : autoplay, mélange, fondu, effets.

use mbconfig::Config;
use serde_yaml::Value;

/// Volume de session par défaut
pub const DEFAULT_INITIAL_VOLUME: f32 = 0.5;
/// Intervalle par défaut entre deux rafraîchissements du catalogue (secondes)
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
/// Durée d'affichage de l'effet visuel après le fondu (secondes)
pub const DEFAULT_EFFECT_LINGER_SECS: u64 = 4;
/// Nombre de paliers par défaut de la rampe de fondu
pub const DEFAULT_CROSSFADE_STEPS: u32 = 60;
/// Durée par défaut entre deux paliers de la rampe (millisecondes)
pub const DEFAULT_CROSSFADE_INTERVAL_MS: u64 = 100;

/// Trait d'extension pour la configuration du lecteur
pub trait PlayerConfigExt {
    /// Lecture automatique dès qu'un morceau est chargé
    fn get_player_autoplay(&self) -> bool;

    /// Repli automatique de l'interface du lecteur côté page
    fn get_player_auto_hide(&self) -> bool;

    /// Mélange de la playlist à chaque récupération du catalogue
    fn get_player_shuffle_on_fetch(&self) -> bool;

    /// Sélection d'un effet visuel au début de chaque fondu
    fn get_player_visual_effects(&self) -> bool;

    /// Volume de session initial, borné entre 0.0 et 1.0
    fn get_player_initial_volume(&self) -> f32;

    /// Intervalle entre deux rafraîchissements du catalogue, en secondes
    fn get_player_refresh_interval_secs(&self) -> u64;

    /// Durée d'affichage de l'effet visuel après la fin du fondu, en secondes
    fn get_player_effect_linger_secs(&self) -> u64;

    /// Activation du fondu de fin de morceau
    fn get_player_crossfade_enabled(&self) -> bool;

    /// Nombre de paliers de la rampe de fondu
    fn get_player_crossfade_steps(&self) -> u32;

    /// Durée entre deux paliers de la rampe, en millisecondes
    fn get_player_crossfade_interval_ms(&self) -> u64;
}

fn bool_value(config: &Config, path: &[&str], default: bool) -> bool {
    match config.get_value(path) {
        Ok(Value::Bool(b)) => b,
        _ => default,
    }
}

fn u64_value(config: &Config, path: &[&str], default: u64) -> u64 {
    match config.get_value(path) {
        Ok(Value::Number(n)) => n.as_u64().unwrap_or(default),
        _ => default,
    }
}

impl PlayerConfigExt for Config {
    fn get_player_autoplay(&self) -> bool {
        bool_value(self, &["player", "autoplay"], true)
    }

    fn get_player_auto_hide(&self) -> bool {
        bool_value(self, &["player", "auto_hide"], false)
    }

    fn get_player_shuffle_on_fetch(&self) -> bool {
        bool_value(self, &["player", "shuffle_on_fetch"], true)
    }

    fn get_player_visual_effects(&self) -> bool {
        bool_value(self, &["player", "visual_effects"], true)
    }

    fn get_player_initial_volume(&self) -> f32 {
        let volume = match self.get_value(&["player", "initial_volume"]) {
            Ok(Value::Number(n)) => n.as_f64().unwrap_or(DEFAULT_INITIAL_VOLUME as f64),
            _ => DEFAULT_INITIAL_VOLUME as f64,
        };
        (volume as f32).clamp(0.0, 1.0)
    }

    fn get_player_refresh_interval_secs(&self) -> u64 {
        u64_value(
            self,
            &["player", "refresh_interval_secs"],
            DEFAULT_REFRESH_INTERVAL_SECS,
        )
        .max(1)
    }

    fn get_player_effect_linger_secs(&self) -> u64 {
        u64_value(
            self,
            &["player", "effect_linger_secs"],
            DEFAULT_EFFECT_LINGER_SECS,
        )
    }

    fn get_player_crossfade_enabled(&self) -> bool {
        bool_value(self, &["player", "crossfade", "enabled"], true)
    }

    fn get_player_crossfade_steps(&self) -> u32 {
        u64_value(
            self,
            &["player", "crossfade", "steps"],
            DEFAULT_CROSSFADE_STEPS as u64,
        )
        .clamp(1, u32::MAX as u64) as u32
    }

    fn get_player_crossfade_interval_ms(&self) -> u64 {
        u64_value(
            self,
            &["player", "crossfade", "interval_ms"],
            DEFAULT_CROSSFADE_INTERVAL_MS,
        )
        .max(1)
    }
}
