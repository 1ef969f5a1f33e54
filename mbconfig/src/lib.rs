//! # mbconfig - Configuration de MemoBook
//!
//! Gestion de la configuration de l'application :
//! - fichier YAML externe fusionné sur des valeurs par défaut embarquées
//! - overrides par variables d'environnement (`MEMOBOOK_CONFIG__SECTION__KEY`)
//! - getters et setters typés pour les valeurs usuelles
//!
//! L'objet [`Config`] est construit une seule fois dans `main` puis passé
//! explicitement aux services qui en ont besoin ; il n'existe aucune
//! instance globale.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use mbconfig::Config;
//!
//! let config = Arc::new(Config::load_config("")?);
//!
//! let http_port = config.get_http_port();
//! config.set_http_port(9090)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::Path,
    sync::Mutex,
};
use tracing::info;

mod net;
pub use net::guess_local_ip;

// YAML par défaut embarqué dans le binaire
const DEFAULT_CONFIG: &str = include_str!("memobook.yaml");

const ENV_CONFIG_DIR: &str = "MEMOBOOK_CONFIG";
const ENV_PREFIX: &str = "MEMOBOOK_CONFIG__";

const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_LOG_BUFFER_CAPACITY: usize = 1000;
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Génère un couple getter/setter pour une valeur entière avec défaut
macro_rules! impl_usize_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<usize> {
            match self.get_value($path)? {
                Value::Number(n) if n.is_i64() => Ok(n.as_i64().unwrap() as usize),
                Value::Number(n) if n.is_u64() => Ok(n.as_u64().unwrap() as usize),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: usize) -> Result<()> {
            self.set_value($path, Value::Number(Number::from(value)))
        }
    };
}

/// Génère un couple getter/setter pour un booléen avec défaut
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            match self.get_value($path)? {
                Value::Bool(b) => Ok(b),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Configuration de MemoBook
///
/// Porte l'arbre YAML fusionné (défauts embarqués + fichier externe +
/// variables d'environnement) et le répertoire de configuration résolu.
/// Toutes les clés sont normalisées en minuscules au chargement ; chaque
/// écriture est immédiatement persistée dans `config.yaml`.
///
/// # Exemple
///
/// ```no_run
/// use mbconfig::Config;
///
/// let config = Config::load_config("")?;
/// println!("HTTP port: {}", config.get_http_port());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

// Clone manuel, le Mutex interne n'étant pas clonable
impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.data.lock().unwrap().clone();
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Cherche le répertoire de configuration, dans l'ordre des candidats
    fn find_config_dir(directory: &str) -> String {
        // Répertoire fourni par l'appelant
        if !directory.is_empty() {
            return directory.to_string();
        }

        // Variable d'environnement
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var=ENV_CONFIG_DIR, path=%env_path, "Config directory from environment");
            return env_path;
        }

        // `.memobook` dans le répertoire courant
        if Path::new(".memobook").exists() {
            return ".memobook".to_string();
        }

        // `.memobook` dans le home de l'utilisateur
        if let Some(home) = home_dir() {
            let home_config = home.join(".memobook");
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        // Sinon il sera créé dans le répertoire courant
        ".memobook".to_string()
    }

    /// Crée le répertoire si nécessaire et vérifie qu'il est utilisable
    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        if !path.is_dir() {
            return Err(anyhow!("Le chemin de configuration n'est pas un répertoire"));
        }

        // Écriture puis lecture de contrôle
        let probe = path.join(".write_probe");
        fs::write(&probe, b"probe")?;
        fs::remove_file(&probe)?;
        fs::read_dir(path)?;

        Ok(())
    }

    /// Détermine et valide le répertoire de configuration
    ///
    /// Candidats essayés dans l'ordre :
    /// 1. le paramètre `directory` s'il n'est pas vide ;
    /// 2. la variable d'environnement `MEMOBOOK_CONFIG` ;
    /// 3. `.memobook` dans le répertoire courant ;
    /// 4. `.memobook` dans le home.
    ///
    /// Le répertoire est créé s'il n'existe pas, puis testé en lecture et en
    /// écriture.
    pub fn config_dir(directory: &str) -> Result<String> {
        let dir_path = Self::find_config_dir(directory);
        Self::validate_config_dir(Path::new(&dir_path))?;
        Ok(dir_path)
    }

    /// Charge la configuration depuis un répertoire
    ///
    /// Les valeurs par défaut embarquées sont chargées d'abord, puis le
    /// fichier `config.yaml` du répertoire est fusionné par-dessus s'il
    /// existe, les overrides d'environnement sont appliqués, et le résultat
    /// est réécrit sur disque.
    ///
    /// # Arguments
    ///
    /// * `directory` - Répertoire contenant `config.yaml`, ou vide pour la
    ///   découverte automatique
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::config_dir(directory)?;
        info!(config_dir=%config_dir, "Using config directory");

        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        let mut merged: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        let external: Value = match fs::read(&path) {
            Ok(data) => {
                info!(config_file=%path, "Loaded config file");
                serde_yaml::from_slice(&data)?
            }
            Err(_) => {
                info!(config_file=%path, "Config file not found, using embedded defaults");
                serde_yaml::from_str(DEFAULT_CONFIG)?
            }
        };

        merge_yaml(&mut merged, &external);
        let mut config_value = Self::lower_keys_value(merged);
        Self::apply_env_overrides(&mut config_value);

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        };

        // Persiste la fusion pour que le fichier reflète l'état effectif
        config.save()?;
        Ok(config)
    }

    /// Écrit la configuration courante dans `config.yaml`
    pub fn save(&self) -> Result<()> {
        let data = self.data.lock().unwrap();
        fs::write(&self.path, serde_yaml::to_string(&*data)?)?;
        Ok(())
    }

    /// Écrit une valeur au chemin donné et persiste le fichier
    ///
    /// # Arguments
    ///
    /// * `path` - Clés successives dans l'arbre (ex. `&["host", "http_port"]`)
    /// * `value` - La valeur YAML à poser
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.data.lock().unwrap();
            Self::set_value_internal(&mut data, path, value)?;
        }
        self.save()
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key = Value::String(path[0].to_lowercase());
            if path.len() == 1 {
                map.insert(key, value);
            } else {
                let entry = map.entry(key).or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Lit la valeur au chemin donné
    ///
    /// Retourne une erreur si le chemin n'existe pas dans l'arbre.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data.lock().unwrap();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            let map = match current {
                Value::Mapping(map) => map,
                _ => return Err(anyhow!("Path {} is not a mapping", path[..i].join("."))),
            };
            current = map
                .get(&Value::String(key.to_lowercase()))
                .ok_or_else(|| anyhow!("Path {} does not exist", path[..=i].join(".")))?;
        }
        Ok(current.clone())
    }

    fn apply_env_overrides(config: &mut Value) {
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                let key_path: Vec<&str> = stripped.split("__").collect();
                let _ = Self::set_value_internal(config, &key_path, Self::convert_env_value(&value));
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        // Nombres et booléens passent par le parseur YAML, le reste est une chaîne
        serde_yaml::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| {
                        let k = match k {
                            Value::String(s) => Value::String(s.to_lowercase()),
                            other => other,
                        };
                        (k, Self::lower_keys_value(v))
                    })
                    .collect(),
            ),
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    /// Résout un chemin (absolu, ou relatif au dossier de config) et le crée
    fn resolve_and_create_dir(&self, dir_path: &str) -> Result<String> {
        let path = Path::new(dir_path);
        let absolute_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            // Les chemins relatifs s'entendent depuis le répertoire de config
            Path::new(&self.config_dir).join(path)
        };

        if !absolute_path.exists() {
            fs::create_dir_all(&absolute_path)?;
            info!(directory=%absolute_path.display(), "Created managed directory");
        }

        Ok(absolute_path.to_string_lossy().to_string())
    }

    /// Lit l'emplacement d'un répertoire géré
    ///
    /// Le chemin configuré peut être absolu ou relatif au répertoire de
    /// configuration ; le répertoire est créé au premier accès. Quand la clé
    /// est absente, `default` est posé dans la configuration puis utilisé.
    pub fn get_managed_dir(&self, path: &[&str], default: &str) -> Result<String> {
        let dir_path = match self.get_value(path) {
            Ok(Value::String(s)) => s,
            _ => {
                self.set_managed_dir(path, default.to_string())?;
                default.to_string()
            }
        };
        self.resolve_and_create_dir(&dir_path)
    }

    /// Remplace l'emplacement d'un répertoire géré
    pub fn set_managed_dir(&self, path: &[&str], directory: String) -> Result<()> {
        self.set_value(path, Value::String(directory))
    }

    /// URL de base du serveur HTTP
    ///
    /// À défaut de valeur configurée, tente de deviner l'adresse IP locale.
    pub fn get_base_url(&self) -> String {
        match self.get_value(&["host", "base_url"]) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => {
                let ip = guess_local_ip();
                tracing::warn!("No base URL configured, falling back to {}", ip);
                ip
            }
        }
    }

    /// Port HTTP configuré, ou 8080 par défaut
    pub fn get_http_port(&self) -> u16 {
        let value = match self.get_value(&["host", "http_port"]) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!("HTTP port unset ({}), using {}", err, DEFAULT_HTTP_PORT);
                return DEFAULT_HTTP_PORT;
            }
        };

        match value {
            Value::Number(n) if n.is_i64() => n.as_i64().unwrap() as u16,
            Value::String(s) => s.parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid HTTP port '{}', using {}", s, DEFAULT_HTTP_PORT);
                DEFAULT_HTTP_PORT
            }),
            _ => {
                tracing::warn!("HTTP port is not a number, using {}", DEFAULT_HTTP_PORT);
                DEFAULT_HTTP_PORT
            }
        }
    }

    /// Définit le port HTTP
    pub fn set_http_port(&self, port: u16) -> Result<()> {
        self.set_value(&["host", "http_port"], Value::Number(Number::from(port)))
    }

    impl_usize_config!(
        get_log_cache_size,
        set_log_cache_size,
        &["host", "logger", "buffer_capacity"],
        DEFAULT_LOG_BUFFER_CAPACITY
    );

    impl_bool_config!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    /// Niveau de log minimum configuré
    pub fn get_log_min_level(&self) -> Result<String> {
        match self.get_value(&["host", "logger", "min_level"])? {
            Value::String(s) => Ok(s),
            _ => Ok(DEFAULT_LOG_MIN_LEVEL.to_string()),
        }
    }

    /// Définit le niveau de log minimum
    pub fn set_log_min_level(&self, level: String) -> Result<()> {
        self.set_value(&["host", "logger", "min_level"], Value::String(level))
    }
}

/// Fusionne récursivement un arbre YAML externe dans l'arbre par défaut
///
/// Les mappings sont fusionnés clé par clé ; pour les scalaires et les
/// séquences, la valeur externe remplace la valeur par défaut.
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}
