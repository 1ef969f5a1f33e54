//! Tests d'intégration pour le chargement de la configuration.

use mbconfig::Config;
use serde_yaml::Value;
use tempfile::TempDir;

#[test]
fn test_load_defaults_into_empty_dir() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

    // Valeurs par défaut embarquées
    assert_eq!(config.get_http_port(), 8080);
    assert_eq!(
        config.get_value(&["store", "tables", "tracks"]).unwrap(),
        Value::String("music_meta".to_string())
    );
    assert_eq!(config.get_log_min_level().unwrap(), "INFO");

    // Le fichier config.yaml doit avoir été créé
    assert!(dir.path().join("config.yaml").exists());
}

#[test]
fn test_external_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "host:\n  http_port: 9099\nstore:\n  url: \"https://store.example\"\n",
    )
    .unwrap();

    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

    assert_eq!(config.get_http_port(), 9099);
    assert_eq!(
        config.get_value(&["store", "url"]).unwrap(),
        Value::String("https://store.example".to_string())
    );
    // Les clés absentes du fichier externe gardent leur valeur par défaut
    assert_eq!(
        config.get_value(&["store", "buckets", "songs"]).unwrap(),
        Value::String("songs".to_string())
    );
}

#[test]
fn test_set_value_persists_across_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().to_str().unwrap();

    {
        let config = Config::load_config(path).unwrap();
        config.set_http_port(9100).unwrap();
    }

    let reloaded = Config::load_config(path).unwrap();
    assert_eq!(reloaded.get_http_port(), 9100);
}

#[test]
fn test_keys_are_lowercased() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "Host:\n  Http_Port: 9200\n",
    )
    .unwrap();

    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(config.get_http_port(), 9200);
}

#[test]
fn test_env_override() {
    // Une section dédiée pour ne pas perturber les autres tests qui
    // tournent en parallèle dans le même processus.
    std::env::set_var("MEMOBOOK_CONFIG__EXTRAS__ANSWER", "42");

    let dir = TempDir::new().unwrap();
    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

    assert_eq!(
        config.get_value(&["extras", "answer"]).unwrap(),
        Value::Number(42.into())
    );

    std::env::remove_var("MEMOBOOK_CONFIG__EXTRAS__ANSWER");
}

#[test]
fn test_get_managed_dir_creates_directory() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

    let managed = config
        .get_managed_dir(&["host", "state", "directory"], "state")
        .unwrap();

    assert!(std::path::Path::new(&managed).is_dir());
    assert!(managed.ends_with("state"));
}
