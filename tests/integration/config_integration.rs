//! Integration tests for layered configuration

use super::test_utils::{Sample, ENV_MUTEX};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use treestore::config::{ConfigLoader, CONFIG_FILE_NAME};
use treestore::{ConfigError, Diagnostics, Store};

/// File values override merge-policy defaults
#[test]
fn test_file_layer() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        r#"
[store]
document = "data/sample.json"
pretty = true

[logging]
format = "json"

[logging.modules]
treestore = "debug"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.store.document, PathBuf::from("data/sample.json"));
    assert!(config.store.pretty);
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.modules.get("treestore").map(String::as_str), Some("debug"));
}

/// Environment variables override the file
#[test]
fn test_environment_layer() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "[store]\npretty = false\n",
    )
    .unwrap();

    std::env::set_var("TREESTORE__STORE__PRETTY", "true");
    let result = ConfigLoader::load(temp_dir.path());
    std::env::remove_var("TREESTORE__STORE__PRETTY");

    assert!(result.unwrap().store.pretty);
}

/// Invalid values are rejected with every problem listed
#[test]
fn test_validation_failure() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    fs::write(
        &path,
        "[store]\ndocument = \"sample.json~\"\n\n[logging]\nlevel = \"chatty\"\n",
    )
    .unwrap();

    match ConfigLoader::load_from_file(&path) {
        Err(ConfigError::Invalid(message)) => {
            assert!(message.contains("Store:"));
            assert!(message.contains("Logging:"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

/// Store options built from configuration drive document rendering
#[test]
fn test_store_from_config() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "[store]\npretty = true\n",
    )
    .unwrap();

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    let document = temp_dir.path().join(&config.store.document);
    let mut store: Store<Sample> =
        Store::open(&document, config.store.options(Diagnostics::silent()));
    store.i = 1;
    store.save().unwrap();

    assert_eq!(fs::read_to_string(&document).unwrap(), "{\n  \"i\": 1\n}");
}
