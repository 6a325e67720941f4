//! Layered configuration tests
//!
//! Environment overrides are process-global, so every test that loads a
//! configuration runs serially.

use gamedge_cli::config::{ConfigManager, StorageBackend, ThrottleStoreKind};
use gamedge_core::RefreshPolicies;
use serial_test::serial;
use tempfile::TempDir;

// Test helper: Create a temporary config manager with isolated directory
fn create_test_config_manager(temp_dir: &TempDir) -> ConfigManager {
    ConfigManager::with_path(temp_dir.path().join("config.toml"))
}

#[test]
#[serial]
fn test_defaults_without_file() {
    let temp_dir = TempDir::new().unwrap();
    let manager = create_test_config_manager(&temp_dir);

    let config = manager.load().unwrap();

    assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    assert_eq!(config.throttle.store, ThrottleStoreKind::Sqlite);
    assert_eq!(config.throttle.policies(), RefreshPolicies::default());
    assert!(!config.throttle.single_flight);
    assert!(config.remote.network_enabled);
}

#[test]
#[serial]
fn test_set_then_get_round_trips_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_test_config_manager(&temp_dir);

    manager
        .set("throttle.discovery_timeout_secs", "120")
        .unwrap();
    manager.set("throttle.single_flight", "true").unwrap();

    assert_eq!(manager.get("throttle.discovery_timeout_secs").unwrap(), "120");
    let config = manager.load().unwrap();
    assert_eq!(config.throttle.policies().discovery().timeout().as_secs(), 120);
    assert!(config.throttle.single_flight);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_test_config_manager(&temp_dir);
    manager.set("storage.backend", "sqlite").unwrap();

    // SAFETY: tests touching the environment are serialized
    unsafe { std::env::set_var("GAMEDGE_STORAGE__BACKEND", "memory") };
    let config = manager.load();
    unsafe { std::env::remove_var("GAMEDGE_STORAGE__BACKEND") };

    assert_eq!(config.unwrap().storage.backend, StorageBackend::Memory);
}

#[test]
#[serial]
fn test_list_contains_every_section() {
    let temp_dir = TempDir::new().unwrap();
    let manager = create_test_config_manager(&temp_dir);

    let items = manager.list().unwrap();
    let keys: Vec<&str> = items.iter().map(|(key, _)| key.as_str()).collect();

    assert!(keys.contains(&"storage.backend"));
    assert!(keys.contains(&"throttle.articles_timeout_secs"));
    assert!(keys.contains(&"remote.network_enabled"));
    assert!(keys.contains(&"output.default_format"));
    assert!(items.windows(2).all(|pair| pair[0].0 <= pair[1].0));
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = create_test_config_manager(&temp_dir);

    assert!(manager.set("throttle.store", "redis").is_err());
    assert!(manager.set("throttle.similar_timeout_secs", "-5").is_err());
    assert!(manager.set("output.default_format", "csv").is_err());
    assert!(!temp_dir.path().join("config.toml").exists());
}
