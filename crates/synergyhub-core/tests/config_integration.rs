//! Integration tests for configuration files on disk.

use synergyhub_core::error::ConfigError;
use synergyhub_core::scoring::CriteriaWeights;
use synergyhub_core::Config;
use tempfile::TempDir;

#[test]
fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set("scoring.price_weight", "0.5").unwrap();
    config.set("scoring.sla_weight", "0.25").unwrap();
    config.set("ledger.seed", "7").unwrap();
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.scoring.weights(), CriteriaWeights::new(0.5, 0.25, 0.25));
    assert_eq!(loaded.ledger.seed, Some(7));
}

#[test]
fn test_hand_written_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[committee]
actor = "junta@cluster.com"

[timeline]
width_px = 1600.0
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.committee.actor, "junta@cluster.com");
    assert_eq!(config.committee.po_prefix, "PO-CLUSTER");
    assert_eq!(config.timeline.width_px, 1600.0);
    assert_eq!(config.timeline.new_synergy_threshold_hours, 24);
    assert_eq!(config.scoring, Config::default().scoring);
}

#[test]
fn test_odd_weights_load_with_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[scoring]\nprice_weight = 0.0\nlead_time_weight = 0.0\nsla_weight = 0.0\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.scoring.weights().total(), 0.05);
    assert_eq!(config.validate().len(), 1);
}

#[test]
fn test_invalid_toml_is_load_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[scoring\nprice_weight = ").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    match err {
        ConfigError::LoadFailed { path: p, .. } => assert_eq!(p, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_file_is_load_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::LoadFailed { .. }));
}

#[test]
fn test_entries_are_sorted() {
    let entries = Config::default().entries();
    let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert!(keys.contains(&"committee.evaluator"));
    assert!(keys.contains(&"timeline.new_synergy_threshold_hours"));
}
