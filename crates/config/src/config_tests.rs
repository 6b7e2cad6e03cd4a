//! Unit tests for the configuration module

use crate::{parse_config, ConfigLoader, PlannerConfig, SortFallbackPolicy};
use serial_test::serial;
use std::collections::HashMap;
use std::io::Write;
use stepdag_core::constants::{STEPDAG_MAX_SLUG_LEN_VAR, STEPDAG_SORT_FALLBACK_VAR};
use stepdag_core::ErrorKind;
use tempfile::NamedTempFile;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = PlannerConfig::default();
    assert_eq!(config.id_prefix, "step");
    assert_eq!(config.max_slug_len, 20);
    assert!(config.prune_self_loops);
    assert_eq!(config.sort_fallback, SortFallbackPolicy::Warn);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = parse_config(r#"{ "max_slug_len": 12, "sort_fallback": "error" }"#).unwrap();
    assert_eq!(config.max_slug_len, 12);
    assert_eq!(config.sort_fallback, SortFallbackPolicy::Error);
    assert_eq!(config.id_prefix, "step");
    assert!(config.prune_self_loops);
}

#[test]
fn test_unknown_fields_are_rejected() {
    let err = parse_config(r#"{ "max_slug": 12 }"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Json);
}

#[test]
fn test_validate_rejects_out_of_range_slug_len() {
    let config = PlannerConfig {
        max_slug_len: 0,
        ..PlannerConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("max_slug_len"));

    let config = PlannerConfig {
        max_slug_len: 65,
        ..PlannerConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_prefix() {
    for prefix in ["", "Step", "step-x", "step x"] {
        let config = PlannerConfig {
            id_prefix: prefix.to_string(),
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err(), "prefix {prefix:?} should be rejected");
    }
}

#[test]
fn test_env_overrides() {
    let config = PlannerConfig::default()
        .apply_env_with(lookup_from(&[
            ("STEPDAG_ID_PREFIX", "task"),
            ("STEPDAG_MAX_SLUG_LEN", " 8 "),
            ("STEPDAG_PRUNE_SELF_LOOPS", "off"),
            ("STEPDAG_SORT_FALLBACK", "Error"),
        ]))
        .unwrap();

    assert_eq!(config.id_prefix, "task");
    assert_eq!(config.max_slug_len, 8);
    assert!(!config.prune_self_loops);
    assert_eq!(config.sort_fallback, SortFallbackPolicy::Error);
}

#[test]
fn test_env_override_errors() {
    let err = PlannerConfig::default()
        .apply_env_with(lookup_from(&[("STEPDAG_MAX_SLUG_LEN", "many")]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = PlannerConfig::default()
        .apply_env_with(lookup_from(&[("STEPDAG_PRUNE_SELF_LOOPS", "maybe")]))
        .unwrap_err();
    assert!(err.to_string().contains("must be a boolean"));

    let err = PlannerConfig::default()
        .apply_env_with(lookup_from(&[("STEPDAG_SORT_FALLBACK", "ignore")]))
        .unwrap_err();
    assert!(err.to_string().contains("invalid sort fallback policy"));
}

#[test]
#[serial]
fn test_loader_layers_file_then_env() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "id_prefix": "job", "max_slug_len": 10 }}"#).unwrap();

    std::env::set_var(STEPDAG_MAX_SLUG_LEN_VAR, "16");
    let loaded = ConfigLoader::new().file(file.path()).load();
    std::env::remove_var(STEPDAG_MAX_SLUG_LEN_VAR);

    let config = loaded.unwrap();
    assert_eq!(config.id_prefix, "job");
    assert_eq!(config.max_slug_len, 16);
}

#[test]
#[serial]
fn test_loader_without_env_ignores_variables() {
    std::env::set_var(STEPDAG_SORT_FALLBACK_VAR, "error");
    let loaded = ConfigLoader::new().use_env(false).load();
    std::env::remove_var(STEPDAG_SORT_FALLBACK_VAR);

    assert_eq!(loaded.unwrap().sort_fallback, SortFallbackPolicy::Warn);
}

#[test]
fn test_loader_reports_missing_file() {
    let err = ConfigLoader::new()
        .use_env(false)
        .file("/nonexistent/stepdag.json")
        .load()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileSystem);
}

#[test]
fn test_loader_validates_merged_config() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "max_slug_len": 500 }}"#).unwrap();

    let err = ConfigLoader::new()
        .use_env(false)
        .file(file.path())
        .load()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_loader_reports_malformed_file_as_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "sort_fallback": "sometimes" }}"#).unwrap();

    let err = ConfigLoader::new()
        .use_env(false)
        .file(file.path())
        .load()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("invalid config file"));
}
