use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults must be valid");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.niches_path.to_str(), Some("./config/niches.yaml"));
    assert!(cfg.maps_api_key.is_none());
    assert!(cfg.analyzer_api_key.is_none());
    assert_eq!(cfg.request_timeout_secs, 15);
    assert_eq!(cfg.website_timeout_secs, 10);
    assert_eq!(cfg.min_delay_ms, 1500);
    assert_eq!(cfg.max_delay_ms, 2500);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_secs, 2);
    assert_eq!(cfg.max_workers, 3);
    assert_eq!(cfg.stage_timeout_secs, 45);
    assert_eq!(cfg.run_budget_secs, 600);
    assert_eq!(cfg.social_post_sample, 12);
    assert_eq!(cfg.analyzer_model, "llama-3.3-70b-versatile");
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("SCOUT_MAPS_API_KEY", "maps-key");
    map.insert("SCOUT_MAX_WORKERS", "5");
    map.insert("SCOUT_MIN_DELAY_MS", "0");
    map.insert("SCOUT_MAX_DELAY_MS", "0");
    map.insert("SCOUT_SOCIAL_POST_SAMPLE", "6");
    map.insert("GROQ_API_KEY", "groq-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.maps_api_key.as_deref(), Some("maps-key"));
    assert_eq!(cfg.max_workers, 5);
    assert_eq!(cfg.min_delay_ms, 0);
    assert_eq!(cfg.max_delay_ms, 0);
    assert_eq!(cfg.social_post_sample, 6);
    assert_eq!(cfg.analyzer_api_key.as_deref(), Some("groq-key"));
}

#[test]
fn blank_optional_values_are_treated_as_absent() {
    let mut map = HashMap::new();
    map.insert("SCOUT_MAPS_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.maps_api_key.is_none());
}

#[test]
fn build_app_config_rejects_invalid_number() {
    let mut map = HashMap::new();
    map.insert("SCOUT_STAGE_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SCOUT_STAGE_TIMEOUT_SECS"),
        "expected InvalidEnvVar(SCOUT_STAGE_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_inverted_delay_window() {
    let mut map = HashMap::new();
    map.insert("SCOUT_MIN_DELAY_MS", "3000");
    map.insert("SCOUT_MAX_DELAY_MS", "1000");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SCOUT_MIN_DELAY_MS"),
        "expected InvalidEnvVar(SCOUT_MIN_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_workers() {
    let mut map = HashMap::new();
    map.insert("SCOUT_MAX_WORKERS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SCOUT_MAX_WORKERS"),
        "expected InvalidEnvVar(SCOUT_MAX_WORKERS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("SCOUT_MAPS_API_KEY", "super-secret-maps");
    map.insert("GROQ_API_KEY", "super-secret-groq");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret-maps"));
    assert!(!rendered.contains("super-secret-groq"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn build_app_config_ignores_unrelated_variables() {
    let mut map = HashMap::new();
    map.insert("SCOUT_ENV", "staging");
    map.insert("SCOUT_LOG_LEVEL", "debug");
    let cfg = build_app_config(lookup_from_map(&map)).expect("unknown variables are not validated");
    assert_eq!(cfg.log_level, "debug");
}
