use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

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
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "WIFIRADAR_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.dataset_path,
        PathBuf::from("./data/bandung_wifi_map.csv")
    );
    assert_eq!(
        cfg.dataset_fallback_path,
        PathBuf::from("./data/bandung_wifi_map.json")
    );
    assert_eq!(
        cfg.raw_data_path,
        PathBuf::from("./data/bandung_wifi_raw.csv")
    );
    assert_eq!(cfg.overpass_url, "https://overpass-api.de");
    assert_eq!(cfg.nominatim_url, "https://nominatim.openstreetmap.org");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.geocode_timeout_secs, 5);
    assert_eq!(cfg.user_agent, "wifiradar/0.1 (public-wifi-map)");
    assert!((cfg.radius_km - 3.0).abs() < f64::EPSILON);
    assert_eq!(cfg.cache_ttl_secs, 3600);
}

#[test]
fn dataset_candidates_lists_primary_before_fallback() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.dataset_candidates(),
        vec![
            PathBuf::from("./data/bandung_wifi_map.csv"),
            PathBuf::from("./data/bandung_wifi_map.json"),
        ]
    );
}

#[test]
fn build_app_config_fails_with_invalid_env() {
    let mut map = HashMap::new();
    map.insert("WIFIRADAR_ENV", "staging");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WIFIRADAR_ENV"),
        "expected InvalidEnvVar(WIFIRADAR_ENV), got: {result:?}"
    );
}

#[test]
fn request_timeout_secs_override() {
    let mut map = HashMap::new();
    map.insert("WIFIRADAR_REQUEST_TIMEOUT_SECS", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 60);
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("WIFIRADAR_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WIFIRADAR_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(WIFIRADAR_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn geocode_timeout_secs_invalid() {
    let mut map = HashMap::new();
    map.insert("WIFIRADAR_GEOCODE_TIMEOUT_SECS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WIFIRADAR_GEOCODE_TIMEOUT_SECS"),
        "expected InvalidEnvVar(WIFIRADAR_GEOCODE_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn user_agent_override() {
    let mut map = HashMap::new();
    map.insert("WIFIRADAR_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

#[test]
fn radius_km_override() {
    let mut map = HashMap::new();
    map.insert("WIFIRADAR_RADIUS_KM", "1.5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.radius_km - 1.5).abs() < f64::EPSILON);
}

#[test]
fn radius_km_rejects_zero_and_negative() {
    for raw in ["0", "-2.5", "NaN", "inf"] {
        let mut map = HashMap::new();
        map.insert("WIFIRADAR_RADIUS_KM", raw);
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "WIFIRADAR_RADIUS_KM"),
            "expected InvalidEnvVar(WIFIRADAR_RADIUS_KM) for {raw}, got: {result:?}"
        );
    }
}

#[test]
fn cache_ttl_secs_override() {
    let mut map = HashMap::new();
    map.insert("WIFIRADAR_CACHE_TTL_SECS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cache_ttl_secs, 0);
}

#[test]
fn dataset_paths_override() {
    let mut map = HashMap::new();
    map.insert("WIFIRADAR_DATASET_PATH", "/srv/wifi/points.csv");
    map.insert("WIFIRADAR_DATASET_FALLBACK_PATH", "/srv/wifi/points.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.dataset_path, PathBuf::from("/srv/wifi/points.csv"));
    assert_eq!(
        cfg.dataset_fallback_path,
        PathBuf::from("/srv/wifi/points.json")
    );
}
