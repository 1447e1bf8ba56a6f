use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default, so an empty environment yields the Bandung
/// dashboard defaults.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_radius = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("radius must be a positive number of kilometers, got {raw}"),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("WIFIRADAR_ENV", "development"))?;
    let log_level = or_default("WIFIRADAR_LOG_LEVEL", "info");

    let dataset_path = PathBuf::from(or_default(
        "WIFIRADAR_DATASET_PATH",
        "./data/bandung_wifi_map.csv",
    ));
    let dataset_fallback_path = PathBuf::from(or_default(
        "WIFIRADAR_DATASET_FALLBACK_PATH",
        "./data/bandung_wifi_map.json",
    ));
    let raw_data_path = PathBuf::from(or_default(
        "WIFIRADAR_RAW_DATA_PATH",
        "./data/bandung_wifi_raw.csv",
    ));

    let overpass_url = or_default("WIFIRADAR_OVERPASS_URL", "https://overpass-api.de");
    let nominatim_url = or_default(
        "WIFIRADAR_NOMINATIM_URL",
        "https://nominatim.openstreetmap.org",
    );

    let request_timeout_secs = parse_u64("WIFIRADAR_REQUEST_TIMEOUT_SECS", "30")?;
    let geocode_timeout_secs = parse_u64("WIFIRADAR_GEOCODE_TIMEOUT_SECS", "5")?;
    let user_agent = or_default("WIFIRADAR_USER_AGENT", "wifiradar/0.1 (public-wifi-map)");
    let radius_km = parse_radius("WIFIRADAR_RADIUS_KM", "3.0")?;
    let cache_ttl_secs = parse_u64("WIFIRADAR_CACHE_TTL_SECS", "3600")?;

    Ok(AppConfig {
        env,
        log_level,
        dataset_path,
        dataset_fallback_path,
        raw_data_path,
        overpass_url,
        nominatim_url,
        request_timeout_secs,
        geocode_timeout_secs,
        user_agent,
        radius_km,
        cache_ttl_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "WIFIRADAR_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
