use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Internal dataset, tried first.
    pub dataset_path: PathBuf,
    /// Internal dataset in the alternate format, tried when the primary is unreadable.
    pub dataset_fallback_path: PathBuf,
    /// Cleaned survey rows used by the usage statistics view.
    pub raw_data_path: PathBuf,
    pub overpass_url: String,
    pub nominatim_url: String,
    pub request_timeout_secs: u64,
    pub geocode_timeout_secs: u64,
    pub user_agent: String,
    pub radius_km: f64,
    pub cache_ttl_secs: u64,
}

impl AppConfig {
    /// Candidate dataset files in load order.
    #[must_use]
    pub fn dataset_candidates(&self) -> Vec<PathBuf> {
        vec![
            self.dataset_path.clone(),
            self.dataset_fallback_path.clone(),
        ]
    }
}
