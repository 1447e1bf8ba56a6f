pub mod app_config;
pub mod config;
pub mod geo;
pub mod point;
pub mod proximity;
pub mod state;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance_km, haversine_km, Degrees, GeoPoint, UNREACHABLE_DISTANCE_KM};
pub use point::{RankedPoint, ReferenceOrigin, ReferencePoint, SourceTag, WifiPoint};
pub use proximity::{nearest, rank_nearby, DEFAULT_RADIUS_KM, NEAREST_LIST_LEN};
pub use state::{DashboardState, SearchOutcome, View};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
