pub mod cache;
pub mod dataset;
pub mod error;
pub mod export;
pub mod geocode;
pub mod normalize;
pub mod overpass;
pub mod prepare;
pub mod radar;
pub mod stats;
pub mod types;

pub use cache::Cached;
pub use dataset::{load_internal_points, read_dataset_rows, DatasetFormat};
pub use error::ScraperError;
pub use export::{read_points_csv, write_points_csv, INTERNAL_EXPORT_FILENAME, LIVE_EXPORT_FILENAME};
pub use geocode::GeocodeClient;
pub use normalize::{normalize_internal, normalize_scrape};
pub use overpass::{build_query, BoundingBox, OverpassClient};
pub use prepare::{prepare_dataset, PreparePaths, PrepareSummary};
pub use radar::{Radar, RadarScan};
pub use stats::{load_usage_summary, summarize_usage, LocationUsage, UsageMetric, UsageSummary};
pub use types::{OverpassElement, RawCell, RawDatasetRow};
