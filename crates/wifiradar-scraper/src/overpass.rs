//! Live WiFi points from the public Overpass API.
//!
//! A single GET per cycle, no retries. [`OverpassClient::fetch_live_points`]
//! is fail-open: a timeout, bad status, or malformed payload yields an empty
//! set and a warning, because "no live data" is a normal outcome for the
//! dashboard.

use std::time::Duration;

use reqwest::{Client, Url};
use wifiradar_core::WifiPoint;

use crate::error::ScraperError;
use crate::normalize::normalize_scrape;
use crate::types::{OverpassElement, OverpassResponse};

const DEFAULT_BASE_URL: &str = "https://overpass-api.de";
const INTERPRETER_PATH: &str = "api/interpreter";

/// Server-side query timeout, kept below the client timeout.
const QUERY_TIMEOUT_SECS: u64 = 25;

/// Tag filters a node must match at least one of.
const WIFI_TAG_FILTERS: [&str; 3] = [
    r#"["internet_access"]"#,
    r#"["wifi"]"#,
    r#"["amenity"="public_wifi"]"#,
];

/// Geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Greater Bandung.
    pub const BANDUNG: Self = Self {
        south: -7.00,
        west: 107.50,
        north: -6.80,
        east: 107.75,
    };

    /// Overpass QL bbox filter, `(south,west,north,east)`.
    #[must_use]
    pub fn overpass_filter(&self) -> String {
        format!(
            "({},{},{},{})",
            self.south, self.west, self.north, self.east
        )
    }
}

/// Builds the Overpass QL query for WiFi-tagged nodes inside `bbox`.
#[must_use]
pub fn build_query(bbox: &BoundingBox) -> String {
    let area = bbox.overpass_filter();
    let statements: String = WIFI_TAG_FILTERS
        .iter()
        .map(|filter| format!("node{area}{filter};"))
        .collect();
    format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];({statements});out center;")
}

/// Client for the Overpass `interpreter` endpoint.
pub struct OverpassClient {
    client: Client,
    interpreter_url: Url,
}

impl OverpassClient {
    /// Creates a client pointed at the public Overpass instance.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// Creates a client with a custom base URL (mirrors or wiremock).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] if the `reqwest::Client` cannot be constructed.
    /// - [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let interpreter_url = endpoint_url(base_url, INTERPRETER_PATH)?;
        Ok(Self {
            client,
            interpreter_url,
        })
    }

    /// Fetches WiFi nodes inside `bbox`, returning an empty set on any failure.
    pub async fn fetch_live_points(&self, bbox: &BoundingBox) -> Vec<WifiPoint> {
        match self.try_fetch_live_points(bbox).await {
            Ok(points) => {
                tracing::info!(count = points.len(), "fetched live points from Overpass");
                points
            }
            Err(error) => {
                tracing::warn!(%error, "Overpass fetch failed; continuing without live points");
                Vec::new()
            }
        }
    }

    /// Fetches WiFi nodes inside `bbox`.
    ///
    /// Elements that do not parse are skipped; the call only fails when the
    /// response as a whole is unusable.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or timeout.
    /// - [`ScraperError::UnexpectedStatus`] on any non-2xx status.
    /// - [`ScraperError::Deserialize`] if the body is not an Overpass JSON document.
    pub async fn try_fetch_live_points(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<WifiPoint>, ScraperError> {
        let mut url = self.interpreter_url.clone();
        url.query_pairs_mut().append_pair("data", &build_query(bbox));

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.interpreter_url.to_string(),
            });
        }

        let body = response.text().await?;
        let payload: OverpassResponse =
            serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
                context: "Overpass interpreter response".to_string(),
                source,
            })?;

        let elements = parse_elements(payload.elements);
        Ok(normalize_scrape(&elements))
    }
}

fn parse_elements(raw: Vec<serde_json::Value>) -> Vec<OverpassElement> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<OverpassElement>(value) {
            Ok(element) => Some(element),
            Err(error) => {
                tracing::debug!(%error, "skipping unparseable Overpass element");
                None
            }
        })
        .collect()
}

/// Joins `path` onto `base_url`, keeping any path prefix the base carries.
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> Result<Url, ScraperError> {
    // A trailing slash makes `join` append instead of replacing the last segment.
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised)
        .and_then(|base| base.join(path))
        .map_err(|e| ScraperError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })
}
