//! Place search scoped to the dashboard's city (Nominatim).
//!
//! A miss and a failure look the same to the caller: `None`, and the
//! dashboard keeps its current reference point.

use std::time::Duration;

use reqwest::{Client, Url};
use wifiradar_core::GeoPoint;

use crate::error::ScraperError;
use crate::overpass::endpoint_url;
use crate::types::NominatimPlace;

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const SEARCH_PATH: &str = "search";
const DEFAULT_CITY: &str = "Bandung";

pub struct GeocodeClient {
    client: Client,
    search_url: Url,
    city: String,
}

impl GeocodeClient {
    /// Creates a client for the public Nominatim instance, scoped to Bandung.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

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
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            search_url: endpoint_url(base_url, SEARCH_PATH)?,
            city: DEFAULT_CITY.to_string(),
        })
    }

    /// Scope searches to a different city.
    #[must_use]
    pub fn with_city(mut self, city: &str) -> Self {
        self.city = city.trim().to_string();
        self
    }

    /// First coordinate match for `query` in the configured city.
    ///
    /// Returns `None` for a blank query, no match, or any failure.
    pub async fn geocode(&self, query: &str) -> Option<GeoPoint> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        match self.try_geocode(query).await {
            Ok(Some(point)) => {
                tracing::debug!(query, ?point, "geocoded place");
                Some(point)
            }
            Ok(None) => {
                tracing::info!(query, "no geocoding match");
                None
            }
            Err(error) => {
                tracing::warn!(query, %error, "geocoding failed");
                None
            }
        }
    }

    /// # Errors
    ///
    /// - [`ScraperError::Http`] on network failure or timeout.
    /// - [`ScraperError::UnexpectedStatus`] on any non-2xx status.
    /// - [`ScraperError::Deserialize`] if the body is not a list of places.
    pub async fn try_geocode(&self, query: &str) -> Result<Option<GeoPoint>, ScraperError> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", &self.scoped_query(query))
            .append_pair("format", "json")
            .append_pair("limit", "1");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.search_url.to_string(),
            });
        }

        let body = response.text().await?;
        let places: Vec<NominatimPlace> =
            serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
                context: format!("geocode(q={query})"),
                source,
            })?;

        Ok(places.first().and_then(|place| {
            let latitude = place.lat.trim().parse::<f64>().ok()?;
            let longitude = place.lon.trim().parse::<f64>().ok()?;
            GeoPoint::new(latitude, longitude)
        }))
    }

    fn scoped_query(&self, query: &str) -> String {
        if self.city.is_empty() {
            query.to_string()
        } else {
            format!("{query} {}", self.city)
        }
    }
}
