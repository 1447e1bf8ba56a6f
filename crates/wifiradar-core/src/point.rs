//! Unified WiFi access point record and the reference point it is ranked against.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Which source a [`WifiPoint`] was normalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    InternalDataset,
    LiveScrape,
}

impl SourceTag {
    /// Human-readable origin shown next to each point.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            SourceTag::InternalDataset => "Dataset Internal",
            SourceTag::LiveScrape => "Scraping Live (OSM)",
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceTag::InternalDataset => write!(f, "internal_dataset"),
            SourceTag::LiveScrape => write!(f, "live_scrape"),
        }
    }
}

/// A public WiFi access point in the unified schema.
///
/// Constructed only by the normalizers, which guarantee a non-empty label and
/// coordinates within valid global ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiPoint {
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub source_tag: SourceTag,
    /// Raw OSM `access` classification; only set for live-scraped points.
    pub access_tag: Option<String>,
}

impl WifiPoint {
    #[must_use]
    pub fn position(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A [`WifiPoint`] paired with its distance to the reference point it was
/// ranked against. Never exported; rebuilt whenever the reference changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPoint {
    pub point: WifiPoint,
    pub distance_km: f64,
}

impl RankedPoint {
    /// Distance rounded to whole meters, as shown in the nearest list.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn distance_m(&self) -> i64 {
        (self.distance_km * 1000.0).round() as i64
    }

    /// Google Maps search link for routing to the point.
    #[must_use]
    pub fn directions_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            self.point.latitude, self.point.longitude
        )
    }
}

/// How the active reference point was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceOrigin {
    CityCenter,
    Search,
    Device,
}

/// The single location that distances are measured from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub point: GeoPoint,
    pub origin: ReferenceOrigin,
}

impl ReferencePoint {
    /// Bandung city center.
    pub const CITY_CENTER: GeoPoint = GeoPoint {
        latitude: -6.9175,
        longitude: 107.6191,
    };

    #[must_use]
    pub fn city_center() -> Self {
        Self {
            point: Self::CITY_CENTER,
            origin: ReferenceOrigin::CityCenter,
        }
    }

    #[must_use]
    pub fn new(point: GeoPoint, origin: ReferenceOrigin) -> Self {
        Self { point, origin }
    }
}
