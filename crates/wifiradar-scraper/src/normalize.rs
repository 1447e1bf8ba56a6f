//! Normalization of both point sources into [`WifiPoint`].
//!
//! Each source has its own entry point; both converge on the same record
//! and both drop unusable rows instead of failing.

use wifiradar_core::{GeoPoint, SourceTag, WifiPoint};

use crate::types::{OverpassElement, RawDatasetRow};

/// Label for internal dataset rows with no usable `lokasi`.
pub const INTERNAL_PLACEHOLDER_LABEL: &str = "WiFi Point (Local)";

/// Label for OSM nodes with neither `name` nor `operator`.
pub const SCRAPE_PLACEHOLDER_LABEL: &str = "WiFi Publik OSM";

/// Access classification assumed when an OSM node has no `access` tag.
pub const DEFAULT_ACCESS_TAG: &str = "public";

/// Normalizes internal dataset rows.
///
/// Rows whose coordinates are missing, non-numeric, or out of range are
/// dropped. Blank labels fall back to [`INTERNAL_PLACEHOLDER_LABEL`].
#[must_use]
pub fn normalize_internal(rows: &[RawDatasetRow]) -> Vec<WifiPoint> {
    rows.iter().filter_map(normalize_internal_row).collect()
}

fn normalize_internal_row(row: &RawDatasetRow) -> Option<WifiPoint> {
    let latitude = row.latitude.as_ref()?.as_f64()?;
    let longitude = row.longitude.as_ref()?.as_f64()?;
    let position = GeoPoint::new(latitude, longitude)?;

    Some(WifiPoint {
        label: non_blank(row.lokasi.as_deref())
            .unwrap_or(INTERNAL_PLACEHOLDER_LABEL)
            .to_string(),
        latitude: position.latitude,
        longitude: position.longitude,
        source_tag: SourceTag::InternalDataset,
        access_tag: None,
    })
}

/// Normalizes Overpass elements.
///
/// Both `lat` and `lon` must be present and non-zero; Overpass never reports
/// a real node at exactly 0, so zero is treated as missing. The label is the
/// `name` tag, then `operator`, then [`SCRAPE_PLACEHOLDER_LABEL`].
#[must_use]
pub fn normalize_scrape(elements: &[OverpassElement]) -> Vec<WifiPoint> {
    elements.iter().filter_map(normalize_element).collect()
}

fn normalize_element(element: &OverpassElement) -> Option<WifiPoint> {
    let latitude = element.lat.filter(|lat| *lat != 0.0)?;
    let longitude = element.lon.filter(|lon| *lon != 0.0)?;
    let position = GeoPoint::new(latitude, longitude)?;

    let tag = |key: &str| non_blank(element.tags.get(key).map(String::as_str));
    let label = tag("name")
        .or_else(|| tag("operator"))
        .unwrap_or(SCRAPE_PLACEHOLDER_LABEL);
    let access = tag("access").unwrap_or(DEFAULT_ACCESS_TAG);

    Some(WifiPoint {
        label: label.to_string(),
        latitude: position.latitude,
        longitude: position.longitude,
        source_tag: SourceTag::LiveScrape,
        access_tag: Some(access.to_string()),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
