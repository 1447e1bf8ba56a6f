//! Raw shapes of the two point sources before normalization.
//!
//! ### Internal dataset rows
//! The curated spreadsheet is exported with Indonesian headers: `lokasi` is
//! the place name, `latitude`/`longitude` are decimal degrees. Exports from
//! spreadsheet tools sometimes quote numbers or leave cells blank, so
//! coordinate cells are modelled as [`RawCell`] and coerced later. Any extra
//! columns (`alamat`, usage counts) are ignored.
//!
//! ### Overpass elements
//! `GET /api/interpreter` with `[out:json]` returns
//! `{"elements": [{"type": "node", "id": 1, "lat": -6.9, "lon": 107.6, "tags": {...}}]}`.
//! Nodes without tags omit the `tags` key entirely. Tag values are always
//! strings.
//!
//! ### Nominatim search results
//! `GET /search?format=json` returns an array of places whose `lat`/`lon`
//! are **strings**, e.g. `[{"lat": "-6.9024812", "lon": "107.6187612", ...}]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// A spreadsheet cell that may hold a number or text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Text(String),
}

impl RawCell {
    /// The cell as a finite number, parsing text after trimming.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawCell::Number(n) => n.is_finite().then_some(*n),
            RawCell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

/// One row of the internal dataset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDatasetRow {
    #[serde(default, deserialize_with = "lenient_label")]
    pub lokasi: Option<String>,
    #[serde(default)]
    pub latitude: Option<RawCell>,
    #[serde(default)]
    pub longitude: Option<RawCell>,
}

/// Reads a label cell of any scalar type as text.
///
/// Numbers and booleans are rendered; nulls, arrays, and objects become
/// `None` so the row keeps its coordinates and gets the placeholder label.
fn lenient_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        serde_json::Value::String(text) => Some(text),
        serde_json::Value::Number(number) => Some(number.to_string()),
        serde_json::Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }))
}

/// Top-level Overpass response. Elements are kept as raw JSON so that one
/// odd element cannot fail the whole payload.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<serde_json::Value>,
}

/// A single Overpass node.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverpassElement {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// A single Nominatim search hit.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
}
