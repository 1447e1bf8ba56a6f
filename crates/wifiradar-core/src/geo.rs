//! Great-circle distance between coordinates.
//!
//! [`haversine_km`] works on validated [`GeoPoint`]s. [`distance_km`] accepts
//! loosely typed inputs (spreadsheet cells, JSON values) and never fails: any
//! input that cannot be read as degrees produces [`UNREACHABLE_DISTANCE_KM`],
//! which is far outside every radius the dashboard filters on.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance reported for coordinates that cannot be interpreted.
pub const UNREACHABLE_DISTANCE_KM: f64 = 999.0;

/// A latitude/longitude pair in decimal degrees, within valid global ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Returns `None` unless both values are finite and within
    /// [-90, 90] / [-180, 180].
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

/// Great-circle distance between two points using the haversine formula.
#[must_use]
pub fn haversine_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    2.0 * a.sqrt().min(1.0).asin() * EARTH_RADIUS_KM
}

/// Values that can be coerced to decimal degrees.
pub trait Degrees {
    /// The value as finite degrees, or `None` if it is missing or non-numeric.
    fn degrees(&self) -> Option<f64>;
}

impl Degrees for f64 {
    fn degrees(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl Degrees for f32 {
    fn degrees(&self) -> Option<f64> {
        f64::from(*self).degrees()
    }
}

impl Degrees for str {
    fn degrees(&self) -> Option<f64> {
        self.trim().parse::<f64>().ok()?.degrees()
    }
}

impl Degrees for &str {
    fn degrees(&self) -> Option<f64> {
        (**self).degrees()
    }
}

impl Degrees for String {
    fn degrees(&self) -> Option<f64> {
        self.as_str().degrees()
    }
}

impl<T: Degrees> Degrees for Option<T> {
    fn degrees(&self) -> Option<f64> {
        self.as_ref().and_then(Degrees::degrees)
    }
}

impl Degrees for serde_json::Value {
    fn degrees(&self) -> Option<f64> {
        match self {
            serde_json::Value::Number(n) => n.as_f64()?.degrees(),
            serde_json::Value::String(s) => s.degrees(),
            _ => None,
        }
    }
}

/// Distance in kilometers between `(lat1, lon1)` and `(lat2, lon2)`.
///
/// Never fails: if any input cannot be coerced to degrees, or the result is
/// not finite, returns [`UNREACHABLE_DISTANCE_KM`].
pub fn distance_km<A, B, C, D>(lat1: A, lon1: B, lat2: C, lon2: D) -> f64
where
    A: Degrees,
    B: Degrees,
    C: Degrees,
    D: Degrees,
{
    let coords = (lat1.degrees(), lon1.degrees(), lat2.degrees(), lon2.degrees());
    let (Some(lat1), Some(lon1), Some(lat2), Some(lon2)) = coords else {
        return UNREACHABLE_DISTANCE_KM;
    };

    let from = GeoPoint {
        latitude: lat1,
        longitude: lon1,
    };
    let to = GeoPoint {
        latitude: lat2,
        longitude: lon2,
    };
    let km = haversine_km(from, to);
    if km.is_finite() {
        km
    } else {
        UNREACHABLE_DISTANCE_KM
    }
}
