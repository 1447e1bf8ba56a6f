//! Radius filtering and nearest-first ranking.
//!
//! A full linear scan: the unified set is a few thousand points at most.

use crate::geo::distance_km;
use crate::point::{RankedPoint, ReferencePoint, WifiPoint};

/// Radius of the radar overlay in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 3.0;

/// Length of the "nearest" list shown beside the map.
pub const NEAREST_LIST_LEN: usize = 5;

/// Rank `points` by distance to `reference`, keeping those within `radius_km`.
///
/// The sort is stable, so points at equal distance keep their input order.
/// Returns an empty vector when nothing is in range.
#[must_use]
pub fn rank_nearby(
    points: &[WifiPoint],
    reference: &ReferencePoint,
    radius_km: f64,
) -> Vec<RankedPoint> {
    let origin = reference.point;
    let mut ranked: Vec<RankedPoint> = points
        .iter()
        .map(|point| RankedPoint {
            distance_km: distance_km(
                origin.latitude,
                origin.longitude,
                point.latitude,
                point.longitude,
            ),
            point: point.clone(),
        })
        .filter(|ranked| ranked.distance_km <= radius_km)
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked
}

/// The first `n` entries of an already-ranked slice.
#[must_use]
pub fn nearest(ranked: &[RankedPoint], n: usize) -> &[RankedPoint] {
    &ranked[..n.min(ranked.len())]
}
