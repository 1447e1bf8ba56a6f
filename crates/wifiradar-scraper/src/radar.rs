//! One dashboard cycle: load both sources, concatenate, rank.
//!
//! Each source is cached for the configured TTL. A failed live fetch is not
//! cached, so the next cycle tries again, and it never affects the internal
//! records.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use wifiradar_core::{rank_nearby, RankedPoint, ReferencePoint, SourceTag, WifiPoint};

use crate::cache::Cached;
use crate::dataset::load_internal_points;
use crate::overpass::{BoundingBox, OverpassClient};

/// Outcome of a radar cycle.
#[derive(Debug, Clone)]
pub struct RadarScan {
    /// Points within the radius, nearest first.
    pub nearby: Vec<RankedPoint>,
    /// Size of the unified set per source, before radius filtering.
    pub internal_count: usize,
    pub live_count: usize,
}

pub struct Radar {
    dataset_candidates: Vec<PathBuf>,
    overpass: OverpassClient,
    internal: Cached<Vec<WifiPoint>>,
    live: Cached<Vec<WifiPoint>>,
}

impl Radar {
    #[must_use]
    pub fn new(dataset_candidates: Vec<PathBuf>, overpass: OverpassClient, ttl: Duration) -> Self {
        Self {
            dataset_candidates,
            overpass,
            internal: Cached::new(ttl),
            live: Cached::new(ttl),
        }
    }

    /// Normalized internal dataset, loaded on first use and cached.
    pub fn internal_points(&mut self) -> &[WifiPoint] {
        let now = Instant::now();
        if self.internal.get_at(now).is_none() {
            let points = load_internal_points(&self.dataset_candidates);
            return self.internal.store_at(points, now);
        }
        self.internal
            .get_at(now)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Normalized live points, fetched on first use and cached on success.
    pub async fn live_points(&mut self) -> &[WifiPoint] {
        let now = Instant::now();
        if self.live.get_at(now).is_none() {
            return match self.overpass.try_fetch_live_points(&BoundingBox::BANDUNG).await {
                Ok(points) => {
                    tracing::info!(count = points.len(), "fetched live points from Overpass");
                    self.live.store_at(points, now).as_slice()
                }
                Err(error) => {
                    tracing::warn!(%error, "Overpass fetch failed; continuing without live points");
                    &[]
                }
            };
        }
        self.live.get_at(now).map(Vec::as_slice).unwrap_or_default()
    }

    /// Internal records followed by live records.
    pub async fn combined_points(&mut self) -> Vec<WifiPoint> {
        let mut points = self.internal_points().to_vec();
        points.extend_from_slice(self.live_points().await);
        points
    }

    /// Runs a full cycle against `reference`.
    pub async fn scan(&mut self, reference: &ReferencePoint, radius_km: f64) -> RadarScan {
        let points = self.combined_points().await;
        let internal_count = points
            .iter()
            .filter(|p| p.source_tag == SourceTag::InternalDataset)
            .count();
        let live_count = points.len() - internal_count;

        let nearby = rank_nearby(&points, reference, radius_km);
        tracing::info!(
            internal_count,
            live_count,
            nearby = nearby.len(),
            radius_km,
            latitude = reference.point.latitude,
            longitude = reference.point.longitude,
            "radar scan complete"
        );

        RadarScan {
            nearby,
            internal_count,
            live_count,
        }
    }

    /// Forget both sources; the next cycle reloads from scratch.
    pub fn reset(&mut self) {
        self.internal.clear();
        self.live.clear();
    }
}
