//! The `radar` command: one dashboard cycle rendered to the terminal.

use std::time::Duration;

use wifiradar_core::{
    nearest, AppConfig, DashboardState, GeoPoint, RankedPoint, SearchOutcome,
};
use wifiradar_scraper::{GeocodeClient, OverpassClient, Radar};

#[derive(Debug, Clone)]
pub(crate) struct RadarRequest {
    /// Device fix as `(latitude, longitude)`.
    pub device: Option<(f64, f64)>,
    pub search: Option<String>,
    pub radius_km: f64,
    pub limit: usize,
}

/// Applies the request to the dashboard state, runs a radar cycle, and
/// prints the nearest list.
///
/// # Errors
///
/// Returns an error for an invalid radius or device fix, or if an HTTP
/// client cannot be constructed. Network failures are not errors.
pub(crate) async fn run_radar(
    config: &AppConfig,
    state: &mut DashboardState,
    request: &RadarRequest,
) -> anyhow::Result<()> {
    if !(request.radius_km.is_finite() && request.radius_km > 0.0) {
        anyhow::bail!("radius must be a positive number of kilometers");
    }

    if let Some((latitude, longitude)) = request.device {
        let point = GeoPoint::new(latitude, longitude)
            .ok_or_else(|| anyhow::anyhow!("device location ({latitude}, {longitude}) is out of range"))?;
        state.apply_device_location(point);
    }

    if let Some(query) = request.search.as_deref() {
        let geocoder = GeocodeClient::with_base_url(
            &config.nominatim_url,
            config.geocode_timeout_secs,
            &config.user_agent,
        )?;
        let result = geocoder.geocode(query).await;
        match state.apply_search(query, result) {
            SearchOutcome::Moved { query, point } => {
                println!(
                    "Moved to '{query}' ({}, {})",
                    point.latitude, point.longitude
                );
            }
            SearchOutcome::NotFound { query } => {
                println!("Location '{query}' not found; keeping the current reference point.");
            }
            SearchOutcome::Ignored => {}
        }
    }

    let overpass = OverpassClient::with_base_url(
        &config.overpass_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let mut radar = Radar::new(
        config.dataset_candidates(),
        overpass,
        Duration::from_secs(config.cache_ttl_secs),
    );
    let scan = radar.scan(&state.reference, request.radius_km).await;

    println!(
        "{} ({}, {})",
        state.status_line(),
        state.reference.point.latitude,
        state.reference.point.longitude
    );
    println!(
        "{} WiFi points within {} km ({} internal, {} live loaded)",
        scan.nearby.len(),
        request.radius_km,
        scan.internal_count,
        scan.live_count
    );
    print!(
        "{}",
        render_nearest(nearest(&scan.nearby, request.limit), request.radius_km)
    );
    Ok(())
}

/// One numbered line per point: label, source, distance, directions link.
pub(crate) fn render_nearest(ranked: &[RankedPoint], radius_km: f64) -> String {
    if ranked.is_empty() {
        return format!("No WiFi points within {radius_km} km.\n");
    }
    ranked
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            format!(
                "{}. {} [{}] {} m  {}\n",
                index + 1,
                entry.point.label,
                entry.point.source_tag.display_name(),
                entry.distance_m(),
                entry.directions_url()
            )
        })
        .collect()
}
