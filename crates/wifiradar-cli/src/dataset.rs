//! The `export` and `prepare` commands.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use wifiradar_core::AppConfig;
use wifiradar_scraper::{
    load_internal_points, prepare_dataset, write_points_csv, BoundingBox, OverpassClient,
    PreparePaths, INTERNAL_EXPORT_FILENAME, LIVE_EXPORT_FILENAME,
};

use crate::ExportSource;

pub(crate) async fn run_export(
    config: &AppConfig,
    source: ExportSource,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (points, default_name) = match source {
        ExportSource::Internal => (
            load_internal_points(&config.dataset_candidates()),
            INTERNAL_EXPORT_FILENAME,
        ),
        ExportSource::Live => {
            let overpass = OverpassClient::with_base_url(
                &config.overpass_url,
                config.request_timeout_secs,
                &config.user_agent,
            )?;
            (
                overpass.fetch_live_points(&BoundingBox::BANDUNG).await,
                LIVE_EXPORT_FILENAME,
            )
        }
    };

    if points.is_empty() {
        tracing::warn!(?source, "no points to export; writing header only");
    }

    let path = output.unwrap_or_else(|| PathBuf::from(default_name));
    write_export(&path, &points)?;
    println!("Wrote {} points to {}", points.len(), path.display());
    Ok(())
}

fn write_export(path: &Path, points: &[wifiradar_core::WifiPoint]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_points_csv(points, BufWriter::new(file))?;
    Ok(())
}

pub(crate) fn run_prepare(paths: &PreparePaths) -> anyhow::Result<()> {
    let summary = prepare_dataset(paths)?;
    println!(
        "Done! Raw rows: {} | Map rows: {}",
        summary.raw_rows, summary.map_rows
    );
    Ok(())
}
