//! CSV export of normalized point sets.
//!
//! Columns are the unified schema: `label,latitude,longitude,source_tag,access_tag`.
//! Distances are never written; they only mean something next to a
//! reference point.

use std::io::{Read, Write};

use wifiradar_core::WifiPoint;

use crate::error::ScraperError;

pub const INTERNAL_EXPORT_FILENAME: &str = "internal_wifi_bandung.csv";
pub const LIVE_EXPORT_FILENAME: &str = "scraped_osm_wifi.csv";

const HEADER: [&str; 5] = ["label", "latitude", "longitude", "source_tag", "access_tag"];

/// Writes `points` as UTF-8 CSV with a header row.
///
/// The header is written even when `points` is empty.
///
/// # Errors
///
/// Returns [`ScraperError::Csv`] if a record cannot be written.
pub fn write_points_csv<W: Write>(points: &[WifiPoint], writer: W) -> Result<(), ScraperError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for point in points {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Parses a CSV produced by [`write_points_csv`].
///
/// # Errors
///
/// Returns [`ScraperError::Csv`] if any record does not match the schema.
pub fn read_points_csv<R: Read>(reader: R) -> Result<Vec<WifiPoint>, ScraperError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize::<WifiPoint>()
        .map(|record| record.map_err(ScraperError::from))
        .collect()
}
