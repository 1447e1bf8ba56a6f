//! Loading the curated internal dataset from disk.
//!
//! The dataset ships in two interchangeable formats, CSV and a JSON array
//! of row objects. Candidates are tried in order and the first readable one
//! wins. Nothing here fails: if no candidate can be read, the internal
//! source is simply empty for this cycle.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use wifiradar_core::WifiPoint;

use crate::error::ScraperError;
use crate::normalize::normalize_internal;
use crate::types::RawDatasetRow;

/// Supported on-disk formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
}

impl DatasetFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Loads and normalizes the internal dataset from the first readable candidate.
///
/// Returns an empty vector when no candidate can be opened and parsed.
pub fn load_internal_points<P: AsRef<Path>>(candidates: &[P]) -> Vec<WifiPoint> {
    for candidate in candidates {
        let path = candidate.as_ref();
        match read_dataset_rows(path) {
            Ok(rows) => {
                let points = normalize_internal(&rows);
                tracing::info!(
                    path = %path.display(),
                    rows = rows.len(),
                    points = points.len(),
                    "loaded internal dataset"
                );
                return points;
            }
            Err(error) => {
                tracing::debug!(path = %path.display(), %error, "dataset candidate unreadable");
            }
        }
    }

    tracing::warn!("no internal dataset readable; continuing without it");
    Vec::new()
}

/// Reads raw rows from a single dataset file.
///
/// Individual rows that do not deserialize are skipped; only a file that
/// cannot be opened or parsed at all is an error.
///
/// # Errors
///
/// - [`ScraperError::UnsupportedFormat`] if the extension is not `.csv` or `.json`.
/// - [`ScraperError::Io`] if the file cannot be opened.
/// - [`ScraperError::Csv`] / [`ScraperError::MissingColumn`] if the CSV header
///   cannot be read or lacks a required column.
/// - [`ScraperError::Deserialize`] if the JSON document is not an array of objects.
pub fn read_dataset_rows(path: &Path) -> Result<Vec<RawDatasetRow>, ScraperError> {
    let format = DatasetFormat::from_path(path).ok_or_else(|| ScraperError::UnsupportedFormat {
        path: path.display().to_string(),
    })?;
    let file = File::open(path).map_err(|source| ScraperError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let reader = BufReader::new(file);

    match format {
        DatasetFormat::Csv => read_csv_rows(reader, &path.display().to_string()),
        DatasetFormat::Json => read_json_rows(reader, &path.display().to_string()),
    }
}

/// Columns a CSV dataset must declare in its header row.
const REQUIRED_COLUMNS: [&str; 3] = ["lokasi", "latitude", "longitude"];

/// Parses dataset rows from CSV with a header row.
///
/// # Errors
///
/// - [`ScraperError::Csv`] if the header row cannot be read.
/// - [`ScraperError::MissingColumn`] if `lokasi`, `latitude`, or `longitude`
///   is not declared (this includes an empty file).
pub fn read_csv_rows<R: Read>(reader: R, context: &str) -> Result<Vec<RawDatasetRow>, ScraperError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(ScraperError::MissingColumn {
            column: (*missing).to_string(),
            path: context.to_string(),
        });
    }

    let mut rows = Vec::new();
    for (line, result) in csv_reader.deserialize::<RawDatasetRow>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(error) => tracing::debug!(line, %error, "skipping malformed dataset row"),
        }
    }
    Ok(rows)
}

/// Parses dataset rows from a JSON array of objects.
///
/// # Errors
///
/// Returns [`ScraperError::Deserialize`] if the document is not a JSON array.
pub fn read_json_rows<R: Read>(reader: R, context: &str) -> Result<Vec<RawDatasetRow>, ScraperError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_reader(reader).map_err(|source| ScraperError::Deserialize {
            context: context.to_string(),
            source,
        })?;

    let rows = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(row) => Some(row),
            Err(error) => {
                tracing::debug!(index, %error, "skipping malformed dataset row");
                None
            }
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use wifiradar_core::SourceTag;

    use super::*;
    use crate::normalize::INTERNAL_PLACEHOLDER_LABEL;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn format_is_chosen_by_extension() {
        assert_eq!(
            DatasetFormat::from_path(Path::new("a/b.CSV")),
            Some(DatasetFormat::Csv)
        );
        assert_eq!(
            DatasetFormat::from_path(Path::new("points.json")),
            Some(DatasetFormat::Json)
        );
        assert_eq!(DatasetFormat::from_path(Path::new("points.xlsx")), None);
        assert_eq!(DatasetFormat::from_path(Path::new("points")), None);
    }

    #[test]
    fn csv_rows_ignore_extra_columns() {
        let csv = "lokasi,alamat,latitude,longitude,jumlah_pengguna\n\
                   Taman Lansia,Jl. Cisangkuy,-6.9025,107.6223,41.5\n";
        let rows = read_csv_rows(csv.as_bytes(), "inline").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].lokasi.as_deref(), Some("Taman Lansia"));
        assert_eq!(
            rows[0].latitude.as_ref().and_then(crate::types::RawCell::as_f64),
            Some(-6.9025)
        );
    }

    #[test]
    fn csv_empty_cells_become_none() {
        let csv = "lokasi,latitude,longitude\n,-6.9,107.6\nBraga,,107.6\n";
        let rows = read_csv_rows(csv.as_bytes(), "inline").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].lokasi.is_none());
        assert!(rows[1].latitude.is_none());
    }

    #[test]
    fn csv_blank_label_normalizes_to_placeholder() {
        let csv = "lokasi,latitude,longitude\n\"  \",-6.9,107.6\n";
        let rows = read_csv_rows(csv.as_bytes(), "inline").unwrap();
        let points = normalize_internal(&rows);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, INTERNAL_PLACEHOLDER_LABEL);
    }

    #[test]
    fn csv_without_coordinate_columns_is_unreadable() {
        let result = read_csv_rows("lokasi,alamat\nBraga,Jl. Braga\n".as_bytes(), "inline");
        assert!(
            matches!(result, Err(ScraperError::MissingColumn { ref column, .. }) if column == "latitude"),
            "expected MissingColumn(latitude), got: {result:?}"
        );
    }

    #[test]
    fn empty_csv_is_unreadable() {
        let result = read_csv_rows("".as_bytes(), "inline");
        assert!(matches!(result, Err(ScraperError::MissingColumn { .. })));
    }

    #[test]
    fn json_rows_accept_numbers_and_numeric_strings() {
        let json = r#"[
            {"lokasi": "Braga", "latitude": -6.9175, "longitude": "107.6096"},
            {"lokasi": 42, "latitude": -6.9, "longitude": 107.6},
            {"lokasi": "Dago", "latitude": "abc", "longitude": 107.61}
        ]"#;
        let rows = read_json_rows(json.as_bytes(), "inline").unwrap();
        assert_eq!(rows.len(), 3);
        let points = normalize_internal(&rows);
        let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Braga", "42"]);
    }

    #[test]
    fn json_rows_with_unusable_labels_keep_their_coordinates() {
        let json = r#"[
            {"lokasi": null, "latitude": -6.9, "longitude": 107.6},
            {"lokasi": ["a", "b"], "latitude": -6.91, "longitude": 107.61},
            {"lokasi": {"nama": "x"}, "latitude": -6.92, "longitude": 107.62},
            {"latitude": -6.93, "longitude": 107.63}
        ]"#;
        let rows = read_json_rows(json.as_bytes(), "inline").unwrap();
        let points = normalize_internal(&rows);
        assert_eq!(points.len(), 4);
        assert!(points
            .iter()
            .all(|p| p.label == INTERNAL_PLACEHOLDER_LABEL));
    }

    #[test]
    fn csv_numeric_label_is_kept_as_text() {
        let csv = "lokasi,latitude,longitude
42,-6.9,107.6
";
        let rows = read_csv_rows(csv.as_bytes(), "inline").unwrap();
        assert_eq!(rows[0].lokasi.as_deref(), Some("42"));
    }

    #[test]
    fn json_object_document_is_an_error() {
        let result = read_json_rows(r#"{"lokasi": "x"}"#.as_bytes(), "inline");
        assert!(matches!(result, Err(ScraperError::Deserialize { .. })));
    }

    #[test]
    fn load_prefers_first_readable_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write_file(&dir, "map.csv", "lokasi,latitude,longitude\nFrom CSV,-6.9,107.6\n");
        let json = write_file(
            &dir,
            "map.json",
            r#"[{"lokasi": "From JSON", "latitude": -6.9, "longitude": 107.6}]"#,
        );

        let points = load_internal_points(&[csv, json]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "From CSV");
        assert_eq!(points[0].source_tag, SourceTag::InternalDataset);
    }

    #[test]
    fn load_falls_back_when_primary_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        let json = write_file(
            &dir,
            "map.json",
            r#"[{"lokasi": "From JSON", "latitude": -6.9, "longitude": 107.6}]"#,
        );

        let points = load_internal_points(&[missing, json]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "From JSON");
    }

    #[test]
    fn load_falls_back_when_primary_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let corrupt = write_file(&dir, "map.json", "not json at all");
        let csv = write_file(&dir, "map.csv", "lokasi,latitude,longitude\nFrom CSV,-6.9,107.6\n");

        let points = load_internal_points(&[corrupt, csv]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "From CSV");
    }

    #[test]
    fn load_falls_back_when_primary_lacks_columns() {
        let dir = tempfile::tempdir().unwrap();
        let wrong = write_file(&dir, "map.csv", "name,lat,lon\nBraga,-6.9,107.6\n");
        let json = write_file(
            &dir,
            "map.json",
            r#"[{"lokasi": "From JSON", "latitude": -6.9, "longitude": 107.6}]"#,
        );

        let points = load_internal_points(&[wrong, json]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "From JSON");
    }

    #[test]
    fn load_returns_empty_when_nothing_is_readable() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = [dir.path().join("a.csv"), dir.path().join("b.json")];
        assert!(load_internal_points(&candidates).is_empty());
    }
}
