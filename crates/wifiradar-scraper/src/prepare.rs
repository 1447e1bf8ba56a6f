//! Offline preparation of the internal dataset from a raw survey export.
//!
//! The survey CSV has one row per observation. Preparation produces three
//! files: the cleaned observations (input to usage statistics) and the
//! per-location map table in both CSV and JSON form (input to the radar).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::error::ScraperError;

const KEY_COLUMNS: [&str; 4] = ["lokasi", "alamat", "latitude", "longitude"];

/// Where to read the survey export and where to write the prepared files.
#[derive(Debug, Clone)]
pub struct PreparePaths {
    pub input: PathBuf,
    pub raw_output: PathBuf,
    pub map_output: PathBuf,
    pub map_json_output: PathBuf,
}

/// Row counts reported after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareSummary {
    pub raw_rows: usize,
    pub map_rows: usize,
}

/// Survey rows that passed cleaning, with the original header row.
#[derive(Debug, Clone)]
pub struct CleanedSurvey {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
    key_indices: [usize; 4],
}

/// One aggregated location in the map table.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRow {
    pub lokasi: String,
    pub alamat: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Per-column means, aligned with [`MapTable::value_columns`].
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapTable {
    pub value_columns: Vec<String>,
    pub rows: Vec<MapRow>,
}

#[derive(Debug, Clone)]
struct GroupKey {
    lokasi: String,
    alamat: String,
    latitude: f64,
    longitude: f64,
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lokasi
            .cmp(&other.lokasi)
            .then_with(|| self.alamat.cmp(&other.alamat))
            .then_with(|| self.latitude.total_cmp(&other.latitude))
            .then_with(|| self.longitude.total_cmp(&other.longitude))
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Runs the full preparation and writes all three outputs.
///
/// # Errors
///
/// - [`ScraperError::Io`] if the input cannot be opened or an output cannot be created.
/// - [`ScraperError::MissingColumn`] if a key column is absent from the input.
/// - [`ScraperError::Csv`] / [`ScraperError::Serialize`] on write failures.
pub fn prepare_dataset(paths: &PreparePaths) -> Result<PrepareSummary, ScraperError> {
    let input = File::open(&paths.input).map_err(|source| ScraperError::Io {
        path: paths.input.display().to_string(),
        source,
    })?;
    let cleaned = clean_survey(BufReader::new(input), &paths.input.display().to_string())?;
    let map = aggregate_map(&cleaned);

    write_cleaned_csv(&cleaned, create_output(&paths.raw_output)?)?;
    write_map_csv(&map, create_output(&paths.map_output)?)?;
    write_map_json(&map, create_output(&paths.map_json_output)?)?;

    let summary = PrepareSummary {
        raw_rows: cleaned.rows.len(),
        map_rows: map.rows.len(),
    };
    tracing::info!(
        input = %paths.input.display(),
        raw_rows = summary.raw_rows,
        map_rows = summary.map_rows,
        "prepared dataset"
    );
    Ok(summary)
}

/// Drops rows with a blank `lokasi`, unparseable coordinates, or a
/// coordinate equal to zero.
///
/// # Errors
///
/// - [`ScraperError::Csv`] if the header row cannot be read.
/// - [`ScraperError::MissingColumn`] if a key column is not declared.
pub fn clean_survey<R: Read>(reader: R, context: &str) -> Result<CleanedSurvey, ScraperError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut key_indices = [0; 4];
    for (slot, column) in key_indices.iter_mut().zip(KEY_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| ScraperError::MissingColumn {
                column: column.to_string(),
                path: context.to_string(),
            })?;
    }

    let mut rows = Vec::new();
    let mut dropped = 0_usize;
    for (line, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!(line, %error, "skipping unreadable survey row");
                dropped += 1;
                continue;
            }
        };
        if keep_row(&record, key_indices) {
            rows.push(record);
        } else {
            dropped += 1;
        }
    }
    tracing::debug!(kept = rows.len(), dropped, "cleaned survey rows");

    Ok(CleanedSurvey {
        headers,
        rows,
        key_indices,
    })
}

fn keep_row(record: &StringRecord, [lokasi, _, latitude, longitude]: [usize; 4]) -> bool {
    let has_label = record.get(lokasi).is_some_and(|v| !v.trim().is_empty());
    let nonzero = |index| parse_number(record.get(index)).is_some_and(|v| v != 0.0);
    has_label && nonzero(latitude) && nonzero(longitude)
}

fn parse_number(cell: Option<&str>) -> Option<f64> {
    cell?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Groups cleaned rows by location and averages every numeric column.
///
/// Rows with a blank `alamat` do not belong to any group. A column is
/// numeric when every non-blank value in it parses as a number.
#[must_use]
pub fn aggregate_map(cleaned: &CleanedSurvey) -> MapTable {
    let [lokasi_idx, alamat_idx, lat_idx, lon_idx] = cleaned.key_indices;

    let value_indices: Vec<usize> = (0..cleaned.headers.len())
        .filter(|index| !cleaned.key_indices.contains(index))
        .filter(|&index| {
            cleaned.rows.iter().all(|row| match row.get(index) {
                Some(cell) if !cell.trim().is_empty() => parse_number(Some(cell)).is_some(),
                _ => true,
            })
        })
        .collect();

    let mut groups: BTreeMap<GroupKey, Vec<(f64, usize)>> = BTreeMap::new();
    for row in &cleaned.rows {
        let alamat = row.get(alamat_idx).unwrap_or_default().trim();
        if alamat.is_empty() {
            continue;
        }
        let (Some(latitude), Some(longitude)) =
            (parse_number(row.get(lat_idx)), parse_number(row.get(lon_idx)))
        else {
            continue;
        };
        let key = GroupKey {
            lokasi: row.get(lokasi_idx).unwrap_or_default().trim().to_string(),
            alamat: alamat.to_string(),
            latitude,
            longitude,
        };

        let sums = groups
            .entry(key)
            .or_insert_with(|| vec![(0.0, 0); value_indices.len()]);
        for (slot, &index) in sums.iter_mut().zip(&value_indices) {
            if let Some(value) = parse_number(row.get(index)) {
                slot.0 += value;
                slot.1 += 1;
            }
        }
    }

    let rows = groups
        .into_iter()
        .map(|(key, sums)| MapRow {
            lokasi: key.lokasi,
            alamat: key.alamat,
            latitude: key.latitude,
            longitude: key.longitude,
            values: sums.into_iter().map(|(sum, n)| mean(sum, n)).collect(),
        })
        .collect();

    MapTable {
        value_columns: value_indices
            .iter()
            .map(|&index| cleaned.headers[index].to_string())
            .collect(),
        rows,
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| round_one_decimal(sum / count as f64))
}

/// Rounds to one decimal, halves to even.
pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Writes the cleaned rows with the original header.
///
/// # Errors
///
/// Returns [`ScraperError::Csv`] if a record cannot be written.
pub fn write_cleaned_csv<W: Write>(cleaned: &CleanedSurvey, writer: W) -> Result<(), ScraperError> {
    let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    csv_writer.write_record(&cleaned.headers)?;
    for row in &cleaned.rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes the map table as CSV: key columns first, then averaged columns.
///
/// # Errors
///
/// Returns [`ScraperError::Csv`] if a record cannot be written.
pub fn write_map_csv<W: Write>(map: &MapTable, writer: W) -> Result<(), ScraperError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let header = KEY_COLUMNS
        .iter()
        .copied()
        .chain(map.value_columns.iter().map(String::as_str));
    csv_writer.write_record(header)?;

    for row in &map.rows {
        let mut record = vec![
            row.lokasi.clone(),
            row.alamat.clone(),
            row.latitude.to_string(),
            row.longitude.to_string(),
        ];
        record.extend(
            row.values
                .iter()
                .map(|value| value.map(|v| v.to_string()).unwrap_or_default()),
        );
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes the map table as a JSON array of row objects.
///
/// # Errors
///
/// - [`ScraperError::Serialize`] if the document cannot be written.
/// - [`ScraperError::Io`] if the final flush fails.
pub fn write_map_json<W: Write>(map: &MapTable, mut writer: W) -> Result<(), ScraperError> {
    let rows: Vec<serde_json::Value> = map
        .rows
        .iter()
        .map(|row| {
            let mut object = serde_json::Map::new();
            object.insert("lokasi".into(), row.lokasi.clone().into());
            object.insert("alamat".into(), row.alamat.clone().into());
            object.insert("latitude".into(), row.latitude.into());
            object.insert("longitude".into(), row.longitude.into());
            for (column, value) in map.value_columns.iter().zip(&row.values) {
                object.insert(column.clone(), value.map_or(serde_json::Value::Null, Into::into));
            }
            serde_json::Value::Object(object)
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &rows).map_err(|source| ScraperError::Serialize {
        context: "map table".to_string(),
        source,
    })?;
    writer.flush().map_err(|source| ScraperError::Io {
        path: "map table".to_string(),
        source,
    })
}

fn create_output(path: &Path) -> Result<BufWriter<File>, ScraperError> {
    let io_error = |source| ScraperError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    File::create(path).map(BufWriter::new).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_dataset_rows;

    const SURVEY: &str = "\
lokasi,alamat,latitude,longitude,jumlah_pengguna,kecepatan,catatan
Taman Lansia,Jl. Cisangkuy,-6.9025,107.6223,40,12.25,ramai
Taman Lansia,Jl. Cisangkuy,-6.9025,107.6223,45,,sepi
Alun-Alun,Jl. Asia Afrika,-6.9218,107.6070,120,8.5,
,Jl. Braga,-6.9170,107.6090,10,3,
Braga,Jl. Braga,0,107.6090,10,3,
Braga,Jl. Braga,-6.9170,utara,10,3,
Dago,,-6.8850,107.6130,30,5,
";

    fn cleaned() -> CleanedSurvey {
        clean_survey(SURVEY.as_bytes(), "inline").unwrap()
    }

    #[test]
    fn cleaning_drops_blank_label_zero_and_bad_coordinates() {
        let cleaned = cleaned();
        assert_eq!(cleaned.rows.len(), 4);
        assert!(cleaned.rows.iter().all(|row| &row[0] != "Braga"));
    }

    #[test]
    fn cleaning_requires_key_columns() {
        let csv = "lokasi,latitude,longitude\nBraga,-6.917,107.609\n";
        let result = clean_survey(csv.as_bytes(), "inline");
        assert!(matches!(
            result,
            Err(ScraperError::MissingColumn { ref column, .. }) if column == "alamat"
        ));
    }

    #[test]
    fn map_groups_by_location_and_averages_numeric_columns() {
        let map = aggregate_map(&cleaned());
        assert_eq!(map.value_columns, vec!["jumlah_pengguna", "kecepatan"]);
        assert_eq!(map.rows.len(), 2);

        let alun = &map.rows[0];
        assert_eq!(alun.lokasi, "Alun-Alun");
        assert_eq!(alun.values, vec![Some(120.0), Some(8.5)]);

        let lansia = &map.rows[1];
        assert_eq!(lansia.lokasi, "Taman Lansia");
        assert_eq!(lansia.latitude, -6.9025);
        assert_eq!(lansia.values, vec![Some(42.5), Some(12.2)]);
    }

    #[test]
    fn one_decimal_rounding_sends_halves_to_even() {
        assert_eq!(round_one_decimal(12.25), 12.2);
        assert_eq!(round_one_decimal(0.75), 0.8);
        assert_eq!(round_one_decimal(-2.25), -2.2);
        assert_eq!(round_one_decimal(3.17), 3.2);
    }

    #[test]
    fn rows_without_address_are_not_grouped() {
        let map = aggregate_map(&cleaned());
        assert!(map.rows.iter().all(|row| row.lokasi != "Dago"));
    }

    #[test]
    fn map_csv_puts_key_columns_first() {
        let mut buffer = Vec::new();
        write_map_csv(&aggregate_map(&cleaned()), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("lokasi,alamat,latitude,longitude,jumlah_pengguna,kecepatan")
        );
        assert_eq!(
            lines.next(),
            Some("Alun-Alun,Jl. Asia Afrika,-6.9218,107.607,120,8.5")
        );
    }

    #[test]
    fn prepare_writes_all_outputs_readable_by_the_radar() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bandung.csv");
        fs::write(&input, SURVEY).unwrap();
        let paths = PreparePaths {
            input,
            raw_output: dir.path().join("out/raw.csv"),
            map_output: dir.path().join("out/map.csv"),
            map_json_output: dir.path().join("out/map.json"),
        };

        let summary = prepare_dataset(&paths).unwrap();
        assert_eq!(
            summary,
            PrepareSummary {
                raw_rows: 4,
                map_rows: 2
            }
        );

        let raw = fs::read_to_string(&paths.raw_output).unwrap();
        assert_eq!(raw.lines().count(), 5);

        let from_csv = read_dataset_rows(&paths.map_output).unwrap();
        let from_json = read_dataset_rows(&paths.map_json_output).unwrap();
        assert_eq!(from_csv.len(), 2);
        assert_eq!(from_csv, from_json);
    }

    #[test]
    fn prepare_reports_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PreparePaths {
            input: dir.path().join("absent.csv"),
            raw_output: dir.path().join("raw.csv"),
            map_output: dir.path().join("map.csv"),
            map_json_output: dir.path().join("map.json"),
        };
        assert!(matches!(
            prepare_dataset(&paths),
            Err(ScraperError::Io { .. })
        ));
    }
}
