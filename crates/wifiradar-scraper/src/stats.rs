//! Per-location usage ranking over the cleaned survey rows.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::ScraperError;
use crate::prepare::round_one_decimal;

const USERS_COLUMN: &str = "jumlah_pengguna";
const LOCATION_COLUMN: &str = "lokasi";

/// Number of entries shown in the ranking chart.
pub const CHART_LEN: usize = 15;

/// What the ranking values measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageMetric {
    /// Mean of `jumlah_pengguna` per location, whole users.
    MeanUsers,
    /// Number of survey rows per location.
    RecordCount,
}

impl UsageMetric {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            UsageMetric::MeanUsers => "mean users",
            UsageMetric::RecordCount => "records",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationUsage {
    pub lokasi: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSummary {
    pub total_rows: usize,
    pub metric: UsageMetric,
    /// Highest value first; ties ordered by location name.
    pub ranking: Vec<LocationUsage>,
}

impl UsageSummary {
    #[must_use]
    pub fn top_location(&self) -> Option<&LocationUsage> {
        self.ranking.first()
    }

    /// The leading entries plotted in the bar chart.
    #[must_use]
    pub fn chart(&self) -> &[LocationUsage] {
        &self.ranking[..self.ranking.len().min(CHART_LEN)]
    }
}

/// Summarizes the cleaned survey file at `path`.
///
/// Returns `None` when the file is missing or unreadable.
pub fn load_usage_summary(path: &Path) -> Option<UsageSummary> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "usage data not found");
            return None;
        }
    };
    match summarize_usage(BufReader::new(file), &path.display().to_string()) {
        Ok(summary) => Some(summary),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "usage data unreadable");
            None
        }
    }
}

/// Builds the ranking from cleaned survey CSV.
///
/// Unreadable rows are skipped and not counted. Rows with a blank `lokasi`
/// are counted in `total_rows` but not ranked.
/// For the mean metric, locations without a single numeric value are left out.
///
/// # Errors
///
/// - [`ScraperError::Csv`] if the header row cannot be read.
/// - [`ScraperError::MissingColumn`] if there is no `lokasi` column.
pub fn summarize_usage<R: Read>(reader: R, context: &str) -> Result<UsageSummary, ScraperError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let location_idx = headers
        .iter()
        .position(|h| h == LOCATION_COLUMN)
        .ok_or_else(|| ScraperError::MissingColumn {
            column: LOCATION_COLUMN.to_string(),
            path: context.to_string(),
        })?;
    let users_idx = headers.iter().position(|h| h == USERS_COLUMN);

    let mut total_rows = 0_usize;
    let mut per_location: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for (line, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                tracing::debug!(line, %error, "skipping unreadable usage row");
                continue;
            }
        };
        total_rows += 1;

        let Some(lokasi) = record
            .get(location_idx)
            .map(str::trim)
            .filter(|v| !v.is_empty())
        else {
            continue;
        };

        let entry = per_location.entry(lokasi.to_string()).or_insert((0.0, 0));
        match users_idx {
            Some(index) => {
                if let Some(users) = record
                    .get(index)
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite())
                {
                    entry.0 += users;
                    entry.1 += 1;
                }
            }
            None => entry.1 += 1,
        }
    }

    let metric = if users_idx.is_some() {
        UsageMetric::MeanUsers
    } else {
        UsageMetric::RecordCount
    };

    let mut ranking: Vec<LocationUsage> = per_location
        .into_iter()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(lokasi, (sum, count))| LocationUsage {
            lokasi,
            value: match metric {
                UsageMetric::MeanUsers => whole_mean(sum, count),
                UsageMetric::RecordCount => i64::try_from(count).unwrap_or(i64::MAX),
            },
        })
        .collect();
    // BTreeMap order makes ties fall back to the location name.
    ranking.sort_by(|a, b| b.value.cmp(&a.value));

    Ok(UsageSummary {
        total_rows,
        metric,
        ranking,
    })
}

/// Mean rounded to one decimal, then truncated toward zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_mean(sum: f64, count: usize) -> i64 {
    round_one_decimal(sum / count as f64).trunc() as i64
}
