use std::path::Path;

use wifiradar_scraper::{load_usage_summary, UsageSummary};

pub(crate) fn run_stats(path: &Path, top: usize) {
    match load_usage_summary(path) {
        Some(summary) => print!("{}", render_summary(&summary, top)),
        None => println!("Usage data '{}' not found.", path.display()),
    }
}

pub(crate) fn render_summary(summary: &UsageSummary, top: usize) -> String {
    let leader = summary.top_location().map_or_else(
        || "-".to_string(),
        |entry| format!("{} ({})", entry.lokasi, entry.value),
    );
    let mut out = format!(
        "Total records: {}\nMost used: {leader}\nRanking by {}:\n",
        summary.total_rows,
        summary.metric.label()
    );
    for (index, entry) in summary.ranking.iter().take(top).enumerate() {
        out.push_str(&format!("{:>3}. {:<32} {}\n", index + 1, entry.lokasi, entry.value));
    }
    out
}
