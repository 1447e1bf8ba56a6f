mod dataset;
mod radar;
mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use wifiradar_core::{DashboardState, View, NEAREST_LIST_LEN};

#[derive(Debug, Parser)]
#[command(name = "wifiradar")]
#[command(about = "Public WiFi radar for Bandung")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank public WiFi points around a location
    Radar {
        /// Device latitude; the first fix recenters the radar
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Device longitude
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
        /// Place name to search for within the city
        #[arg(long)]
        search: Option<String>,
        /// Search radius in kilometers (defaults to `WIFIRADAR_RADIUS_KM`)
        #[arg(long)]
        radius: Option<f64>,
        /// Number of nearest points to list
        #[arg(long, default_value_t = NEAREST_LIST_LEN)]
        limit: usize,
    },
    /// Rank locations by recorded usage
    Stats {
        /// Cleaned survey CSV (defaults to `WIFIRADAR_RAW_DATA_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Number of locations to list
        #[arg(long, default_value_t = wifiradar_scraper::stats::CHART_LEN)]
        top: usize,
    },
    /// Write a normalized point set as CSV
    Export {
        #[arg(value_enum)]
        source: ExportSource,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Clean a raw survey export and build the map dataset
    Prepare {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        raw_output: Option<PathBuf>,
        #[arg(long)]
        map_output: Option<PathBuf>,
        #[arg(long)]
        map_json_output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportSource {
    Internal,
    Live,
}

/// Dashboard view a command renders.
fn view_for(command: Option<&Commands>) -> View {
    match command {
        None | Some(Commands::Radar { .. }) => View::Radar,
        Some(Commands::Stats { .. }) => View::Stats,
        Some(Commands::Export { .. } | Commands::Prepare { .. }) => View::Data,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = wifiradar_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut state = DashboardState::default();
    state.show(view_for(cli.command.as_ref()));
    println!("== {} ==", state.view.title());

    match cli.command {
        Some(Commands::Radar {
            lat,
            lon,
            search,
            radius,
            limit,
        }) => {
            let request = radar::RadarRequest {
                device: lat.zip(lon),
                search,
                radius_km: radius.unwrap_or(config.radius_km),
                limit,
            };
            radar::run_radar(&config, &mut state, &request).await?;
        }
        None => {
            let request = radar::RadarRequest {
                device: None,
                search: None,
                radius_km: config.radius_km,
                limit: NEAREST_LIST_LEN,
            };
            radar::run_radar(&config, &mut state, &request).await?;
        }
        Some(Commands::Stats { input, top }) => {
            let path = input.unwrap_or_else(|| config.raw_data_path.clone());
            stats::run_stats(&path, top);
        }
        Some(Commands::Export { source, output }) => {
            dataset::run_export(&config, source, output).await?;
        }
        Some(Commands::Prepare {
            input,
            raw_output,
            map_output,
            map_json_output,
        }) => {
            let paths = wifiradar_scraper::PreparePaths {
                input,
                raw_output: raw_output.unwrap_or_else(|| config.raw_data_path.clone()),
                map_output: map_output.unwrap_or_else(|| config.dataset_path.clone()),
                map_json_output: map_json_output
                    .unwrap_or_else(|| config.dataset_fallback_path.clone()),
            };
            dataset::run_prepare(&paths)?;
        }
    }

    Ok(())
}
