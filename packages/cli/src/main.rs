#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the crime dashboard.
//!
//! Each subcommand renders one dashboard view in the terminal. With no
//! subcommand, an interactive menu offers the views and the API server.
//!
//! Uses `indicatif-log-bridge` (via [`crime_dashboard_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod interactive;
mod views;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use crime_dashboard_analytics_models::YearSelection;
use crime_dashboard_geography::boundaries::{DEFAULT_LAYER, DEFAULT_NAME_FIELD};
use crime_dashboard_source::RecordFetcher;
use crime_dashboard_source::ckan::CkanFetcher;
use crime_dashboard_source::loader::DatasetCache;

#[derive(Parser)]
#[command(name = "crime_dashboard", about = "Israel Police crime statistics dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured yearly datasets
    Sources,
    /// Records per crime category
    Overview {
        /// Year to show; omit for the mean over all years
        #[arg(long)]
        year: Option<i32>,
        /// Also break counts down by quarter
        #[arg(long)]
        split_by_quarter: bool,
    },
    /// Quarterly volume before and after 7 October 2023
    October7 {
        /// District label; omit for all districts
        #[arg(long)]
        district: Option<String>,
        /// Print the selectable districts and exit
        #[arg(long)]
        list_districts: bool,
    },
    /// Incident counts per police region
    Heatmap {
        /// Zip archive holding the boundary layers
        #[arg(long)]
        boundaries: PathBuf,
        /// Pre-cleaned incident CSV
        #[arg(long)]
        incidents: PathBuf,
        /// Boundary layer name inside the archive
        #[arg(long, default_value = DEFAULT_LAYER)]
        layer: String,
        /// Feature property naming each region
        #[arg(long, default_value = DEFAULT_NAME_FIELD)]
        name_field: String,
        /// Statistic group to count (default: all crimes)
        #[arg(long)]
        crime_type: Option<String>,
        /// Year to count (default: all years)
        #[arg(long)]
        year: Option<i32>,
        /// Write the joined regions as `GeoJSON` to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_dashboard_cli_utils::init_logger();
    let cli = Cli::parse();

    let fetcher: Arc<dyn RecordFetcher> = Arc::new(CkanFetcher::from_registry());
    let cache = DatasetCache::new(fetcher);

    let Some(command) = cli.command else {
        return interactive::run(&cache, &multi).await;
    };

    match command {
        Commands::Sources => views::print_sources(),
        Commands::Overview {
            year,
            split_by_quarter,
        } => {
            views::overview(&cache, &multi, YearSelection::from(year), split_by_quarter).await?;
        }
        Commands::October7 {
            district,
            list_districts,
        } => {
            views::october7(&cache, &multi, district.as_deref(), list_districts).await?;
        }
        Commands::Heatmap {
            boundaries,
            incidents,
            layer,
            name_field,
            crime_type,
            year,
            output,
        } => {
            views::heatmap(
                &multi,
                &views::HeatmapArgs {
                    boundaries,
                    incidents,
                    layer,
                    name_field,
                    crime_type,
                    year,
                    output,
                },
            )?;
        }
    }

    Ok(())
}
