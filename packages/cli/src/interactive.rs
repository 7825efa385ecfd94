//! Interactive menu for the crime dashboard.
//!
//! Loops over the dashboard views until the user quits. The dataset is
//! fetched once and reused by every view in the session.

use std::path::PathBuf;

use crime_dashboard_analytics::{comparison, overview};
use crime_dashboard_analytics_models::YearSelection;
use crime_dashboard_cli_utils::MultiProgress;
use crime_dashboard_geography::boundaries::{DEFAULT_LAYER, DEFAULT_NAME_FIELD};
use crime_dashboard_geography::heatmap;
use crime_dashboard_geography_models::ALL_CRIMES;
use crime_dashboard_server::{DEFAULT_BOUNDARIES_PATH, DEFAULT_INCIDENTS_PATH};
use crime_dashboard_source::loader::DatasetCache;
use dialoguer::{Confirm, Input, Select};

use crate::views;

enum Action {
    Overview,
    October7,
    Heatmap,
    Server,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Overview,
        Self::October7,
        Self::Heatmap,
        Self::Server,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview by category",
            Self::October7 => "Before/after 7 October 2023",
            Self::Heatmap => "Heatmap by police region",
            Self::Server => "Start API server",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt fails or a view cannot load its data.
pub async fn run(
    cache: &DatasetCache,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Crime Dashboard");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to see?")
            .items(&labels)
            .default(0)
            .interact()?;

        let result = match Action::ALL[idx] {
            Action::Overview => run_overview(cache, multi).await,
            Action::October7 => run_october7(cache, multi).await,
            Action::Heatmap => run_heatmap(multi),
            Action::Server => {
                // The server uses actix-web's runtime, so we need to run it
                // in a blocking task to avoid nesting tokio runtimes.
                tokio::task::spawn_blocking(|| {
                    actix_web::rt::System::new()
                        .block_on(crime_dashboard_server::interactive::run())
                })
                .await??;
                return Ok(());
            }
            Action::Quit => return Ok(()),
        };

        if let Err(e) = result {
            log::error!("{e}");
        }
        println!();
    }
}

async fn run_overview(
    cache: &DatasetCache,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = views::load(cache, multi).await?;

    let mut options = vec!["All years (mean)".to_string()];
    let years = overview::available_years(&dataset);
    options.extend(years.iter().map(ToString::to_string));

    let idx = Select::new()
        .with_prompt("Year")
        .items(&options)
        .default(0)
        .interact()?;
    let selection = if idx == 0 {
        YearSelection::AllYears
    } else {
        YearSelection::Year(years[idx - 1])
    };

    let split = Confirm::new()
        .with_prompt("Split by quarter?")
        .default(false)
        .interact()?;

    views::overview(cache, multi, selection, split).await
}

async fn run_october7(
    cache: &DatasetCache,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = views::load(cache, multi).await?;
    let districts = comparison::districts(&comparison::october_seventh_rows(&dataset));
    if districts.is_empty() {
        println!("No district data available.");
        return Ok(());
    }

    let idx = Select::new()
        .with_prompt("District")
        .items(&districts)
        .default(0)
        .interact()?;

    views::october7(cache, multi, Some(&districts[idx]), false).await
}

fn run_heatmap(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let boundaries: String = Input::new()
        .with_prompt("Boundary archive (zip)")
        .default(DEFAULT_BOUNDARIES_PATH.to_string())
        .interact_text()?;
    let incidents_path: String = Input::new()
        .with_prompt("Incident CSV")
        .default(DEFAULT_INCIDENTS_PATH.to_string())
        .interact_text()?;

    let incidents = heatmap::load_incidents(&PathBuf::from(&incidents_path))?;

    let mut crime_types = vec![ALL_CRIMES.to_string()];
    crime_types.extend(heatmap::crime_types(&incidents));
    let crime_idx = Select::new()
        .with_prompt("Crime type")
        .items(&crime_types)
        .default(0)
        .interact()?;

    let years = heatmap::years(&incidents);
    let mut year_options = vec!["All years".to_string()];
    year_options.extend(years.iter().map(ToString::to_string));
    let year_idx = Select::new()
        .with_prompt("Year")
        .items(&year_options)
        .default(0)
        .interact()?;

    views::heatmap(
        multi,
        &views::HeatmapArgs {
            boundaries: PathBuf::from(boundaries),
            incidents: PathBuf::from(incidents_path),
            layer: DEFAULT_LAYER.to_string(),
            name_field: DEFAULT_NAME_FIELD.to_string(),
            crime_type: Some(crime_types[crime_idx].clone()),
            year: (year_idx > 0).then(|| years[year_idx - 1]),
            output: None,
        },
    )
}
