use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use sikjipsa_client::app_state::AppState;
use sikjipsa_client::config::ClientConfig;
use sikjipsa_client::models::community::{PostQuery, PostType};
use sikjipsa_client::models::diagnosis::{Identification, Location, UNIDENTIFIED_NOTICE};
use sikjipsa_client::models::plant::PlantFilter;
use sikjipsa_client::services::community::PostPager;
use sikjipsa_client::services::polling::{CancelHandle, PollPolicy};
use sikjipsa_client::services::validation::ImageUpload;

/// Command-line client for the Sikjipsa plant-care API.
///
/// Reads `API_URL` (and optionally `API_TOKEN`) from the environment or a
/// `.env` file. Results are printed to stdout as JSON; logs go to stderr.
#[derive(Debug, Parser)]
#[command(name = "sikjipsa", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Upload a plant photo and wait for the AI diagnosis.
    ///
    /// Ctrl-C stops polling immediately.
    Diagnose {
        /// JPEG, PNG or WEBP image, at most 10 MiB.
        image: PathBuf,

        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Override POLL_MAX_ATTEMPTS.
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Override POLL_INTERVAL_MS.
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Browse the plant encyclopedia.
    Plants {
        /// Case-insensitive match on name or scientific name.
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<u64>,
    },

    /// Read the community feed.
    Posts {
        /// general, question, tip, share or trade.
        #[arg(long = "type")]
        post_type: Option<PostType>,

        #[arg(long)]
        search: Option<String>,

        /// Pages to load.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// List published announcements.
    Announcements,

    /// Recent diagnoses of the signed-in user. Requires API_TOKEN.
    History,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    describe_metrics();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = ClientConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    tracing::debug!(api = %state.client.base_url(), "Client initialized");

    match cli.command {
        Command::Diagnose {
            image,
            lat,
            lon,
            max_attempts,
            interval_ms,
        } => {
            let upload = ImageUpload::from_path(&image)?;
            let location = lat
                .zip(lon)
                .map(|(latitude, longitude)| Location { latitude, longitude });
            let policy = PollPolicy::new(
                max_attempts.unwrap_or(state.poll_policy.max_attempts),
                interval_ms
                    .map(Duration::from_millis)
                    .unwrap_or(state.poll_policy.interval),
            );

            let handle = CancelHandle::new();
            let signal = handle.signal();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling diagnosis");
                    handle.cancel();
                }
            });

            let report = state
                .diagnosis
                .analyze_and_wait(&upload, location, policy, &signal)
                .await?;

            if report.identification() == Identification::Unidentified {
                eprintln!("{UNIDENTIFIED_NOTICE}");
            }
            print_json(&report)?;
        }

        Command::Plants { search, category } => {
            let plants = state.plants.all_plants().await?;
            let filter = PlantFilter {
                category_id: category,
                search: search.unwrap_or_default(),
            };
            print_json(&filter.apply(&plants))?;
        }

        Command::Posts {
            post_type,
            search,
            pages,
        } => {
            let query = PostQuery {
                post_type,
                search,
                ..PostQuery::default()
            };
            let mut pager = PostPager::new(state.community.clone(), query);
            pager.load_pages(pages.max(1)).await?;
            print_json(pager.posts())?;
        }

        Command::Announcements => {
            print_json(&state.announcements.list().await?)?;
        }

        Command::History => {
            if state.client.credential().is_none() {
                return Err("API_TOKEN is required for history".into());
            }
            print_json(&state.diagnosis.history().await?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn describe_metrics() {
    metrics::describe_counter!("diagnosis_jobs_submitted", "Images submitted for diagnosis");
    metrics::describe_counter!(
        "diagnosis_poll_attempts_total",
        "Status requests issued while polling"
    );
    metrics::describe_counter!("diagnosis_jobs_completed", "Diagnoses that completed");
    metrics::describe_counter!("diagnosis_jobs_failed", "Diagnoses reported as failed");
    metrics::describe_counter!(
        "diagnosis_jobs_timed_out",
        "Diagnoses abandoned after the attempt budget"
    );
    metrics::describe_histogram!(
        "diagnosis_wait_seconds",
        "Time from first status request to a terminal outcome"
    );
}
