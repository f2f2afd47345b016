//! fotodesk-geotag CLI
//!
//! Runs one batch geotagging job over a folder of images, printing the job
//! log to stdout. Ctrl-C requests cooperative cancellation; output already
//! written stays on disk.

use anyhow::Result;
use clap::Parser;
use fotodesk_common::events::{EventBus, JobEvent, JobState};
use fotodesk_geotag::{GeotagApp, JobSpec};
use std::path::PathBuf;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fotodesk-geotag", version, about = "Batch image geotagger")]
struct Args {
    /// Folder containing the images to tag
    folder: PathBuf,

    /// Candidate location names (comma-separated or repeated)
    #[arg(long, value_delimiter = ',', required = true)]
    locations: Vec<String>,

    /// Candidate keywords (comma-separated or repeated)
    #[arg(long, value_delimiter = ',', required = true)]
    keywords: Vec<String>,

    /// Maximum geocode requests per second
    #[arg(long, default_value_t = 1.0)]
    rate: f64,

    /// RNG seed for reproducible location/keyword assignment
    #[arg(long)]
    seed: Option<u64>,

    /// Alternative geocoding endpoint
    #[arg(long, env = "FOTODESK_GEOCODER_URL")]
    geocoder_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting fotodesk-geotag");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let event_bus = EventBus::new(100);
    let mut app = GeotagApp::new(event_bus.clone());
    if let Some(url) = args.geocoder_url {
        app = app.with_geocoder_url(url);
    }

    // Print the job log as it streams in; a terminal state ends the stream
    let mut rx = event_bus.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(JobEvent::JobLog { line, .. }) => println!("{}", line),
                Ok(JobEvent::JobProgress { current, total, .. }) => {
                    tracing::debug!(current, total, "progress");
                }
                Ok(JobEvent::JobStateChanged { new_state, .. })
                    if matches!(new_state, JobState::Completed | JobState::Cancelled) =>
                {
                    break;
                }
                Ok(_) => {}
                // Falling behind drops events but must not end the log output
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "log printer lagged, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let spec = JobSpec {
        folder: args.folder,
        locations: args.locations,
        keywords: args.keywords,
        requests_per_second: args.rate,
        seed: args.seed,
    };

    let mut handle = app.start_job(spec)?;

    // Ctrl-C requests cooperative cancellation at the next item boundary
    let cancel_app = app.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_app.cancel_job();
        }
    });

    let outcome = handle.wait().await?;

    info!(
        state = %outcome.state,
        processed = outcome.processed,
        errored = outcome.errored,
        skipped = outcome.skipped,
        "Job finished"
    );

    let _ = printer.await;

    Ok(())
}
