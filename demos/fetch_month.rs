//! Fetch one month of IEOD reports
//!
//! This demo walks through the whole pipeline:
//! - Listing published years and months
//! - Subscribing to batch events
//! - Running a month batch into a local folder
//! - Cancelling with Ctrl+C
//!
//! ```bash
//! RUST_LOG=ieod_dl=debug cargo run --example fetch_month -- [year] [month] [dest]
//! ```
//!
//! An optional `IEOD_CONFIG` environment variable points at a JSON config file.

use std::path::PathBuf;

use ieod_dl::{BatchOutcome, BatchPhase, Config, Event, PortalDownloader, cancel_on_signal};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ieod_dl=info")),
        )
        .init();

    let config = match std::env::var_os("IEOD_CONFIG") {
        Some(path) => Config::load(&PathBuf::from(path)).await?,
        None => Config::default(),
    };
    let downloader = PortalDownloader::new(config)?;

    let mut args = std::env::args().skip(1);

    let years = downloader.list_years_or_fallback().await;
    println!("Years: {}", years.join(", "));
    let year = args.next().unwrap_or_else(|| years[0].clone());

    let months = downloader.list_months(&year).await?;
    println!("Months of {}: {}", year, months.join(", "));
    let Some(month) = args.next().or_else(|| months.last().cloned()) else {
        println!("No months published for {}", year);
        return Ok(());
    };

    let dest = PathBuf::from(args.next().unwrap_or_else(|| format!("ieod/{}/{}", year, month)));

    // Subscribe to events
    let mut events = downloader.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                Event::PhaseChanged { phase } if phase != BatchPhase::Idle => {
                    println!("» {:?}", phase);
                }
                Event::DayDiscovered {
                    day,
                    primary,
                    secondary,
                } => {
                    println!("  day {}: {} files, {} dispatch files", day, primary, secondary);
                }
                Event::TaskSaved { path, .. } => {
                    println!("✓ {}", path.display());
                }
                Event::TaskFailed {
                    file,
                    error_kind,
                    message,
                } => {
                    println!("✗ {} [{}]: {}", file, error_kind, message);
                }
                Event::Progress {
                    completed,
                    total,
                    percent,
                } => {
                    println!("  {}/{} ({}%)", completed, total, percent);
                }
                _ => {}
            }
        }
    });

    // Ctrl+C stops the batch; remaining tasks are reported as failed
    tokio::spawn(cancel_on_signal(downloader.clone()));

    println!("Fetching {}/{} into {}", year, month, dest.display());
    match downloader.run_batch(&year, &month, &dest).await? {
        BatchOutcome::NothingToDownload => println!("Nothing to download"),
        BatchOutcome::Completed(summary) => println!(
            "Done: {} saved, {} failed in {}s",
            summary.saved,
            summary.failed,
            (summary.finished_at - summary.started_at).num_seconds()
        ),
    }

    Ok(())
}
