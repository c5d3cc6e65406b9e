//! # ieod-dl
//!
//! Discovery and retrieval of the daily operation reports (IEOD) published on the COES
//! portal file browser.
//!
//! ## Design Philosophy
//!
//! ieod-dl is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Sensible defaults** - The portal's real endpoints and folder layout out of the box
//! - **Event-driven** - Consumers subscribe to events, no polling required
//! - **Resilient** - A failed file never aborts a month; every task is tallied
//!
//! ## Pipeline
//!
//! A batch for one month walks the primary report tree
//! (`Post Operación/Reportes/IEOD/<year>/<NN_Month>/<day>/`) and, best-effort, the
//! secondary dispatch tree (`.../Programa Diario/<year>/<NN_MONTH>/Día <DD>/`), classifies
//! every file row into a retrieval strategy and runs the resulting tasks on a bounded
//! pool. Output lands in `<destination>/<day>/`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ieod_dl::{BatchOutcome, Config, PortalDownloader};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = PortalDownloader::new(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let year = downloader.list_years_or_fallback().await.remove(0);
//!     let months = downloader.list_months(&year).await?;
//!     if let Some(month) = months.first() {
//!         match downloader.run_batch(&year, month, Path::new("ieod")).await? {
//!             BatchOutcome::NothingToDownload => println!("nothing to download"),
//!             BatchOutcome::Completed(summary) => {
//!                 println!("{} saved, {} failed", summary.saved, summary.failed)
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Portal file-browser listing requests and markup parsing
pub mod browser;
/// File classification into retrieval strategies
pub mod classify;
/// Configuration types
pub mod config;
/// Batch orchestration (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Month and day folder naming
pub mod naming;
/// Task retrieval and archive extraction
pub mod retriever;
/// HTTP session with the portal
pub mod session;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;
/// Year, month and day discovery over both report trees
pub mod walker;

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use browser::{DirectoryListing, PortalBrowser};
pub use config::{BatchConfig, Config, NamingConfig, PortalConfig, TreeConfig};
pub use downloader::PortalDownloader;
pub use error::{ArchiveError, Error, ErrorKind, Result};
pub use retriever::{Retriever, TaskRunner};
pub use session::Session;
pub use types::{
    BatchOutcome, BatchPhase, BatchSummary, DirectoryEntry, Event, FolderPath, Indicator,
    RemoteFile, RetrievalTask, Strategy,
};

/// Cancel the downloader's running batch once a termination signal arrives.
///
/// - **Unix:** listens for SIGTERM and Ctrl+C (SIGINT); Ctrl+C only if SIGTERM cannot be registered.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// The batch itself still resolves, reporting cancelled tasks as failures.
///
/// # Example
///
/// ```no_run
/// use ieod_dl::{cancel_on_signal, Config, PortalDownloader};
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = PortalDownloader::new(Config::default())?;
///     tokio::spawn(cancel_on_signal(downloader.clone()));
///
///     downloader.run_batch("2025", "03_Marzo", Path::new("ieod")).await?;
///     Ok(())
/// }
/// ```
pub async fn cancel_on_signal(downloader: PortalDownloader) {
    wait_for_signal().await;
    downloader.cancel().await;
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("SIGTERM received, cancelling batch"),
                () = wait_for_ctrl_c() => {}
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not register SIGTERM handler, listening for Ctrl+C only");
            wait_for_ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Ctrl+C received, cancelling batch"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
