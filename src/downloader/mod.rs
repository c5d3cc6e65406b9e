//! Batch orchestration split into focused submodules.
//!
//! The `PortalDownloader` struct and its methods are organized by phase:
//! - [`discovery`] - Walking the day folders of a month and planning tasks
//! - [`batch`] - Bounded-concurrency task execution and progress reporting

mod batch;
mod discovery;


use crate::browser::{DirectoryListing, PortalBrowser};
use crate::config::Config;
use crate::error::Result;
use crate::retriever::{Retriever, TaskRunner};
use crate::session::Session;
use crate::types::{BatchOutcome, BatchPhase, BatchSummary, Event};
use crate::walker::HierarchyWalker;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct PortalDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Discovery over both report trees
    pub(crate) walker: HierarchyWalker,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Cancellation token of the current batch, replaced when a batch starts
    pub(crate) cancel_token: Arc<tokio::sync::Mutex<CancellationToken>>,
}

impl PortalDownloader {
    /// Create a new PortalDownloader browsing the configured portal
    ///
    /// No request is made until a listing or batch operation is called.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let session = Session::new(&config.portal)?;
        let browser = PortalBrowser::new(session, &config.portal)?;
        Self::with_listing(config, Arc::new(browser))
    }

    /// Create a downloader over a custom [`DirectoryListing`]
    pub fn with_listing(config: Config, listing: Arc<dyn DirectoryListing>) -> Result<Self> {
        config.validate()?;

        let walker = HierarchyWalker::new(listing, config.tree.clone(), config.naming.clone());
        let (event_tx, _rx) = tokio::sync::broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            config: Arc::new(config),
            walker,
            event_tx,
            cancel_token: Arc::new(tokio::sync::Mutex::new(CancellationToken::new())),
        })
    }

    /// Subscribe to batch events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events independently.
    /// Events are buffered, but if a subscriber falls behind by more than 1000 events,
    /// it will receive a `RecvError::Lagged` error.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Request cancellation of the running batch
    ///
    /// In-flight downloads stop at their next chunk and tasks not yet started fail
    /// immediately; the batch still resolves every task and reports its tally.
    pub async fn cancel(&self) {
        self.cancel_token.lock().await.cancel();
    }

    pub(crate) fn emit(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    pub(crate) fn set_phase(&self, phase: BatchPhase) {
        tracing::info!(?phase, "batch phase changed");
        self.emit(Event::PhaseChanged { phase });
    }

    /// Year folders at or above the configured minimum, newest first
    ///
    /// Listing failures propagate; see [`list_years_or_fallback`](Self::list_years_or_fallback).
    pub async fn list_years(&self) -> Result<Vec<String>> {
        let min_year = self.config.batch.min_year;
        let mut years: Vec<(u32, String)> = self
            .walker
            .years()
            .await?
            .into_iter()
            .filter_map(|y| y.parse::<u32>().ok().map(|n| (n, y)))
            .filter(|(n, _)| min_year.is_none_or(|min| *n >= min))
            .collect();
        years.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(years.into_iter().map(|(_, y)| y).collect())
    }

    /// Like [`list_years`](Self::list_years), but never fails
    ///
    /// An error or an empty listing yields the configured fallback year.
    pub async fn list_years_or_fallback(&self) -> Vec<String> {
        match self.list_years().await {
            Ok(years) if !years.is_empty() => years,
            Ok(_) => vec![self.config.batch.fallback_year.clone()],
            Err(e) => {
                tracing::warn!(error = %e, "year listing failed, offering fallback year");
                vec![self.config.batch.fallback_year.clone()]
            }
        }
    }

    /// Normalized month folders of `year`
    pub async fn list_months(&self, year: &str) -> Result<Vec<String>> {
        self.walker.months(year).await
    }

    /// Day folders of `year/month`
    pub async fn list_days(&self, year: &str, month: &str) -> Result<Vec<String>> {
        self.walker.days(year, month).await
    }

    /// Retrieve every qualifying file of a month into `destination_root/<day>/`
    ///
    /// Opens a fresh session for the batch, walks every day of the month, schedules
    /// the classified files on a pool of `batch.max_concurrent_tasks` workers and
    /// resolves once every task has finished. Progress is reported through
    /// [`subscribe`](Self::subscribe).
    ///
    /// # Errors
    /// Failures listing the primary tree or creating day folders abort the batch before
    /// any task runs. Individual task failures never do; they are counted in the summary.
    pub async fn run_batch(
        &self,
        year: &str,
        month: &str,
        destination_root: &Path,
    ) -> Result<BatchOutcome> {
        // installed before the warm-up so a cancel issued while it runs is kept
        let cancel = self.begin_batch().await;
        let session = Session::open(&self.config.portal).await?;
        let retriever = Retriever::new(
            session,
            &self.config.portal,
            &self.config.naming,
            self.config.batch.chunk_size,
        )?;
        self.run_phases(year, month, destination_root, Arc::new(retriever), cancel)
            .await
    }

    /// [`run_batch`](Self::run_batch) with a caller-supplied task runner
    pub async fn run_batch_with(
        &self,
        year: &str,
        month: &str,
        destination_root: &Path,
        runner: Arc<dyn TaskRunner>,
    ) -> Result<BatchOutcome> {
        let cancel = self.begin_batch().await;
        self.run_phases(year, month, destination_root, runner, cancel)
            .await
    }

    /// Install a fresh cancellation token for a new batch
    async fn begin_batch(&self) -> CancellationToken {
        let mut token = self.cancel_token.lock().await;
        *token = CancellationToken::new();
        token.clone()
    }

    async fn run_phases(
        &self,
        year: &str,
        month: &str,
        destination_root: &Path,
        runner: Arc<dyn TaskRunner>,
        cancel: CancellationToken,
    ) -> Result<BatchOutcome> {
        let started_at = chrono::Utc::now();

        tracing::info!(year, month, destination = %destination_root.display(), "starting batch");

        self.set_phase(BatchPhase::Discovering);
        let days = match self.discover(year, month, destination_root).await {
            Ok(days) => days,
            Err(e) => {
                tracing::error!(year, month, error = %e, "discovery failed, batch aborted");
                self.set_phase(BatchPhase::Idle);
                return Err(e);
            }
        };

        self.set_phase(BatchPhase::Scheduling);
        let tasks = self.schedule(days);
        if tasks.is_empty() {
            tracing::info!(year, month, "nothing to download");
            self.emit(Event::NothingToDownload);
            self.set_phase(BatchPhase::Idle);
            return Ok(BatchOutcome::NothingToDownload);
        }

        self.set_phase(BatchPhase::Running);
        let total = tasks.len();
        let tally = self.execute(tasks, runner, cancel).await;

        let summary = BatchSummary {
            total,
            saved: tally.saved,
            failed: tally.failed,
            started_at,
            finished_at: chrono::Utc::now(),
        };

        tracing::info!(
            year,
            month,
            total,
            saved = summary.saved,
            failed = summary.failed,
            "batch complete"
        );
        self.emit(Event::BatchComplete {
            saved: summary.saved,
            failed: summary.failed,
        });
        self.set_phase(BatchPhase::Completed);
        self.set_phase(BatchPhase::Idle);

        Ok(BatchOutcome::Completed(summary))
    }
}
