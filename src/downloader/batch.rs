//! Running phase: bounded-concurrency task execution with a single tally owner.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::retriever::TaskRunner;
use crate::types::{Event, RetrievalTask};
use crate::utils::percent;

use super::PortalDownloader;

/// Final counters of the running phase
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) saved: usize,
    pub(crate) failed: usize,
}

impl PortalDownloader {
    /// Run `tasks` with at most `batch.max_concurrent_tasks` in flight.
    ///
    /// Each task runs on its own tokio task; results are consumed here, in completion
    /// order, so the counters have exactly one writer. Every task resolves as either
    /// saved or failed, including tasks that panic or start after cancellation.
    pub(super) async fn execute(
        &self,
        tasks: Vec<RetrievalTask>,
        runner: Arc<dyn TaskRunner>,
        cancel: CancellationToken,
    ) -> Tally {
        let total = tasks.len();
        let width = self.config.batch.max_concurrent_tasks.max(1);
        tracing::info!(total, width, "running tasks");

        let mut results = stream::iter(tasks)
            .map(|task| {
                let runner = Arc::clone(&runner);
                let cancel = cancel.clone();
                let name = task.file.display_name.clone();
                async move {
                    let handle = tokio::spawn(async move {
                        if cancel.is_cancelled() {
                            return Err(Error::Cancelled);
                        }
                        runner.run(&task, &cancel).await
                    });
                    let outcome = match handle.await {
                        Ok(result) => result,
                        Err(e) => Err(Error::Other(format!("task for '{}' panicked: {}", name, e))),
                    };
                    (name, outcome)
                }
            })
            .buffer_unordered(width);

        let mut tally = Tally::default();
        let mut completed = 0usize;
        while let Some((name, outcome)) = results.next().await {
            match outcome {
                Ok(path) => {
                    tally.saved += 1;
                    self.emit(Event::TaskSaved { file: name, path });
                }
                Err(e) => {
                    tally.failed += 1;
                    tracing::warn!(file = %name, error = %e, "task failed");
                    self.emit(Event::TaskFailed {
                        file: name,
                        error_kind: e.kind(),
                        message: e.to_string(),
                    });
                }
            }

            completed += 1;
            self.emit(Event::Progress {
                completed,
                total,
                percent: percent(completed, total),
            });
        }

        tally
    }
}
