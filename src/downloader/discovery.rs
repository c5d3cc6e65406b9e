//! Discovery and scheduling phases: day folders, their files, and the task plan.

use std::path::{Path, PathBuf};

use crate::classify::plan_day;
use crate::error::{Error, Result};
use crate::types::{Event, RemoteFile, RetrievalTask};

use super::PortalDownloader;

/// Everything discovered for a single day folder
#[derive(Debug)]
pub(crate) struct DiscoveredDay {
    pub(crate) day: String,
    pub(crate) destination: PathBuf,
    pub(crate) primary: Vec<RemoteFile>,
    pub(crate) secondary: Vec<RemoteFile>,
}

impl PortalDownloader {
    /// Walk every day of `year/month`, creating `destination_root/<day>/` as it goes.
    ///
    /// Primary-tree failures abort discovery; secondary-tree failures only mean
    /// the day has no secondary files.
    pub(super) async fn discover(
        &self,
        year: &str,
        month: &str,
        destination_root: &Path,
    ) -> Result<Vec<DiscoveredDay>> {
        let days = self.walker.days(year, month).await?;
        tracing::debug!(year, month, count = days.len(), "day folders listed");

        let mut discovered = Vec::with_capacity(days.len());
        for day in days {
            let destination = destination_root.join(&day);
            tokio::fs::create_dir_all(&destination).await.map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("failed to create '{}': {}", destination.display(), e),
                ))
            })?;

            let primary = self.walker.files_of_day(year, month, &day).await?;
            let secondary = self.walker.secondary_files(year, month, &day).await;

            tracing::debug!(
                day = %day,
                primary = primary.len(),
                secondary = secondary.len(),
                "day discovered"
            );
            self.emit(Event::DayDiscovered {
                day: day.clone(),
                primary: primary.len(),
                secondary: secondary.len(),
            });

            discovered.push(DiscoveredDay {
                day,
                destination,
                primary,
                secondary,
            });
        }

        Ok(discovered)
    }

    /// Classify every discovered file into retrieval tasks, day by day
    pub(super) fn schedule(&self, days: Vec<DiscoveredDay>) -> Vec<RetrievalTask> {
        days.into_iter()
            .flat_map(|d| {
                let tasks = plan_day(d.primary, d.secondary, &d.destination, &self.config.naming);
                tracing::debug!(day = %d.day, tasks = tasks.len(), "day scheduled");
                tasks
            })
            .collect()
    }
}
