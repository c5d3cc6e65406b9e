//! Hierarchy walker
//!
//! Composes a [`DirectoryListing`] into the discovery operations of both report trees:
//! - primary: `<root>/<year>/<NN_Month>/<day>/`
//! - secondary: `<root>/<year>/<NN_MONTH>/Día <DD>/`, best-effort

use crate::browser::DirectoryListing;
use crate::config::{NamingConfig, TreeConfig};
use crate::error::Result;
use crate::naming;
use crate::types::{DirectoryEntry, FolderPath, Indicator, RemoteFile};
use std::sync::Arc;
use tracing::{debug, warn};

/// Discovery over the primary and secondary report trees
#[derive(Clone)]
pub struct HierarchyWalker {
    listing: Arc<dyn DirectoryListing>,
    tree: TreeConfig,
    naming: NamingConfig,
}

impl HierarchyWalker {
    /// Create a walker over `listing`
    pub fn new(listing: Arc<dyn DirectoryListing>, tree: TreeConfig, naming: NamingConfig) -> Self {
        Self {
            listing,
            tree,
            naming,
        }
    }

    fn primary_root(&self) -> FolderPath {
        FolderPath::root(&self.tree.primary_root)
    }

    async fn folder_names(&self, path: &FolderPath) -> Result<Vec<String>> {
        Ok(self
            .listing
            .list(path, Indicator::Folders)
            .await?
            .into_iter()
            .filter_map(|entry| match entry {
                DirectoryEntry::Folder { display_name } => Some(display_name),
                DirectoryEntry::File { .. } => None,
            })
            .collect())
    }

    async fn file_rows(&self, path: &FolderPath) -> Result<Vec<RemoteFile>> {
        Ok(self
            .listing
            .list(path, Indicator::Files)
            .await?
            .into_iter()
            .filter_map(|entry| match entry {
                DirectoryEntry::File {
                    remote_path,
                    display_name,
                } => Some(RemoteFile {
                    remote_path,
                    display_name,
                }),
                DirectoryEntry::Folder { .. } => None,
            })
            .collect())
    }

    /// Year folders of the primary tree (purely numeric names only)
    pub async fn years(&self) -> Result<Vec<String>> {
        let names = self.folder_names(&self.primary_root()).await?;
        Ok(names.into_iter().filter(|n| naming::is_numeric(n)).collect())
    }

    /// Month folders of `year`, normalized to `NN_Name`
    ///
    /// Entries without any digit (e.g. "Informes") are dropped.
    pub async fn months(&self, year: &str) -> Result<Vec<String>> {
        let path = self.primary_root().join(year);
        let names = self.folder_names(&path).await?;
        Ok(names
            .iter()
            .filter(|n| naming::has_digit(n))
            .map(|n| naming::normalize_month(n))
            .collect())
    }

    /// Day folders of `year/month` (purely numeric names only)
    pub async fn days(&self, year: &str, month: &str) -> Result<Vec<String>> {
        let path = self.primary_root().join(year).join(month);
        let names = self.folder_names(&path).await?;
        Ok(names.into_iter().filter(|n| naming::is_numeric(n)).collect())
    }

    /// File rows of one primary-tree day
    pub async fn files_of_day(&self, year: &str, month: &str, day: &str) -> Result<Vec<RemoteFile>> {
        let path = self.primary_root().join(year).join(month).join(day);
        self.file_rows(&path).await
    }

    /// Path of a day in the secondary tree
    pub fn secondary_day_path(&self, year: &str, month: &str, day: &str) -> FolderPath {
        FolderPath::root(&self.tree.secondary_root)
            .join(year)
            .join(naming::secondary_month(month))
            .join(naming::secondary_day(&self.tree.secondary_day_prefix, day))
    }

    /// Qualifying spreadsheets of one secondary-tree day
    ///
    /// Any listing failure yields an empty list: the secondary tree is optional and
    /// must never block retrieval from the primary tree.
    pub async fn secondary_files(&self, year: &str, month: &str, day: &str) -> Vec<RemoteFile> {
        let path = self.secondary_day_path(year, month, day);

        let rows = match self.file_rows(&path).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(path = %path, error = %e, "secondary tree listing failed, continuing without it");
                return Vec::new();
            }
        };

        let prefix = self.naming.secondary_prefix.to_lowercase();
        let extension = self.naming.spreadsheet_extension.to_lowercase();
        let files: Vec<RemoteFile> = rows
            .into_iter()
            .filter(|f| {
                let name = f.display_name.to_lowercase();
                name.starts_with(&prefix) && name.ends_with(&extension)
            })
            .collect();

        debug!(path = %path, count = files.len(), "secondary files discovered");
        files
    }
}
