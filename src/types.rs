//! Core types and events for ieod-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ErrorKind;

/// Logical path of a node in the remote tree
///
/// Rendered as the segments joined with `/` plus a trailing separator, which is
/// the form the directory browser expects (`Post Operación/Reportes/IEOD/2025/`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// Build a path from a root string such as `"Post Operación/Reportes/IEOD/"`
    pub fn root(root: &str) -> Self {
        Self {
            segments: root
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// A new path with one more segment appended
    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Path segments, root first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl std::fmt::Display for FolderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for segment in &self.segments {
            write!(f, "{}/", segment)?;
        }
        Ok(())
    }
}

/// Listing mode selected by the indicator form field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indicator {
    /// `S`: list sub-folders
    Folders,
    /// `N`: list files
    Files,
}

impl Indicator {
    /// Wire value of the flag
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Folders => "S",
            Indicator::Files => "N",
        }
    }
}

/// A parsed row of a directory listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DirectoryEntry {
    /// A sub-folder
    Folder {
        /// Folder name as displayed
        display_name: String,
    },
    /// A downloadable file
    File {
        /// Opaque identifier handed back to the download endpoint
        remote_path: String,
        /// File name as displayed
        display_name: String,
    },
}

impl DirectoryEntry {
    /// Display name of either entry kind
    pub fn display_name(&self) -> &str {
        match self {
            DirectoryEntry::Folder { display_name } | DirectoryEntry::File { display_name, .. } => {
                display_name
            }
        }
    }

    /// Remote path for file rows
    pub fn remote_path(&self) -> Option<&str> {
        match self {
            DirectoryEntry::File { remote_path, .. } => Some(remote_path),
            DirectoryEntry::Folder { .. } => None,
        }
    }
}

/// A file row from the listing, as handed to the classifier and retriever
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// Opaque identifier handed back to the download endpoint
    pub remote_path: String,
    /// File name as displayed
    pub display_name: String,
}

impl From<RemoteFile> for DirectoryEntry {
    fn from(file: RemoteFile) -> Self {
        DirectoryEntry::File {
            remote_path: file.remote_path,
            display_name: file.display_name,
        }
    }
}

/// How a file is fetched
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Spreadsheet from the primary tree, saved as-is
    Direct,
    /// Archive from the primary tree, first spreadsheet inside is extracted
    ArchiveExtract,
    /// Spreadsheet from the secondary tree, saved as-is
    SecondaryDirect,
}

/// A unit of work for the retriever
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetrievalTask {
    /// Retrieval strategy
    pub strategy: Strategy,
    /// The remote file
    pub file: RemoteFile,
    /// Day folder the result is written into (exists before the task runs)
    pub destination: PathBuf,
}

/// Batch lifecycle phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchPhase {
    /// No batch running
    Idle,
    /// Walking the remote tree
    Discovering,
    /// Classifying discovered files into tasks
    Scheduling,
    /// Tasks executing on the worker pool
    Running,
    /// All tasks resolved
    Completed,
}

/// Final tally of a batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Tasks scheduled
    pub total: usize,
    /// Tasks that wrote their file
    pub saved: usize,
    /// Tasks that failed
    pub failed: usize,
    /// When the batch started discovering
    pub started_at: DateTime<Utc>,
    /// When the last task resolved
    pub finished_at: DateTime<Utc>,
}

/// Result of a batch run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Discovery found nothing to retrieve
    NothingToDownload,
    /// Every scheduled task resolved
    Completed(BatchSummary),
}

/// Event emitted by the downloader
///
/// Consumers subscribe via `PortalDownloader::subscribe()`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Batch moved to a new phase
    PhaseChanged {
        /// The new phase
        phase: BatchPhase,
    },

    /// A day folder was enumerated
    DayDiscovered {
        /// Day folder name
        day: String,
        /// File rows in the primary tree
        primary: usize,
        /// Qualifying files in the secondary tree
        secondary: usize,
    },

    /// A task wrote its output file
    TaskSaved {
        /// Remote display name
        file: String,
        /// Local output path
        path: PathBuf,
    },

    /// A task failed
    TaskFailed {
        /// Remote display name
        file: String,
        /// Failure category
        error_kind: ErrorKind,
        /// Error message
        message: String,
    },

    /// A task resolved
    Progress {
        /// Tasks resolved so far
        completed: usize,
        /// Tasks scheduled
        total: usize,
        /// `completed * 100 / total`
        percent: u8,
    },

    /// Discovery produced zero tasks
    NothingToDownload,

    /// All tasks resolved
    BatchComplete {
        /// Tasks that wrote their file
        saved: usize,
        /// Tasks that failed
        failed: usize,
    },
}
