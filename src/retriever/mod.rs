//! Retrieval of classified files
//!
//! - [`Strategy::Direct`] / [`Strategy::SecondaryDirect`]: the file is streamed to
//!   `destination/<display name>`, replacing any existing copy once complete.
//! - [`Strategy::ArchiveExtract`]: the archive is streamed into the destination folder,
//!   the first spreadsheet inside is extracted next to it, and the archive is removed.
//!
//! All requests go through the batch [`Session`], whose cookies the portal requires
//! for archive downloads.

pub mod archive;


use crate::config::{NamingConfig, PortalConfig};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::{RetrievalTask, Strategy};
use crate::utils::{encode_remote_path, remove_file_best_effort};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Abstraction over task execution, enabling testability of the batch orchestrator.
#[async_trait::async_trait]
pub trait TaskRunner: Send + Sync {
    /// Execute one task, returning the path of the file it produced
    async fn run(&self, task: &RetrievalTask, cancel: &CancellationToken) -> Result<PathBuf>;
}

/// Production [`TaskRunner`] that downloads from the portal.
#[derive(Clone, Debug)]
pub struct Retriever {
    session: Session,
    download_url: url::Url,
    spreadsheet_extension: String,
    chunk_size: usize,
}

impl Retriever {
    /// Create a retriever sharing `session`
    pub fn new(
        session: Session,
        portal: &PortalConfig,
        naming: &NamingConfig,
        chunk_size: usize,
    ) -> Result<Self> {
        let download_url = session.endpoint(&portal.download_path)?;
        Ok(Self {
            session,
            download_url,
            spreadsheet_extension: naming.spreadsheet_extension.clone(),
            chunk_size: chunk_size.max(1),
        })
    }

    /// Download URL for a remote path: `<download endpoint>?url=<encoded path>`
    pub fn download_url(&self, remote_path: &str) -> url::Url {
        let mut url = self.download_url.clone();
        url.set_query(Some(&format!("url={}", encode_remote_path(remote_path))));
        url
    }

    /// Stream `remote_path` into `dest`, returning the number of bytes written
    ///
    /// The body is written to `<dest>.part` and renamed over `dest` once complete, so
    /// a failed or cancelled download leaves any earlier copy of `dest` untouched.
    /// Cancellation is checked between chunks.
    pub async fn download_to(
        &self,
        remote_path: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        let part = partial_path(dest);
        let written = match self.stream_to(remote_path, &part, cancel).await {
            Ok(written) => written,
            Err(e) => {
                remove_file_best_effort(&part).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part, dest).await {
            remove_file_best_effort(&part).await;
            return Err(Error::Io(std::io::Error::new(
                e.kind(),
                format!("failed to move download into '{}': {}", dest.display(), e),
            )));
        }
        Ok(written)
    }

    async fn stream_to(
        &self,
        remote_path: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let url = self.download_url(remote_path);
        debug!(url = %url, dest = %dest.display(), "downloading");

        let mut response = self.session.client().get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let file = tokio::fs::File::create(dest).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("failed to create '{}': {}", dest.display(), e),
            ))
        })?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        writer.flush().await?;

        Ok(written)
    }

    async fn retrieve_file(&self, task: &RetrievalTask, cancel: &CancellationToken) -> Result<PathBuf> {
        let dest = target_path(task)?;
        let bytes = self.download_to(&task.file.remote_path, &dest, cancel).await?;
        info!(file = %task.file.display_name, bytes, "file saved");
        Ok(dest)
    }

    async fn retrieve_archive(
        &self,
        task: &RetrievalTask,
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        let archive_path = target_path(task)?;
        self.download_to(&task.file.remote_path, &archive_path, cancel)
            .await?;

        let extension = self.spreadsheet_extension.clone();
        let dest_dir = task.destination.clone();
        let blocking_archive = archive_path.clone();
        let extracted = tokio::task::spawn_blocking(move || {
            archive::extract_first_matching(&blocking_archive, &dest_dir, &extension)
        })
        .await
        .map_err(|e| Error::Other(format!("extraction task panicked: {}", e)))
        .and_then(|result| result);

        remove_file_best_effort(&archive_path).await;

        let out = extracted?;
        info!(archive = %task.file.display_name, out = %out.display(), "archive extracted");
        Ok(out)
    }

    /// Execute a task according to its strategy
    pub async fn retrieve(&self, task: &RetrievalTask, cancel: &CancellationToken) -> Result<PathBuf> {
        match task.strategy {
            Strategy::Direct | Strategy::SecondaryDirect => self.retrieve_file(task, cancel).await,
            Strategy::ArchiveExtract => self.retrieve_archive(task, cancel).await,
        }
    }
}

/// Local path for a task's download: the last component of the remote display name,
/// inside the task's destination folder
fn target_path(task: &RetrievalTask) -> Result<PathBuf> {
    match Path::new(&task.file.display_name).file_name() {
        Some(name) => Ok(task.destination.join(name)),
        None => Err(Error::Other(format!(
            "remote file name '{}' has no usable file name",
            task.file.display_name
        ))),
    }
}

/// `<dest>.part`, the in-progress name of a download
fn partial_path(dest: &Path) -> PathBuf {
    let mut part = dest.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

#[async_trait::async_trait]
impl TaskRunner for Retriever {
    async fn run(&self, task: &RetrievalTask, cancel: &CancellationToken) -> Result<PathBuf> {
        self.retrieve(task, cancel).await
    }
}
