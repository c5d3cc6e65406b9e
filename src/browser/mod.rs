//! Directory browser client
//!
//! The portal exposes its file tree only through an HTML-rendering endpoint. A listing
//! is a form-encoded POST naming the folder and an indicator flag (`S` for sub-folders,
//! `N` for files); the response is markup parsed by [`parse`].

pub mod parse;


use crate::config::PortalConfig;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::{DirectoryEntry, FolderPath, Indicator};
use tracing::debug;

/// Abstraction over folder listing, enabling testability of the walker.
#[async_trait::async_trait]
pub trait DirectoryListing: Send + Sync {
    /// List the folder at `path`
    ///
    /// With [`Indicator::Folders`] only folder entries are returned, with
    /// [`Indicator::Files`] only file entries.
    async fn list(&self, path: &FolderPath, indicator: Indicator) -> Result<Vec<DirectoryEntry>>;
}

/// Production [`DirectoryListing`] backed by the portal's listing endpoint.
///
/// No retries: timeouts and error statuses propagate to the caller.
#[derive(Clone, Debug)]
pub struct PortalBrowser {
    session: Session,
    listing_url: url::Url,
    initial_link: String,
    order_folder: String,
}

impl PortalBrowser {
    /// Create a browser issuing requests through `session`
    pub fn new(session: Session, portal: &PortalConfig) -> Result<Self> {
        let listing_url = session.endpoint(&portal.listing_path)?;
        Ok(Self {
            session,
            listing_url,
            initial_link: portal.initial_link.clone(),
            order_folder: portal.order_folder.clone(),
        })
    }

    async fn fetch(&self, path: &FolderPath, indicator: Indicator) -> Result<String> {
        let folder = path.to_string();
        let form = [
            ("baseDirectory", folder.as_str()),
            ("url", folder.as_str()),
            ("indicador", indicator.as_str()),
            ("initialLink", self.initial_link.as_str()),
            ("orderFolder", self.order_folder.as_str()),
        ];

        debug!(path = %folder, indicator = indicator.as_str(), "listing folder");

        let response = self
            .session
            .client()
            .post(self.listing_url.clone())
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::HttpStatus {
                url: self.listing_url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl DirectoryListing for PortalBrowser {
    async fn list(&self, path: &FolderPath, indicator: Indicator) -> Result<Vec<DirectoryEntry>> {
        let html = self.fetch(path, indicator).await?;

        let entries: Vec<DirectoryEntry> = match indicator {
            Indicator::Folders => parse::parse_folders(&html)?
                .into_iter()
                .map(|display_name| DirectoryEntry::Folder { display_name })
                .collect(),
            Indicator::Files => parse::parse_files(&html)?
                .into_iter()
                .map(DirectoryEntry::from)
                .collect(),
        };

        debug!(path = %path, count = entries.len(), "folder listed");
        Ok(entries)
    }
}
