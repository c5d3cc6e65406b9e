//! Anonymous browsing session
//!
//! A [`Session`] wraps a cookie-carrying `reqwest::Client`. The portal rejects archive
//! downloads that do not present the cookies handed out by its landing page, so a
//! batch opens one session, warms it up once, and shares it read-only across every
//! retrieval task.

use crate::config::PortalConfig;
use crate::error::{Error, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tracing::{debug, warn};

/// Shared HTTP client with a cookie jar
///
/// Cloning is cheap; clones share the connection pool and the cookie jar.
#[derive(Clone, Debug)]
pub struct Session {
    client: reqwest::Client,
    base_url: url::Url,
}

impl Session {
    /// Build a session without contacting the portal
    pub fn new(portal: &PortalConfig) -> Result<Self> {
        let base_url = url::Url::parse(&portal.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let mut builder = reqwest::Client::builder()
            .user_agent(portal.user_agent.clone())
            .default_headers(headers)
            .cookie_store(true);
        if let Some(timeout) = portal.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Build a session and fetch the landing page once to collect cookies
    ///
    /// A failed warm-up is logged and otherwise ignored.
    pub async fn open(portal: &PortalConfig) -> Result<Self> {
        let session = Self::new(portal)?;
        session.warm_up(portal).await;
        Ok(session)
    }

    async fn warm_up(&self, portal: &PortalConfig) {
        let url = match self.endpoint(&portal.landing_path) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "invalid landing page path, skipping session warm-up");
                return;
            }
        };

        match self
            .client
            .get(url.clone())
            .timeout(portal.warmup_timeout)
            .send()
            .await
        {
            Ok(response) => {
                debug!(url = %url, status = %response.status(), "session warm-up finished")
            }
            Err(e) => warn!(url = %url, error = %e, "session warm-up failed"),
        }
    }

    /// Resolve a path such as `/Portal/browser/download` against the base URL
    pub fn endpoint(&self, path: &str) -> Result<url::Url> {
        Ok(self.base_url.join(path)?)
    }

    /// The underlying client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}
