//! Mock COES portal built on wiremock
//!
//! Listing requests are matched on the decoded `baseDirectory` and `indicador` form
//! fields; downloads on the decoded `url` query parameter.

use std::collections::HashMap;

use ieod_dl::{Config, PortalConfig};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use super::fixtures::{file_listing, folder_listing};

pub const PRIMARY_ROOT: &str = "Post Operación/Reportes/IEOD/";
pub const SECONDARY_ROOT: &str = "Operación/Programa de Operación/Programa Diario/";

const LISTING_PATH: &str = "/Portal/browser/vistadatos";
const DOWNLOAD_PATH: &str = "/Portal/browser/download";
const LANDING_PATH: &str = "/Portal/PostOperacion/Reportes/Ieod";

/// Session cookie handed out by the landing page
pub const SESSION_COOKIE: &str = "ASP.NET_SessionId=ieod-test";

/// Matches a listing POST for one folder and indicator
struct ListingRequest {
    base_directory: String,
    indicator: &'static str,
}

impl Match for ListingRequest {
    fn matches(&self, request: &Request) -> bool {
        let form: HashMap<String, String> = url::form_urlencoded::parse(&request.body)
            .into_owned()
            .collect();
        form.get("baseDirectory") == Some(&self.base_directory)
            && form.get("indicador").map(String::as_str) == Some(self.indicator)
    }
}

/// A running mock portal
pub struct MockPortal {
    pub server: MockServer,
}

impl MockPortal {
    /// Start the portal with a landing page that sets [`SESSION_COOKIE`]
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LANDING_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Set-Cookie", format!("{}; Path=/", SESSION_COOKIE).as_str())
                    .set_body_string("<html><body>IEOD</body></html>"),
            )
            .mount(&server)
            .await;
        Self { server }
    }

    /// Configuration pointing every endpoint at this portal
    pub fn config(&self) -> Config {
        Config {
            portal: PortalConfig {
                base_url: self.server.uri(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Serve a folder listing for `folder`
    pub async fn folders(&self, folder: &str, names: &[&str]) {
        self.listing(folder, "S", folder_listing(names)).await;
    }

    /// Serve a file listing for `folder`
    pub async fn files(&self, folder: &str, names: &[&str]) {
        self.listing(folder, "N", file_listing(folder, names)).await;
    }

    /// Fail every listing of `folder` with `status`
    pub async fn fail_listing(&self, folder: &str, status: u16) {
        for indicator in ["S", "N"] {
            Mock::given(method("POST"))
                .and(path(LISTING_PATH))
                .and(ListingRequest {
                    base_directory: folder.to_string(),
                    indicator,
                })
                .respond_with(ResponseTemplate::new(status))
                .mount(&self.server)
                .await;
        }
    }

    async fn listing(&self, folder: &str, indicator: &'static str, body: String) {
        Mock::given(method("POST"))
            .and(path(LISTING_PATH))
            .and(header("X-Requested-With", "XMLHttpRequest"))
            .and(ListingRequest {
                base_directory: folder.to_string(),
                indicator,
            })
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Serve `body` for the file at `remote_path`
    pub async fn download(&self, remote_path: &str, body: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(DOWNLOAD_PATH))
            .and(query_param("url", remote_path))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&self.server)
            .await;
    }

    /// Serve `body` for `remote_path` only to requests carrying the session cookie
    pub async fn download_with_session(&self, remote_path: &str, body: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(DOWNLOAD_PATH))
            .and(query_param("url", remote_path))
            .and(header("cookie", SESSION_COOKIE))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(&self.server)
            .await;
    }

    /// Fail the download of `remote_path` with `status`
    pub async fn fail_download(&self, remote_path: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(DOWNLOAD_PATH))
            .and(query_param("url", remote_path))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }
}

/// Primary-tree folder of a month or day
pub fn primary(parts: &[&str]) -> String {
    let mut folder = PRIMARY_ROOT.to_string();
    for part in parts {
        folder.push_str(part);
        folder.push('/');
    }
    folder
}

/// Secondary-tree folder of a month or day
pub fn secondary(parts: &[&str]) -> String {
    let mut folder = SECONDARY_ROOT.to_string();
    for part in parts {
        folder.push_str(part);
        folder.push('/');
    }
    folder
}
