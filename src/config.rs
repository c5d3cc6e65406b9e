//! Configuration types for ieod-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Remote portal endpoints and request identity
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Portal origin (default: "https://www.coes.org.pe")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory-browser listing endpoint, relative to `base_url`
    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    /// Download endpoint, relative to `base_url`
    #[serde(default = "default_download_path")]
    pub download_path: String,

    /// Landing page fetched once per batch to acquire session cookies
    #[serde(default = "default_landing_path")]
    pub landing_path: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Constant `initialLink` form value
    #[serde(default = "default_initial_link")]
    pub initial_link: String,

    /// Constant `orderFolder` form value (descending)
    #[serde(default = "default_order_folder")]
    pub order_folder: String,

    /// Per-request timeout (None = transport default)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// Timeout for the session warm-up request (default: 10 seconds)
    #[serde(default = "default_warmup_timeout", with = "duration_serde")]
    pub warmup_timeout: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            listing_path: default_listing_path(),
            download_path: default_download_path(),
            landing_path: default_landing_path(),
            user_agent: default_user_agent(),
            initial_link: default_initial_link(),
            order_folder: default_order_folder(),
            request_timeout: None,
            warmup_timeout: default_warmup_timeout(),
        }
    }
}

/// Folder roots of the two report trees
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Root of the primary (year/month/day) report tree
    #[serde(default = "default_primary_root")]
    pub primary_root: String,

    /// Root of the secondary dispatch-program tree
    #[serde(default = "default_secondary_root")]
    pub secondary_root: String,

    /// Prefix of secondary day folders ("Día" → "Día 05")
    #[serde(default = "default_secondary_day_prefix")]
    pub secondary_day_prefix: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            primary_root: default_primary_root(),
            secondary_root: default_secondary_root(),
            secondary_day_prefix: default_secondary_day_prefix(),
        }
    }
}

/// File naming conventions used by the classifier
///
/// All prefixes and extensions are compared case-insensitively.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Prefix of spreadsheets downloaded directly from the primary tree
    #[serde(default = "default_direct_prefix")]
    pub direct_prefix: String,

    /// Prefix of spreadsheets kept from the secondary tree
    #[serde(default = "default_secondary_prefix")]
    pub secondary_prefix: String,

    /// Spreadsheet extension, including the dot
    #[serde(default = "default_spreadsheet_extension")]
    pub spreadsheet_extension: String,

    /// Archive extension, including the dot
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,

    /// Extensions dropped before classification (document viewers)
    #[serde(default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            direct_prefix: default_direct_prefix(),
            secondary_prefix: default_secondary_prefix(),
            spreadsheet_extension: default_spreadsheet_extension(),
            archive_extension: default_archive_extension(),
            excluded_extensions: default_excluded_extensions(),
        }
    }
}

/// Batch execution settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum retrieval tasks in flight (default: 5)
    #[serde(default = "default_max_concurrent_tasks")]
    pub max_concurrent_tasks: usize,

    /// Write buffer size for streamed downloads (default: 8 KiB)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Years older than this are hidden from the year listing (default: 2025)
    #[serde(default = "default_min_year")]
    pub min_year: Option<u32>,

    /// Year offered when the year listing fails or comes back empty
    #[serde(default = "default_fallback_year")]
    pub fallback_year: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: default_max_concurrent_tasks(),
            chunk_size: default_chunk_size(),
            min_year: default_min_year(),
            fallback_year: default_fallback_year(),
        }
    }
}

/// Main configuration for PortalDownloader
///
/// Fields are organized into logical sub-configs:
/// - [`portal`](PortalConfig) - endpoints and request identity
/// - [`tree`](TreeConfig) - folder roots of both report trees
/// - [`naming`](NamingConfig) - classification prefixes and extensions
/// - [`batch`](BatchConfig) - concurrency and year filtering
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Portal endpoints
    #[serde(default)]
    pub portal: PortalConfig,

    /// Report tree roots
    #[serde(default)]
    pub tree: TreeConfig,

    /// Naming conventions
    #[serde(default)]
    pub naming: NamingConfig,

    /// Batch execution
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Config {
    /// Parse a JSON configuration document, filling omitted fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Check settings that would otherwise fail deep inside a batch
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.portal.base_url)
            .map_err(|e| Error::config(format!("invalid base URL: {}", e), "portal.base_url"))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::config(
                format!("unsupported scheme '{}'", base.scheme()),
                "portal.base_url",
            ));
        }

        if self.batch.max_concurrent_tasks == 0 {
            return Err(Error::config(
                "must allow at least one concurrent task",
                "batch.max_concurrent_tasks",
            ));
        }
        if self.batch.chunk_size == 0 {
            return Err(Error::config(
                "chunk size must be positive",
                "batch.chunk_size",
            ));
        }

        let extensions = [
            ("naming.spreadsheet_extension", &self.naming.spreadsheet_extension),
            ("naming.archive_extension", &self.naming.archive_extension),
        ];
        for (key, ext) in extensions {
            if !ext.starts_with('.') {
                return Err(Error::config(
                    format!("extension '{}' must start with '.'", ext),
                    key,
                ));
            }
        }
        if let Some(ext) = self
            .naming
            .excluded_extensions
            .iter()
            .find(|e| !e.starts_with('.'))
        {
            return Err(Error::config(
                format!("extension '{}' must start with '.'", ext),
                "naming.excluded_extensions",
            ));
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "https://www.coes.org.pe".to_string()
}

fn default_listing_path() -> String {
    "/Portal/browser/vistadatos".to_string()
}

fn default_download_path() -> String {
    "/Portal/browser/download".to_string()
}

fn default_landing_path() -> String {
    "/Portal/PostOperacion/Reportes/Ieod".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_initial_link() -> String {
    "IEOD".to_string()
}

fn default_order_folder() -> String {
    "D".to_string()
}

fn default_warmup_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_primary_root() -> String {
    "Post Operación/Reportes/IEOD/".to_string()
}

fn default_secondary_root() -> String {
    "Operación/Programa de Operación/Programa Diario/".to_string()
}

fn default_secondary_day_prefix() -> String {
    "Día".to_string()
}

fn default_direct_prefix() -> String {
    "anexoa".to_string()
}

fn default_secondary_prefix() -> String {
    "anexo1_despacho".to_string()
}

fn default_spreadsheet_extension() -> String {
    ".xlsx".to_string()
}

fn default_archive_extension() -> String {
    ".zip".to_string()
}

fn default_excluded_extensions() -> Vec<String> {
    vec![".pdf".to_string()]
}

fn default_max_concurrent_tasks() -> usize {
    5
}

fn default_chunk_size() -> usize {
    8192
}

fn default_min_year() -> Option<u32> {
    Some(2025)
}

fn default_fallback_year() -> String {
    "2025".to_string()
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
