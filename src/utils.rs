//! Utility functions for download URLs and local file handling

use std::path::Path;
use tracing::debug;

/// Percent-encode a remote path for the download endpoint's `url` query value
///
/// Everything except unreserved characters is escaped, apart from `/` and `:`
/// which the portal expects verbatim.
///
/// # Examples
///
/// ```
/// use ieod_dl::utils::encode_remote_path;
///
/// assert_eq!(
///     encode_remote_path("Post Operación/IEOD/a b.xlsx"),
///     "Post%20Operaci%C3%B3n/IEOD/a%20b.xlsx"
/// );
/// ```
#[must_use]
pub fn encode_remote_path(remote_path: &str) -> String {
    urlencoding::encode(remote_path)
        .replace("%2F", "/")
        .replace("%3A", ":")
}

/// Remove a file, logging instead of failing when it cannot be removed
pub async fn remove_file_best_effort(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        debug!(path = %path.display(), error = %e, "could not remove file");
    }
}

/// Integer percentage of `completed` over `total`, clamped to 100
///
/// A zero total reports 100.
#[must_use]
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (completed.min(total) * 100 / total) as u8
}
