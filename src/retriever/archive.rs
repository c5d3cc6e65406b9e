//! Spreadsheet extraction from downloaded ZIP archives

use crate::error::{ArchiveError, Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extract the first entry whose name ends in `extension` into `dest_dir`
///
/// The entry is written under its base name, so folders inside the archive are
/// flattened away. Later qualifying entries are ignored.
///
/// # Errors
/// - [`ArchiveError::InvalidArchive`] if the file is not a readable ZIP
/// - [`ArchiveError::NoQualifyingEntry`] if no entry matches; nothing is written
/// - [`ArchiveError::EntryReadFailed`] if the entry cannot be decompressed
pub fn extract_first_matching(
    archive_path: &Path,
    dest_dir: &Path,
    extension: &str,
) -> Result<PathBuf> {
    debug!(?archive_path, ?dest_dir, extension, "inspecting archive");

    let file = std::fs::File::open(archive_path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open archive '{}': {}", archive_path.display(), e),
        ))
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| ArchiveError::InvalidArchive {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let wanted = extension.to_lowercase();
    let mut selected = None;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| ArchiveError::EntryReadFailed {
                path: archive_path.to_path_buf(),
                reason: e.to_string(),
            })?;
        if !entry.is_dir() && entry.name().to_lowercase().ends_with(&wanted) {
            selected = Some(index);
            break;
        }
    }

    let Some(index) = selected else {
        return Err(ArchiveError::NoQualifyingEntry {
            path: archive_path.to_path_buf(),
            extension: extension.to_string(),
        }
        .into());
    };

    let mut entry = archive
        .by_index(index)
        .map_err(|e| ArchiveError::EntryReadFailed {
            path: archive_path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let base_name = Path::new(entry.name())
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| ArchiveError::EntryReadFailed {
            path: archive_path.to_path_buf(),
            reason: format!("entry '{}' has no file name", entry.name()),
        })?;
    let out_path = dest_dir.join(base_name);

    let mut out = std::fs::File::create(&out_path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to create '{}': {}", out_path.display(), e),
        ))
    })?;

    if let Err(e) = std::io::copy(&mut entry, &mut out) {
        drop(out);
        let _ = std::fs::remove_file(&out_path);
        return Err(ArchiveError::EntryReadFailed {
            path: archive_path.to_path_buf(),
            reason: e.to_string(),
        }
        .into());
    }

    info!(?archive_path, ?out_path, "spreadsheet extracted from archive");
    Ok(out_path)
}
