//! Shared test helpers: in-memory archives, retrieval tasks and a fake directory listing.

use crate::browser::DirectoryListing;
use crate::error::{Error, Result};
use crate::types::{DirectoryEntry, FolderPath, Indicator, RemoteFile, RetrievalTask, Strategy};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Build an in-memory ZIP archive holding `entries` in order
pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A task for `name` under the primary-tree path of day 05, March 2025
pub(crate) fn task(strategy: Strategy, name: &str, destination: &Path) -> RetrievalTask {
    RetrievalTask {
        strategy,
        file: RemoteFile {
            remote_path: format!("Post Operación/Reportes/IEOD/2025/03_Marzo/05/{}", name),
            display_name: name.to_string(),
        },
        destination: destination.to_path_buf(),
    }
}

/// In-memory listing keyed by `(path, indicator)`; unknown keys fail with 404.
#[derive(Default)]
pub(crate) struct FakeListing {
    responses: HashMap<(String, &'static str), Vec<DirectoryEntry>>,
    pub(crate) requests: Mutex<Vec<String>>,
}

impl FakeListing {
    pub(crate) fn folders(mut self, path: &str, names: &[&str]) -> Self {
        let entries = names
            .iter()
            .map(|n| DirectoryEntry::Folder {
                display_name: n.to_string(),
            })
            .collect();
        self.responses.insert((path.to_string(), "S"), entries);
        self
    }

    pub(crate) fn files(mut self, path: &str, names: &[&str]) -> Self {
        let entries = names
            .iter()
            .map(|n| DirectoryEntry::File {
                remote_path: format!("{}{}", path, n),
                display_name: n.to_string(),
            })
            .collect();
        self.responses.insert((path.to_string(), "N"), entries);
        self
    }
}

#[async_trait::async_trait]
impl DirectoryListing for FakeListing {
    async fn list(&self, path: &FolderPath, indicator: Indicator) -> Result<Vec<DirectoryEntry>> {
        let key = (path.to_string(), indicator.as_str());
        self.requests.lock().unwrap().push(key.0.clone());
        self.responses.get(&key).cloned().ok_or(Error::HttpStatus {
            url: key.0,
            status: 404,
        })
    }
}
