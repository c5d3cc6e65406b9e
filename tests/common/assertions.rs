//! Event collection and output-tree assertions

use std::path::Path;
use std::time::Duration;

use ieod_dl::Event;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;

/// Collect events until the batch returns to idle, or `timeout` elapses
pub async fn collect_until_idle(events: &mut Receiver<Event>, timeout: Duration) -> Vec<Event> {
    let mut seen = Vec::new();
    let _ = tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let idle = matches!(
                        event,
                        Event::PhaseChanged {
                            phase: ieod_dl::BatchPhase::Idle
                        }
                    );
                    seen.push(event);
                    if idle {
                        return;
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return,
            }
        }
    })
    .await;
    seen
}

/// Every regular file under `root`, as sorted `/`-separated relative paths
pub fn output_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

/// Assert that `path` holds exactly `expected`
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let actual = std::fs::read(path)
        .unwrap_or_else(|e| panic!("expected {} to exist: {}", path.display(), e));
    assert_eq!(actual, expected, "unexpected content in {}", path.display());
}
