use super::WatchError;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tokio::time::{sleep, Instant};

const MAX_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Size and modification time; a file is settled when this stops changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

fn fingerprint(path: &Path) -> Option<Fingerprint> {
    let meta = std::fs::metadata(path).ok()?;
    Some(Fingerprint {
        len: meta.len(),
        modified: meta.modified().ok(),
    })
}

/// Waits until `path` is non-empty and unchanged for `quiet`.
///
/// Screenshot tools often create the file first and fill it afterwards;
/// reading too early yields a truncated image.
pub async fn wait_for_stable(path: &Path, quiet: Duration, timeout: Duration) -> Result<(), WatchError> {
    let start = Instant::now();
    let poll = (quiet / 4).clamp(Duration::from_millis(10), MAX_POLL_INTERVAL);

    let mut last = fingerprint(path);
    let mut unchanged_since = Instant::now();

    loop {
        if let Some(fp) = last {
            if fp.len > 0 && unchanged_since.elapsed() >= quiet {
                log::debug!(
                    "[WATCH] {} stable after {}ms",
                    path.display(),
                    start.elapsed().as_millis()
                );
                return Ok(());
            }
        }
        if start.elapsed() >= timeout {
            return Err(WatchError::Unstable {
                path: path.to_path_buf(),
                timeout,
            });
        }

        sleep(poll).await;
        let current = fingerprint(path);
        if current != last {
            last = current;
            unchanged_since = Instant::now();
        }
    }
}
