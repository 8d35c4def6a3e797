//! Watch service — frames screenshots as they land in a folder.
//!
//! Architecture:
//!   DirectoryWatcher (notify) → JobQueue → WorkerPool dispatcher
//!   → per-job task: wait_for_stable → compose_file on spawn_blocking
//!   → PostActions → WatchStatus.
//!
//! Jobs share nothing but the output folder; one job failing never
//! touches another.

mod post_actions;
mod stability;
mod watcher;
mod worker;

pub use post_actions::{PostActionError, PostActions};
pub use stability::wait_for_stable;
pub use watcher::{is_screenshot_candidate, DirectoryWatcher, ScreenshotEvent};
pub use worker::{Job, JobQueue, StatusHandle, WatchStatus, WorkerConfig, WorkerPool};

use crate::compose::default_output_path;
use crate::settings::Settings;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// How long a file may keep changing before we give up on it.
pub const STABILITY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Failed to initialize file watcher: {0}")]
    Init(#[source] notify::Error),

    #[error("Failed to watch {}: {source}", .path.display())]
    WatchPath {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("Watch folder {} does not exist", .0.display())]
    MissingDir(PathBuf),

    #[error("{} did not settle within {}ms", .path.display(), .timeout.as_millis())]
    Unstable { path: PathBuf, timeout: Duration },
}

/// Runs the watch loop until `shutdown` resolves, then drains in-flight jobs.
pub async fn run<F>(settings: Settings, shutdown: F) -> Result<WatchStatus, WatchError>
where
    F: std::future::Future<Output = ()>,
{
    let dir = settings.resolved_watch_dir();
    if !dir.is_dir() {
        return Err(WatchError::MissingDir(dir));
    }

    let mut watcher = DirectoryWatcher::new(&dir, &settings.output_suffix)?;
    let config = WorkerConfig {
        composition: Arc::new(settings.composition.clone()),
        workers: settings.workers,
        stability: Duration::from_millis(settings.stability_ms),
        stability_timeout: STABILITY_TIMEOUT,
        post: PostActions {
            copy_to_clipboard: settings.copy_to_clipboard,
            delete_original: settings.delete_original,
        },
    };
    let (queue, status, pool) = WorkerPool::spawn(config);

    log::info!(
        "[WATCH] Watching {} ({} workers, output {})",
        dir.display(),
        settings.workers.max(1),
        settings
            .output_dir
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "next to source".to_string())
    );

    if settings.output_suffix.is_empty()
        && settings.output_dir.as_deref().map_or(true, |out| out == dir)
    {
        log::warn!(
            "[WATCH] Empty output suffix into the watch folder; screenshots will be skipped, not overwritten"
        );
    }

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("[WATCH] Shutdown requested");
                break;
            }
            event = watcher.next_event() => match event {
                Some(ScreenshotEvent::Discovered(input)) => {
                    let output = default_output_path(
                        &input,
                        settings.output_dir.as_deref(),
                        &settings.output_suffix,
                    );
                    queue.submit(Job { input, output });
                }
                Some(ScreenshotEvent::Error(message)) => log::warn!("[WATCH] {}", message),
                None => {
                    log::warn!("[WATCH] Watcher channel closed");
                    break;
                }
            }
        }
    }

    drop(queue);
    pool.join().await;
    Ok(status.snapshot())
}
