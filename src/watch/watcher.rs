use super::WatchError;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, Receiver};

const SCREENSHOT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenshotEvent {
    /// A screenshot was created or is still being written.
    Discovered(PathBuf),
    Error(String),
}

pub struct DirectoryWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    output_suffix: String,
    pending: VecDeque<PathBuf>,
}

impl DirectoryWatcher {
    pub fn new(path: &Path, output_suffix: &str) -> Result<Self, WatchError> {
        let (tx, rx) = mpsc::channel(100);

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.blocking_send(res);
            },
            Config::default(),
        )
        .map_err(WatchError::Init)?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::WatchPath {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Self {
            _watcher: watcher,
            rx,
            output_suffix: output_suffix.to_string(),
            pending: VecDeque::new(),
        })
    }

    pub async fn next_event(&mut self) -> Option<ScreenshotEvent> {
        loop {
            if let Some(path) = self.pending.pop_front() {
                return Some(ScreenshotEvent::Discovered(path));
            }
            match self.rx.recv().await? {
                Ok(event) => self.process_event(event),
                Err(e) => {
                    return Some(ScreenshotEvent::Error(format!(
                        "Directory watcher error: {}",
                        e
                    )))
                }
            }
        }
    }

    fn process_event(&mut self, event: Event) {
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            return;
        }
        for path in event.paths {
            if is_screenshot_candidate(&path, &self.output_suffix) && !self.pending.contains(&path) {
                log::debug!("[WATCH] {:?} {}", event.kind, path.display());
                self.pending.push_back(path);
            }
        }
    }
}

/// An image file we did not produce ourselves.
pub fn is_screenshot_candidate(path: &Path, output_suffix: &str) -> bool {
    let is_image = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| SCREENSHOT_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false);
    let is_output = !output_suffix.is_empty()
        && path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.ends_with(output_suffix))
            .unwrap_or(false);
    let is_hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(true);
    is_image && !is_output && !is_hidden
}
