//! Job queue and bounded worker pool.
//!
//! Compositions are CPU-bound, so each runs on `spawn_blocking`; a
//! semaphore caps how many run at once. Status is written only here and
//! read elsewhere through snapshots.

use super::{wait_for_stable, PostActions};
use crate::compose::{compose_file, CompositionConfig};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

/// One screenshot to frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub composition: Arc<CompositionConfig>,
    pub workers: usize,
    /// Quiet period before a file is read. Zero skips the wait.
    pub stability: Duration,
    pub stability_timeout: Duration,
    pub post: PostActions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchStatus {
    pub processed: u64,
    pub failed: u64,
    pub skipped_duplicates: u64,
    /// Jobs refused because the output path was the input itself.
    pub skipped_overwrites: u64,
    pub in_flight: usize,
    pub last_output: Option<PathBuf>,
    pub last_error: Option<String>,
}

/// Read side of the pool's status.
#[derive(Debug, Clone, Default)]
pub struct StatusHandle(Arc<Mutex<WatchStatus>>);

impl StatusHandle {
    pub fn snapshot(&self) -> WatchStatus {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, WatchStatus> {
        // Status is plain counters; a panicked writer leaves them usable.
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn update(&self, f: impl FnOnce(&mut WatchStatus)) {
        f(&mut self.lock());
    }
}

/// Submission side. Dropping every clone lets the pool drain and stop.
#[derive(Debug, Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<Job>,
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
    status: StatusHandle,
}

impl JobQueue {
    /// Enqueues `job` unless the same input is already queued or running,
    /// or the job would write over its own input.
    pub fn submit(&self, job: Job) -> bool {
        if job.output == job.input {
            // Framing in place would re-trigger the watcher on every write.
            log::warn!("[WORKER] Output would overwrite input, skipping {}", job.input.display());
            self.status.update(|s| s.skipped_overwrites += 1);
            return false;
        }
        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            if !in_flight.insert(job.input.clone()) {
                log::debug!("[WORKER] Already in flight: {}", job.input.display());
                self.status.update(|s| s.skipped_duplicates += 1);
                return false;
            }
        }
        let input = job.input.clone();
        self.status.update(|s| s.in_flight += 1);
        if self.tx.send(job).is_err() {
            log::warn!("[WORKER] Pool stopped, dropping {}", input.display());
            self.status.update(|s| s.in_flight -= 1);
            self.in_flight
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&input);
            return false;
        }
        true
    }

    /// Shared state a running job needs, minus the sender (which would
    /// keep the channel open forever).
    fn context(&self) -> JobContext {
        JobContext {
            in_flight: Arc::clone(&self.in_flight),
            status: self.status.clone(),
        }
    }
}

pub struct WorkerPool {
    dispatcher: JoinHandle<()>,
}

impl WorkerPool {
    pub fn spawn(config: WorkerConfig) -> (JobQueue, StatusHandle, WorkerPool) {
        let (tx, rx) = mpsc::unbounded_channel();
        let status = StatusHandle::default();
        let queue = JobQueue {
            tx,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            status: status.clone(),
        };
        let dispatcher = tokio::spawn(dispatch(rx, queue.context(), config));
        (queue, status, WorkerPool { dispatcher })
    }

    /// Waits until the queue is closed and every job has finished.
    pub async fn join(self) {
        if let Err(e) = self.dispatcher.await {
            log::error!("[WORKER] Dispatcher panicked: {}", e);
        }
    }
}

#[derive(Clone)]
struct JobContext {
    in_flight: Arc<Mutex<HashSet<PathBuf>>>,
    status: StatusHandle,
}

async fn dispatch(mut rx: mpsc::UnboundedReceiver<Job>, ctx: JobContext, config: WorkerConfig) {
    let workers = config.workers.max(1);
    let semaphore = Arc::new(Semaphore::new(workers));

    while let Some(job) = rx.recv().await {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let ctx = ctx.clone();
        let config = config.clone();
        tokio::spawn(async move {
            run_job(&job, &config, &ctx).await;
            ctx.in_flight
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&job.input);
            ctx.status.update(|s| s.in_flight = s.in_flight.saturating_sub(1));
            drop(permit);
        });
    }

    // Every permit back means every job is done.
    if let Ok(all) = semaphore.acquire_many(workers as u32).await {
        drop(all);
    }
    log::info!("[WORKER] Queue drained");
}

async fn run_job(job: &Job, config: &WorkerConfig, ctx: &JobContext) {
    let start = Instant::now();

    if !config.stability.is_zero() {
        if let Err(e) = wait_for_stable(&job.input, config.stability, config.stability_timeout).await {
            record_failure(ctx, job, e.to_string());
            return;
        }
    }

    let input = job.input.clone();
    let output = job.output.clone();
    let composition = Arc::clone(&config.composition);
    let result = tokio::task::spawn_blocking(move || compose_file(&input, &output, &composition)).await;

    match result {
        Ok(Ok(written)) => {
            log::info!(
                "[WORKER] Framed {} → {} in {}ms",
                job.input.display(),
                written.display(),
                start.elapsed().as_millis()
            );
            ctx.status.update(|s| {
                s.processed += 1;
                s.last_output = Some(written.clone());
            });
            if !config.post.is_empty() {
                let post = config.post;
                let (input, written) = (job.input.clone(), written.clone());
                // Clipboard and file removal block; keep them off the runtime.
                if let Err(e) = tokio::task::spawn_blocking(move || post.run(&input, &written)).await {
                    log::warn!("[POST] Post actions panicked: {}", e);
                }
            }
        }
        Ok(Err(e)) => {
            let hint = if e.is_recoverable() { " (will retry on next change)" } else { "" };
            record_failure(ctx, job, format!("{}{}", e, hint));
        }
        Err(e) => record_failure(ctx, job, format!("worker task failed: {}", e)),
    }
}

fn record_failure(ctx: &JobContext, job: &Job, message: String) {
    log::error!("[WORKER] {}: {}", job.input.display(), message);
    ctx.status.update(|s| {
        s.failed += 1;
        s.last_error = Some(format!("{}: {}", job.input.display(), message));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("snapframe-worker-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config(workers: usize) -> WorkerConfig {
        WorkerConfig {
            composition: Arc::new(CompositionConfig::default()),
            workers,
            stability: Duration::ZERO,
            stability_timeout: Duration::from_secs(1),
            post: PostActions::default(),
        }
    }

    fn write_png(path: &std::path::Path) {
        RgbaImage::from_pixel(40, 30, Rgba([200, 60, 60, 255]))
            .save(path)
            .unwrap();
    }

    #[tokio::test]
    async fn failures_do_not_stop_other_jobs() {
        let dir = scratch("isolation");
        let good = dir.join("good.png");
        let bad = dir.join("bad.png");
        write_png(&good);
        std::fs::write(&bad, b"not a png").unwrap();

        let (queue, status, pool) = WorkerPool::spawn(config(2));
        assert!(queue.submit(Job { input: bad.clone(), output: dir.join("bad-framed.png") }));
        assert!(queue.submit(Job { input: good.clone(), output: dir.join("good-framed.png") }));
        drop(queue);
        pool.join().await;

        let snap = status.snapshot();
        assert_eq!(snap.processed, 1);
        assert_eq!(snap.failed, 1);
        assert_eq!(snap.in_flight, 0);
        assert!(dir.join("good-framed.png").exists());
        assert!(!dir.join("bad-framed.png").exists());
        assert!(snap.last_error.unwrap().contains("bad.png"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn duplicate_submission_is_skipped() {
        let dir = scratch("dupes");
        let input = dir.join("shot.png");
        write_png(&input);

        let (queue, status, pool) = WorkerPool::spawn(config(1));
        let job = Job { input, output: dir.join("shot-framed.png") };
        assert!(queue.submit(job.clone()));
        assert!(!queue.submit(job));
        drop(queue);
        pool.join().await;

        let snap = status.snapshot();
        assert_eq!(snap.processed, 1);
        assert_eq!(snap.skipped_duplicates, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn job_writing_over_its_input_is_refused() {
        let dir = scratch("inplace");
        let input = dir.join("shot.png");
        write_png(&input);
        let before = std::fs::read(&input).unwrap();

        let (queue, status, pool) = WorkerPool::spawn(config(1));
        assert!(!queue.submit(Job { input: input.clone(), output: input.clone() }));
        drop(queue);
        pool.join().await;

        let snap = status.snapshot();
        assert_eq!(snap.processed, 0);
        assert_eq!(snap.skipped_overwrites, 1);
        assert_eq!(snap.in_flight, 0);
        assert_eq!(std::fs::read(&input).unwrap(), before);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn delete_original_runs_after_write() {
        let dir = scratch("post");
        let input = dir.join("shot.png");
        write_png(&input);

        let mut cfg = config(1);
        cfg.post.delete_original = true;
        let (queue, status, pool) = WorkerPool::spawn(cfg);
        queue.submit(Job { input: input.clone(), output: dir.join("shot-framed.png") });
        drop(queue);
        pool.join().await;

        assert_eq!(status.snapshot().processed, 1);
        assert!(dir.join("shot-framed.png").exists());
        assert!(!input.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
