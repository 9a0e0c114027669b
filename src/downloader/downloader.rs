//! Core downloader implementation with the worker pool and fetch logic.
//!
//! A run spawns a fixed number of workers on the tokio runtime. They share a
//! single queue of [`DownloadTask`]s and each keeps popping until the queue
//! is empty, so concurrency never exceeds the configured cap no matter how
//! long the manifest is. Retries for a file happen inside the worker that
//! picked it up, before it goes back to the queue.
//!
//! # Examples
//!
//! ```rust,no_run
//! use portal_fetch::downloader::DownloaderBuilder;
//! use portal_fetch::download::DownloadTask;
//! use portal_fetch::session::{PortalConfig, SessionHandle};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = SessionHandle::anonymous(&PortalConfig::default())?;
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("./mirror"))
//!     .concurrent_downloads(8)
//!     .build();
//!
//! let tasks = vec![DownloadTask::new("reads", "a.fastq.gz", "/portal/a.fastq.gz")];
//! for outcome in downloader.run(tasks, &session).await {
//!     println!("{} {}", outcome.destination().display(), outcome.status());
//! }
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use crate::download::{file_checksum, ChecksumAlgorithm, DownloadTask, TaskOutcome};
use crate::error::{Error, Result};
use crate::events::Event;
use crate::progress::ProgressDisplay;
use crate::session::SessionHandle;

use futures::{FutureExt, StreamExt};
use indicatif::ProgressBar;
use reqwest::{Response, Url};
use std::collections::VecDeque;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, error, warn};

/// Represents the download controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use portal_fetch::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build();
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig) -> Self {
        Self { config }
    }

    /// Gets the directory where files will be downloaded.
    pub fn directory(&self) -> &Path {
        &self.config.directory
    }

    /// Gets the number of retries per file.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Gets the number of workers.
    pub fn concurrent_downloads(&self) -> usize {
        self.config.concurrent_downloads
    }

    /// Gets whether to overwrite existing files.
    pub fn overwrite(&self) -> bool {
        self.config.overwrite
    }

    /// Gets the checksum algorithm.
    pub fn checksum_algorithm(&self) -> ChecksumAlgorithm {
        self.config.checksum
    }

    /// Gets whether files are nested under the manifest name.
    pub fn nest_by_manifest_name(&self) -> bool {
        self.config.nest_by_manifest_name
    }

    /// Report an event to the configured sink.
    pub fn emit(&self, event: &Event<'_>) {
        self.config.sink.emit(event);
    }

    /// Download every task into the configured directory.
    pub async fn run(&self, tasks: Vec<DownloadTask>, session: &SessionHandle) -> Vec<TaskOutcome> {
        self.run_in(tasks, session, &self.config.directory).await
    }

    /// Download every task below `root`.
    ///
    /// Returns exactly one outcome per task, in completion order.
    pub async fn run_in(
        &self,
        tasks: Vec<DownloadTask>,
        session: &SessionHandle,
        root: &Path,
    ) -> Vec<TaskOutcome> {
        let total = tasks.len();
        let workers = self.config.concurrent_downloads.max(1).min(total);
        debug!("Downloading {} files with {} workers into {:?}", total, workers, root);

        let ctx = Arc::new(RunContext {
            config: self.config.clone(),
            session: session.clone(),
            root: root.to_path_buf(),
            progress: ProgressDisplay::new(self.config.style_options.clone(), total),
            queue: Mutex::new(VecDeque::from(tasks)),
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut pool = JoinSet::new();
        for id in 0..workers {
            pool.spawn(worker(id, ctx.clone(), tx.clone()));
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(total);
        while let Some(outcome) = rx.recv().await {
            ctx.progress.increment_main();
            self.config.sink.emit(&Event::TaskFinished(&outcome));
            outcomes.push(outcome);
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                error!("Download worker stopped unexpectedly: {}", e);
            }
        }

        ctx.progress.finish();
        outcomes
    }
}

/// State shared by the workers of one run.
struct RunContext {
    config: DownloaderConfig,
    session: SessionHandle,
    root: PathBuf,
    progress: ProgressDisplay,
    queue: Mutex<VecDeque<DownloadTask>>,
}

async fn worker(id: usize, ctx: Arc<RunContext>, tx: mpsc::UnboundedSender<TaskOutcome>) {
    loop {
        let Some(task) = ctx.queue.lock().await.pop_front() else {
            break;
        };
        debug!(worker = id, "Processing {}", task.relative_path().display());

        let outcome = match AssertUnwindSafe(ctx.process(task.clone()))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(worker = id, "Panic while processing {}", task.filename);
                let destination = ctx.root.join(task.relative_path());
                TaskOutcome::new(task, destination).fail(0, "worker panicked")
            }
        };

        if tx.send(outcome).is_err() {
            break;
        }
    }
    debug!(worker = id, "Queue drained");
}

impl RunContext {
    /// Skip, fetch with retries, then verify one task.
    async fn process(&self, task: DownloadTask) -> TaskOutcome {
        let relative = match task.contained_relative_path() {
            Ok(relative) => relative,
            Err(e) => {
                let destination = task.relative_path();
                return TaskOutcome::new(task, destination).fail(0, e);
            }
        };
        let destination = self.root.join(relative);
        let outcome = TaskOutcome::new(task, destination.clone());

        if !self.config.overwrite && destination.exists() {
            debug!("File exists: {:?}", destination);
            return outcome.skipped();
        }

        if let Some(parent) = destination.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                return outcome.fail(0, Error::from(e));
            }
        }

        let url = match self.session.resolve(&outcome.task().source_url) {
            Ok(url) => url,
            Err(e) => return outcome.fail(0, e),
        };

        let max_attempts = self.config.retries.saturating_add(1);
        let mut attempts = 0;
        let size = loop {
            attempts += 1;
            match self.fetch(&url, &destination).await {
                Ok(size) => break size,
                Err(e) if attempts >= max_attempts => {
                    return outcome.fail(attempts, e);
                }
                Err(e) => {
                    let delay = self.config.retry_delay.saturating_mul(attempts);
                    debug!(
                        "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                        attempts, max_attempts, url, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        };

        let validated = self
            .verify(&destination, outcome.task().expected_checksum.as_deref())
            .await;
        outcome.downloaded(attempts, size, validated)
    }

    /// One GET of `url`, streamed into a temporary sibling of `destination`
    /// and moved into place once the body is complete.
    async fn fetch(&self, url: &Url, destination: &Path) -> Result<u64> {
        debug!("Fetching {}", url);
        let res = self.session.get(url.clone()).await.map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let partial = partial_path(destination);
        let label = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let pb = self
            .progress
            .create_child_progress(res.content_length().unwrap_or(0), &label);
        let written = write_body(res, url, &partial, &pb).await;
        self.progress.finish_child(pb);

        let size = match written {
            Ok(size) => size,
            Err(e) => {
                let _ = fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&partial, destination).await {
            let _ = fs::remove_file(&partial).await;
            return Err(e.into());
        }
        Ok(size)
    }

    /// Compare the file against the manifest checksum.
    ///
    /// Files without a checksum always validate. A mismatch or a hashing
    /// error is reported but leaves the file in place.
    async fn verify(&self, path: &Path, expected: Option<&str>) -> bool {
        let Some(expected) = expected else {
            return true;
        };

        let algorithm = self.config.checksum;
        let owned = path.to_path_buf();
        let computed = tokio::task::spawn_blocking(move || file_checksum(&owned, algorithm)).await;

        match computed {
            Ok(Ok(actual)) if actual.eq_ignore_ascii_case(expected.trim()) => true,
            Ok(Ok(actual)) => {
                let mismatch = Error::ChecksumMismatch {
                    expected: expected.to_string(),
                    actual,
                };
                warn!("{:?}: {}", path, mismatch);
                false
            }
            Ok(Err(e)) => {
                warn!("Could not checksum {:?}: {}", path, e);
                false
            }
            Err(e) => {
                warn!("Checksum task for {:?} did not complete: {}", path, e);
                false
            }
        }
    }
}

/// Stream the response body into `partial`, returning the bytes written.
async fn write_body(res: Response, url: &Url, partial: &Path, pb: &ProgressBar) -> Result<u64> {
    debug!("Creating destination file {:?}", partial);
    let mut file = fs::File::create(partial).await?;
    let mut size: u64 = 0;

    let mut stream = res.bytes_stream();
    while let Some(item) = stream.next().await {
        let mut chunk = item.map_err(|e| Error::Fetch {
            url: url.to_string(),
            reason: format!("interrupted transfer: {}", e),
        })?;
        let chunk_size = chunk.len() as u64;
        file.write_all_buf(&mut chunk).await?;
        size += chunk_size;
        pb.inc(chunk_size);
    }

    file.flush().await?;
    Ok(size)
}

/// `dir/.name.part` next to `dir/name`.
fn partial_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{}.part", name))
}
