//! Per-task download results.
//!
//! Every [`DownloadTask`] handed to the worker pool comes back as exactly one
//! [`TaskOutcome`]. The outcome records what happened to the file, how many
//! requests were issued for it, and whether its content matched the manifest
//! checksum.
//!
//! # Examples
//!
//! ```rust
//! use portal_fetch::download::{DownloadTask, TaskOutcome, TaskStatus};
//! use std::path::PathBuf;
//!
//! let task = DownloadTask::new("reads", "a.txt", "/a");
//! let outcome = TaskOutcome::new(task, PathBuf::from("out/reads/a.txt"))
//!     .downloaded(1, 1024, true);
//!
//! assert_eq!(outcome.status(), &TaskStatus::Downloaded);
//! assert!(outcome.validated());
//! ```

use super::task::DownloadTask;
use std::fmt;
use std::path::{Path, PathBuf};

/// Final state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// The file was fetched and written to its destination.
    Downloaded,
    /// The destination already existed and overwriting was disabled.
    SkippedExisting,
    /// Every attempt failed.
    Failed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TaskStatus::Downloaded => "downloaded",
            TaskStatus::SkippedExisting => "skipped",
            TaskStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Represents the result of processing one [`DownloadTask`].
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    task: DownloadTask,
    destination: PathBuf,
    status: TaskStatus,
    validated: bool,
    attempts: u32,
    size: u64,
    last_error: Option<String>,
}

impl TaskOutcome {
    /// Start an outcome for `task`. It reads as failed until one of the
    /// finishing methods is applied.
    pub fn new(task: DownloadTask, destination: PathBuf) -> Self {
        Self {
            task,
            destination,
            status: TaskStatus::Failed,
            validated: false,
            attempts: 0,
            size: 0,
            last_error: None,
        }
    }

    /// Mark the task as downloaded.
    pub fn downloaded(self, attempts: u32, size: u64, validated: bool) -> Self {
        Self {
            status: TaskStatus::Downloaded,
            validated,
            attempts,
            size,
            last_error: None,
            ..self
        }
    }

    /// Mark the task as skipped because the destination already exists.
    ///
    /// The existing file is not re-hashed: it validates only when the
    /// manifest lists no checksum for it.
    pub fn skipped(self) -> Self {
        Self {
            status: TaskStatus::SkippedExisting,
            validated: self.task.expected_checksum.is_none(),
            attempts: 0,
            ..self
        }
    }

    /// Mark the task as failed with the last error seen.
    pub fn fail(self, attempts: u32, msg: impl fmt::Display) -> Self {
        Self {
            status: TaskStatus::Failed,
            validated: false,
            attempts,
            size: 0,
            last_error: Some(format!("{}", msg)),
            ..self
        }
    }

    /// Get a reference to the outcome's task.
    pub fn task(&self) -> &DownloadTask {
        &self.task
    }

    /// Where the file was (or would have been) written.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Get a reference to the outcome's status.
    pub fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Whether the content matched the manifest checksum, or no checksum was
    /// listed.
    pub fn validated(&self) -> bool {
        self.validated
    }

    /// Number of GET requests issued for this task.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Bytes written to disk.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The last error for failed tasks.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
