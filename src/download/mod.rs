//! Download module containing the task, outcome and checksum types.
//!
//! # Overview
//!
//! - [`task`] - [`DownloadTask`], one file listed in a manifest
//! - [`outcome`] - [`TaskOutcome`] and [`TaskStatus`], the result of processing a task
//! - [`summary`] - [`RunSummary`], the counters aggregated over a whole run
//! - [`hash`] - checksum computation and verification
//!
//! # Examples
//!
//! ```rust
//! use portal_fetch::download::{DownloadTask, RunSummary, TaskOutcome};
//! use std::path::PathBuf;
//!
//! let outcomes = vec![
//!     TaskOutcome::new(DownloadTask::new("reads", "a.txt", "/a"), PathBuf::from("reads/a.txt"))
//!         .downloaded(1, 12, true),
//!     TaskOutcome::new(DownloadTask::new("reads", "b.txt", "/b"), PathBuf::from("reads/b.txt"))
//!         .fail(3, "HTTP 500"),
//! ];
//!
//! let summary = RunSummary::from_outcomes(&outcomes);
//! assert_eq!(summary.downloaded, 1);
//! assert_eq!(summary.failed, 1);
//! ```

pub mod hash;
pub mod outcome;
pub mod summary;
pub mod task;

pub use hash::{file_checksum, verify_checksum, ChecksumAlgorithm};
pub use outcome::{TaskOutcome, TaskStatus};
pub use summary::RunSummary;
pub use task::DownloadTask;
