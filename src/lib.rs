//! portal-fetch mirrors the files listed in a content portal's XML download
//! manifest into a local directory tree, signing in once and fetching with a
//! bounded pool of concurrent workers.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use portal_fetch::{mirror, Credentials, DownloaderBuilder, Error, PortalConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("output"))
//!     .build();
//! let summary = mirror(
//!     &PortalConfig::default(),
//!     &Credentials::new("alice", "secret"),
//!     Path::new("Project.xml"),
//!     &downloader,
//! )
//! .await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`manifest`] - XML manifest parsing into download tasks
//! - [`session`] - portal sign-on and the shared authenticated client
//! - [`downloader`] - the `Downloader` worker pool and its builder
//! - [`download`] - task, outcome and summary types plus checksum verification
//! - [`events`] - the reporting interface
//! - [`pipeline`] - parse, login, download and summarize in one call
//! - [`settings`] - the credentials settings file
//! - [`error`] - centralized error handling with the `Error` enum
//! - [`http`] - HTTP client construction
//! - [`progress`] - progress bar styling and display management

pub mod download;
pub mod downloader;
pub mod error;
pub mod events;
pub mod http;
pub mod manifest;
pub mod pipeline;
pub mod progress;
pub mod session;
pub mod settings;

pub use download::{ChecksumAlgorithm, DownloadTask, RunSummary, TaskOutcome, TaskStatus};
pub use downloader::{Downloader, DownloaderBuilder};
pub use error::{Error, Result};
pub use events::{Event, EventSink, TracingSink};
pub use manifest::{load_manifest, parse_manifest, Manifest};
pub use pipeline::{download_manifest, mirror, mirror_with_session};
pub use progress::{ProgressBarOpts, StyleOptions};
pub use session::{login, Credentials, PortalConfig, SessionHandle};
