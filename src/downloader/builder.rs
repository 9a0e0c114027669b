//! Builder pattern implementation for creating Downloader instances.
//!
//! # Examples
//!
//! ```rust
//! use portal_fetch::downloader::DownloaderBuilder;
//! use portal_fetch::events::Event;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! let downloader = DownloaderBuilder::hidden()
//!     .directory(PathBuf::from("./mirror"))
//!     .concurrent_downloads(4)
//!     .retries(2)
//!     .retry_delay(Duration::from_millis(500))
//!     .on_event(|event| {
//!         if let Event::TaskFinished(outcome) = event {
//!             println!("{}: {}", outcome.task().filename, outcome.status());
//!         }
//!     })
//!     .build();
//! assert_eq!(downloader.retries(), 2);
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};
use crate::download::ChecksumAlgorithm;
use crate::events::{Event, EventSink};
use crate::progress::StyleOptions;

use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::warn;

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main()  {
/// use portal_fetch::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().retries(5).directory("mirror".into()).build();
/// # }
/// ```
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Convenience function to hide the progress bars.
    pub fn hidden() -> Self {
        DownloaderBuilder::default().style_options(StyleOptions::hidden())
    }

    /// Sets the directory where to store the mirrored tree.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = directory;
        self
    }

    /// Set the number of retries per file after the first attempt.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the number of workers. Values below 1 are raised to 1.
    pub fn concurrent_downloads(mut self, concurrent_downloads: usize) -> Self {
        if concurrent_downloads < 1 {
            warn!("Setting the number of concurrent downloads to 1");
        }
        self.config.concurrent_downloads = concurrent_downloads.max(1);
        self
    }

    /// Set the base delay between attempts for the same file.
    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.config.retry_delay = retry_delay;
        self
    }

    /// Set whether to overwrite existing files.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    /// Set the algorithm manifest checksums are compared with.
    pub fn checksum_algorithm(mut self, checksum: ChecksumAlgorithm) -> Self {
        self.config.checksum = checksum;
        self
    }

    /// Nest the mirror under a directory named after the manifest.
    pub fn nest_by_manifest_name(mut self, nest: bool) -> Self {
        self.config.nest_by_manifest_name = nest;
        self
    }

    /// Set the downloader style options.
    pub fn style_options(mut self, style_options: StyleOptions) -> Self {
        self.config.style_options = style_options;
        self
    }

    /// Replace the event sink.
    pub fn sink<S>(mut self, sink: S) -> Self
    where
        S: EventSink + 'static,
    {
        self.config.sink = Arc::new(sink);
        self
    }

    /// Set a callback receiving every event of a run.
    ///
    /// Task outcomes are delivered as soon as each task finishes, while
    /// other tasks are still in flight.
    pub fn on_event<F>(self, callback: F) -> Self
    where
        F: Fn(&Event<'_>) + Send + Sync + 'static,
    {
        self.sink(callback)
    }

    /// Create the [`Downloader`] with the specified options.
    pub fn build(self) -> Downloader {
        Downloader::new(self.config)
    }
}
