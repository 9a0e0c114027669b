//! Configuration structures and defaults for the downloader.

use crate::download::ChecksumAlgorithm;
use crate::events::{EventSink, TracingSink};
use crate::progress::StyleOptions;

use std::env::current_dir;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Default number of simultaneous downloads.
pub const DEFAULT_CONCURRENCY: usize = 12;
/// Default number of retries per file after the first attempt.
pub const DEFAULT_RETRIES: u32 = 5;
/// Default base delay between attempts. Attempt `n` waits `n` times this.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Configuration structure for the downloader
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Directory the mirrored tree is written to.
    pub directory: PathBuf,
    /// Number of retries per file after the first attempt.
    pub retries: u32,
    /// Number of workers draining the task queue.
    pub concurrent_downloads: usize,
    /// Base delay between two attempts for the same file.
    pub retry_delay: Duration,
    /// Re-fetch files that already exist at their destination.
    pub overwrite: bool,
    /// Algorithm the manifest checksums were computed with.
    pub checksum: ChecksumAlgorithm,
    /// Write files under `directory/<manifest name>/` when the manifest has
    /// a name.
    pub nest_by_manifest_name: bool,
    /// Downloader style options.
    pub style_options: StyleOptions,
    /// Receiver of run events.
    pub sink: Arc<dyn EventSink>,
}

impl fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("directory", &self.directory)
            .field("retries", &self.retries)
            .field("concurrent_downloads", &self.concurrent_downloads)
            .field("retry_delay", &self.retry_delay)
            .field("overwrite", &self.overwrite)
            .field("checksum", &self.checksum)
            .field("nest_by_manifest_name", &self.nest_by_manifest_name)
            .field("style_options", &self.style_options)
            .finish_non_exhaustive()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: current_dir().unwrap_or_default(),
            retries: DEFAULT_RETRIES,
            concurrent_downloads: DEFAULT_CONCURRENCY,
            retry_delay: DEFAULT_RETRY_DELAY,
            overwrite: false,
            checksum: ChecksumAlgorithm::default(),
            nest_by_manifest_name: false,
            style_options: StyleOptions::default(),
            sink: Arc::new(TracingSink),
        }
    }
}
