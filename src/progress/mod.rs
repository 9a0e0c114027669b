//! Terminal progress bars for a run.
//!
//! - `style` - progress bar styling options and templates
//! - `display` - coordination of the main bar and the per-transfer bars
//!
//! ```rust
//! use portal_fetch::downloader::DownloaderBuilder;
//! use portal_fetch::progress::{ProgressBarOpts, StyleOptions};
//!
//! // Keep the file counter, drop the per-transfer bars.
//! let style = StyleOptions::new(StyleOptions::default().main().clone(), ProgressBarOpts::hidden());
//! let downloader = DownloaderBuilder::new().style_options(style).build();
//! ```

pub(crate) mod display;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use style::{ProgressBarOpts, StyleOptions};
