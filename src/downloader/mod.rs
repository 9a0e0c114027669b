//! Downloader module containing the worker pool, its builder and configuration.
//!
//! - `downloader` - the [`Downloader`] and its bounded worker pool
//! - `builder` - [`DownloaderBuilder`] for configuring a downloader
//! - `config` - [`DownloaderConfig`] and its defaults
//!
//! # Examples
//!
//! ```rust
//! use portal_fetch::downloader::DownloaderBuilder;
//! use std::path::PathBuf;
//!
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("./mirror"))
//!     .concurrent_downloads(12)
//!     .retries(5)
//!     .overwrite(false)
//!     .build();
//! ```

pub mod builder;
pub mod config;
pub mod downloader;

pub use builder::DownloaderBuilder;
pub use config::{DownloaderConfig, DEFAULT_CONCURRENCY, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY};
pub use downloader::Downloader;
