//! A single file listed in a portal manifest.
//!
//! A [`DownloadTask`] is produced by the manifest parser and never changes
//! afterwards. Two tasks with the same folder and filename are legal and are
//! processed independently.
//!
//! # Examples
//!
//! ```rust
//! use portal_fetch::download::DownloadTask;
//!
//! let task = DownloadTask::new("reads", "a.fastq.gz", "/ext-api/downloads/get_tape_file?blocking=true&url=/a")
//!     .with_checksum(Some("d41d8cd98f00b204e9800998ecf8427e".to_string()));
//! assert_eq!(task.relative_path(), std::path::PathBuf::from("reads/a.fastq.gz"));
//! ```

use crate::error::Error;

use reqwest::Url;
use std::path::{Component, Path, PathBuf};

/// Represents a file to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Name of the manifest folder the file belongs to. May be empty.
    pub relative_folder: String,
    /// File name used to save the file on disk.
    pub filename: String,
    /// Source URL, absolute or relative to the portal host.
    pub source_url: String,
    /// Expected content checksum (hex), if the manifest carries one.
    pub expected_checksum: Option<String>,
}

impl DownloadTask {
    /// Creates a new [`DownloadTask`] without a checksum.
    pub fn new(relative_folder: &str, filename: &str, source_url: &str) -> Self {
        Self {
            relative_folder: String::from(relative_folder),
            filename: String::from(filename),
            source_url: String::from(source_url),
            expected_checksum: None,
        }
    }

    /// Attach an expected checksum. Empty strings count as no checksum.
    pub fn with_checksum(self, checksum: Option<String>) -> Self {
        Self {
            expected_checksum: checksum.filter(|c| !c.trim().is_empty()),
            ..self
        }
    }

    /// Path of the file relative to the output root: `folder/filename`.
    pub fn relative_path(&self) -> PathBuf {
        if self.relative_folder.is_empty() {
            PathBuf::from(&self.filename)
        } else {
            Path::new(&self.relative_folder).join(&self.filename)
        }
    }

    /// Returns the relative path only if it stays below the output root.
    ///
    /// Manifest values are used verbatim, so a folder named `..` or an
    /// absolute filename would otherwise escape the mirror directory.
    pub fn contained_relative_path(&self) -> Result<PathBuf, Error> {
        let path = self.relative_path();
        let escapes = path.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || self.filename.is_empty() {
            return Err(Error::InvalidUrl(format!(
                "refusing to write \"{}\" outside of the output directory",
                path.display()
            )));
        }
        Ok(path)
    }

    /// Derive a filename from the last path segment of a manifest URL.
    ///
    /// Relative URLs are accepted; they are resolved against a placeholder
    /// host only to split the path.
    pub fn filename_from_url(url: &str) -> Result<String, Error> {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => Url::parse("http://portal.invalid/")
                .and_then(|base| base.join(url))
                .map_err(|e| {
                    Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", url, e))
                })?,
        };

        parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .map(|segment| {
                form_urlencoded::parse(segment.as_bytes())
                    .map(|(key, val)| [key, val].concat())
                    .collect::<String>()
            })
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                Error::InvalidUrl(format!("The url \"{}\" does not contain a filename", url))
            })
    }
}
