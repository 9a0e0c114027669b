//! Error handling for portal-fetch.
//!
//! Only two variants are fatal for a whole run: [`Error::MalformedManifest`]
//! and [`Error::Auth`]. Everything that goes wrong while fetching a single
//! file is retried inside the worker and finally reduced to a failed
//! [`TaskOutcome`](crate::download::TaskOutcome), so those variants never
//! escape [`Downloader::run`](crate::downloader::Downloader::run).

use reqwest::StatusCode;
use std::io;
use thiserror::Error;

/// Errors that can happen when mirroring a portal manifest.
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest is not well-formed XML or does not follow the
    /// folder/file schema.
    #[error("Malformed manifest: {0}")]
    MalformedManifest(String),

    /// The portal rejected the login or did not hand out a session.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The settings file is missing or improperly formatted.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The server answered a file request with a non-success status.
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: StatusCode },

    /// A file request failed before or while streaming the body.
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The downloaded content does not hash to the manifest checksum.
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// I/O Error.
    ///
    /// Wraps standard I/O errors raised while creating, writing, renaming
    /// or hashing files.
    #[error("I/O error: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error raised by the HTTP middleware stack.
    #[error("HTTP middleware error: {source}")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },
}

impl Error {
    /// Whether the error aborts the whole run rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::MalformedManifest(_) | Error::Auth(_) | Error::Config(_))
    }
}

/// Result type alias for operations that can fail with a portal-fetch error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::MalformedManifest("eof".into()).is_fatal());
        assert!(Error::Auth("denied".into()).is_fatal());
        assert!(!Error::HttpStatus {
            url: "http://portal/a".into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
        .is_fatal());
        assert!(!Error::ChecksumMismatch {
            expected: "a".into(),
            actual: "b".into(),
        }
        .is_fatal());
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::HttpStatus {
            url: "http://portal/a".into(),
            status: StatusCode::NOT_FOUND,
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("http://portal/a"));
    }
}
