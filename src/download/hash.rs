//! Content checksum verification for downloaded files.
//!
//! The portal lists one hex digest per file. Which algorithm produced it is a
//! property of the portal, not of the individual file, so the algorithm is a
//! [`ChecksumAlgorithm`] chosen once in the downloader configuration.
//! Historically the portal publishes MD5 digests.
//!
//! # Examples
//!
//! ```rust,no_run
//! use portal_fetch::download::hash::{verify_checksum, ChecksumAlgorithm};
//! use std::path::Path;
//!
//! let expected = Some("d41d8cd98f00b204e9800998ecf8427e".to_string());
//! match verify_checksum(Path::new("downloaded_file.zip"), expected.as_deref(), ChecksumAlgorithm::Md5) {
//!     Ok(true) => println!("Checksum verification passed!"),
//!     Ok(false) => println!("Checksum verification failed!"),
//!     Err(e) => println!("Error during verification: {}", e),
//! }
//! ```

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Supported checksum algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    /// MD5, 32 hex characters.
    #[default]
    Md5,
    /// SHA-256, 64 hex characters.
    Sha256,
}

impl FromStr for ChecksumAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(ChecksumAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(ChecksumAlgorithm::Sha256),
            other => Err(format!("unsupported checksum algorithm: {}", other)),
        }
    }
}

/// Compute the hex digest of a file with the given algorithm.
///
/// The file is read in fixed-size chunks so large downloads are never held
/// in memory.
pub fn file_checksum(path: &Path, algorithm: ChecksumAlgorithm) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    match algorithm {
        ChecksumAlgorithm::Md5 => {
            let mut context = md5::Context::new();
            loop {
                let read = file.read(&mut buffer)?;
                if read == 0 {
                    break;
                }
                context.consume(&buffer[..read]);
            }
            Ok(format!("{:x}", context.compute()))
        }
        ChecksumAlgorithm::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let read = file.read(&mut buffer)?;
                if read == 0 {
                    break;
                }
                hasher.update(&buffer[..read]);
            }
            Ok(hex::encode(hasher.finalize()))
        }
    }
}

/// Verify a local file against an expected checksum.
///
/// Returns `Ok(true)` when no checksum is expected: files the portal lists
/// without a digest always count as validated. Comparison ignores case and
/// surrounding whitespace.
pub fn verify_checksum(
    path: &Path,
    expected: Option<&str>,
    algorithm: ChecksumAlgorithm,
) -> io::Result<bool> {
    let Some(expected) = expected else {
        return Ok(true);
    };

    let actual = file_checksum(path, algorithm)?;
    Ok(actual.eq_ignore_ascii_case(expected.trim()))
}
