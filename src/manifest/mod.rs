//! Portal download manifests.
//!
//! A manifest is the XML document the portal exports for a project. It is a
//! two-level tree:
//!
//! ```xml
//! <organismDownloads name="Project">
//!   <folder name="Raw Data">
//!     <file filename="a.fastq.gz" url="/portal/a.fastq.gz" md5="..."/>
//!   </folder>
//! </organismDownloads>
//! ```
//!
//! [`parse_manifest`] flattens it into an ordered list of
//! [`DownloadTask`](crate::download::DownloadTask)s.

mod parser;

pub use parser::{load_manifest, parse_manifest, parse_manifest_bytes};

use crate::download::DownloadTask;

/// A parsed manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// The root element's `name` attribute.
    pub name: Option<String>,
    /// One task per `file` element, in document order.
    pub tasks: Vec<DownloadTask>,
}

impl Manifest {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
