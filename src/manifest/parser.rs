use super::Manifest;
use crate::download::DownloadTask;
use crate::error::{Error, Result};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use tracing::debug;

const FOLDER_TAG: &[u8] = b"folder";
const FILE_TAG: &[u8] = b"file";

/// Read a manifest from disk and parse it.
pub async fn load_manifest(path: &Path) -> Result<Manifest> {
    debug!("Reading manifest {:?}", path);
    let bytes = tokio::fs::read(path).await?;
    parse_manifest_bytes(&bytes)
}

/// Parse raw manifest bytes. The document must be UTF-8.
pub fn parse_manifest_bytes(bytes: &[u8]) -> Result<Manifest> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::MalformedManifest(format!("manifest is not valid UTF-8: {}", e)))?;
    parse_manifest(text)
}

/// Parse a manifest document into a flat list of tasks.
///
/// Only `file` elements directly inside a `folder` that is itself a direct
/// child of the root element produce tasks. Anything else is ignored.
pub fn parse_manifest(xml: &str) -> Result<Manifest> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut walker = Walker::default();
    loop {
        let event = reader.read_event().map_err(|e| {
            Error::MalformedManifest(format!(
                "{} (at byte {})",
                e,
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(element) => walker.open(&element)?,
            Event::Empty(element) => {
                walker.open(&element)?;
                walker.close()?;
            }
            Event::End(_) => walker.close()?,
            Event::Text(_) | Event::CData(_) if walker.depth == 0 => {
                return Err(Error::MalformedManifest(
                    "text content outside of the root element".into(),
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    walker.finish()
}

#[derive(Default)]
struct Walker {
    depth: usize,
    roots: usize,
    /// Name of the folder currently open at depth 2, if any.
    folder: Option<String>,
    manifest: Manifest,
}

impl Walker {
    fn open(&mut self, element: &BytesStart<'_>) -> Result<()> {
        self.depth += 1;
        let tag = element.name();

        match self.depth {
            1 => {
                self.roots += 1;
                if self.roots > 1 {
                    return Err(Error::MalformedManifest(
                        "more than one root element".into(),
                    ));
                }
                self.manifest.name = attribute(element, "name")?;
            }
            2 if tag.as_ref() == FOLDER_TAG => {
                self.folder = Some(attribute(element, "name")?.unwrap_or_default());
            }
            3 if tag.as_ref() == FILE_TAG => {
                if let Some(folder) = &self.folder {
                    let task = file_task(folder, element)?;
                    self.manifest.tasks.push(task);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.depth == 2 {
            self.folder = None;
        }
        self.depth = self
            .depth
            .checked_sub(1)
            .ok_or_else(|| Error::MalformedManifest("unexpected closing tag".into()))?;
        Ok(())
    }

    fn finish(self) -> Result<Manifest> {
        if self.depth != 0 {
            return Err(Error::MalformedManifest(
                "document ended before all elements were closed".into(),
            ));
        }
        if self.roots == 0 {
            return Err(Error::MalformedManifest("document has no root element".into()));
        }
        debug!(
            "Parsed manifest {:?} with {} files",
            self.manifest.name,
            self.manifest.tasks.len()
        );
        Ok(self.manifest)
    }
}

fn file_task(folder: &str, element: &BytesStart<'_>) -> Result<DownloadTask> {
    let filename = attribute(element, "filename")?.filter(|f| !f.is_empty());
    let url = attribute(element, "url")?.filter(|u| !u.is_empty());
    let checksum = attribute(element, "md5")?;

    let (filename, url) = match (filename, url) {
        (Some(filename), Some(url)) => (filename, url),
        (None, Some(url)) => {
            let filename = DownloadTask::filename_from_url(&url).map_err(|e| {
                Error::MalformedManifest(format!("file element has no filename: {}", e))
            })?;
            (filename, url)
        }
        (Some(filename), None) => {
            return Err(Error::MalformedManifest(format!(
                "file \"{}\" in folder \"{}\" has no url",
                filename, folder
            )));
        }
        (None, None) => {
            return Err(Error::MalformedManifest(format!(
                "file element in folder \"{}\" has neither filename nor url",
                folder
            )));
        }
    };

    Ok(DownloadTask::new(folder, &filename, &url).with_checksum(checksum))
}

fn attribute(element: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::MalformedManifest(e.to_string()))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::MalformedManifest(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
