//! End-to-end run: manifest, login, downloads, summary.

use crate::download::RunSummary;
use crate::downloader::Downloader;
use crate::error::{Error, Result};
use crate::events::Event;
use crate::manifest::{load_manifest, Manifest};
use crate::session::{login, Credentials, PortalConfig, SessionHandle};

use std::path::{Path, PathBuf};
use tracing::debug;

/// Mirror every file listed in the manifest at `manifest_path`.
///
/// The manifest is parsed before any network traffic, so a malformed
/// document aborts the run without contacting the portal. A rejected login
/// aborts it as well. Past that point the run always completes and the
/// returned summary accounts for every file.
pub async fn mirror(
    portal: &PortalConfig,
    credentials: &Credentials,
    manifest_path: &Path,
    downloader: &Downloader,
) -> Result<RunSummary> {
    let manifest = parsed(manifest_path, downloader).await?;

    let session = match login(portal, credentials).await {
        Ok(session) => session,
        Err(e) => {
            let reason = e.to_string();
            downloader.emit(&Event::LoginFailed { reason: &reason });
            return Err(match e {
                Error::Auth(_) => e,
                other => Error::Auth(other.to_string()),
            });
        }
    };
    downloader.emit(&Event::LoginSucceeded {
        username: &credentials.username,
    });

    Ok(download_manifest(manifest, &session, downloader).await)
}

/// Like [`mirror`], with a session the caller already holds.
pub async fn mirror_with_session(
    session: &SessionHandle,
    manifest_path: &Path,
    downloader: &Downloader,
) -> Result<RunSummary> {
    let manifest = parsed(manifest_path, downloader).await?;
    Ok(download_manifest(manifest, session, downloader).await)
}

/// Run the worker pool over a parsed manifest and report the summary.
pub async fn download_manifest(
    manifest: Manifest,
    session: &SessionHandle,
    downloader: &Downloader,
) -> RunSummary {
    let root = output_root(downloader, manifest.name.as_deref());
    let outcomes = downloader.run_in(manifest.tasks, session, &root).await;

    let summary = RunSummary::from_outcomes(&outcomes);
    downloader.emit(&Event::RunFinished(&summary));
    summary
}

async fn parsed(manifest_path: &Path, downloader: &Downloader) -> Result<Manifest> {
    debug!("Parsing {:?} for URLs", manifest_path);
    let manifest = load_manifest(manifest_path).await?;
    downloader.emit(&Event::ManifestParsed {
        name: manifest.name.as_deref(),
        tasks: manifest.len(),
    });
    Ok(manifest)
}

/// Root directory for a manifest's files.
///
/// A manifest name that is empty or would leave the output directory is
/// ignored.
fn output_root(downloader: &Downloader, manifest_name: Option<&str>) -> PathBuf {
    let directory = downloader.directory().to_path_buf();
    if !downloader.nest_by_manifest_name() {
        return directory;
    }
    match manifest_name {
        Some(name) if is_plain_segment(name) => directory.join(name),
        _ => directory,
    }
}

fn is_plain_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}
