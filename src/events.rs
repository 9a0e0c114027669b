//! Progress and result reporting.
//!
//! The engine never formats messages itself. It emits [`Event`]s to an
//! [`EventSink`] that the caller supplies; [`TracingSink`] is the default and
//! forwards everything to `tracing`. Any `Fn(&Event)` closure is a sink too:
//!
//! ```rust
//! use portal_fetch::events::{Event, EventSink};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let finished = Arc::new(AtomicUsize::new(0));
//! let counter = finished.clone();
//! let sink = move |event: &Event<'_>| {
//!     if let Event::TaskFinished(_) = event {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     }
//! };
//! sink.emit(&Event::ManifestParsed { name: None, tasks: 0 });
//! assert_eq!(finished.load(Ordering::SeqCst), 0);
//! ```

use crate::download::{RunSummary, TaskOutcome, TaskStatus};
use tracing::{error, info, warn};

/// Something worth reporting during a run.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// The portal accepted the credentials.
    LoginSucceeded { username: &'a str },
    /// The portal rejected the credentials; the run stops.
    LoginFailed { reason: &'a str },
    /// The manifest was parsed into `tasks` download tasks.
    ManifestParsed { name: Option<&'a str>, tasks: usize },
    /// A task reached its final state.
    TaskFinished(&'a TaskOutcome),
    /// Every task has an outcome.
    RunFinished(&'a RunSummary),
}

/// Receiver of [`Event`]s. Shared by every worker of a run.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event<'_>);
}

impl<F> EventSink for F
where
    F: Fn(&Event<'_>) + Send + Sync,
{
    fn emit(&self, event: &Event<'_>) {
        self(event)
    }
}

/// Default sink: one `tracing` record per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &Event<'_>) {
        match *event {
            Event::LoginSucceeded { username } => {
                info!(username, "Successfully signed in to the portal");
            }
            Event::LoginFailed { reason } => {
                error!(reason, "Login failed");
            }
            Event::ManifestParsed { name, tasks } => {
                info!(manifest = name.unwrap_or_default(), tasks, "Found {} files to download", tasks);
            }
            Event::TaskFinished(outcome) => report_outcome(outcome),
            Event::RunFinished(summary) => {
                info!(
                    downloaded = summary.downloaded,
                    skipped = summary.skipped,
                    failed = summary.failed,
                    validated = summary.validated,
                    "Finished {} tasks",
                    summary.total_tasks
                );
                if summary.failed > 0 {
                    warn!("{} files failed to download", summary.failed);
                }
                if summary.mismatched > 0 {
                    warn!("{} files failed checksum validation", summary.mismatched);
                }
            }
        }
    }
}

fn report_outcome(outcome: &TaskOutcome) {
    let path = outcome.destination().display();
    match outcome.status() {
        TaskStatus::Downloaded if outcome.validated() => {
            info!(attempts = outcome.attempts(), bytes = outcome.size(), "Downloaded {}", path);
        }
        TaskStatus::Downloaded => {
            warn!(attempts = outcome.attempts(), "Downloaded {} but its checksum does not match", path);
        }
        TaskStatus::SkippedExisting => {
            info!("File exists, skipping {}", path);
        }
        TaskStatus::Failed => {
            warn!(
                attempts = outcome.attempts(),
                error = outcome.last_error().unwrap_or_default(),
                "Failed to download {}",
                path
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::DownloadTask;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[test]
    fn test_closure_sink_receives_events() {
        let seen = Mutex::new(Vec::new());
        let sink = |event: &Event<'_>| {
            let label = match event {
                Event::LoginSucceeded { .. } => "login",
                Event::LoginFailed { .. } => "login-failed",
                Event::ManifestParsed { .. } => "parsed",
                Event::TaskFinished(_) => "task",
                Event::RunFinished(_) => "run",
            };
            seen.lock().unwrap().push(label);
        };

        let outcome = TaskOutcome::new(DownloadTask::new("f", "a", "/a"), PathBuf::from("f/a"));
        let summary = RunSummary::from_outcomes([&outcome]);
        sink.emit(&Event::ManifestParsed { name: Some("p"), tasks: 1 });
        sink.emit(&Event::TaskFinished(&outcome));
        sink.emit(&Event::RunFinished(&summary));

        assert_eq!(*seen.lock().unwrap(), vec!["parsed", "task", "run"]);
    }

    #[test]
    fn test_tracing_sink_handles_every_event() {
        let outcome = TaskOutcome::new(DownloadTask::new("f", "a", "/a"), PathBuf::from("f/a"));
        let summary = RunSummary::from_outcomes([&outcome]);
        let sink = TracingSink;

        sink.emit(&Event::LoginSucceeded { username: "alice" });
        sink.emit(&Event::LoginFailed { reason: "HTTP 401" });
        sink.emit(&Event::ManifestParsed { name: None, tasks: 1 });
        sink.emit(&Event::TaskFinished(&outcome.clone().skipped()));
        sink.emit(&Event::TaskFinished(&outcome.clone().downloaded(1, 3, false)));
        sink.emit(&Event::TaskFinished(&outcome.fail(3, "HTTP 500")));
        sink.emit(&Event::RunFinished(&summary));
    }
}
