//! Aggregation of task outcomes into run-level counters.

use super::outcome::{TaskOutcome, TaskStatus};
use std::fmt;

/// Counters describing a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_tasks: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub validated: usize,
    /// Downloaded files whose content did not match the manifest checksum.
    pub mismatched: usize,
}

impl RunSummary {
    /// Count statuses and the validated flag over a set of outcomes.
    ///
    /// The order of the outcomes does not matter.
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a TaskOutcome>,
    {
        outcomes
            .into_iter()
            .fold(RunSummary::default(), |mut summary, outcome| {
                summary.total_tasks += 1;
                match outcome.status() {
                    TaskStatus::Downloaded => summary.downloaded += 1,
                    TaskStatus::SkippedExisting => summary.skipped += 1,
                    TaskStatus::Failed => summary.failed += 1,
                }
                if outcome.validated() {
                    summary.validated += 1;
                } else if outcome.status() == &TaskStatus::Downloaded {
                    summary.mismatched += 1;
                }
                summary
            })
    }

    /// True when nothing failed and every downloaded file validated.
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && self.mismatched == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tasks: {} downloaded, {} skipped, {} failed, {} validated",
            self.total_tasks, self.downloaded, self.skipped, self.failed, self.validated
        )
    }
}
