//! Progress bar display management and coordination.

use super::StyleOptions;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};

/// Coordinates the main bar and the per-transfer child bars of one run.
///
/// `MultiProgress` and `ProgressBar` are internally synchronized, so a single
/// display is shared by reference between all workers.
pub struct ProgressDisplay {
    multi: MultiProgress,
    main: ProgressBar,
    style_options: StyleOptions,
}

impl ProgressDisplay {
    /// Create a display for `total_tasks` files.
    pub fn new(style_options: StyleOptions, total_tasks: usize) -> Self {
        let multi = if style_options.is_enabled() {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let main = multi.add(style_options.main().to_progress_bar(total_tasks as u64));
        main.tick();

        Self {
            multi,
            main,
            style_options,
        }
    }

    /// Create a child bar for one transfer of `size` bytes (0 when unknown).
    pub fn create_child_progress(&self, size: u64, label: &str) -> ProgressBar {
        let pb = self
            .multi
            .add(self.style_options.child().to_progress_bar(size));
        pb.set_message(label.to_string());
        pb
    }

    /// Finish a child bar based on configuration.
    pub fn finish_child(&self, pb: ProgressBar) {
        if self.style_options.child().clear {
            pb.finish_and_clear();
        } else {
            pb.finish();
        }
        self.multi.remove(&pb);
    }

    /// One more file reached its final state.
    pub fn increment_main(&self) {
        self.main.inc(1);
    }

    /// Files counted so far.
    pub fn position(&self) -> u64 {
        self.main.position()
    }

    /// Finish the display, clearing or keeping the main bar.
    pub fn finish(&self) {
        if self.style_options.main().clear {
            self.main.finish_and_clear();
        } else {
            self.main.finish();
        }
    }
}
