use indicatif::ProgressBar;
use std::sync::Arc;

use crate::application::use_cases::task_executor::CompletionObserver;
use crate::presentation::ui::display::DisplayHelper;

/// Progress bar advanced once per finished repository
pub struct RepositoryProgress {
    bar: ProgressBar,
}

impl RepositoryProgress {
    /// Visible only when color output is on and stderr is a terminal
    pub fn new(display: &DisplayHelper, total: usize, message: &str) -> Self {
        let visible = display.use_color && atty::is(atty::Stream::Stderr);
        let bar = DisplayHelper::new(visible).create_progress_bar(total as u64, message);
        Self { bar }
    }

    /// Observer to hand to the task executor
    pub fn observer(&self) -> CompletionObserver {
        let bar = self.bar.clone();
        Arc::new(move |repo, _ok| {
            bar.set_message(repo.display_path.clone());
            bar.inc(1);
        })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}
