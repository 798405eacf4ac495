pub mod branch;
pub mod clean;
pub mod pull;
pub mod remote;
pub mod switch;

use std::fmt::Write;
use std::sync::Arc;

use crate::application::services::confirmation::Confirmation;
use crate::application::use_cases::task_executor::{ExecutionSummary, OperationResult};
use crate::domain::entities::run_config::RunConfig;
use crate::infrastructure::git::GitOperations;
use crate::presentation::ui::display::DisplayHelper;

pub use branch::{BranchCommand, BranchView};
pub use clean::CleanCommand;
pub use pull::PullCommand;
pub use remote::{RemoteCommand, RemoteView};
pub use switch::SwitchCommand;

/// Everything a command handler needs for one invocation
pub struct CommandContext {
    pub config: RunConfig,
    pub display: DisplayHelper,
    pub git: Arc<dyn GitOperations>,
    pub confirmation: Arc<dyn Confirmation>,
}

impl CommandContext {
    pub fn new(
        config: RunConfig,
        git: Arc<dyn GitOperations>,
        confirmation: Arc<dyn Confirmation>,
    ) -> Self {
        let display = DisplayHelper::new(config.use_color);
        Self {
            config,
            display,
            git,
            confirmation,
        }
    }

    /// Ask unless `skip` is set
    pub fn confirm(&self, prompt: &str, skip: bool) -> bool {
        skip || self.confirmation.confirm(prompt)
    }
}

/// How a command finished, mapped to the process exit status by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// At least one repository failed
    PartialFailure,
    /// The user declined the confirmation prompt
    Cancelled,
}

impl CommandStatus {
    pub fn from_summary(summary: &ExecutionSummary) -> Self {
        if summary.all_succeeded() {
            CommandStatus::Success
        } else {
            CommandStatus::PartialFailure
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CommandStatus::Success | CommandStatus::Cancelled => 0,
            CommandStatus::PartialFailure => 1,
        }
    }
}

/// `<label> result: 3/4 succeeded`
pub(crate) fn render_tally(label: &str, summary: &ExecutionSummary, display: &DisplayHelper) -> String {
    let counts = format!("{}/{}", summary.succeeded, summary.total);
    let counts = if summary.all_succeeded() {
        display.paint(&counts, colored::Color::Green)
    } else {
        display.paint(&counts, colored::Color::Yellow)
    };
    format!("{} result: {} succeeded\n", label, counts)
}

/// Itemized failure list, empty when everything succeeded
pub(crate) fn render_failures<T>(results: &[OperationResult<T>], display: &DisplayHelper) -> String {
    let mut out = String::new();
    let failures: Vec<_> = results
        .iter()
        .filter_map(|r| r.error().map(|e| (&r.repository, e)))
        .collect();

    if failures.is_empty() {
        return out;
    }

    let _ = writeln!(out, "\n{}", display.bold("Failed repositories:"));
    for (repo, error) in failures {
        let _ = writeln!(
            out,
            "  {} {}: {}",
            display.failure_mark(),
            display.format_path(&repo.display_path),
            error
        );
    }
    out
}

pub(crate) fn no_repositories_message(config: &RunConfig) -> String {
    format!("No git repositories found in {}", config.root.display())
}
