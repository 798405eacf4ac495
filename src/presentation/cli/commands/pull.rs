use anyhow::Result;
use std::fmt::Write;
use std::sync::Arc;
use tracing::warn;

use crate::application::services::repository_scope::discover_repositories;
use crate::application::use_cases::pull_repositories::PullRepositoryTask;
use crate::application::use_cases::task_executor::{ExecutionSummary, OperationResult, TaskExecutor};
use crate::presentation::ui::display::DisplayHelper;
use crate::presentation::ui::progress::RepositoryProgress;

use super::{no_repositories_message, render_failures, render_tally, CommandContext, CommandStatus};

/// Handler for the pull command
pub struct PullCommand {
    /// Skip the confirmation prompt
    pub yes: bool,
}

impl PullCommand {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<CommandStatus> {
        let repos = discover_repositories(&ctx.config).await?;
        if repos.is_empty() {
            ctx.display.warning(&no_repositories_message(&ctx.config));
            return Ok(CommandStatus::Success);
        }

        println!("Found {} git repositories:", repos.len());
        for repo in &repos {
            println!("  - {}", ctx.display.format_path(&repo.display_path));
        }

        let prompt = format!("Pull updates for all {} repositories?", repos.len());
        if !ctx.confirm(&prompt, self.yes) {
            println!("Operation cancelled.");
            return Ok(CommandStatus::Cancelled);
        }

        let mut executor = TaskExecutor::from_config(&ctx.config);
        let progress = (!executor.is_parallel())
            .then(|| RepositoryProgress::new(&ctx.display, repos.len(), "pulling"));
        if let Some(progress) = &progress {
            executor = executor.with_observer(progress.observer());
        }

        let task = PullRepositoryTask::new(Arc::clone(&ctx.git));
        let results = executor.run_all(&repos, Arc::new(task)).await;
        if let Some(progress) = &progress {
            progress.finish();
        }

        for result in &results {
            if let Some(e) = result.error() {
                warn!(repo = %result.repository.display_path, error = %e, "pull failed");
            }
        }

        let summary = ExecutionSummary::from_results(&results);
        print!("{}", render_report(&results, &summary, &ctx.display));
        Ok(CommandStatus::from_summary(&summary))
    }
}

/// Per-repository outcome lines, the tally and the failure list
pub fn render_report(
    results: &[OperationResult<String>],
    summary: &ExecutionSummary,
    display: &DisplayHelper,
) -> String {
    let mut out = String::from("\n");

    for result in results {
        let name = display.format_repo(&result.repository.display_path);
        match &result.outcome {
            Ok(branch) => {
                let _ = writeln!(
                    out,
                    "{} {}: pulled ({})",
                    display.success_mark(),
                    name,
                    display.format_branch(branch, false)
                );
            }
            Err(e) => {
                let _ = writeln!(out, "{} {}: {}", display.failure_mark(), name, e);
            }
        }
    }

    out.push('\n');
    out.push_str(&render_tally("Pull", summary, display));
    out.push_str(&render_failures(results, display));
    out
}
