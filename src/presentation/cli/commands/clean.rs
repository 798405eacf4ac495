use anyhow::Result;
use std::fmt::Write;
use std::sync::Arc;

use crate::application::services::repository_scope::{discover_repositories, require_repository};
use crate::application::use_cases::clean_repositories::{CleanReport, CleanRepositoryTask, TARGET_DIR};
use crate::application::use_cases::task_executor::{ExecutionSummary, OperationResult, TaskExecutor};
use crate::presentation::ui::display::DisplayHelper;
use crate::presentation::ui::progress::RepositoryProgress;

use super::{no_repositories_message, render_failures, render_tally, CommandContext, CommandStatus};

/// Handler for the clean command
pub struct CleanCommand {
    /// Skip the confirmation prompt
    pub force: bool,
    /// Clean every repository below the root instead of the root itself
    pub recursive: bool,
}

impl CleanCommand {
    pub fn new(force: bool, recursive: bool) -> Self {
        Self { force, recursive }
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<CommandStatus> {
        let repos = if self.recursive {
            discover_repositories(&ctx.config).await?
        } else {
            vec![require_repository(ctx.git.as_ref(), &ctx.config.root).await?]
        };
        if repos.is_empty() {
            ctx.display.warning(&no_repositories_message(&ctx.config));
            return Ok(CommandStatus::Success);
        }

        if !self.force {
            println!("The following repositories will be reset and cleaned:");
            for repo in &repos {
                println!("  - {}", ctx.display.format_path(&repo.display_path));
            }
            let prompt = format!(
                "Discard all uncommitted changes and untracked files in {} repositories?",
                repos.len()
            );
            if !ctx.confirm(&prompt, false) {
                println!("Operation cancelled.");
                return Ok(CommandStatus::Cancelled);
            }
        }

        let mut executor = TaskExecutor::from_config(&ctx.config);
        let progress = (!executor.is_parallel())
            .then(|| RepositoryProgress::new(&ctx.display, repos.len(), "cleaning"));
        if let Some(progress) = &progress {
            executor = executor.with_observer(progress.observer());
        }

        let task = CleanRepositoryTask::new(Arc::clone(&ctx.git))
            .with_remove_target(ctx.config.clean_target_dir);
        let results = executor.run_all(&repos, Arc::new(task)).await;
        if let Some(progress) = &progress {
            progress.finish();
        }

        let summary = ExecutionSummary::from_results(&results);
        print!("{}", render_report(&results, &summary, &ctx.display));
        Ok(CommandStatus::from_summary(&summary))
    }
}

pub fn render_report(
    results: &[OperationResult<CleanReport>],
    summary: &ExecutionSummary,
    display: &DisplayHelper,
) -> String {
    let mut out = String::from("\n");

    for result in results {
        let name = display.format_repo(&result.repository.display_path);
        match &result.outcome {
            Ok(report) if report.target_removed => {
                let _ = writeln!(
                    out,
                    "{} {}: cleaned (removed {}/)",
                    display.success_mark(),
                    name,
                    TARGET_DIR
                );
            }
            Ok(_) => {
                let _ = writeln!(out, "{} {}: cleaned", display.success_mark(), name);
            }
            Err(e) => {
                let _ = writeln!(out, "{} {}: {}", display.failure_mark(), name, e);
            }
        }
    }

    out.push('\n');
    out.push_str(&render_tally("Clean", summary, display));
    out.push_str(&render_failures(results, display));
    out
}
