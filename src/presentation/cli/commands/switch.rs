use anyhow::Result;
use std::fmt::Write;
use std::sync::Arc;

use crate::application::services::repository_scope::discover_repositories;
use crate::application::use_cases::switch_branch::{SwitchBranchUseCase, SwitchMode};
use crate::application::use_cases::task_executor::{ExecutionSummary, OperationResult, TaskExecutor};
use crate::common::error::SgitError;
use crate::domain::value_objects::branch_name::BranchName;
use crate::presentation::ui::display::DisplayHelper;

use super::{no_repositories_message, render_failures, render_tally, CommandContext, CommandStatus};

/// Handler for the switch command
#[derive(Debug, Clone)]
pub struct SwitchCommand {
    pub branch: String,
    pub create: bool,
    pub track: bool,
    pub fetch: bool,
    pub force: bool,
    /// Print failures only and never ask
    pub silent: bool,
    pub yes: bool,
}

impl SwitchCommand {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            create: false,
            track: false,
            fetch: false,
            force: false,
            silent: false,
            yes: false,
        }
    }

    pub fn mode(&self) -> SwitchMode {
        SwitchMode::from_flags(self.create, self.track, self.fetch, self.force)
    }

    /// Creating a missing branch is the only request that runs unasked
    pub fn needs_confirmation(&self) -> bool {
        !self.silent && !self.yes && (self.force || !self.create)
    }

    fn prompt(&self, count: usize) -> String {
        if self.mode().is_destructive() {
            format!(
                "Discard all local changes in {} repositories and switch to '{}'?",
                count, self.branch
            )
        } else {
            format!("Switch {} repositories to branch '{}'?", count, self.branch)
        }
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<CommandStatus> {
        let branch = BranchName::new(&self.branch).map_err(SgitError::from)?;

        let repos = discover_repositories(&ctx.config).await?;
        if repos.is_empty() {
            if !self.silent {
                ctx.display.warning(&no_repositories_message(&ctx.config));
            }
            return Ok(CommandStatus::Success);
        }

        if self.needs_confirmation() && !ctx.confirm(&self.prompt(repos.len()), false) {
            println!("Operation cancelled.");
            return Ok(CommandStatus::Cancelled);
        }

        let use_case = SwitchBranchUseCase::new(Arc::clone(&ctx.git), branch, self.mode())
            .with_remote(ctx.config.remote.clone());
        let results = TaskExecutor::parallel(ctx.config.workers)
            .run_all(&repos, Arc::new(use_case))
            .await;

        let summary = ExecutionSummary::from_results(&results);
        print!(
            "{}",
            render_report(&results, &summary, &self.branch, self.silent, &ctx.display)
        );
        Ok(CommandStatus::from_summary(&summary))
    }
}

/// Per-repository lines, the tally and the failure list. Silent mode keeps
/// only the per-repository failure lines.
pub fn render_report(
    results: &[OperationResult<String>],
    summary: &ExecutionSummary,
    branch: &str,
    silent: bool,
    display: &DisplayHelper,
) -> String {
    let mut out = String::new();

    for result in results {
        let name = display.format_repo(&result.repository.display_path);
        match &result.outcome {
            Ok(message) if !silent => {
                let _ = writeln!(
                    out,
                    "{} {}: {}",
                    display.success_mark(),
                    name,
                    success_text(message, branch)
                );
            }
            Ok(_) => {}
            Err(e) => {
                let _ = writeln!(out, "{} {}: {}", display.failure_mark(), name, e);
            }
        }
    }

    if !silent {
        out.push('\n');
        out.push_str(&render_tally("Switch", summary, display));
        out.push_str(&render_failures(results, display));
    }
    out
}

/// Plain and create switches report just the branch; the other modes
/// already describe what they did.
fn success_text(message: &str, branch: &str) -> String {
    if message == branch {
        format!("switched to {}", message)
    } else {
        message.to_string()
    }
}
