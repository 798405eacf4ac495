use anyhow::Result;
use colored::Color;
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;

use crate::application::services::repository_scope::discover_repositories;
use crate::application::use_cases::branch_summary::BranchSummary;
use crate::application::use_cases::inspect_branches::{BranchInfo, InspectBranchesTask};
use crate::application::use_cases::task_executor::{OperationResult, TaskExecutor};
use crate::domain::entities::repository::RepositoryRef;
use crate::presentation::ui::display::DisplayHelper;

use super::{no_repositories_message, CommandContext, CommandStatus};

const TABLE_WIDTH: usize = 80;

/// Output layout of the branch command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchView {
    Detailed,
    All,
    Simple,
    Summary,
    Json,
}

impl BranchView {
    pub fn from_flags(simple: bool, all: bool, summary: bool, json: bool) -> Self {
        if json {
            BranchView::Json
        } else if summary {
            BranchView::Summary
        } else if simple {
            BranchView::Simple
        } else if all {
            BranchView::All
        } else {
            BranchView::Detailed
        }
    }
}

/// Handler for the branch command
pub struct BranchCommand {
    pub view: BranchView,
}

impl BranchCommand {
    pub fn new(view: BranchView) -> Self {
        Self { view }
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<CommandStatus> {
        let repos = discover_repositories(&ctx.config).await?;
        if repos.is_empty() {
            ctx.display.warning(&no_repositories_message(&ctx.config));
            return Ok(CommandStatus::Success);
        }

        let task = InspectBranchesTask::new(Arc::clone(&ctx.git))
            .with_all_branches(self.view == BranchView::All);
        let results = TaskExecutor::from_config(&ctx.config)
            .run_all(&repos, Arc::new(task))
            .await;

        let output = match self.view {
            BranchView::Detailed => render_detailed(&results, &ctx.display),
            BranchView::All => render_all(&results, &ctx.display),
            BranchView::Simple => render_simple(&results, &ctx.display),
            BranchView::Summary => render_summary(&BranchSummary::from_results(&results), &ctx.display),
            BranchView::Json => render_json(&results)?,
        };
        print!("{}", output);

        // Read-only: per-repository errors are part of the report
        Ok(CommandStatus::Success)
    }
}

fn branch_label(info: &BranchInfo, display: &DisplayHelper) -> String {
    let branch = display.format_branch(&info.branch, info.is_detached());
    if info.is_detached() {
        format!("{} (detached)", branch)
    } else {
        branch
    }
}

/// One block per repository: name, branch, status and path
pub fn render_detailed(results: &[OperationResult<BranchInfo>], display: &DisplayHelper) -> String {
    let mut out = String::new();

    for result in results {
        let repo = &result.repository;
        match &result.outcome {
            Ok(info) => {
                let dirty = if info.dirty {
                    format!(" {}", display.paint("(uncommitted changes)", Color::Red))
                } else {
                    String::new()
                };
                let _ = writeln!(
                    out,
                    "► {} {}{}",
                    display.format_repo(&repo.name),
                    branch_label(info, display),
                    dirty
                );
                let status = info.status_text();
                if !status.is_empty() {
                    let _ = writeln!(out, "  Status: {}", status);
                }
            }
            Err(e) => {
                let _ = writeln!(
                    out,
                    "► {} {} {}",
                    display.format_repo(&repo.name),
                    display.failure_mark(),
                    e
                );
            }
        }
        let _ = writeln!(out, "  Path: {}\n", display.format_path(&repo.display_path));
    }

    out
}

/// Local, remote and tag listing per repository, current branch starred
pub fn render_all(results: &[OperationResult<BranchInfo>], display: &DisplayHelper) -> String {
    let mut out = String::new();

    for result in results {
        let repo = &result.repository;
        let _ = writeln!(out, "► {}", display.format_repo(&repo.name));
        let _ = writeln!(out, "  Path: {}", display.format_path(&repo.display_path));

        let info = match &result.outcome {
            Ok(info) => info,
            Err(e) => {
                let _ = writeln!(out, "  {} {}\n", display.failure_mark(), e);
                continue;
            }
        };

        let Some(branches) = &info.branches else {
            out.push('\n');
            continue;
        };

        if !branches.local.is_empty() {
            let _ = writeln!(out, "  Local:");
            for name in &branches.local {
                if *name == info.branch {
                    let _ = writeln!(out, "    * {}", display.paint(name, Color::Green));
                } else {
                    let _ = writeln!(out, "      {}", name);
                }
            }
        }
        if !branches.remote.is_empty() {
            let _ = writeln!(out, "  Remote:");
            for name in &branches.remote {
                let _ = writeln!(out, "      {}", display.paint(name, Color::Red));
            }
        }
        if !branches.tags.is_empty() {
            let _ = writeln!(out, "  Tags:");
            for name in &branches.tags {
                let _ = writeln!(out, "      {}", display.paint(name, Color::Yellow));
            }
        }
        out.push('\n');
    }

    out
}

/// Fixed-width table: Repository / Branch / Status / Changes
pub fn render_simple(results: &[OperationResult<BranchInfo>], display: &DisplayHelper) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}{}{}{}",
        display.pad(&display.bold("Repository"), 30),
        display.pad(&display.bold("Branch"), 25),
        display.pad(&display.bold("Status"), 15),
        display.bold("Changes")
    );
    let _ = writeln!(out, "{}", display.separator(TABLE_WIDTH));

    for result in results {
        let repo = &result.repository;
        let name = display.pad(&display.format_repo(&repo.display_path), 30);
        match &result.outcome {
            Ok(info) => {
                let changes = if info.dirty {
                    display.paint("✗", Color::Red)
                } else {
                    String::new()
                };
                let _ = writeln!(
                    out,
                    "{}{}{}{}",
                    name,
                    display.pad(&display.format_branch(&info.branch, info.is_detached()), 25),
                    display.pad(&info.status_text(), 15),
                    changes
                );
            }
            Err(e) => {
                let _ = writeln!(
                    out,
                    "{}{}{}",
                    name,
                    display.pad(&display.paint("ERROR", Color::Red), 25),
                    e
                );
            }
        }
    }

    out
}

fn numbered_list(out: &mut String, repos: &[&RepositoryRef], display: &DisplayHelper) {
    for (i, repo) in repos.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, display.format_path(&repo.display_path));
    }
}

/// Histogram of current branches plus detached, failed and dirty lists
pub fn render_summary(summary: &BranchSummary<'_>, display: &DisplayHelper) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", display.bold("Branch summary for Git repositories"));
    let _ = writeln!(out, "{}", display.separator(60));

    if !summary.branches.is_empty() {
        let _ = writeln!(out, "\n{}", display.bold("Branches:"));
        for (branch, count) in &summary.branches {
            let _ = writeln!(
                out,
                "  {}: {} repositories",
                display.pad(&display.format_branch(branch, false), 30),
                count
            );
        }
    }

    if !summary.detached.is_empty() {
        let _ = writeln!(
            out,
            "\n{}",
            display.paint(&format!("Detached HEAD ({} repositories):", summary.detached.len()), Color::Yellow)
        );
        numbered_list(&mut out, &summary.detached, display);
    }

    if !summary.errors.is_empty() {
        let _ = writeln!(
            out,
            "\n{}",
            display.paint(&format!("Errors ({}):", summary.errors.len()), Color::Red)
        );
        for (i, (repo, error)) in summary.errors.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}: {}",
                i + 1,
                display.format_path(&repo.display_path),
                error
            );
        }
    }

    if !summary.dirty.is_empty() {
        let _ = writeln!(
            out,
            "\n{}",
            display.paint(&format!("Uncommitted changes ({}):", summary.dirty.len()), Color::Red)
        );
        numbered_list(&mut out, &summary.dirty, display);
    }

    let _ = writeln!(out, "\nTotal repositories: {}", summary.total);
    out
}

#[derive(Serialize)]
struct BranchRecord<'a> {
    repository: &'a RepositoryRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<&'a BranchInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn render_json(results: &[OperationResult<BranchInfo>]) -> Result<String> {
    let records: Vec<BranchRecord<'_>> = results
        .iter()
        .map(|r| BranchRecord {
            repository: &r.repository,
            info: r.value(),
            error: r.error().map(|e| e.to_string()),
        })
        .collect();
    let mut json = serde_json::to_string_pretty(&records)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::task_executor::TaskError;
    use crate::domain::value_objects::branch_set::BranchSet;
    use crate::infrastructure::git::{BranchStatus, GitError, MockGitOperations};
    use crate::presentation::cli::commands::test_support::{context, fake_repos};
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::TempDir;

    fn results() -> Vec<OperationResult<BranchInfo>> {
        let root = Path::new("/work");
        vec![
            OperationResult::new(
                RepositoryRef::new("/work/api", root),
                Ok(BranchInfo::new("main", false).with_status(Some(BranchStatus::new(2, 0)))),
            ),
            OperationResult::new(RepositoryRef::new("/work/web", root), Ok(BranchInfo::new("HEAD", true))),
            OperationResult::new(
                RepositoryRef::new("/work/broken", root),
                Err(TaskError::Git(GitError::command_failed("git rev-parse", 128, "bad HEAD"))),
            ),
            OperationResult::new(RepositoryRef::new("/work/cli", root), Ok(BranchInfo::new("main", true))),
        ]
    }

    #[test]
    fn test_view_precedence() {
        assert_eq!(BranchView::from_flags(false, false, false, false), BranchView::Detailed);
        assert_eq!(BranchView::from_flags(true, true, false, false), BranchView::Simple);
        assert_eq!(BranchView::from_flags(true, true, true, false), BranchView::Summary);
        assert_eq!(BranchView::from_flags(true, true, true, true), BranchView::Json);
    }

    #[test]
    fn test_detailed_view() {
        let output = render_detailed(&results(), &DisplayHelper::new(false));
        assert!(output.contains("► api main\n  Status: ↑2\n  Path: api\n"));
        assert!(output.contains("► web HEAD (detached) (uncommitted changes)\n"));
        assert!(output.contains("► broken [FAILED] bad HEAD\n"));
    }

    #[test]
    fn test_all_view_stars_current_branch() {
        let root = Path::new("/work");
        let info = BranchInfo::new("main", false)
            .with_branches(BranchSet::partition(["main", "dev", "remotes/origin/main", "tags/v1.0"]));
        let results = vec![OperationResult::new(RepositoryRef::new("/work/api", root), Ok(info))];

        let output = render_all(&results, &DisplayHelper::new(false));
        assert_eq!(
            output,
            "► api\n  Path: api\n  Local:\n      dev\n    * main\n  Remote:\n      origin/main\n  Tags:\n      v1.0\n\n"
        );
    }

    #[test]
    fn test_simple_table() {
        let output = render_simple(&results(), &DisplayHelper::new(false));
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("Repository"));
        assert_eq!(lines[1], "-".repeat(80));
        assert_eq!(lines[2].trim_end(), format!("{:<30}{:<25}{}", "api", "main", "↑2"));
        assert!(lines[3].ends_with('✗'));
        assert!(lines[4].contains("ERROR"));
    }

    #[test]
    fn test_summary_view() {
        let results = results();
        let output = render_summary(&BranchSummary::from_results(&results), &DisplayHelper::new(false));

        assert!(output.starts_with("Branch summary for Git repositories\n"));
        assert!(output.contains(&format!("  {:<30}: 2 repositories", "main")));
        assert!(output.contains("Detached HEAD (1 repositories):\n  1. web\n"));
        assert!(output.contains("Errors (1):\n  1. broken: bad HEAD\n"));
        assert!(output.contains("Uncommitted changes (2):\n  1. web\n  2. cli\n"));
        assert!(output.ends_with("Total repositories: 4\n"));
    }

    #[test]
    fn test_json_view() {
        let json = render_json(&results()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["info"]["branch"], "main");
        assert_eq!(value[0]["info"]["status"]["ahead"], 2);
        assert_eq!(value[2]["error"], "bad HEAD");
        assert!(value[2].get("info").is_none());
    }

    #[tokio::test]
    async fn test_execute_inspects_every_repository() {
        let temp_dir = TempDir::new().unwrap();
        fake_repos(temp_dir.path(), &["a", "b"]);

        let mut git = MockGitOperations::new();
        git.expect_current_branch()
            .times(2)
            .returning(|_| Ok("main".to_string()));
        git.expect_is_dirty().returning(|_| false);
        git.expect_branch_status().returning(|_, _| None);
        git.expect_all_branches().never();

        let status = BranchCommand::new(BranchView::Summary)
            .execute(&context(temp_dir.path(), git))
            .await
            .unwrap();
        assert_eq!(status, CommandStatus::Success);
    }
}
