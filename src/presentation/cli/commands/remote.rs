use anyhow::Result;
use colored::Color;
use std::fmt::Write;
use std::sync::Arc;

use crate::application::services::repository_scope::discover_repositories;
use crate::application::use_cases::inspect_remotes::InspectRemotesTask;
use crate::application::use_cases::task_executor::{OperationResult, TaskExecutor};
use crate::domain::value_objects::remote_kind::{shorten_url, RemoteKind};
use crate::infrastructure::git::RemoteMap;
use crate::presentation::ui::display::DisplayHelper;

use super::{no_repositories_message, CommandContext, CommandStatus};

const TABLE_WIDTH: usize = 90;
const URL_WIDTH: usize = 25;

/// Output layout of the remote command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteView {
    Detailed,
    Simple,
    /// `<path>:<name>:<url>` lines for scripts
    Raw,
}

impl RemoteView {
    pub fn from_flags(simple: bool, raw: bool) -> Self {
        if raw {
            RemoteView::Raw
        } else if simple {
            RemoteView::Simple
        } else {
            RemoteView::Detailed
        }
    }
}

/// Handler for the remote command
pub struct RemoteCommand {
    pub view: RemoteView,
}

impl RemoteCommand {
    pub fn new(view: RemoteView) -> Self {
        Self { view }
    }

    pub async fn execute(&self, ctx: &CommandContext) -> Result<CommandStatus> {
        let repos = discover_repositories(&ctx.config).await?;
        if repos.is_empty() {
            if self.view == RemoteView::Raw {
                eprintln!("{}", no_repositories_message(&ctx.config));
            } else {
                ctx.display.warning(&no_repositories_message(&ctx.config));
            }
            return Ok(CommandStatus::Success);
        }

        let task = InspectRemotesTask::new(Arc::clone(&ctx.git));
        let results = TaskExecutor::from_config(&ctx.config)
            .run_all(&repos, Arc::new(task))
            .await;

        let output = match self.view {
            RemoteView::Detailed => render_detailed(&results, &ctx.display),
            RemoteView::Simple => render_simple(&results, &ctx.display),
            RemoteView::Raw => render_raw(&results),
        };
        print!("{}", output);

        Ok(CommandStatus::Success)
    }
}

/// Colon-delimited lines keyed by absolute repository path. Never colored.
pub fn render_raw(results: &[OperationResult<RemoteMap>]) -> String {
    let mut out = String::new();

    for result in results {
        let path = result.repository.path.display();
        match &result.outcome {
            Ok(remotes) if remotes.is_empty() => {
                let _ = writeln!(out, "{}: NO_REMOTES", path);
            }
            Ok(remotes) => {
                for (name, url) in remotes {
                    let _ = writeln!(out, "{}:{}:{}", path, name, url);
                }
            }
            Err(e) => {
                let _ = writeln!(out, "{}: ERROR: {}", path, e);
            }
        }
    }

    out
}

/// Table of Repository / Remote / URL / Type
pub fn render_simple(results: &[OperationResult<RemoteMap>], display: &DisplayHelper) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}{}{}{}",
        display.pad(&display.bold("Repository"), 30),
        display.pad(&display.bold("Remote"), 15),
        display.pad(&display.bold("URL"), 30),
        display.bold("Type")
    );
    let _ = writeln!(out, "{}", display.separator(TABLE_WIDTH));

    for result in results {
        let repo = display.pad(&display.format_repo(&result.repository.display_path), 30);
        match &result.outcome {
            Ok(remotes) if remotes.is_empty() => {
                let _ = writeln!(
                    out,
                    "{}{}{}{}",
                    repo,
                    display.pad(&display.paint("LOCAL_ONLY", Color::Yellow), 15),
                    display.pad("-", 30),
                    "-"
                );
            }
            Ok(remotes) => {
                for (name, url) in remotes {
                    let _ = writeln!(
                        out,
                        "{}{}{}{}",
                        repo,
                        display.pad(&display.paint(name, Color::Green), 15),
                        display.pad(&shorten_url(url, URL_WIDTH), 30),
                        RemoteKind::classify(url)
                    );
                }
            }
            Err(e) => {
                let _ = writeln!(
                    out,
                    "{}{}{}",
                    repo,
                    display.pad(&display.paint("ERROR", Color::Red), 15),
                    e
                );
            }
        }
    }

    let _ = writeln!(out, "{}", display.separator(TABLE_WIDTH));
    let _ = writeln!(out, "Total repositories: {}", results.len());
    out
}

/// Per repository: name, path and each remote with its hosting kind
pub fn render_detailed(results: &[OperationResult<RemoteMap>], display: &DisplayHelper) -> String {
    let mut out = String::new();

    for result in results {
        let repo = &result.repository;
        let _ = writeln!(out, "► {}", display.format_repo(&repo.name));
        let _ = writeln!(out, "  Path: {}", display.format_path(&repo.display_path));

        match &result.outcome {
            Ok(remotes) if remotes.is_empty() => {
                let _ = writeln!(out, "  {}", display.paint("No remotes configured", Color::Yellow));
            }
            Ok(remotes) => {
                for (name, url) in remotes {
                    let _ = writeln!(
                        out,
                        "  {}: {} ({})",
                        display.paint(name, Color::Green),
                        url,
                        RemoteKind::classify(url)
                    );
                }
            }
            Err(e) => {
                let _ = writeln!(out, "  {} {}", display.failure_mark(), e);
            }
        }
        out.push('\n');
    }

    out
}
