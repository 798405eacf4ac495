use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, warn};

use super::git_interface::{BranchStatus, GitError, GitOperations, RemoteMap};
use crate::domain::value_objects::branch_name::BranchName;
use crate::infrastructure::process::{CommandExecutor, CommandExecutorError};

/// Git operations implemented by shelling out to the `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    executor: CommandExecutor,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            executor: CommandExecutor::new("git").with_env("GIT_TERMINAL_PROMPT", "0"),
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom executable path
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executor = self.executor.with_program(executable);
        self
    }

    /// Bound every git invocation by `timeout_seconds`
    pub fn with_timeout(mut self, timeout_seconds: Option<u64>) -> Self {
        self.executor = self.executor.with_timeout(timeout_seconds);
        self
    }

    /// Check if the git executable is available
    pub async fn check_availability(&self) -> Result<(), GitError> {
        if self.executor.is_available().await {
            Ok(())
        } else {
            Err(GitError::SpawnFailed {
                message: format!("{} is not installed or not in PATH", self.executor.program()),
            })
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.executor.program(), args.join(" "))
    }

    /// Execute a git command in `working_dir` and return its trimmed stdout
    async fn execute_git_command(&self, args: &[&str], working_dir: &Path) -> Result<String, GitError> {
        let command = self.describe(args);
        debug!(command = %command, path = %working_dir.display(), "running git");

        let output = self.executor.run(args, working_dir).await.map_err(|e| match e {
            CommandExecutorError::Timeout { seconds, .. } => GitError::Timeout {
                command: command.clone(),
                timeout_seconds: seconds,
            },
            other => GitError::SpawnFailed {
                message: other.to_string(),
            },
        })?;

        if !output.success() {
            return Err(GitError::command_failed(
                command,
                output.exit_code(),
                output.diagnostic(),
            ));
        }

        Ok(output.stdout.trim().to_string())
    }

    async fn upstream_of(&self, path: &Path, branch: &str) -> Option<String> {
        let upstream_ref = format!("{}@{{upstream}}", branch);
        self.execute_git_command(&["rev-parse", "--abbrev-ref", &upstream_ref], path)
            .await
            .ok()
            .filter(|upstream| !upstream.is_empty())
    }

    fn parse_left_right(output: &str) -> Option<BranchStatus> {
        let mut counts = output.split_whitespace().map(str::parse::<usize>);
        match (counts.next(), counts.next()) {
            (Some(Ok(ahead)), Some(Ok(behind))) => Some(BranchStatus::new(ahead, behind)),
            _ => None,
        }
    }

    /// Whether `ls-remote` output names exactly `refname`.
    /// Its patterns match on any trailing path, so `x` also hits `feature/x`.
    fn lists_ref(ls_remote: &str, refname: &str) -> bool {
        ls_remote
            .lines()
            .filter_map(|line| line.split_whitespace().nth(1))
            .any(|name| name == refname)
    }

    /// `refs/heads/main` -> `main`, `refs/remotes/origin/x` -> `remotes/origin/x`,
    /// `refs/tags/v1` -> `tags/v1`. Symbolic `remotes/<r>/HEAD` entries are dropped.
    fn normalize_ref(refname: &str) -> Option<String> {
        let rest = refname.strip_prefix("refs/")?;
        if let Some(local) = rest.strip_prefix("heads/") {
            return Some(local.to_string());
        }
        if rest.starts_with("remotes/") && rest.ends_with("/HEAD") {
            return None;
        }
        Some(rest.to_string())
    }
}

#[async_trait]
impl GitOperations for GitCli {
    async fn is_git_repository(&self, path: &Path) -> bool {
        matches!(
            self.execute_git_command(&["rev-parse", "--is-inside-work-tree"], path).await.as_deref(),
            Ok("true")
        )
    }

    async fn current_branch(&self, path: &Path) -> Result<String, GitError> {
        match self.execute_git_command(&["rev-parse", "--abbrev-ref", "HEAD"], path).await {
            Ok(branch) => Ok(branch),
            Err(err) => {
                // Unborn branch: HEAD does not resolve yet but still names a branch
                match self
                    .execute_git_command(&["symbolic-ref", "--short", "-q", "HEAD"], path)
                    .await
                {
                    Ok(branch) if !branch.is_empty() => Ok(branch),
                    _ => Err(err),
                }
            }
        }
    }

    async fn is_dirty(&self, path: &Path) -> bool {
        match self.try_is_dirty(path).await {
            Ok(dirty) => dirty,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "status check failed, assuming clean");
                false
            }
        }
    }

    async fn try_is_dirty(&self, path: &Path) -> Result<bool, GitError> {
        let output = self.execute_git_command(&["status", "--porcelain"], path).await?;
        Ok(!output.is_empty())
    }

    async fn branch_status(&self, path: &Path, branch: &str) -> Option<BranchStatus> {
        if branch == "HEAD" {
            return None;
        }
        let upstream = self.upstream_of(path, branch).await?;
        let range = format!("{}...{}", branch, upstream);
        let output = self
            .execute_git_command(&["rev-list", "--left-right", "--count", &range], path)
            .await
            .ok()?;
        Self::parse_left_right(&output)
    }

    async fn remotes(&self, path: &Path) -> Result<RemoteMap, GitError> {
        let names = self.execute_git_command(&["remote"], path).await?;
        let mut remotes = RemoteMap::new();
        for name in names.lines().map(str::trim).filter(|n| !n.is_empty()) {
            let url = self.execute_git_command(&["remote", "get-url", name], path).await?;
            remotes.insert(name.to_string(), url);
        }
        Ok(remotes)
    }

    async fn all_branches(&self, path: &Path) -> Result<Vec<String>, GitError> {
        let output = self
            .execute_git_command(
                &[
                    "for-each-ref",
                    "--format=%(refname)",
                    "refs/heads",
                    "refs/remotes",
                    "refs/tags",
                ],
                path,
            )
            .await?;
        Ok(output.lines().filter_map(Self::normalize_ref).collect())
    }

    async fn fetch_all(&self, path: &Path) -> Result<(), GitError> {
        self.execute_git_command(&["fetch", "--all"], path).await?;
        Ok(())
    }

    async fn pull(&self, path: &Path) -> Result<(), GitError> {
        self.fetch_all(path).await?;
        self.execute_git_command(&["pull"], path).await?;
        Ok(())
    }

    async fn reset_hard(&self, path: &Path) -> Result<(), GitError> {
        self.execute_git_command(&["reset", "--hard"], path).await?;
        Ok(())
    }

    async fn clean_untracked(&self, path: &Path) -> Result<(), GitError> {
        self.execute_git_command(&["clean", "-f", "-d"], path).await?;
        Ok(())
    }

    async fn checkout(&self, path: &Path, branch: &BranchName, create: bool) -> Result<(), GitError> {
        match self.execute_git_command(&["checkout", branch.as_str()], path).await {
            Ok(_) => Ok(()),
            Err(_) if create => {
                debug!(branch = %branch, path = %path.display(), "branch missing, creating");
                self.execute_git_command(&["checkout", "-b", branch.as_str()], path)
                    .await
                    .map(|_| ())
            }
            Err(e) => Err(e),
        }
    }

    async fn checkout_tracking(
        &self,
        path: &Path,
        branch: &BranchName,
        remote: &str,
    ) -> Result<(), GitError> {
        let local = branch.without_remote(remote);
        let wanted = format!("refs/heads/{}", local);
        let heads = self
            .execute_git_command(&["ls-remote", "--heads", remote, &wanted], path)
            .await?;
        if !Self::lists_ref(&heads, &wanted) {
            return Err(GitError::remote_branch_not_found(remote, local));
        }

        let start_point = format!("{}/{}", remote, local);
        self.execute_git_command(&["checkout", "--track", "-b", local, &start_point], path)
            .await?;
        Ok(())
    }
}
