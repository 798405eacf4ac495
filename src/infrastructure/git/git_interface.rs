use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::domain::value_objects::branch_name::BranchName;

/// Remote name to fetch URL, ordered by name
pub type RemoteMap = BTreeMap<String, String>;

/// Position of a branch relative to its upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BranchStatus {
    /// Commits on the branch not on its upstream
    pub ahead: usize,
    /// Commits on the upstream not on the branch
    pub behind: usize,
}

impl BranchStatus {
    pub fn new(ahead: usize, behind: usize) -> Self {
        Self { ahead, behind }
    }

    pub fn is_in_sync(&self) -> bool {
        self.ahead == 0 && self.behind == 0
    }
}

impl fmt::Display for BranchStatus {
    /// `↑N ↓M`, omitting zero sides; empty when in sync
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ahead > 0 {
            parts.push(format!("↑{}", self.ahead));
        }
        if self.behind > 0 {
            parts.push(format!("↓{}", self.behind));
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Failures of a single git invocation against a single repository
#[derive(Debug, Error)]
pub enum GitError {
    #[error("{stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("`{command}` timed out after {timeout_seconds} seconds")]
    Timeout {
        command: String,
        timeout_seconds: u64,
    },

    #[error("could not run git: {message}")]
    SpawnFailed { message: String },

    #[error("remote branch {remote}/{branch} does not exist")]
    RemoteBranchNotFound { remote: String, branch: String },
}

impl GitError {
    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    pub fn remote_branch_not_found(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self::RemoteBranchNotFound {
            remote: remote.into(),
            branch: branch.into(),
        }
    }
}

/// Everything the fan-out commands need from git, for one repository at a time.
///
/// Implementations must be safe to call concurrently for distinct paths. Each
/// call is independent; nothing is cached between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitOperations: Send + Sync {
    /// Whether `path` lies inside a git work tree
    async fn is_git_repository(&self, path: &Path) -> bool;

    /// Current branch name, or `HEAD` when detached
    async fn current_branch(&self, path: &Path) -> Result<String, GitError>;

    /// Whether the work tree has uncommitted changes.
    ///
    /// Fails open: a status error is logged and reported as clean.
    async fn is_dirty(&self, path: &Path) -> bool;

    /// Same as [`GitOperations::is_dirty`], but surfaces the status error
    async fn try_is_dirty(&self, path: &Path) -> Result<bool, GitError>;

    /// Ahead/behind counts against the upstream of `branch`, `None` when the
    /// branch has no upstream
    async fn branch_status(&self, path: &Path, branch: &str) -> Option<BranchStatus>;

    /// Configured remotes and their URLs
    async fn remotes(&self, path: &Path) -> Result<RemoteMap, GitError>;

    /// Every local branch, remote-tracking branch and tag, as
    /// `name`, `remotes/<remote>/<name>` or `tags/<name>`
    async fn all_branches(&self, path: &Path) -> Result<Vec<String>, GitError>;

    /// `git fetch --all`
    async fn fetch_all(&self, path: &Path) -> Result<(), GitError>;

    /// `git fetch --all` followed by `git pull`
    async fn pull(&self, path: &Path) -> Result<(), GitError>;

    /// `git reset --hard`
    async fn reset_hard(&self, path: &Path) -> Result<(), GitError>;

    /// `git clean -f -d`
    async fn clean_untracked(&self, path: &Path) -> Result<(), GitError>;

    /// Check out `branch`; with `create`, fall back to creating it from HEAD
    async fn checkout(&self, path: &Path, branch: &BranchName, create: bool)
        -> Result<(), GitError>;

    /// Create a local branch tracking `<remote>/<branch>` and check it out
    async fn checkout_tracking(
        &self,
        path: &Path,
        branch: &BranchName,
        remote: &str,
    ) -> Result<(), GitError>;
}
