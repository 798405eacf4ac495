use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::use_cases::task_executor::{RepositoryTask, TaskError};
use crate::domain::entities::repository::RepositoryRef;
use crate::domain::entities::run_config::DEFAULT_REMOTE;
use crate::domain::value_objects::branch_name::BranchName;
use crate::infrastructure::git::{GitError, GitOperations};

/// How a repository is moved onto the target branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchMode {
    /// Check out an existing branch
    Plain,
    /// Check out the branch, creating it from HEAD when missing
    CreateIfMissing,
    /// Create a local branch tracking `<remote>/<branch>`
    TrackRemote { fetch: bool },
    /// Discard all local changes, then check out (optionally creating)
    ForceDiscard { create: bool },
}

impl SwitchMode {
    /// Resolve command-line flags. Force wins over track, track over create.
    pub fn from_flags(create: bool, track: bool, fetch: bool, force: bool) -> Self {
        if force {
            SwitchMode::ForceDiscard { create }
        } else if track {
            SwitchMode::TrackRemote { fetch }
        } else if create {
            SwitchMode::CreateIfMissing
        } else {
            SwitchMode::Plain
        }
    }

    /// Whether this mode throws away uncommitted work
    pub fn is_destructive(&self) -> bool {
        matches!(self, SwitchMode::ForceDiscard { .. })
    }
}

/// Failed step of a switch. The message names the step.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("fetch failed: {0}")]
    FetchFailed(#[source] GitError),

    #[error("reset failed: {0}")]
    ResetFailed(#[source] GitError),

    #[error("clean failed: {0}")]
    CleanFailed(#[source] GitError),

    #[error("switch failed: {0}")]
    CheckoutFailed(#[source] GitError),

    /// Reset and clean already ran; only the checkout failed
    #[error("work tree reset and cleaned; switch failed: {0}")]
    CheckoutAfterDiscardFailed(#[source] GitError),

    #[error("tracking branch creation failed: remote branch {remote}/{branch} does not exist")]
    RemoteBranchNotFound { remote: String, branch: String },

    #[error("tracking branch creation failed: {0}")]
    TrackingFailed(#[source] GitError),
}

impl SwitchError {
    fn from_tracking(error: GitError) -> Self {
        match error {
            GitError::RemoteBranchNotFound { remote, branch } => {
                SwitchError::RemoteBranchNotFound { remote, branch }
            }
            other => SwitchError::TrackingFailed(other),
        }
    }
}

/// Moves one repository onto a branch according to a [`SwitchMode`].
///
/// Steps run strictly in order and the first failing step ends the run.
/// Steps that already succeeded are not rolled back, so a forced switch whose
/// checkout fails still leaves the work tree reset and clean.
pub struct SwitchBranchUseCase {
    git: Arc<dyn GitOperations>,
    branch: BranchName,
    mode: SwitchMode,
    remote: String,
}

impl SwitchBranchUseCase {
    pub fn new(git: Arc<dyn GitOperations>, branch: BranchName, mode: SwitchMode) -> Self {
        Self {
            git,
            branch,
            mode,
            remote: DEFAULT_REMOTE.to_string(),
        }
    }

    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    pub fn branch(&self) -> &BranchName {
        &self.branch
    }

    pub fn mode(&self) -> SwitchMode {
        self.mode
    }

    /// Run the state machine for one repository and return the success message
    pub async fn switch(&self, repo: &RepositoryRef) -> Result<String, SwitchError> {
        let path = repo.path.as_path();
        debug!(repo = %repo.display_path, branch = %self.branch, mode = ?self.mode, "switching");

        match self.mode {
            SwitchMode::Plain => {
                self.git
                    .checkout(path, &self.branch, false)
                    .await
                    .map_err(SwitchError::CheckoutFailed)?;
                Ok(self.branch.to_string())
            }
            SwitchMode::CreateIfMissing => {
                self.git
                    .checkout(path, &self.branch, true)
                    .await
                    .map_err(SwitchError::CheckoutFailed)?;
                Ok(self.branch.to_string())
            }
            SwitchMode::TrackRemote { fetch } => {
                if fetch {
                    self.git
                        .fetch_all(path)
                        .await
                        .map_err(SwitchError::FetchFailed)?;
                }
                self.git
                    .checkout_tracking(path, &self.branch, &self.remote)
                    .await
                    .map_err(SwitchError::from_tracking)?;
                Ok(format!("tracking branch: {}", self.branch))
            }
            SwitchMode::ForceDiscard { create } => {
                self.git
                    .reset_hard(path)
                    .await
                    .map_err(SwitchError::ResetFailed)?;
                self.git
                    .clean_untracked(path)
                    .await
                    .map_err(SwitchError::CleanFailed)?;

                if let Err(e) = self.git.checkout(path, &self.branch, create).await {
                    warn!(repo = %repo.display_path, "work tree discarded but checkout failed");
                    return Err(SwitchError::CheckoutAfterDiscardFailed(e));
                }

                if create {
                    Ok(format!("created and switched to: {}", self.branch))
                } else {
                    Ok(format!("switched to: {}", self.branch))
                }
            }
        }
    }
}

#[async_trait]
impl RepositoryTask for SwitchBranchUseCase {
    type Output = String;

    async fn run(&self, repo: &RepositoryRef) -> Result<String, TaskError> {
        Ok(self.switch(repo).await?)
    }
}
